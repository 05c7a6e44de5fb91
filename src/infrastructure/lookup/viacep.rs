//! ViaCEP address lookup.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{build_client, parse_base_url};
use crate::domain::entities::Address;
use crate::domain::postal_code::PostalCode;
use crate::domain::resolvers::{AddressResolver, LocationError};

const SERVICE: &str = "viacep";
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Raw ViaCEP payload.
///
/// Unknown codes come back as `200 {"erro": true}` (older deployments send
/// the string `"true"`).
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<Value>,
    cep: Option<String>,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    estado: Option<String>,
    uf: Option<String>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_address(self, postal_code: &PostalCode) -> Result<Address, LocationError> {
        if self.is_error() {
            return Err(LocationError::InvalidPostalCode {
                postal_code: postal_code.to_string(),
            });
        }

        if non_blank(self.cep).is_none() {
            return Err(LocationError::unavailable(SERVICE, "response has no 'cep' field"));
        }

        Ok(Address {
            street: non_blank(self.logradouro),
            neighborhood: non_blank(self.bairro),
            city: non_blank(self.localidade),
            state: non_blank(self.estado).or_else(|| non_blank(self.uf)),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Address resolver backed by the ViaCEP REST API.
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
}

impl ViaCepClient {
    /// Creates a client pointed at the public ViaCEP endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::LookupUnavailable`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, LocationError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::LookupUnavailable`] if the HTTP client cannot be
    /// built or `base_url` does not parse.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, LocationError> {
        Ok(Self {
            client: build_client(SERVICE, timeout_secs)?,
            base_url: parse_base_url(SERVICE, base_url)?,
        })
    }

    fn address_url(&self, postal_code: &PostalCode) -> Result<Url, LocationError> {
        self.base_url
            .join(&format!("{postal_code}/json/"))
            .map_err(|e| LocationError::unavailable(SERVICE, e))
    }
}

#[async_trait]
impl AddressResolver for ViaCepClient {
    async fn resolve(&self, postal_code: &PostalCode) -> Result<Address, LocationError> {
        let url = self.address_url(postal_code)?;
        tracing::debug!(%url, "requesting address");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LocationError::unavailable(SERVICE, e))?;

        // ViaCEP answers 400 for codes it cannot even parse.
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(LocationError::InvalidPostalCode {
                postal_code: postal_code.to_string(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|e| LocationError::unavailable(SERVICE, e))?;

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| LocationError::unavailable(SERVICE, format!("malformed body: {e}")))?;

        body.into_address(postal_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code() -> PostalCode {
        PostalCode::parse("01310100").unwrap()
    }

    fn parse(body: Value) -> Result<Address, LocationError> {
        serde_json::from_value::<ViaCepResponse>(body)
            .unwrap()
            .into_address(&code())
    }

    #[test]
    fn test_parse_full_address() {
        let address = parse(json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "estado": "São Paulo"
        }))
        .unwrap();

        assert_eq!(address.street.as_deref(), Some("Avenida Paulista"));
        assert_eq!(address.neighborhood.as_deref(), Some("Bela Vista"));
        assert_eq!(address.city.as_deref(), Some("São Paulo"));
        assert_eq!(address.state.as_deref(), Some("São Paulo"));
    }

    #[test]
    fn test_parse_falls_back_to_uf_and_blanks_become_none() {
        let address = parse(json!({
            "cep": "78890-000",
            "logradouro": "",
            "bairro": " ",
            "localidade": "Sorriso",
            "uf": "MT"
        }))
        .unwrap();

        assert!(address.street.is_none());
        assert!(address.neighborhood.is_none());
        assert_eq!(address.state.as_deref(), Some("MT"));
    }

    #[test]
    fn test_parse_error_flag_bool_and_string() {
        assert!(matches!(
            parse(json!({ "erro": true })),
            Err(LocationError::InvalidPostalCode { .. })
        ));
        assert!(matches!(
            parse(json!({ "erro": "true" })),
            Err(LocationError::InvalidPostalCode { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(matches!(
            parse(json!({ "message": "rate limited" })),
            Err(LocationError::LookupUnavailable { .. })
        ));
    }

    #[test]
    fn test_address_url_keeps_base_path() {
        let client = ViaCepClient::with_base_url("http://localhost:1234/ws/", 5).unwrap();

        let url = client.address_url(&code()).unwrap();

        assert_eq!(url.as_str(), "http://localhost:1234/ws/01310100/json/");
    }
}
