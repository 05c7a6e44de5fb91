#![allow(dead_code)]

use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use store_locator::application::services::{LocationEnricher, StoreService};
use store_locator::infrastructure::lookup::{OpenCageClient, ViaCepClient};
use store_locator::infrastructure::persistence::PgStoreRepository;
use store_locator::state::AppState;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TIMEOUT_SECS: u64 = 5;
pub const TEST_API_KEY: &str = "test-opencage-key";

pub fn viacep_base(server: &MockServer) -> String {
    format!("{}/ws", server.uri())
}

pub fn opencage_base(server: &MockServer) -> String {
    format!("{}/geocode/v1", server.uri())
}

pub fn viacep_client(server: &MockServer) -> ViaCepClient {
    ViaCepClient::with_base_url(&viacep_base(server), TEST_TIMEOUT_SECS).unwrap()
}

pub fn opencage_client(server: &MockServer) -> OpenCageClient {
    OpenCageClient::with_base_url(TEST_API_KEY, &opencage_base(server), TEST_TIMEOUT_SECS).unwrap()
}

/// Mounts ViaCEP and OpenCage answers for a known postal code.
pub async fn mount_postal_code(server: &MockServer, cep: &str, city: &str, lat: f64, lng: f64) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{cep}/json/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cep": format!("{}-{}", &cep[..5], &cep[5..]),
            "logradouro": "Rua de Teste",
            "complemento": "",
            "bairro": "Centro",
            "localidade": city,
            "uf": "SP",
            "estado": "São Paulo"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geocode/v1/json"))
        .and(query_param("q", cep))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "geometry": { "lat": lat, "lng": lng } }],
            "status": { "code": 200, "message": "OK" }
        })))
        .mount(server)
        .await;
}

/// Mounts a ViaCEP `{"erro": true}` answer.
pub async fn mount_unknown_postal_code(server: &MockServer, cep: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{cep}/json/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "erro": true })))
        .mount(server)
        .await;
}

pub fn create_test_state(pool: PgPool, lookups: &MockServer) -> AppState {
    let repository = Arc::new(PgStoreRepository::new(Arc::new(pool)));
    let enricher = LocationEnricher::new(
        Arc::new(viacep_client(lookups)),
        Arc::new(opencage_client(lookups)),
    );

    AppState::new(StoreService::new(repository, enricher))
}

/// Inserts an already-enriched store directly, bypassing the lookups.
pub async fn insert_store(pool: &PgPool, name: &str, cep: &str, lat: f64, lng: f64) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO stores (name, postal_code, street, neighborhood, city, state, latitude, longitude)
        VALUES ($1, $2, 'Rua de Teste', 'Centro', 'São Paulo', 'São Paulo', $3, $4)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(cep)
    .bind(lat)
    .bind(lng)
    .fetch_one(pool)
    .await
    .unwrap()
}
