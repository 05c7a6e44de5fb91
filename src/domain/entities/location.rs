//! Address and resolved location of a postal code.

use crate::domain::geo::Coordinate;
use serde::Serialize;

/// Postal address derived from a postal code.
///
/// Every field is optional: the lookup service leaves some of them blank for
/// codes that cover a whole city or a single large customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Address and coordinate resolved together for one postal code.
///
/// The only way to obtain one outside tests is
/// [`crate::application::services::LocationEnricher::enrich`], which keeps the
/// two halves consistent with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub address: Address,
    pub coordinate: Coordinate,
}

impl Location {
    pub fn new(address: Address, coordinate: Coordinate) -> Self {
        Self {
            address,
            coordinate,
        }
    }
}
