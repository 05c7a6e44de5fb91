//! Store entity representing a physical retail location.

use chrono::{DateTime, Utc};

use crate::domain::entities::location::{Address, Location};
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;
use crate::domain::proximity::Located;

/// A persisted store.
///
/// Address and coordinate always come from the same enrichment of
/// `postal_code`; clients can only change them by changing the postal code.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub postal_code: PostalCode,
    pub address: Address,
    pub coordinate: Coordinate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Creates a new Store instance.
    pub fn new(
        id: i64,
        name: String,
        postal_code: PostalCode,
        location: Location,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            postal_code,
            address: location.address,
            coordinate: location.coordinate,
            created_at,
            updated_at,
        }
    }
}

impl Located for Store {
    fn postal_code(&self) -> &PostalCode {
        &self.postal_code
    }

    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// Input data for inserting an enriched store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStore {
    pub name: String,
    pub postal_code: PostalCode,
    pub location: Location,
}

/// A postal code change together with its freshly resolved location.
///
/// Applied as a whole: the previous address and coordinate are replaced,
/// never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub postal_code: PostalCode,
    pub location: Location,
}

/// Partial update for an existing store.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePatch {
    pub name: Option<String>,
    pub relocation: Option<Relocation>,
}

impl StorePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.relocation.is_none()
    }
}
