//! Proximity search over a snapshot of located records.
//!
//! Two query modes share one eligibility rule: a record qualifies when its
//! distance to the target is at most the radius and its postal code differs
//! from the excluded one (the query's own code, so a store is never reported
//! as near itself).
//!
//! - [`ProximityQuery::within_radius`] keeps every qualifying record in input order.
//! - [`ProximityQuery::closest`] returns the first record with the minimum distance.
//!
//! Neither mode treats an empty result as an error.

use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;

/// Default search radius in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 100.0;

/// Anything that has a postal code and a resolved position.
pub trait Located {
    fn postal_code(&self) -> &PostalCode;
    fn coordinate(&self) -> Coordinate;
}

impl<T: Located> Located for &T {
    fn postal_code(&self) -> &PostalCode {
        (**self).postal_code()
    }

    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

/// A record paired with its distance from the query target.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Parameters of a single proximity query.
#[derive(Debug, Clone, Copy)]
pub struct ProximityQuery<'a> {
    pub target: Coordinate,
    pub radius_km: f64,
    pub exclude_postal_code: Option<&'a PostalCode>,
}

impl<'a> ProximityQuery<'a> {
    /// Query around `target` with the default radius and no exclusion.
    pub fn new(target: Coordinate) -> Self {
        Self {
            target,
            radius_km: DEFAULT_RADIUS_KM,
            exclude_postal_code: None,
        }
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn excluding(mut self, postal_code: &'a PostalCode) -> Self {
        self.exclude_postal_code = Some(postal_code);
        self
    }

    /// Distance to `item` if it is eligible for this query.
    fn score<T: Located>(&self, item: &T) -> Option<f64> {
        if self.exclude_postal_code == Some(item.postal_code()) {
            return None;
        }

        let distance = self.target.distance_to(&item.coordinate());
        tracing::debug!(
            postal_code = %item.postal_code(),
            distance_km = format!("{distance:.2}"),
            "scored record"
        );

        (distance <= self.radius_km).then_some(distance)
    }

    /// All eligible records, in the order they were supplied.
    pub fn within_radius<T, I>(&self, items: I) -> Vec<Nearby<T>>
    where
        T: Located,
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .filter_map(|item| {
                self.score(&item)
                    .map(|distance_km| Nearby { item, distance_km })
            })
            .collect()
    }

    /// The eligible record with the smallest distance.
    ///
    /// When several records share the minimum, the first one supplied wins.
    pub fn closest<T, I>(&self, items: I) -> Option<Nearby<T>>
    where
        T: Located,
        I: IntoIterator<Item = T>,
    {
        let mut best: Option<Nearby<T>> = None;

        for item in items {
            let Some(distance_km) = self.score(&item) else {
                continue;
            };

            if best.as_ref().is_none_or(|b| distance_km < b.distance_km) {
                best = Some(Nearby { item, distance_km });
            }
        }

        best
    }
}
