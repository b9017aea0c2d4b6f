use std::collections::HashMap;

use super::{AirportRecord, RouteDataSource};
use crate::core::Result;
use crate::foundation::math::Vec3;
use crate::geo::lat_lon_to_sphere;

/// Airport id to position on the globe sphere
///
/// Built once and immutable afterwards. Every stored point lies at `radius`
/// from the origin.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    positions: HashMap<String, Vec3>,
    radius: f32,
    rejected: usize,
}

impl PositionIndex {
    /// Project airport records onto a sphere of `radius`
    ///
    /// Later records with the same id replace earlier ones. Records with
    /// non-finite coordinates are skipped and counted in [`Self::rejected`].
    ///
    /// A negative or non-finite radius cannot place any point at distance
    /// `radius`, so every record is rejected and the index is empty.
    pub fn from_airports<'a>(airports: impl IntoIterator<Item = &'a AirportRecord>, radius: f32) -> Self {
        let mut positions = HashMap::new();
        let mut rejected = 0;

        if !radius.is_finite() || radius < 0.0 {
            rejected = airports.into_iter().count();
            log::warn!("Cannot project airports onto radius {}, rejecting {} records", radius, rejected);
            return Self { positions, radius, rejected };
        }

        if radius <= 0.0 {
            log::warn!("Projecting airports onto a zero radius, every position is the origin");
        }

        for airport in airports {
            if !airport.lat.is_finite() || !airport.lon.is_finite() {
                log::warn!(
                    "Rejecting airport '{}' with non-finite coordinates ({}, {})",
                    airport.id, airport.lat, airport.lon
                );
                rejected += 1;
                continue;
            }

            let position = lat_lon_to_sphere(airport.lat, airport.lon, radius);
            if positions.insert(airport.id.clone(), position).is_some() {
                log::debug!("Duplicate airport id '{}', keeping the later record", airport.id);
            }
        }

        log::info!(
            "Built PositionIndex with {} airports on radius {} ({} rejected)",
            positions.len(), radius, rejected
        );

        Self { positions, radius, rejected }
    }

    /// Build the index from a data source's airports
    pub fn from_source(source: &dyn RouteDataSource, radius: f32) -> Result<Self> {
        let airports = source.airports()?;
        Ok(Self::from_airports(&airports, radius))
    }

    /// Position of an airport, if known
    pub fn get(&self, id: &str) -> Option<&Vec3> {
        self.positions.get(id)
    }

    /// Whether the airport id is known
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Resolve both endpoints of a route
    pub fn endpoints(&self, source: &str, destination: &str) -> Option<(Vec3, Vec3)> {
        Some((*self.get(source)?, *self.get(destination)?))
    }

    /// Number of indexed airports
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no airports are indexed
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sphere radius the positions were projected onto
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Records skipped for non-finite coordinates or an unusable radius
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
