//! Airport and route data
//!
//! Records arrive already parsed from a [`RouteDataSource`]. Airports are
//! projected once into a [`PositionIndex`]; routes are kept as id pairs and
//! resolved against the index while scheduling.

mod position_index;

pub use position_index::PositionIndex;

use serde::{Serialize, Deserialize};

use crate::core::Result;

/// Airport record supplied by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    /// Airport identifier routes refer to
    pub id: String,
    /// Latitude in degrees
    pub lat: f32,
    /// Longitude in degrees
    pub lon: f32,
}

impl AirportRecord {
    /// Create a new airport record
    pub fn new(id: impl Into<String>, lat: f32, lon: f32) -> Self {
        Self { id: id.into(), lat, lon }
    }
}

/// Route between two airports
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Departure airport id
    pub source_airport_id: String,
    /// Arrival airport id
    pub destination_airport_id: String,
}

impl Route {
    /// Create a new route
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source_airport_id: source.into(),
            destination_airport_id: destination.into(),
        }
    }
}

/// Provider of parsed airport and route records
///
/// Implementations own whatever parsing or loading is needed; the scheduler
/// only sees the resulting records.
pub trait RouteDataSource {
    /// All airports known to the source
    fn airports(&self) -> Result<Vec<AirportRecord>>;

    /// All routes in visitation order
    fn routes(&self) -> Result<Vec<Route>>;
}

/// Data source over records that are already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    airports: Vec<AirportRecord>,
    routes: Vec<Route>,
}

impl InMemoryDataSource {
    /// Create a data source from pre-parsed records
    pub fn new(airports: Vec<AirportRecord>, routes: Vec<Route>) -> Self {
        Self { airports, routes }
    }
}

impl RouteDataSource for InMemoryDataSource {
    fn airports(&self) -> Result<Vec<AirportRecord>> {
        Ok(self.airports.clone())
    }

    fn routes(&self) -> Result<Vec<Route>> {
        Ok(self.routes.clone())
    }
}
