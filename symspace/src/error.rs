//! Error types used by the crate.

use symspace_types::error::SymspaceTypesError;
use thiserror::Error;

/// Symspace error type.
///
/// A position that is not contained in any region is not an error: the resolver returns an empty list in
/// that case. Failures of a [`RegionStore`](crate::store::RegionStore) are returned as the store's own error
/// type.
#[derive(Debug, Error)]
pub enum SymspaceError {
    /// The boundary descriptor cannot be turned into a ring.
    #[error("malformed boundary: {0}")]
    MalformedBoundary(String),
    /// Interchange payload is missing required data.
    #[error("failed to decode region: {0}")]
    Decode(String),
    /// Interchange payload names a region type that is not registered.
    #[error("unknown region type: {0}")]
    UnknownRegionType(String),
    /// Region properties cannot be serialized.
    #[error("failed to encode region: {0}")]
    Encode(#[from] serde_json::Error),
    /// Payload is not valid GeoJSON.
    #[error("invalid geojson: {0}")]
    GeoJson(#[from] Box<geojson::Error>),
    /// Geometry conversion error.
    #[error(transparent)]
    Types(#[from] SymspaceTypesError),
}

impl From<geojson::Error> for SymspaceError {
    fn from(value: geojson::Error) -> Self {
        Self::GeoJson(Box::new(value))
    }
}
