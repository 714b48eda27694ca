//! Interchange formats for regions.
//!
//! Regions are exchanged as GeoJSON features with the region's identity, type and transform stored in the
//! feature properties. A WKT polygon can be written and read for the boundary alone.

mod feature;
mod registry;
mod wkt;

pub use registry::RegionRegistry;

/// Encodes and decodes regions.
///
/// Decoding creates regions through the [`RegionRegistry`], so types registered by the application are
/// restored with their own defaults.
#[derive(Debug, Default)]
pub struct RegionCodec {
    registry: RegionRegistry,
}

impl RegionCodec {
    /// Creates a codec using the given registry.
    pub fn new(registry: RegionRegistry) -> Self {
        Self { registry }
    }

    /// Registry of region types.
    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Mutable access to the registry of region types.
    pub fn registry_mut(&mut self) -> &mut RegionRegistry {
        &mut self.registry
    }
}
