use ahash::{HashMap, HashMapExt};

use crate::error::SymspaceError;
use crate::region::{Region, RegionKind};

type Factory = Box<dyn Fn() -> Region + Send + Sync>;

/// Maps region type tags to factories creating empty regions of that type.
///
/// The default registry knows all built-in [`RegionKind`]s.
pub struct RegionRegistry {
    factories: HashMap<String, Factory>,
}

impl RegionRegistry {
    /// Creates a registry without any types.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a factory for the `tag`. A factory registered earlier for the same tag is replaced.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        factory: impl Fn() -> Region + Send + Sync + 'static,
    ) {
        self.factories.insert(tag.into(), Box::new(factory));
    }

    /// Registers a kind with a factory creating an empty region of that kind.
    pub fn register_kind(&mut self, kind: RegionKind) {
        let tag = kind.tag().to_string();
        self.register(tag, move || Region::new(kind.clone()));
    }

    /// Returns true if the `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Creates an empty region for the type `tag`. Without a tag a generic region is created.
    pub fn create(&self, tag: Option<&str>) -> Result<Region, SymspaceError> {
        let Some(tag) = tag else {
            return Ok(Region::new(RegionKind::Generic));
        };

        self.factories
            .get(tag)
            .map(|factory| factory())
            .ok_or_else(|| SymspaceError::UnknownRegionType(tag.to_string()))
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in RegionKind::builtin() {
            registry.register_kind(kind);
        }

        registry
    }
}

impl std::fmt::Debug for RegionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&String> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("RegionRegistry").field("tags", &tags).finish()
    }
}
