use ahash::{HashMap, HashMapExt};

use super::Region;

/// Resolves parent references of regions.
///
/// A region only stores the uid of its parent. Operations that need the ancestor chain (coordinate
/// conversion, containment of positions given in another frame) receive a lookup to resolve these uids.
pub trait RegionLookup {
    /// Region with the given uid, if known.
    fn region(&self, uid: &str) -> Option<&Region>;
}

/// Lookup that knows no regions. Regions resolved with it only use their own frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl RegionLookup for Detached {
    fn region(&self, _uid: &str) -> Option<&Region> {
        None
    }
}

impl RegionLookup for [Region] {
    fn region(&self, uid: &str) -> Option<&Region> {
        self.iter().find(|region| region.uid() == uid)
    }
}

impl RegionLookup for Vec<Region> {
    fn region(&self, uid: &str) -> Option<&Region> {
        self.as_slice().region(uid)
    }
}

/// Uid index over a borrowed set of regions.
///
/// When several regions share a uid, the first one in iteration order is kept.
#[derive(Debug, Default)]
pub struct RegionIndex<'a> {
    regions: HashMap<&'a str, &'a Region>,
}

impl<'a> RegionIndex<'a> {
    /// Indexes the given regions.
    pub fn new(universe: impl IntoIterator<Item = &'a Region>) -> Self {
        let mut regions = HashMap::new();
        for region in universe {
            regions.entry(region.uid()).or_insert(region);
        }

        Self { regions }
    }

    /// Number of distinct uids.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over the indexed regions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Region> + '_ {
        self.regions.values().copied()
    }
}

impl RegionLookup for RegionIndex<'_> {
    fn region(&self, uid: &str) -> Option<&Region> {
        self.regions.get(uid).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionKind;

    #[test]
    fn first_uid_wins() {
        let first = Region::new(RegionKind::Room)
            .with_uid("a")
            .with_name("first");
        let second = Region::new(RegionKind::Room)
            .with_uid("a")
            .with_name("second");
        let other = Region::new(RegionKind::Floor).with_uid("b");
        let universe = [first, second, other];

        let index = RegionIndex::new(&universe);
        assert_eq!(index.len(), 2);
        assert_eq!(index.region("a").and_then(Region::name), Some("first"));
        assert!(index.region("c").is_none());
        assert!(Detached.region("a").is_none());
        assert_eq!(universe[..].region("b").map(Region::kind), Some(&RegionKind::Floor));
    }
}
