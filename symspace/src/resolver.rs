//! Resolution of the regions containing a position.

use log::debug;

use crate::position::Position;
use crate::region::{Region, RegionIndex, RegionKind};
use crate::store::RegionStore;

/// What to search regions for.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Regions containing the position.
    Position(Position),
    /// Regions of the kind.
    Kind(RegionKind),
}

/// Score of regions found by a [`Query::Kind`] query.
pub const KIND_MATCH_SCORE: i32 = -1;

/// Finds the regions of `universe` matching the query.
///
/// Regions containing a position are ranked by descending priority, so the most specific region comes
/// first. Regions with equal priority keep their order in `universe`. The score of each match is its
/// priority. Kind queries return matches in `universe` order with score [`KIND_MATCH_SCORE`].
///
/// Parents are resolved within `universe`; when several regions share a uid, the first one is used.
pub fn find_containing<'a>(query: &Query, universe: &'a [Region]) -> Vec<(&'a Region, i32)> {
    match query {
        Query::Position(position) => {
            let index = RegionIndex::new(universe);
            let mut found: Vec<(&Region, i32)> = universe
                .iter()
                .filter(|region| region.is_inside_with(position, &index))
                .map(|region| (region, region.priority()))
                .collect();
            found.sort_by(|a, b| b.1.cmp(&a.1));

            debug!(
                "{} of {} regions contain {position:?}",
                found.len(),
                universe.len()
            );
            found
        }
        Query::Kind(kind) => universe
            .iter()
            .filter(|region| region.kind() == kind)
            .map(|region| (region, KIND_MATCH_SCORE))
            .collect(),
    }
}

/// Regions of `universe` whose parent is `parent`.
pub fn find_children<'a>(parent: &Region, universe: &'a [Region]) -> Vec<&'a Region> {
    universe
        .iter()
        .filter(|region| region.parent_uid() == Some(parent.uid()))
        .collect()
}

/// Resolves queries against the regions of a [`RegionStore`].
#[derive(Debug)]
pub struct Resolver<S> {
    store: S,
}

impl<S: RegionStore> Resolver<S> {
    /// Creates a resolver reading from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Regions matching the query with their scores. See [`find_containing`].
    pub async fn find_containing(&self, query: &Query) -> Result<Vec<(Region, i32)>, S::Error> {
        let universe = self.store.fetch_all().await?;
        Ok(find_containing(query, &universe)
            .into_iter()
            .map(|(region, score)| (region.clone(), score))
            .collect())
    }

    /// Regions containing `position`, most specific first.
    pub async fn find_by_position(&self, position: &Position) -> Result<Vec<Region>, S::Error> {
        Ok(self
            .find_containing(&Query::Position(*position))
            .await?
            .into_iter()
            .map(|(region, _)| region)
            .collect())
    }

    /// Regions whose parent is `parent`.
    pub async fn find_children(&self, parent: &Region) -> Result<Vec<Region>, S::Error> {
        let universe = self.store.fetch_all().await?;
        Ok(find_children(parent, &universe)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::boundary::Boundary;
    use crate::store::MemoryRegionStore;
    use crate::tests::{init_logger, pl9, FLOOR_UID, LAB_UID};

    fn lab_center(universe: &[Region]) -> Position {
        let index = RegionIndex::new(universe);
        let lab = universe
            .iter()
            .find(|r| r.uid() == LAB_UID)
            .expect("lab");
        let center = lab
            .to_geographic_with(&lab.centroid().expect("centroid").point, &index)
            .expect("anchored");

        Position::Geographic(center)
    }

    #[test]
    fn room_is_ranked_before_floor() {
        init_logger();
        let universe = pl9();

        let found = find_containing(&Query::Position(lab_center(&universe)), &universe);
        let uids: Vec<&str> = found.iter().map(|(r, _)| r.uid()).collect();
        assert_eq!(uids, vec![LAB_UID, FLOOR_UID]);
        assert_eq!(found[0].1, 2);
        assert_eq!(found[1].1, 1);
    }

    #[test]
    fn lab_accuracy() {
        let universe = pl9();
        let lab = universe
            .iter()
            .find(|r| r.uid() == LAB_UID)
            .expect("lab");

        assert_eq!(lab.accuracy().map(f64::round), Some(7.0));
    }

    #[test]
    fn equal_priority_keeps_order() {
        let square = |uid: &str| {
            Region::new(RegionKind::Zone)
                .with_uid(uid)
                .with_bounds(Boundary::corners(
                    Position::local2d(0.0, 0.0),
                    Position::local2d(10.0, 10.0),
                ))
                .expect("valid boundary")
        };
        let universe = vec![square("a"), square("b").with_priority(3), square("c")];

        let found = find_containing(&Query::Position(Position::local2d(5.0, 5.0)), &universe);
        let uids: Vec<&str> = found.iter().map(|(r, _)| r.uid()).collect();
        assert_eq!(uids, vec!["b", "a", "c"]);

        assert!(find_containing(&Query::Position(Position::local2d(50.0, 5.0)), &universe).is_empty());
        assert!(find_containing(&Query::Position(Position::local2d(5.0, 5.0)), &[]).is_empty());
    }

    #[test]
    fn kind_query() {
        let universe = pl9();
        let found = find_containing(&Query::Kind(RegionKind::Floor), &universe);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.uid(), FLOOR_UID);
        assert_eq!(found[0].1, KIND_MATCH_SCORE);
    }

    #[test]
    fn children_of_floor() {
        let universe = pl9();
        let floor = universe
            .iter()
            .find(|r| r.uid() == FLOOR_UID)
            .expect("floor");

        let children = find_children(floor, &universe);
        assert!(children.iter().any(|r| r.uid() == LAB_UID));
        assert!(children.iter().all(|r| r.parent_uid() == Some(FLOOR_UID)));
    }

    #[test]
    fn resolver_reads_store() {
        let universe = pl9();
        let position = lab_center(&universe);
        let resolver = Resolver::new(MemoryRegionStore::with_regions(universe));

        tokio_test::block_on(async {
            let found = resolver
                .find_by_position(&position)
                .await
                .expect("infallible");
            assert_eq!(found[0].uid(), LAB_UID);

            let floor = found[1].clone();
            let children = resolver.find_children(&floor).await.expect("infallible");
            assert!(!children.is_empty());
        });
    }

    #[derive(Debug, thiserror::Error)]
    #[error("store is offline")]
    struct Offline;

    struct OfflineStore;

    #[async_trait]
    impl RegionStore for OfflineStore {
        type Error = Offline;

        async fn fetch_all(&self) -> Result<Vec<Region>, Self::Error> {
            Err(Offline)
        }

        async fn insert(&self, _region: Region) -> Result<(), Self::Error> {
            Err(Offline)
        }

        async fn delete_all(&self) -> Result<(), Self::Error> {
            Err(Offline)
        }
    }

    #[test]
    fn store_errors_propagate() {
        let resolver = Resolver::new(OfflineStore);
        let result = tokio_test::block_on(resolver.find_by_position(&Position::local2d(0.0, 0.0)));
        assert!(matches!(result, Err(Offline)));
    }
}
