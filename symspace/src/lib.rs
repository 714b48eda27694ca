//! Symspace models nested, boundary-defined regions of space (building, floor, room) and resolves which of
//! them contain a position.
//!
//! # Main components
//!
//! * [`Boundary`] describes the shape of a region: a ring of positions, a pair of corners or a rotated
//!   rectangle. Building it produces a closed metric ring.
//! * [`Region`] holds the ring in its own local frame. A region with a geographic boundary anchors that
//!   frame on the earth; other regions are placed into the frame of their parent by an
//!   [`AffineTransform`](region::AffineTransform).
//! * [`RegionCodec`](codec::RegionCodec) exchanges regions as GeoJSON features or WKT polygons.
//! * [`find_containing`](resolver::find_containing) and [`Resolver`] rank the regions containing a
//!   position, most specific first.
//!
//! ```ignore
//! use symspace::{Boundary, Position, Region, RegionKind};
//! use symspace::resolver::{find_containing, Query};
//!
//! let office = Region::new(RegionKind::Room)
//!     .with_bounds(Boundary::corners(Position::local2d(5.0, 5.0), Position::local2d(10.0, 10.0)))?;
//! assert!(office.is_inside(&Position::local2d(7.5, 7.5)));
//!
//! let universe = vec![office];
//! let found = find_containing(&Query::Position(Position::local2d(7.5, 7.5)), &universe);
//! ```

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod boundary;
pub mod codec;
pub mod error;
pub mod position;
pub mod region;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use boundary::Boundary;
pub use error::SymspaceError;
pub use position::{Position, PositionKind};
pub use region::{Region, RegionKind};
pub use resolver::Resolver;
pub use store::{MemoryRegionStore, RegionStore};

// Reexport symspace_types
pub use symspace_types;
