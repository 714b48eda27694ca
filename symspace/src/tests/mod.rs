//! Shared fixtures: building PL9 of the VUB campus with its third floor.

use symspace_types::latlon;

use crate::boundary::Boundary;
use crate::position::Position;
use crate::region::{Region, RegionKind, DEFAULT_FLOOR_HEIGHT};

pub(crate) const BUILDING_UID: &str = "pl9";
pub(crate) const FLOOR_UID: &str = "pl9-3";
pub(crate) const LAB_UID: &str = "pl9-3-lab";
pub(crate) const BUILDING_WIDTH: f64 = 46.275;
pub(crate) const BUILDING_LENGTH: f64 = 37.27;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn building() -> Region {
    Region::new(RegionKind::Building)
        .with_uid(BUILDING_UID)
        .with_name("Pleinlaan 9")
        .with_bounds(Boundary::rectangle(
            latlon!(50.8203726927966, 4.392241309019189),
            BUILDING_WIDTH,
            BUILDING_LENGTH,
            -34.04,
        ))
        .expect("valid building boundary")
}

pub(crate) fn floor(building: &Region) -> Region {
    let mut floor = Region::new(RegionKind::Floor)
        .with_uid(FLOOR_UID)
        .with_name("3");
    floor.set_building(building).expect("building footprint");
    floor
        .set_floor_number(3, DEFAULT_FLOOR_HEIGHT)
        .expect("floor boundary");
    floor
}

fn room(floor: &Region, uid: &str, top_left: (f64, f64), bottom_right: (f64, f64)) -> Region {
    let mut room = Region::new(RegionKind::Room).with_uid(uid).with_name(uid);
    room.set_floor(floor).expect("no boundary yet");
    room.set_bounds(Boundary::corners(
        Position::local2d(top_left.0, top_left.1),
        Position::local2d(bottom_right.0, bottom_right.1),
    ))
    .expect("valid room boundary");
    room
}

fn hallway(floor: &Region) -> Region {
    let mut hallway = Region::new(RegionKind::Corridor)
        .with_uid("pl9-3-hallway")
        .with_name("Hallway");
    hallway.set_floor(floor).expect("no boundary yet");
    hallway
        .set_bounds(Boundary::ring([
            Position::local2d(2.39, 6.015),
            Position::local2d(2.39, 7.715),
            Position::local2d(18.015, 7.715),
            Position::local2d(18.015, 29.555),
            Position::local2d(2.39, 29.555),
            Position::local2d(2.39, 31.255),
            Position::local2d(41.94, 31.255),
            Position::local2d(41.94, 29.555),
            Position::local2d(20.315, 29.555),
            Position::local2d(20.315, 7.715),
            Position::local2d(41.94, 7.715),
            Position::local2d(41.94, 6.015),
        ]))
        .expect("valid hallway boundary");
    hallway
}

/// Building, floor 3, three rooms and the hallway of the floor.
pub(crate) fn pl9() -> Vec<Region> {
    let building = building();
    let floor = floor(&building);
    let office = room(&floor, "pl9-3-58", (4.75, 31.25), (8.35, 37.02));
    let lab = room(&floor, LAB_UID, (13.15, 31.25), (25.15, 37.02));
    let classroom = room(&floor, "pl9-3-63", (27.55, 24.105), (35.95, 29.5));
    let hallway = hallway(&floor);

    vec![building, floor, office, lab, classroom, hallway]
}
