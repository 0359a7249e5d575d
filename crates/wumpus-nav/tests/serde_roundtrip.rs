#![cfg(feature = "serde")]

use wumpus_core::{Coord, Direction};
use wumpus_nav::{PlanningModule, Route};

#[test]
fn planner_and_route_roundtrip() {
    let mut planner = PlanningModule::new();
    planner.extend([Coord::new(1, 0), Coord::new(2, 0)]);
    let route = planner
        .find_route(Coord::ORIGIN, Coord::new(2, 0), Direction::East)
        .expect("route");

    let json = serde_json::to_string(&planner).unwrap();
    let back: PlanningModule = serde_json::from_str(&json).unwrap();
    assert_eq!(planner, back);

    let json = serde_json::to_string(&route).unwrap();
    let back: Route = serde_json::from_str(&json).unwrap();
    assert_eq!(route, back);
}
