#![cfg(feature = "serde")]

use wumpus_core::{Command, Coord, Direction, Percepts};

#[test]
fn primitives_roundtrip_via_serde() {
    let coord = Coord::new(3, -1);
    let json = serde_json::to_string(&coord).expect("serialize coord");
    assert_eq!(serde_json::from_str::<Coord>(&json).expect("coord"), coord);

    let percepts = Percepts {
        stench: true,
        breeze: false,
        glitter: true,
    };
    let json = serde_json::to_string(&percepts).expect("serialize percepts");
    assert_eq!(
        serde_json::from_str::<Percepts>(&json).expect("percepts"),
        percepts
    );

    let log = vec![Command::TurnLeft, Command::Forward, Command::Shoot];
    let json = serde_json::to_string(&(Direction::West, &log)).expect("serialize log");
    let (dir, back): (Direction, Vec<Command>) = serde_json::from_str(&json).expect("log");
    assert_eq!(dir, Direction::West);
    assert_eq!(back, log);
}
