//! Grid, percept and cave-world primitives shared by the wumpus agent crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod command;
pub mod coord;
pub mod percept;
pub mod world;

pub use command::Command;
pub use coord::{Coord, Direction};
pub use percept::Percepts;
pub use world::{CaveMut, CaveView};
