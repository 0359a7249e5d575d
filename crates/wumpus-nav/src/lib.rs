//! Route planning over the cells an agent believes safe.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod planner;
pub mod route;

pub use planner::PlanningModule;
pub use route::Route;
