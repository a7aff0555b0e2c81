//! Resolvers: turn extracted constraints into a store filter, rank the
//! candidates and cut them down to a structured answer.

pub mod composer;
pub mod planner;
pub mod ranker;
pub mod types;

pub use composer::ResponseComposer;
pub use planner::QueryPlanner;
pub use ranker::Ranker;
pub use types::*;
