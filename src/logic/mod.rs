//! Tournament business logic: registration, bracket generation, results, standings.

mod bracket;
mod registration;
mod results;
mod standings;
pub mod topology;

pub use bracket::{build_bracket, BuildError};
pub use registration::register_competitor;
pub use results::{register_match_result, ResultError};
pub use standings::{match_schedule, podium, MatchSchedule, StandingsError};
pub use topology::{compute_topology, flat_index, Topology, TopologyError};
