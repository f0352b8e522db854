//! Single-elimination tournament organizer: library with models, bracket logic, store and REST API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    build_bracket, compute_topology, flat_index, match_schedule, podium, register_competitor,
    register_match_result, BuildError, MatchSchedule, ResultError, StandingsError, Topology,
    TopologyError,
};
pub use models::{
    Bracket, Competitor, CompetitorId, LabelError, Match, MatchId, MatchResult, Participation,
    Slot, SlotConflict, Tournament, TournamentError, TournamentId, TournamentStart,
};
pub use store::Store;
