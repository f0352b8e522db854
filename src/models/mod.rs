//! Data structures for the bracket: competitors, tournaments, participations, matches.

mod competitor;
mod label;
mod matches;
mod participation;
mod tournament;

pub use competitor::{Competitor, CompetitorId};
pub use label::{trimmed_label, LabelError};
pub use matches::{Match, MatchId, MatchResult, Slot, SlotConflict};
pub use participation::{Bracket, Participation};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentStart};
