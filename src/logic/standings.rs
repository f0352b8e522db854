//! Read-only views over a started bracket: played vs. upcoming matches, and the podium.

use crate::models::{Bracket, CompetitorId, Match};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StandingsError {
    #[error("Tournament has not started yet")]
    NotStarted,
    #[error("Tournament has not finished yet")]
    NotFinished,
}

/// Matches split by state, each list in canonical bracket order.
#[derive(Clone, Debug, Default)]
pub struct MatchSchedule<'a> {
    /// Matches with a result, byes included.
    pub past: Vec<&'a Match>,
    /// Matches with both competitors known and no result yet.
    pub upcoming: Vec<&'a Match>,
}

/// Split the bracket into played and playable matches. Matches still waiting
/// for a competitor appear in neither list.
pub fn match_schedule(bracket: &Bracket) -> Result<MatchSchedule<'_>, StandingsError> {
    if !bracket.tournament.is_started() {
        return Err(StandingsError::NotStarted);
    }
    let mut schedule = MatchSchedule::default();
    for m in &bracket.matches {
        if m.is_decided() {
            schedule.past.push(m);
        } else if m.is_ready() {
            schedule.upcoming.push(m);
        }
    }
    Ok(schedule)
}

/// Final ranking: champion, runner-up, third, fourth.
///
/// Shorter for small tournaments: one competitor has only a champion, two have no
/// third-place match, and with three the third-place match has no loser.
/// Requires the final, and the third-place match when there is one, to be decided.
pub fn podium(bracket: &Bracket) -> Result<Vec<CompetitorId>, StandingsError> {
    if !bracket.tournament.is_started() {
        return Err(StandingsError::NotStarted);
    }
    let final_match = bracket.final_match().ok_or(StandingsError::NotFinished)?;
    let result = final_match.result.ok_or(StandingsError::NotFinished)?;

    let mut top = vec![result.winner];
    top.extend(result.loser);

    if let Some(third_place) = bracket.third_place_match() {
        let third = third_place.result.ok_or(StandingsError::NotFinished)?;
        top.push(third.winner);
        top.extend(third.loser);
    }
    Ok(top)
}
