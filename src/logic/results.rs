//! Match results: validate the declared winner and move both competitors through the bracket.

use crate::models::{Bracket, CompetitorId, Match, MatchId, Slot, SlotConflict};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResultError {
    #[error("Target Match does not exist")]
    MatchNotFound(MatchId),
    #[error("Target Match belongs to a tournament that has not started")]
    NotStarted,
    #[error("Target Match has already registered its result")]
    AlreadyRegistered,
    /// Entry-round match with a single competitor: bracket generation should have decided it.
    #[error("Target Match should have elected an automatic winner")]
    ShouldHaveAutomaticWinner,
    /// A match feeding this one has not been played yet.
    #[error(
        "Target Match is not ready to register a result due to registered previous Matches but missing Competitor"
    )]
    MissingCompetitor,
    #[error("Target Competitor is not a target Match competitor")]
    NotAMatchCompetitor,
    #[error("Bracket has no match at round {round} position {position}")]
    MissingBracketMatch { round: u32, position: u32 },
    #[error("Competitor {0} is not registered in the tournament")]
    UnknownParticipant(CompetitorId),
    /// The next match already seats this competitor on the other side.
    #[error(transparent)]
    SlotConflict(#[from] SlotConflict),
}

/// Where a competitor goes after this match: a slot in another match, or nowhere.
#[derive(Clone, Copy, Debug)]
struct Advance {
    participant: usize,
    competitor: CompetitorId,
    target: Option<(usize, Slot)>,
}

/// Register `winner` as the winner of match `match_id` and rewire the bracket.
///
/// - The winner of a round `r > 0` match moves to (`r - 1`, `position / 2`),
///   slot A from an even position and B from an odd one. After round 0 it has no next match.
/// - The loser of a semifinal (round 1) moves to the third-place match by the same
///   slot rule. With exactly three competitors there is nobody to play for third,
///   so the third-place match is decided for the loser straight away.
/// - Every other loser is out.
///
/// Validation, including lookups of every match and participation touched,
/// finishes before anything is written.
pub fn register_match_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: CompetitorId,
    now: DateTime<Utc>,
) -> Result<&Match, ResultError> {
    let index = bracket
        .match_index(match_id)
        .ok_or(ResultError::MatchNotFound(match_id))?;
    let start = *bracket.tournament.started().ok_or(ResultError::NotStarted)?;
    let current = &bracket.matches[index];

    if current.is_decided() {
        return Err(ResultError::AlreadyRegistered);
    }
    let Some((a, b)) = current.pairing() else {
        return Err(if current.round == start.starting_round {
            ResultError::ShouldHaveAutomaticWinner
        } else {
            ResultError::MissingCompetitor
        });
    };
    let loser = if winner == a {
        b
    } else if winner == b {
        a
    } else {
        return Err(ResultError::NotAMatchCompetitor);
    };

    let (round, position) = (current.round, current.position);
    let slot = Slot::for_position(position);

    let winner_target = if round > 0 {
        Some((locate(bracket, round - 1, position / 2)?, slot))
    } else {
        None
    };
    let winner_move = Advance {
        participant: participant(bracket, winner)?,
        competitor: winner,
        target: winner_target,
    };

    let third_place = if round == 1 {
        Some(locate(bracket, 0, 1)?)
    } else {
        None
    };
    // With three competitors the semifinal loser is third without playing.
    let automatic_third = third_place.filter(|_| start.competitor_count == 3);
    let loser_move = Advance {
        participant: participant(bracket, loser)?,
        competitor: loser,
        target: third_place.map(|i| (i, slot)),
    };
    for step in [winner_move, loser_move] {
        if let Some((target, slot)) = step.target {
            bracket.matches[target].check_place(slot, step.competitor)?;
        }
    }

    bracket.matches[index].decide(winner, Some(loser), now);
    log::info!(
        "Match {} (round {} position {}) won by {} against {}",
        match_id,
        round,
        position,
        winner,
        loser
    );

    advance(bracket, winner_move)?;
    advance(bracket, loser_move)?;

    if let Some(third_index) = automatic_third {
        bracket.matches[third_index].decide(loser, None, now);
        bracket.participations[loser_move.participant].next_match = None;
        log::debug!(
            "Competitor {} takes third place automatically in a three-competitor tournament",
            loser
        );
    }

    Ok(&bracket.matches[index])
}

fn locate(bracket: &Bracket, round: u32, position: u32) -> Result<usize, ResultError> {
    bracket
        .index_of(round, position)
        .ok_or(ResultError::MissingBracketMatch { round, position })
}

fn participant(bracket: &Bracket, competitor: CompetitorId) -> Result<usize, ResultError> {
    bracket
        .participation_index(competitor)
        .ok_or(ResultError::UnknownParticipant(competitor))
}

fn advance(bracket: &mut Bracket, step: Advance) -> Result<(), ResultError> {
    let next_match = match step.target {
        Some((target, slot)) => {
            let next = &mut bracket.matches[target];
            next.place(slot, step.competitor)?;
            log::debug!(
                "Competitor {} moves to round {} position {}",
                step.competitor,
                next.round,
                next.position
            );
            Some(next.id)
        }
        None => None,
    };
    bracket.participations[step.participant].next_match = next_match;
    Ok(())
}
