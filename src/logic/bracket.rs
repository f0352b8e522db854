//! Bracket generation: allocate every match, seat the shuffled competitors and resolve byes.

use crate::logic::topology::{self, compute_topology, Topology, TopologyError};
use crate::models::{
    Bracket, CompetitorId, Match, Slot, SlotConflict, TournamentError, TournamentStart,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuildError {
    #[error("No competitors to start tournament")]
    NoCompetitors,
    /// A participation already points at a match.
    #[error("Competitor already has a scheduled match")]
    AlreadyScheduled(CompetitorId),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Slot(#[from] SlotConflict),
}

/// Build the whole bracket for the registered competitors and start the tournament.
///
/// 1. Allocate one match per (round, position) from the entry round down to the
///    final, plus the third-place match for more than two competitors.
/// 2. Shuffle and seat: competitor `i` goes to entry match `i % entry_matches`,
///    slot A on the first pass, slot B on the second.
/// 3. Entry matches with only slot A filled are won by that competitor at `now`,
///    who moves on to the next round (or is done, for a single competitor).
///
/// On error the bracket is left untouched. Returns the matches in canonical order.
pub fn build_bracket<'a, R: Rng + ?Sized>(
    bracket: &'a mut Bracket,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<&'a [Match], BuildError> {
    if bracket.tournament.is_started() {
        return Err(TournamentError::AlreadyStarted.into());
    }
    if bracket.participations.is_empty() {
        return Err(BuildError::NoCompetitors);
    }
    if let Some(p) = bracket.participations.iter().find(|p| p.next_match.is_some()) {
        return Err(BuildError::AlreadyScheduled(p.competitor_id));
    }

    let topology = compute_topology(bracket.participations.len())?;
    let tournament_id = bracket.tournament.id;
    let mut matches: Vec<Match> = topology
        .match_slots()
        .map(|(round, position)| Match::new(tournament_id, round, position))
        .collect();

    // Index into `matches` of each competitor's next match, by participation.
    let mut next_index: Vec<Option<usize>> = vec![None; bracket.participations.len()];
    let mut order: Vec<usize> = (0..bracket.participations.len()).collect();
    order.shuffle(rng);

    for (i, &participant) in order.iter().enumerate() {
        let match_index = i % topology.entry_matches;
        let slot = if i / topology.entry_matches == 0 {
            Slot::A
        } else {
            Slot::B
        };
        matches[match_index].place(slot, bracket.participations[participant].competitor_id)?;
        next_index[participant] = Some(match_index);
    }

    resolve_automatic_winners(&topology, &mut matches, &order, &mut next_index, now)?;

    bracket.tournament.set_started(TournamentStart {
        started_at: now,
        competitor_count: topology.competitor_count,
        starting_round: topology.starting_round,
    })?;
    for (participation, index) in bracket.participations.iter_mut().zip(&next_index) {
        participation.next_match = index.map(|i| matches[i].id);
    }
    bracket.matches = matches;

    log::info!(
        "Tournament {} started: {} competitors, starting round {}, {} matches, {} byes",
        tournament_id,
        topology.competitor_count,
        topology.starting_round,
        bracket.matches.len(),
        topology.byes(),
    );
    Ok(&bracket.matches)
}

/// Declare slot A the winner of every single-competitor entry match and forward it.
///
/// Slot A of entry match `i` holds participant `order[i]`.
fn resolve_automatic_winners(
    topology: &Topology,
    matches: &mut [Match],
    order: &[usize],
    next_index: &mut [Option<usize>],
    now: DateTime<Utc>,
) -> Result<(), BuildError> {
    for match_index in 0..topology.entry_matches {
        let entry = &matches[match_index];
        let competitor = match (entry.slot_a, entry.slot_b) {
            (Some(a), None) => a,
            _ => continue,
        };
        let position = entry.position;
        matches[match_index].decide(competitor, None, now);

        let participant = order[match_index];

        // A single competitor wins the final outright.
        if topology.starting_round == 0 {
            next_index[participant] = None;
            log::debug!("Competitor {} wins a single-competitor tournament", competitor);
            continue;
        }

        let next_round = topology.starting_round - 1;
        let target = topology::flat_index(topology.starting_round, next_round, position / 2)?;
        matches[target].place(Slot::for_position(position), competitor)?;
        next_index[participant] = Some(target);
        log::debug!(
            "Competitor {} gets a bye at round {} position {}, moves to round {} position {}",
            competitor,
            topology.starting_round,
            position,
            next_round,
            position / 2,
        );
    }
    Ok(())
}
