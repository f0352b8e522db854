//! Bracket shape: starting round, entry matches and the flat match numbering.

use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TopologyError {
    #[error("No competitors to build a bracket for")]
    NoCompetitors,
    #[error("invalid round {round}: bracket starts at round {starting_round}")]
    RoundOutOfRange { round: u32, starting_round: u32 },
    #[error("invalid position {position} for round {round}")]
    PositionOutOfRange { round: u32, position: u32 },
    #[error("bracket starting at round {starting_round} is too large")]
    TooLarge { starting_round: u32 },
}

/// Highest supported entry round. Positions are `u32`, so an entry round of
/// `2^31` matches is the largest one they can number.
pub const MAX_STARTING_ROUND: u32 = 31;

/// Shape of the bracket for a given number of competitors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Topology {
    pub competitor_count: usize,
    /// Entry round; the final is round 0.
    pub starting_round: u32,
    /// Number of matches in the entry round (`2^starting_round`).
    pub entry_matches: usize,
}

/// Smallest bracket seating `competitor_count` competitors with byes confined to the entry round.
///
/// One competitor plays (and wins) the final alone. Otherwise the entry round is
/// `floor(log2(n - 1))`, so `entry_matches < n <= 2 * entry_matches`.
pub fn compute_topology(competitor_count: usize) -> Result<Topology, TopologyError> {
    let starting_round = match competitor_count {
        0 => return Err(TopologyError::NoCompetitors),
        1 => 0,
        n => (n - 1).ilog2(),
    };
    // Every match of the bracket must be addressable by a `usize` index.
    main_match_count(starting_round)?
        .checked_add(usize::from(competitor_count > 2))
        .ok_or(TopologyError::TooLarge { starting_round })?;
    Ok(Topology {
        competitor_count,
        starting_round,
        entry_matches: 1 << starting_round,
    })
}

impl Topology {
    pub fn has_third_place_match(&self) -> bool {
        self.competitor_count > 2
    }

    /// Entry matches that get a single competitor.
    pub fn byes(&self) -> usize {
        self.entry_matches
            .saturating_mul(2)
            .saturating_sub(self.competitor_count)
    }

    /// Matches in the bracket, third-place match included.
    ///
    /// Saturates for a hand-built topology that [`compute_topology`] would reject.
    pub fn match_count(&self) -> usize {
        main_match_count(self.starting_round)
            .map_or(usize::MAX, |n| n.saturating_add(usize::from(self.has_third_place_match())))
    }

    /// (round, position) of every match in canonical order.
    pub fn match_slots(&self) -> impl Iterator<Item = (u32, u32)> {
        let third_place = self.has_third_place_match().then_some((0, 1));
        (0..=self.starting_round)
            .rev()
            .flat_map(|round| {
                let width = 1usize << round.min(MAX_STARTING_ROUND);
                (0..=u32::MAX).take(width).map(move |position| (round, position))
            })
            .chain(third_place)
    }
}

/// Matches from the entry round down to the final, without the third-place match.
/// Also the flat index of the third-place match.
pub fn main_match_count(starting_round: u32) -> Result<usize, TopologyError> {
    if starting_round > MAX_STARTING_ROUND {
        return Err(TopologyError::TooLarge { starting_round });
    }
    usize::try_from((2u64 << starting_round) - 1)
        .map_err(|_| TopologyError::TooLarge { starting_round })
}

/// Offset of (round, position) when rounds are laid out from `starting_round` down to 0.
///
/// Rounds above `round` contribute `2^r` slots each.
pub fn flat_index(starting_round: u32, round: u32, position: u32) -> Result<usize, TopologyError> {
    if round > starting_round {
        return Err(TopologyError::RoundOutOfRange {
            round,
            starting_round,
        });
    }
    if starting_round > MAX_STARTING_ROUND {
        return Err(TopologyError::TooLarge { starting_round });
    }
    if u64::from(position) >= 1u64 << round {
        return Err(TopologyError::PositionOutOfRange { round, position });
    }
    let offset: u64 = (round + 1..=starting_round).map(|r| 1u64 << r).sum();
    usize::try_from(offset + u64::from(position))
        .map_err(|_| TopologyError::TooLarge { starting_round })
}
