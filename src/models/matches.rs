//! Bracket match and the slot a competitor occupies in it.

use crate::models::competitor::CompetitorId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two competitor slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Slot a competitor takes in the next match: A when coming from an even position, B from odd.
    pub fn for_position(position: u32) -> Self {
        if position % 2 == 0 {
            Slot::A
        } else {
            Slot::B
        }
    }
}

/// A competitor cannot face themselves.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("Competitor {competitor} already holds the other slot of match {match_id}")]
pub struct SlotConflict {
    pub match_id: MatchId,
    pub competitor: CompetitorId,
}

/// Outcome of a decided match. A bye has a winner and no loser.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: CompetitorId,
    pub loser: Option<CompetitorId>,
    pub registered_at: DateTime<Utc>,
}

/// A single match in the bracket. Round 0 is the final (position 0) and the
/// third-place match (position 1).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: u32,
    pub position: u32,
    pub slot_a: Option<CompetitorId>,
    pub slot_b: Option<CompetitorId>,
    /// None if not yet played.
    pub result: Option<MatchResult>,
}

impl Match {
    pub fn new(tournament_id: TournamentId, round: u32, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            position,
            slot_a: None,
            slot_b: None,
            result: None,
        }
    }

    /// Check that `competitor` can take `slot` without also holding the other one.
    pub fn check_place(&self, slot: Slot, competitor: CompetitorId) -> Result<(), SlotConflict> {
        let other = match slot {
            Slot::A => self.slot_b,
            Slot::B => self.slot_a,
        };
        if other == Some(competitor) {
            return Err(SlotConflict {
                match_id: self.id,
                competitor,
            });
        }
        Ok(())
    }

    /// Put a competitor into a slot, replacing whoever was there. Nothing
    /// changes when the competitor already holds the other slot.
    pub fn place(&mut self, slot: Slot, competitor: CompetitorId) -> Result<(), SlotConflict> {
        self.check_place(slot, competitor)?;
        match slot {
            Slot::A => self.slot_a = Some(competitor),
            Slot::B => self.slot_b = Some(competitor),
        }
        Ok(())
    }

    /// Both slots, if filled.
    pub fn pairing(&self) -> Option<(CompetitorId, CompetitorId)> {
        self.slot_a.zip(self.slot_b)
    }

    pub fn has_competitor(&self, competitor: CompetitorId) -> bool {
        self.slot_a == Some(competitor) || self.slot_b == Some(competitor)
    }

    pub fn is_decided(&self) -> bool {
        self.result.is_some()
    }

    /// Ready to be played: both competitors known and no result yet.
    pub fn is_ready(&self) -> bool {
        !self.is_decided() && self.pairing().is_some()
    }

    pub fn winner(&self) -> Option<CompetitorId> {
        self.result.map(|r| r.winner)
    }

    pub fn loser(&self) -> Option<CompetitorId> {
        self.result.and_then(|r| r.loser)
    }

    pub fn result_registered_at(&self) -> Option<DateTime<Utc>> {
        self.result.map(|r| r.registered_at)
    }

    pub(crate) fn decide(
        &mut self,
        winner: CompetitorId,
        loser: Option<CompetitorId>,
        at: DateTime<Utc>,
    ) {
        self.result = Some(MatchResult {
            winner,
            loser,
            registered_at: at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_follows_position_parity() {
        assert_eq!(Slot::for_position(0), Slot::A);
        assert_eq!(Slot::for_position(1), Slot::B);
        assert_eq!(Slot::for_position(6), Slot::A);
        assert_eq!(Slot::for_position(7), Slot::B);
    }

    #[test]
    fn decide_sets_winner_and_timestamp_together() {
        let mut m = Match::new(Uuid::new_v4(), 1, 0);
        let a = Uuid::new_v4();
        m.place(Slot::A, a).unwrap();
        assert!(!m.is_ready());
        assert!(m.winner().is_none() && m.result_registered_at().is_none());

        let now = Utc::now();
        m.decide(a, None, now);
        assert_eq!(m.winner(), Some(a));
        assert_eq!(m.loser(), None);
        assert_eq!(m.result_registered_at(), Some(now));
    }

    #[test]
    fn competitor_cannot_take_both_slots() {
        let mut m = Match::new(Uuid::new_v4(), 1, 0);
        let a = Uuid::new_v4();
        m.place(Slot::A, a).unwrap();

        assert_eq!(
            m.place(Slot::B, a),
            Err(SlotConflict {
                match_id: m.id,
                competitor: a,
            })
        );
        assert_eq!(m.slot_b, None);

        // Re-placing into the same slot is fine.
        m.place(Slot::A, a).unwrap();
        assert_eq!(m.slot_a, Some(a));
    }
}
