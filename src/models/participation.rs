//! Tournament × competitor link and the per-tournament bracket aggregate.

use crate::logic::topology;
use crate::models::competitor::CompetitorId;
use crate::models::matches::{Match, MatchId};
use crate::models::tournament::Tournament;
use serde::{Deserialize, Serialize};

/// A competitor's entry in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub competitor_id: CompetitorId,
    /// Match to play next; `None` once eliminated or done with the tournament
    /// (and before the bracket exists).
    pub next_match: Option<MatchId>,
}

impl Participation {
    pub fn new(competitor_id: CompetitorId) -> Self {
        Self {
            competitor_id,
            next_match: None,
        }
    }
}

/// Everything belonging to one tournament. Mutated as a unit: the store hands
/// out a draft and commits it only when the whole operation succeeded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bracket {
    pub tournament: Tournament,
    /// In registration order.
    pub participations: Vec<Participation>,
    /// Canonical order: entry round first, round by round down to the final,
    /// third-place match last. Empty before start.
    pub matches: Vec<Match>,
}

impl Bracket {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            participations: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn participation(&self, competitor: CompetitorId) -> Option<&Participation> {
        self.participations
            .iter()
            .find(|p| p.competitor_id == competitor)
    }

    pub fn participation_index(&self, competitor: CompetitorId) -> Option<usize> {
        self.participations
            .iter()
            .position(|p| p.competitor_id == competitor)
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_index(&self, id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    /// Index of the match at (round, position) in `matches`, using the canonical layout.
    pub fn index_of(&self, round: u32, position: u32) -> Option<usize> {
        let start = self.tournament.started()?;
        let index = if round == 0 && position == 1 {
            topology::main_match_count(start.starting_round).ok()?
        } else {
            topology::flat_index(start.starting_round, round, position).ok()?
        };
        self.matches
            .get(index)
            .filter(|m| m.round == round && m.position == position)
            .map(|_| index)
    }

    pub fn match_at(&self, round: u32, position: u32) -> Option<&Match> {
        self.index_of(round, position).map(|i| &self.matches[i])
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.match_at(0, 0)
    }

    pub fn third_place_match(&self) -> Option<&Match> {
        self.match_at(0, 1)
    }

    /// The match a registered competitor has to play next, if any.
    pub fn next_match_of(&self, competitor: CompetitorId) -> Option<&Match> {
        let next = self.participation(competitor)?.next_match?;
        self.find_match(next)
    }
}
