//! In-memory store: competitors, and one bracket per tournament behind its own lock.

use crate::models::{Bracket, Competitor, CompetitorId, MatchId, Tournament, TournamentId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared store for all tournaments. Operations on different tournaments do
/// not contend; operations on the same tournament are serialized.
#[derive(Default)]
pub struct Store {
    competitors: RwLock<HashMap<CompetitorId, Competitor>>,
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<Bracket>>>>,
    /// Which tournament each match belongs to.
    matches: RwLock<HashMap<MatchId, TournamentId>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_competitor(&self, competitor: Competitor) {
        self.competitors.write().insert(competitor.id, competitor);
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<Competitor> {
        self.competitors.read().get(&id).cloned()
    }

    /// All competitors, oldest first.
    pub fn competitors(&self) -> Vec<Competitor> {
        let mut all: Vec<Competitor> = self.competitors.read().values().cloned().collect();
        all.sort_by_key(|c| (c.created_at, c.id));
        all
    }

    pub fn insert_tournament(&self, tournament: Tournament) {
        let id = tournament.id;
        self.tournaments
            .write()
            .insert(id, Arc::new(Mutex::new(Bracket::new(tournament))));
    }

    /// Snapshot of a tournament with its participations and matches.
    pub fn bracket(&self, id: TournamentId) -> Option<Bracket> {
        let entry = self.tournaments.read().get(&id).cloned()?;
        let bracket = entry.lock().clone();
        Some(bracket)
    }

    pub fn tournament_of_match(&self, match_id: MatchId) -> Option<TournamentId> {
        self.matches.read().get(&match_id).copied()
    }

    /// Run `f` against a draft of the tournament's bracket as one unit of work.
    ///
    /// The draft replaces the stored bracket only if `f` returns `Ok`; on `Err`
    /// nothing changes. `None` if the tournament does not exist.
    pub fn update<T, E>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Bracket) -> Result<T, E>,
    ) -> Option<Result<T, E>> {
        let entry = self.tournaments.read().get(&id).cloned()?;
        let mut bracket = entry.lock();
        let mut draft = bracket.clone();
        let outcome = f(&mut draft);
        if outcome.is_ok() {
            if draft.matches.len() != bracket.matches.len() {
                let mut index = self.matches.write();
                for m in &draft.matches {
                    index.insert(m.id, id);
                }
            }
            *bracket = draft;
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Participation, TournamentError};

    #[test]
    fn failed_update_leaves_bracket_untouched() {
        let store = Store::new();
        let tournament = Tournament::new("Cup").unwrap();
        let id = tournament.id;
        store.insert_tournament(tournament);

        let outcome = store.update(id, |b| {
            b.participations.push(Participation::new(uuid::Uuid::new_v4()));
            Err::<(), _>(TournamentError::NotStarted)
        });
        assert_eq!(outcome, Some(Err(TournamentError::NotStarted)));
        assert!(store.bracket(id).unwrap().participations.is_empty());

        let outcome = store.update(id, |b| {
            b.participations.push(Participation::new(uuid::Uuid::new_v4()));
            Ok::<_, TournamentError>(())
        });
        assert_eq!(outcome, Some(Ok(())));
        assert_eq!(store.bracket(id).unwrap().participations.len(), 1);
    }

    #[test]
    fn unknown_tournament_is_none() {
        let store = Store::new();
        let outcome = store.update(uuid::Uuid::new_v4(), |_| Ok::<_, TournamentError>(()));
        assert!(outcome.is_none());
        assert!(store.bracket(uuid::Uuid::new_v4()).is_none());
    }
}
