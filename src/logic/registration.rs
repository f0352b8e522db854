//! Registration phase: competitors join a tournament before its bracket exists.

use crate::models::{Bracket, CompetitorId, Participation, TournamentError};

/// Add a competitor to an unstarted tournament. Each competitor can join once.
pub fn register_competitor(
    bracket: &mut Bracket,
    competitor: CompetitorId,
) -> Result<&Participation, TournamentError> {
    if bracket.tournament.is_started() {
        return Err(TournamentError::AlreadyStarted);
    }
    if bracket.participation(competitor).is_some() {
        return Err(TournamentError::AlreadyRegistered(competitor));
    }
    bracket.participations.push(Participation::new(competitor));
    log::debug!(
        "Competitor {} registered in tournament {} ({} so far)",
        competitor,
        bracket.tournament.id,
        bracket.participations.len()
    );
    Ok(&bracket.participations[bracket.participations.len() - 1])
}
