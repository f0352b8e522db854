//! Tournament and the start triple recorded when its bracket is built.

use crate::models::competitor::CompetitorId;
use crate::models::label::{trimmed_label, LabelError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Registration and bracket generation are only possible before start.
    #[error("Tournament has already started")]
    AlreadyStarted,
    /// The action needs a bracket.
    #[error("Tournament has not started yet")]
    NotStarted,
    #[error("Competitor is already registered in this tournament")]
    AlreadyRegistered(CompetitorId),
    /// A started field would be overwritten with a different value.
    #[error("{field} is not allowed to be updated after Tournament start")]
    ImmutableAfterStart { field: &'static str },
    /// A started tournament must have at least one competitor.
    #[error("A started tournament needs at least one competitor")]
    InvalidCompetitorCount,
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Fields set together when the bracket is generated. Never changed afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentStart {
    pub started_at: DateTime<Utc>,
    pub competitor_count: usize,
    /// Highest round number; the entry round. 0 is the final.
    pub starting_round: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub label: String,
    pub created_at: DateTime<Utc>,
    /// `None` until started; all-or-nothing by construction.
    started: Option<TournamentStart>,
}

impl Tournament {
    /// Create an unstarted tournament with a trimmed, non-empty label.
    pub fn new(label: &str) -> Result<Self, LabelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            label: trimmed_label(label)?,
            created_at: Utc::now(),
            started: None,
        })
    }

    pub fn started(&self) -> Option<&TournamentStart> {
        self.started.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    /// Record the start triple.
    ///
    /// Once set, every field is frozen: writing the same values again is a no-op,
    /// writing different ones fails with [`TournamentError::ImmutableAfterStart`]
    /// naming the first field that would change.
    pub fn set_started(&mut self, start: TournamentStart) -> Result<(), TournamentError> {
        if start.competitor_count == 0 {
            return Err(TournamentError::InvalidCompetitorCount);
        }
        let current = match self.started {
            Some(current) => current,
            None => {
                self.started = Some(start);
                return Ok(());
            }
        };
        if current.started_at != start.started_at {
            return Err(TournamentError::ImmutableAfterStart { field: "started_at" });
        }
        if current.competitor_count != start.competitor_count {
            return Err(TournamentError::ImmutableAfterStart {
                field: "competitor_count",
            });
        }
        if current.starting_round != start.starting_round {
            return Err(TournamentError::ImmutableAfterStart {
                field: "starting_round",
            });
        }
        Ok(())
    }
}
