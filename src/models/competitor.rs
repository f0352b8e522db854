//! Competitor data structure.

use crate::models::label::{trimmed_label, LabelError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used in matches, participations and lookups).
pub type CompetitorId = Uuid;

/// Someone who can enter tournaments. Exists independently of any tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Competitor {
    /// Create a competitor with a trimmed, non-empty label. Labels need not be unique.
    pub fn new(label: &str) -> Result<Self, LabelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            label: trimmed_label(label)?,
            created_at: Utc::now(),
        })
    }
}
