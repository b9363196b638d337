//! Check-in records.
//!
//! A check-in marks a habit as done for one UTC calendar day. Records are
//! created and deleted but never edited.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::UserId;

/// Maximum note length in characters, after trimming.
pub const CHECK_IN_NOTE_MAX: usize = 500;

/// Validation failures for check-in fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckInValidationError {
    /// Note exceeded [`CHECK_IN_NOTE_MAX`] characters.
    #[error("note must be at most {max} characters")]
    NoteTooLong {
        /// Character limit.
        max: usize,
    },
}

/// Trimmed, non-blank note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInNote(String);

impl CheckInNote {
    /// Trim and validate a note. Blank notes are stored as absent.
    pub fn parse(raw: impl AsRef<str>) -> Result<Option<Self>, CheckInValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > CHECK_IN_NOTE_MAX {
            return Err(CheckInValidationError::NoteTooLong {
                max: CHECK_IN_NOTE_MAX,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for CheckInNote {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A check-in ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckIn {
    /// Identifier assigned by the service.
    pub id: Uuid,
    /// Habit being checked in.
    pub habit_id: Uuid,
    /// Owner of the habit.
    pub user_id: UserId,
    /// Day the check-in counts for.
    pub date: NaiveDate,
    /// Optional note.
    pub note: Option<CheckInNote>,
    /// Recording time.
    pub created_at: DateTime<Utc>,
}

/// A stored check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    id: Uuid,
    habit_id: Uuid,
    user_id: UserId,
    date: NaiveDate,
    note: Option<CheckInNote>,
    created_at: DateTime<Utc>,
}

impl From<NewCheckIn> for CheckIn {
    fn from(value: NewCheckIn) -> Self {
        let NewCheckIn {
            id,
            habit_id,
            user_id,
            date,
            note,
            created_at,
        } = value;
        Self {
            id,
            habit_id,
            user_id,
            date,
            note,
            created_at,
        }
    }
}

impl CheckIn {
    /// Check-in identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Habit the check-in belongs to.
    pub fn habit_id(&self) -> Uuid {
        self.habit_id
    }

    /// Owner of the habit.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Day the check-in counts for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Optional note.
    pub fn note(&self) -> Option<&CheckInNote> {
        self.note.as_ref()
    }

    /// Recording time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
