//! Habit aggregate and its validated field types.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::UserId;

/// Maximum habit name length in characters, after trimming.
pub const HABIT_NAME_MAX: usize = 100;
/// Maximum habit description length in characters, after trimming.
pub const HABIT_DESCRIPTION_MAX: usize = 500;
/// Accepted range for the weekly frequency goal.
pub const FREQUENCY_GOAL_RANGE: std::ops::RangeInclusive<u8> = 1..=7;

/// Validation failures for habit fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HabitValidationError {
    /// Name was blank after trimming.
    #[error("habit name must not be empty")]
    EmptyName,
    /// Name exceeded [`HABIT_NAME_MAX`] characters.
    #[error("habit name must be at most {max} characters")]
    NameTooLong {
        /// Character limit.
        max: usize,
    },
    /// Description exceeded [`HABIT_DESCRIPTION_MAX`] characters.
    #[error("description must be at most {max} characters")]
    DescriptionTooLong {
        /// Character limit.
        max: usize,
    },
    /// Frequency goal fell outside [`FREQUENCY_GOAL_RANGE`].
    #[error("frequency goal must be between 1 and 7")]
    FrequencyGoalOutOfRange {
        /// Rejected value.
        value: i64,
    },
}

/// Trimmed, non-empty habit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitName(String);

impl HabitName {
    /// Trim and validate a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, HabitValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if trimmed.chars().count() > HABIT_NAME_MAX {
            return Err(HabitValidationError::NameTooLong {
                max: HABIT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for HabitName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Trimmed habit description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDescription(String);

impl HabitDescription {
    /// Trim and validate a description. Blank input yields `None`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Option<Self>, HabitValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > HABIT_DESCRIPTION_MAX {
            return Err(HabitValidationError::DescriptionTooLong {
                max: HABIT_DESCRIPTION_MAX,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for HabitDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Target number of check-ins per week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyGoal(u8);

impl FrequencyGoal {
    /// Validate a goal from any integer source.
    pub fn new(value: impl Into<i64>) -> Result<Self, HabitValidationError> {
        let value = value.into();
        u8::try_from(value)
            .ok()
            .filter(|goal| FREQUENCY_GOAL_RANGE.contains(goal))
            .map(Self)
            .ok_or(HabitValidationError::FrequencyGoalOutOfRange { value })
    }

    /// Goal as a plain number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for FrequencyGoal {
    fn default() -> Self {
        Self(1)
    }
}

/// Streak fields derived from a habit's check-ins.
///
/// `longest_streak >= current_streak` holds for every snapshot produced by
/// [`StreakSnapshot::after_check_in`] and [`StreakSnapshot::after_removal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakSnapshot {
    /// Consecutive days ending today or yesterday.
    pub current_streak: u32,
    /// Best streak ever recorded for the habit.
    pub longest_streak: u32,
    /// Date of the newest check-in.
    pub last_check_in: Option<NaiveDate>,
}

impl StreakSnapshot {
    /// Snapshot after recording a check-in on `day`.
    pub fn after_check_in(self, current_streak: u32, day: NaiveDate) -> Self {
        Self {
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_check_in: Some(day),
        }
    }

    /// Snapshot after undoing a check-in.
    ///
    /// The longest streak is never lowered, even when the removed day was
    /// part of it.
    pub fn after_removal(self, current_streak: u32, newest_remaining: Option<NaiveDate>) -> Self {
        Self {
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_check_in: newest_remaining,
        }
    }
}

/// Partial update applied by the owner.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    /// Replacement name.
    pub name: Option<HabitName>,
    /// Replacement description.
    pub description: Option<Option<HabitDescription>>,
    /// Replacement frequency goal.
    pub frequency_goal: Option<FrequencyGoal>,
    /// Archive or reactivate the habit.
    pub is_active: Option<bool>,
}

/// Input for rebuilding a [`Habit`] from storage.
#[derive(Debug, Clone)]
pub struct HabitDraft {
    /// Habit identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: HabitName,
    /// Optional description.
    pub description: Option<HabitDescription>,
    /// Weekly goal.
    pub frequency_goal: FrequencyGoal,
    /// Stored streak fields.
    pub streak: StreakSnapshot,
    /// Whether the habit is active.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A habit owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    id: Uuid,
    owner_id: UserId,
    name: HabitName,
    description: Option<HabitDescription>,
    frequency_goal: FrequencyGoal,
    streak: StreakSnapshot,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Habit {
    /// Rebuild a habit from already validated parts.
    pub fn new(draft: HabitDraft) -> Self {
        let HabitDraft {
            id,
            owner_id,
            name,
            description,
            frequency_goal,
            streak,
            is_active,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            owner_id,
            name,
            description,
            frequency_goal,
            streak,
            is_active,
            created_at,
            updated_at,
        }
    }

    /// A freshly created, active habit with no check-ins.
    pub fn create(
        owner_id: UserId,
        name: HabitName,
        description: Option<HabitDescription>,
        frequency_goal: FrequencyGoal,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(HabitDraft {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description,
            frequency_goal,
            streak: StreakSnapshot::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an owner's patch. Streak fields are untouched.
    pub fn apply(mut self, patch: HabitPatch, now: DateTime<Utc>) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(goal) = patch.frequency_goal {
            self.frequency_goal = goal;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        self
    }

    /// Replace the stored streak fields.
    pub fn with_streak(mut self, streak: StreakSnapshot) -> Self {
        self.streak = streak;
        self
    }

    /// Habit identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Display name.
    pub fn name(&self) -> &HabitName {
        &self.name
    }

    /// Optional description.
    pub fn description(&self) -> Option<&HabitDescription> {
        self.description.as_ref()
    }

    /// Weekly goal.
    pub fn frequency_goal(&self) -> FrequencyGoal {
        self.frequency_goal
    }

    /// Stored streak fields.
    pub fn streak(&self) -> StreakSnapshot {
        self.streak
    }

    /// Whether the habit is active.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
