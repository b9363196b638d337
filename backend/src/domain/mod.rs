//! Domain primitives, services and ports.
//!
//! Purpose: model habits and check-ins, compute streaks and orchestrate the
//! check-in lifecycle without knowing about HTTP or SQL. Adapters reach the
//! domain through the traits in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `Habit`, `CheckIn` and their validated field types.
//! - `streak` and `calendar`: pure day arithmetic.
//! - `CheckInService` / `HabitService`: driving port implementations.

pub mod calendar;
pub mod check_in;
mod check_in_service;
pub mod error;
pub mod habit;
mod habit_service;
pub mod ports;
pub mod streak;
mod trace_id;
pub mod user;

pub use self::check_in::{CheckIn, CheckInNote, CheckInValidationError, NewCheckIn};
pub use self::check_in_service::CheckInService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::habit::{
    FrequencyGoal, Habit, HabitDescription, HabitDraft, HabitName, HabitPatch,
    HabitValidationError, StreakSnapshot,
};
pub use self::habit_service::HabitService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};
