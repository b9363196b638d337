//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the persistence adapters.
//! Driving ports (`*Command`, `*Query`) are implemented by the domain services
//! and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod check_in_command;
mod check_in_query;
mod check_in_repository;
mod habit_command;
mod habit_query;
mod habit_repository;

#[cfg(test)]
pub use check_in_command::MockCheckInCommand;
pub use check_in_command::{
    CheckInCommand, CheckInPayload, RecordCheckInRequest, RecordCheckInResponse,
    RemoveCheckInRequest, RemoveCheckInResponse,
};
#[cfg(test)]
pub use check_in_query::MockCheckInQuery;
pub use check_in_query::{CHECK_IN_HISTORY_PAGE_SIZE, CheckInQuery, ListCheckInsRequest};
#[cfg(test)]
pub use check_in_repository::MockCheckInRepository;
pub use check_in_repository::{CheckInRepository, CheckInRepositoryError};
#[cfg(test)]
pub use habit_command::MockHabitCommand;
pub use habit_command::{
    CreateHabitRequest, DeleteHabitRequest, HabitCommand, HabitPayload, UpdateHabitRequest,
};
#[cfg(test)]
pub use habit_query::MockHabitQuery;
pub use habit_query::{
    DETAIL_RECENT_CHECK_INS, GetHabitRequest, HABIT_LIST_PAGE_SIZE, HabitDetail, HabitQuery,
    HabitSummary, LIST_RECENT_CHECK_INS, ListHabitsRequest,
};
#[cfg(test)]
pub use habit_repository::MockHabitRepository;
pub use habit_repository::{HabitRepository, HabitRepositoryError};
