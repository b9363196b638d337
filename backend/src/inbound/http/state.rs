//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable with mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    CheckInCommand, CheckInQuery, CheckInRepository, HabitCommand, HabitQuery, HabitRepository,
};
use crate::domain::{CheckInService, HabitService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub habits: Arc<dyn HabitCommand>,
    pub habits_query: Arc<dyn HabitQuery>,
    pub check_ins: Arc<dyn CheckInCommand>,
    pub check_ins_query: Arc<dyn CheckInQuery>,
}

impl HttpState {
    /// Construct state from individual port implementations.
    #[must_use]
    pub fn new(
        habits: Arc<dyn HabitCommand>,
        habits_query: Arc<dyn HabitQuery>,
        check_ins: Arc<dyn CheckInCommand>,
        check_ins_query: Arc<dyn CheckInQuery>,
    ) -> Self {
        Self {
            habits,
            habits_query,
            check_ins,
            check_ins_query,
        }
    }

    /// Wire both domain services as command and query ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{CheckInService, HabitService};
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryHabitStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryHabitStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::from_services(
    ///     Arc::new(HabitService::new(store.clone(), store.clone(), clock.clone())),
    ///     Arc::new(CheckInService::new(store.clone(), store, clock)),
    /// );
    /// let _habits = state.habits.clone();
    /// ```
    #[must_use]
    pub fn from_services<H, C>(
        habit_service: Arc<HabitService<H, C>>,
        check_in_service: Arc<CheckInService<H, C>>,
    ) -> Self
    where
        H: HabitRepository + 'static,
        C: CheckInRepository + 'static,
    {
        Self {
            habits: habit_service.clone(),
            habits_query: habit_service,
            check_ins: check_in_service.clone(),
            check_ins_query: check_in_service,
        }
    }
}
