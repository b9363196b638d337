//! Builders wiring the domain services to a storage adapter.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use backend::domain::{CheckInService, HabitService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryHabitStore;
use backend::outbound::persistence::{DieselCheckInRepository, DieselHabitRepository};

use super::ServerConfig;

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a process-local in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => {
            let habits = Arc::new(DieselHabitRepository::new(pool.clone()));
            let check_ins = Arc::new(DieselCheckInRepository::new(pool.clone()));
            HttpState::from_services(
                Arc::new(HabitService::new(
                    habits.clone(),
                    check_ins.clone(),
                    clock.clone(),
                )),
                Arc::new(CheckInService::new(habits, check_ins, clock)),
            )
        }
        None => {
            info!("no database configured; habits are kept in memory");
            let store = Arc::new(InMemoryHabitStore::new());
            HttpState::from_services(
                Arc::new(HabitService::new(store.clone(), store.clone(), clock.clone())),
                Arc::new(CheckInService::new(store.clone(), store, clock)),
            )
        }
    };
    web::Data::new(state)
}
