//! Driving port for check-in history reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use uuid::Uuid;

use super::CheckInPayload;
use crate::domain::{Error, UserId};

/// Default page size for check-in history.
pub const CHECK_IN_HISTORY_PAGE_SIZE: u32 = 30;

/// Request for one page of a habit's check-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCheckInsRequest {
    pub habit_id: Uuid,
    pub user_id: UserId,
    pub page: PageRequest,
}

/// Driving port for reading check-in history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInQuery: Send + Sync {
    /// List check-ins newest first. Unknown or foreign habits are `not_found`.
    async fn list_check_ins(
        &self,
        request: ListCheckInsRequest,
    ) -> Result<Paginated<CheckInPayload>, Error>;
}
