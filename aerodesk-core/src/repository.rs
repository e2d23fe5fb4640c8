use aerodesk_shared::{Route, Seat, SeatStatus};
use async_trait::async_trait;

use crate::CoreError;

/// Failure talking to a collaborating service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream timed out: {0}")]
    Timeout(String),
    #[error("upstream rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::Rejected { status: 404, .. })
    }

    /// Maps a failed inventory call onto the ledger's error taxonomy.
    /// `action` names the step for the caller-facing message.
    pub fn into_core(self, action: &str) -> CoreError {
        match self {
            UpstreamError::Unavailable(detail) => {
                CoreError::UpstreamUnavailable(format!("could not {}: {}", action, detail))
            }
            UpstreamError::Timeout(detail) => {
                CoreError::UpstreamTimeout(format!("timed out trying to {}: {}", action, detail))
            }
            UpstreamError::Rejected { status: 409, message } => {
                CoreError::Conflict(format!("could not {}: {}", action, message))
            }
            UpstreamError::Rejected { status, message } => CoreError::Internal(format!(
                "could not {} (upstream status {}): {}",
                action, status, message
            )),
            UpstreamError::Malformed(detail) => {
                CoreError::Internal(format!("could not {}: {}", action, detail))
            }
        }
    }
}

impl From<CoreError> for UpstreamError {
    fn from(err: CoreError) -> Self {
        UpstreamError::Rejected {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

/// The slice of the inventory service the ledger depends on.
///
/// Implemented over HTTP for deployment and directly by the in-process
/// inventory store for tests and single-binary setups.
#[async_trait]
pub trait SeatInventory: Send + Sync {
    /// `None` when no route has this id.
    async fn route(&self, airplane_route_id: u32) -> Result<Option<Route>, UpstreamError>;

    /// `None` when the airplane is unknown or has no seats.
    async fn seats(&self, airplane_id: u32) -> Result<Option<Vec<Seat>>, UpstreamError>;

    /// Sets a seat's status. With `expected`, the write only happens when the
    /// seat currently holds that status and is rejected with 409 otherwise.
    async fn set_seat_status(
        &self,
        airplane_id: u32,
        seat_number: &str,
        status: SeatStatus,
        expected: Option<SeatStatus>,
    ) -> Result<Seat, UpstreamError>;

    async fn free_seat(&self, airplane_id: u32, seat_number: &str) -> Result<Seat, UpstreamError>;
}
