pub mod availability;
pub mod repository;
pub mod validation;

use serde::Serialize;
use std::collections::BTreeMap;

pub use repository::{SeatInventory, UpstreamError};

/// Field name → messages, rendered as the `errors` object of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error
    /// carrying every field message.
    pub fn into_result(self, message: &str) -> CoreResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation {
                message: message.to_string(),
                errors: self,
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("{0}")]
    UpstreamTimeout(String),
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Validation error for a single field.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = FieldErrors::new();
        errors.add(field, message.clone());
        CoreError::Validation { message, errors }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::Validation { .. } => 400,
            CoreError::NotFound(_) => 404,
            CoreError::Conflict(_) => 409,
            CoreError::UpstreamUnavailable(_) => 503,
            CoreError::UpstreamTimeout(_) => 504,
            CoreError::Internal(_) => 500,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Outcome of an update that may turn out to be a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Applied(T),
    Unchanged(T),
}

impl<T> Change<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Change::Applied(value) | Change::Unchanged(value) => value,
        }
    }
}
