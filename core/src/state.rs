//! Render state of a mounted view.
//!
//! A view starts in `Loading` and settles exactly once into `Error` or
//! `Ready`. There is no way back to `Loading` short of mounting again.

use thiserror::Error;

/// What the user is told when a view fails. Transient and permanent
/// failures are deliberately indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Failed to authenticate with Petfinder API")]
    Authentication,

    #[error("{0}")]
    Fetch(String),
}

impl ViewError {
    pub fn fetch(message: impl Into<String>) -> Self {
        ViewError::Fetch(message.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Loading,
    Error(ViewError),
    Ready(T),
}

impl<T> ViewState<T> {
    /// Settle a loading view. Already-settled views ignore the outcome.
    pub fn resolve(self, outcome: Result<T, ViewError>) -> Self {
        match self {
            ViewState::Loading => match outcome {
                Ok(value) => ViewState::Ready(value),
                Err(error) => ViewState::Error(error),
            },
            settled => settled,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            ViewState::Error(error) => Some(error),
            _ => None,
        }
    }
}
