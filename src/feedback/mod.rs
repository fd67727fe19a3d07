mod center;

use std::fmt::{Display, Formatter};
use std::time::Duration;

pub use center::{ConfirmationCallback, MessageCallback, MessageCenter, ToastExpiry};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeedbackOptions {
    pub toast_duration: Duration,
}

impl Default for FeedbackOptions {
    fn default() -> Self {
        Self {
            toast_duration: Duration::from_millis(3_000),
        }
    }
}

impl FeedbackOptions {
    pub fn toast_duration_ms(mut self, value: u64) -> Self {
        self.toast_duration = Duration::from_millis(value);
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageSnapshot {
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfirmationSnapshot {
    pub title: String,
    pub message: String,
    pub yes_text: String,
    pub no_text: String,
}

/// What a view layer needs to render the feedback overlays.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeedbackSnapshot {
    pub loading: bool,
    pub message: Option<MessageSnapshot>,
    pub confirmation: Option<ConfirmationSnapshot>,
    pub toast: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FeedbackError {
    NoPendingConfirmation,
}

impl Display for FeedbackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackError::NoPendingConfirmation => {
                f.write_str("no confirmation is waiting for an answer")
            }
        }
    }
}

impl std::error::Error for FeedbackError {}
