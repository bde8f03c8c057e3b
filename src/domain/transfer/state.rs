//! Transfer flow state machine

use std::fmt;
use thiserror::Error;

use super::request::TransferRequest;
use super::result::TransferResult;

/// Why an execution attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The bank processed the request and declined it
    Declined,
    /// The session token was rejected; log in again before retrying
    SessionExpired,
    /// The server answered with an error status
    Server,
    /// The request never completed
    Network,
}

/// User-facing description of a failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    kind: FailureKind,
    message: String,
}

impl TransferFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a retry must be preceded by a fresh login
    pub fn requires_reauthentication(&self) -> bool {
        self.kind == FailureKind::SessionExpired
    }
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Transfer flow states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    Parsing,
    AwaitingConfirmation(TransferRequest),
    Executing(TransferRequest),
    Succeeded(TransferResult),
    Failed(TransferRequest, TransferFailure),
}

impl TransferState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::AwaitingConfirmation(_) => "awaiting confirmation",
            Self::Executing(_) => "executing",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_, _) => "failed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_executing(&self) -> bool {
        matches!(self, Self::Executing(_))
    }

    /// The draft this state carries, if any
    pub fn draft(&self) -> Option<&TransferRequest> {
        match self {
            Self::AwaitingConfirmation(draft) | Self::Executing(draft) | Self::Failed(draft, _) => {
                Some(draft)
            }
            _ => None,
        }
    }

    /// Apply an event, returning the next state.
    ///
    /// State machine:
    ///   IDLE | SUCCEEDED | FAILED | AWAITING -> PARSING (input)
    ///   PARSING -> AWAITING (extracted) | IDLE (extraction failed)
    ///   AWAITING -> EXECUTING (confirm) | IDLE (cancel) | AWAITING (amended)
    ///   EXECUTING -> SUCCEEDED | FAILED (completed / errored)
    ///   FAILED -> EXECUTING (retry, same draft) | IDLE (cancel)
    ///   SUCCEEDED | FAILED | IDLE -> IDLE (reset)
    pub fn apply(&self, event: TransferEvent) -> Result<TransferState, InvalidStateTransition> {
        let next = match (self, event) {
            (
                Self::Idle | Self::Succeeded(_) | Self::Failed(_, _) | Self::AwaitingConfirmation(_),
                TransferEvent::Input,
            ) => Self::Parsing,

            (Self::Parsing, TransferEvent::Extracted(draft)) => Self::AwaitingConfirmation(draft),
            (Self::Parsing, TransferEvent::ExtractionFailed) => Self::Idle,

            (Self::AwaitingConfirmation(draft), TransferEvent::Confirm) => {
                Self::Executing(draft.clone())
            }
            (Self::AwaitingConfirmation(_), TransferEvent::Cancel) => Self::Idle,
            (Self::AwaitingConfirmation(_), TransferEvent::Amended(draft)) => {
                Self::AwaitingConfirmation(draft)
            }

            (Self::Executing(draft), TransferEvent::Completed(result)) => {
                if result.is_success() {
                    Self::Succeeded(result)
                } else {
                    Self::Failed(
                        draft.clone(),
                        TransferFailure::new(FailureKind::Declined, result.message()),
                    )
                }
            }
            (Self::Executing(draft), TransferEvent::Errored(failure)) => {
                Self::Failed(draft.clone(), failure)
            }

            (Self::Failed(draft, _), TransferEvent::Retry) => Self::Executing(draft.clone()),
            (Self::Failed(_, _), TransferEvent::Cancel) => Self::Idle,

            (Self::Idle | Self::Succeeded(_) | Self::Failed(_, _), TransferEvent::Reset) => {
                Self::Idle
            }

            (current, event) => {
                return Err(InvalidStateTransition {
                    current_state: current.as_str(),
                    action: event.as_str(),
                })
            }
        };
        Ok(next)
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs that drive the transfer flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// Recognized text arrived
    Input,
    Extracted(TransferRequest),
    ExtractionFailed,
    /// Details were added to the pending draft before confirmation
    Amended(TransferRequest),
    Confirm,
    Cancel,
    /// The bank answered the execution request
    Completed(TransferResult),
    /// The execution request failed before a result was produced
    Errored(TransferFailure),
    Retry,
    Reset,
}

impl TransferEvent {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "accept input",
            Self::Extracted(_) => "accept a draft",
            Self::ExtractionFailed => "report an extraction failure",
            Self::Amended(_) => "amend the draft",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Completed(_) => "complete",
            Self::Errored(_) => "fail",
            Self::Retry => "retry",
            Self::Reset => "reset",
        }
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: &'static str,
    pub action: &'static str,
}
