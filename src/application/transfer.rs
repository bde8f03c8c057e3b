//! Voice transfer use case

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::error::ExtractionError;
use crate::domain::transfer::{
    FailureKind, InvalidStateTransition, TransferEvent, TransferExtractor, TransferFailure,
    TransferRequest, TransferState,
};
use crate::domain::voice::VoiceEvidence;

use super::ports::{BankingApi, SessionError};

/// Errors from the transfer use case
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Could not understand the transfer: {0}")]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Authentication required. Log in again before retrying this transfer.")]
    AuthenticationRequired,
}

/// Optional details the user adds to a parsed draft
#[derive(Debug, Clone, Default)]
pub struct DraftDetails {
    /// Source account number; the primary account when `None`
    pub from_account: Option<String>,
    pub memo: Option<String>,
}

impl DraftDetails {
    fn apply(self, mut draft: TransferRequest) -> TransferRequest {
        if let Some(account) = self.from_account {
            draft = draft.with_source_account(account);
        }
        if let Some(memo) = self.memo {
            draft = draft.with_memo(memo);
        }
        draft
    }
}

/// State plus the evidence that produced the current draft
#[derive(Debug, Default)]
struct Flow {
    state: TransferState,
    evidence: VoiceEvidence,
}

/// Coordinates parse -> confirm -> execute -> result -> retry.
///
/// At most one transfer executes at a time: a confirm or retry that
/// arrives while `Executing` is a no-op. Every transition is published
/// to subscribers.
pub struct TransferOrchestrator<B: BankingApi> {
    banking: Arc<B>,
    extractor: TransferExtractor,
    flow: Mutex<Flow>,
    updates: watch::Sender<TransferState>,
}

impl<B: BankingApi> TransferOrchestrator<B> {
    /// Create an orchestrator with the default extractor
    pub fn new(banking: Arc<B>) -> Self {
        Self::with_extractor(banking, TransferExtractor::new())
    }

    /// Create an orchestrator with a custom extractor
    pub fn with_extractor(banking: Arc<B>, extractor: TransferExtractor) -> Self {
        let (updates, _) = watch::channel(TransferState::Idle);
        Self {
            banking,
            extractor,
            flow: Mutex::new(Flow::default()),
            updates,
        }
    }

    /// Receive every state the flow enters
    pub fn subscribe(&self) -> watch::Receiver<TransferState> {
        self.updates.subscribe()
    }

    /// Get current state
    pub fn state(&self) -> TransferState {
        self.flow().state.clone()
    }

    fn flow(&self) -> MutexGuard<'_, Flow> {
        self.flow.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(
        &self,
        flow: &mut Flow,
        event: TransferEvent,
    ) -> Result<TransferState, InvalidStateTransition> {
        let next = flow.state.apply(event).inspect_err(|e| warn!("{e}"))?;
        debug!(from = %flow.state, to = %next, "transfer state changed");
        flow.state = next.clone();
        self.updates.send_replace(next.clone());
        Ok(next)
    }

    /// Parse recognized speech into a draft awaiting confirmation.
    ///
    /// On extraction failure the flow returns to idle and the error is
    /// returned for display.
    pub fn submit(
        &self,
        evidence: VoiceEvidence,
        details: DraftDetails,
    ) -> Result<TransferRequest, OrchestratorError> {
        let mut flow = self.flow();
        self.transition(&mut flow, TransferEvent::Input)?;

        match self.extractor.extract(evidence.transcript()) {
            Ok(draft) => {
                let draft = details.apply(draft);
                self.transition(&mut flow, TransferEvent::Extracted(draft.clone()))?;
                flow.evidence = evidence;
                Ok(draft)
            }
            Err(e) => {
                warn!(text = evidence.transcript(), "extraction failed: {e}");
                self.transition(&mut flow, TransferEvent::ExtractionFailed)?;
                flow.evidence = VoiceEvidence::default();
                Err(e.into())
            }
        }
    }

    /// Add details to the draft awaiting confirmation.
    ///
    /// The draft is not re-extracted; only the given details change.
    pub fn amend(&self, details: DraftDetails) -> Result<TransferRequest, OrchestratorError> {
        let mut flow = self.flow();
        let draft = match &flow.state {
            TransferState::AwaitingConfirmation(draft) => details.apply(draft.clone()),
            other => {
                let err = InvalidStateTransition {
                    current_state: other.as_str(),
                    action: "amend the draft",
                };
                warn!("{err}");
                return Err(err.into());
            }
        };
        self.transition(&mut flow, TransferEvent::Amended(draft.clone()))?;
        Ok(draft)
    }

    /// Confirm the pending draft and execute it.
    pub async fn confirm(&self) -> Result<TransferState, OrchestratorError> {
        self.start(TransferEvent::Confirm).await
    }

    /// Re-submit the draft of a failed attempt without re-parsing.
    pub async fn retry(&self) -> Result<TransferState, OrchestratorError> {
        let requires_login = matches!(
            &self.flow().state,
            TransferState::Failed(_, failure) if failure.requires_reauthentication()
        );
        if requires_login && !self.banking.is_authenticated().await {
            return Err(OrchestratorError::AuthenticationRequired);
        }

        self.start(TransferEvent::Retry).await
    }

    /// Discard a pending or failed draft.
    pub fn cancel(&self) -> Result<TransferState, OrchestratorError> {
        let mut flow = self.flow();
        let next = self.transition(&mut flow, TransferEvent::Cancel)?;
        flow.evidence = VoiceEvidence::default();
        Ok(next)
    }

    /// Return to idle after a finished attempt.
    pub fn reset(&self) -> Result<TransferState, OrchestratorError> {
        let mut flow = self.flow();
        let next = self.transition(&mut flow, TransferEvent::Reset)?;
        flow.evidence = VoiceEvidence::default();
        Ok(next)
    }

    async fn start(&self, event: TransferEvent) -> Result<TransferState, OrchestratorError> {
        let (draft, evidence) = {
            let mut flow = self.flow();
            if flow.state.is_executing() {
                debug!("{} ignored: a transfer is already executing", event.as_str());
                return Ok(flow.state.clone());
            }

            match self.transition(&mut flow, event)? {
                TransferState::Executing(draft) => (draft, flow.evidence.clone()),
                other => return Ok(other),
            }
        };

        info!(
            recipient = draft.recipient_name(),
            amount = draft.amount().won(),
            "executing transfer"
        );

        // No cancellation past this point: the result is applied even if
        // the caller has moved on.
        let event = match self.banking.execute_transfer(&draft, &evidence).await {
            Ok(result) => {
                info!(success = result.is_success(), "transfer completed: {}", result.message());
                TransferEvent::Completed(result)
            }
            Err(e) => {
                warn!("transfer failed: {e}");
                TransferEvent::Errored(failure_from(&e))
            }
        };

        let mut flow = self.flow();
        Ok(self.transition(&mut flow, event)?)
    }
}

fn failure_from(error: &SessionError) -> TransferFailure {
    let kind = match error {
        SessionError::Expired => FailureKind::SessionExpired,
        SessionError::Server(_) => FailureKind::Server,
        SessionError::Network(_) => FailureKind::Network,
    };
    TransferFailure::new(kind, error.to_string())
}
