//! Analysis orchestrator - sequences a submission from balance check to
//! settled outcome.
//!
//! # Submission Flow
//! ```text
//! 1. Validate the prompt (non-empty, within the length cap)
//! 2. Fetch the authoritative balance and reconcile the ledger
//! 3. Optimistically deduct one credit (insufficiency is terminal)
//! 4. Submit the analysis
//! 5. Commit the deduction on success, refund it on any failure
//! ```
//!
//! Exactly one terminal outcome is produced per submission. The orchestrator
//! is the only place compensation logic runs: every optimistic deduction it
//! takes is committed or refunded on the same run, so a run must never be
//! torn down mid-flight (see [`AnalysisOrchestrator::spawn_submit`]).

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::credential::BearerToken;
use crate::decode::decode_analysis_text;
use crate::ledger::{CreditLedger, SpendOutcome};
use crate::remote::{AnalysisRequest, RemoteApi, RemoteError};

/// Credits consumed by one analysis.
pub const ANALYSIS_COST: u64 = 1;

/// Errors a submission can fail with.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("prompt exceeds {max} characters")]
    PromptTooLong { max: usize },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Terminal outcome of a submission.
///
/// Insufficient credit is its own variant rather than a failure so the UI
/// can route it to a dedicated "need more credit" signal instead of a
/// generic error message.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Completed(String),
    InsufficientCredit,
    Failed(AnalysisError),
}

/// Non-terminal phases of a submission, published for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    FetchingBalance,
    Deducting,
    Submitting,
    Settled,
}

/// Orchestrates submissions against a shared ledger.
///
/// Concurrent submissions each run this flow independently; the shared
/// [`CreditLedger`] serializes their balance mutations.
pub struct AnalysisOrchestrator {
    remote: Arc<dyn RemoteApi>,
    ledger: Arc<CreditLedger>,
    max_prompt_chars: usize,
    events: Option<broadcast::Sender<SubmitPhase>>,
}

impl AnalysisOrchestrator {
    pub fn new(remote: Arc<dyn RemoteApi>, ledger: Arc<CreditLedger>, config: &Config) -> Self {
        Self {
            remote,
            ledger,
            max_prompt_chars: config.max_prompt_chars,
            events: None,
        }
    }

    /// Attach an event sink for phase observation (e.g. a progress UI).
    pub fn with_events(mut self, events: broadcast::Sender<SubmitPhase>) -> Self {
        self.events = Some(events);
        self
    }

    /// The ledger this orchestrator settles against.
    pub fn ledger(&self) -> &Arc<CreditLedger> {
        &self.ledger
    }

    /// Run one submission to its terminal outcome.
    ///
    /// # Postconditions
    /// - Every optimistic deduction taken during the call has been committed
    ///   or refunded by the time it returns.
    pub async fn submit(
        &self,
        text: &str,
        credential: Option<&BearerToken>,
    ) -> AnalysisOutcome {
        let submission_id = Uuid::new_v4();
        let outcome = self.run(submission_id, text, credential).await;
        self.publish(SubmitPhase::Settled);
        match &outcome {
            AnalysisOutcome::Completed(_) => info!(%submission_id, "analysis completed"),
            AnalysisOutcome::InsufficientCredit => {
                info!(%submission_id, "analysis rejected: insufficient credit")
            }
            AnalysisOutcome::Failed(err) => warn!(%submission_id, error = %err, "analysis failed"),
        }
        outcome
    }

    /// Run a submission on its own task.
    ///
    /// A caller that abandons the returned handle cannot cancel the run, so
    /// the commit/refund pairing still executes even if the user walks away
    /// mid-flight.
    pub fn spawn_submit(
        self: Arc<Self>,
        text: String,
        credential: Option<BearerToken>,
    ) -> JoinHandle<AnalysisOutcome> {
        tokio::spawn(async move { self.submit(&text, credential.as_ref()).await })
    }

    async fn run(
        &self,
        submission_id: Uuid,
        text: &str,
        credential: Option<&BearerToken>,
    ) -> AnalysisOutcome {
        let request = match self.validate(text) {
            Ok(request) => request,
            Err(err) => return AnalysisOutcome::Failed(err),
        };

        self.publish(SubmitPhase::FetchingBalance);
        let server_balance = match self.remote.fetch_balance(credential).await {
            Ok(balance) => balance,
            // No spend was attempted yet; nothing to compensate.
            Err(err) => return AnalysisOutcome::Failed(err.into()),
        };
        self.ledger.reconcile(server_balance).await;

        self.publish(SubmitPhase::Deducting);
        if self.ledger.try_spend(ANALYSIS_COST).await == SpendOutcome::InsufficientCredit {
            return AnalysisOutcome::InsufficientCredit;
        }

        self.publish(SubmitPhase::Submitting);
        debug!(%submission_id, chars = text.chars().count(), "submitting analysis");
        match self.remote.analyze(&request, credential).await {
            Ok(body) => match decode_analysis_text(&body) {
                Ok(analysis) => {
                    // The server honored the spend; only the pending debit settles.
                    self.ledger.commit().await;
                    AnalysisOutcome::Completed(analysis)
                }
                Err(err) => {
                    self.ledger.refund(ANALYSIS_COST).await;
                    AnalysisOutcome::Failed(AnalysisError::Remote(err.into()))
                }
            },
            Err(RemoteError::PaymentRequired) => {
                // The authoritative side rejected the spend (stale local
                // cache or independent insufficiency): reverse the
                // optimistic deduction.
                self.ledger.refund(ANALYSIS_COST).await;
                AnalysisOutcome::InsufficientCredit
            }
            Err(err) => {
                // Assume a non-success response did not consume a credit and
                // refund, favoring the user over a potential double-spend.
                self.ledger.refund(ANALYSIS_COST).await;
                AnalysisOutcome::Failed(err.into())
            }
        }
    }

    fn validate(&self, text: &str) -> Result<AnalysisRequest, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyPrompt);
        }
        if text.chars().count() > self.max_prompt_chars {
            return Err(AnalysisError::PromptTooLong {
                max: self.max_prompt_chars,
            });
        }
        Ok(AnalysisRequest::new(text))
    }

    fn publish(&self, phase: SubmitPhase) {
        if let Some(events) = &self.events {
            let _ = events.send(phase);
        }
    }
}
