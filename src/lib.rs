//! Credit-metered client core for the Oneiro dream analysis service.
//!
//! # Key Concepts
//! - [`remote::RemoteApi`]: the three wire operations (balance, analysis,
//!   history) behind a trait seam, with a `reqwest` implementation
//! - [`ledger::CreditLedger`]: locally cached balance with optimistic
//!   deduction and server reconciliation
//! - [`orchestrator::AnalysisOrchestrator`]: the submission state machine
//!   pairing every optimistic deduction with a commit or refund
//! - [`decode`]: tolerant extraction of the generated text from the
//!   loosely-shaped service payload
//!
//! The UI shell, navigation, and the platform purchase sheet are external
//! collaborators: they call into this core and render whatever state it
//! exposes.

pub mod catalog;
pub mod config;
pub mod credential;
pub mod decode;
pub mod ledger;
pub mod orchestrator;
pub mod remote;

pub use catalog::{default_packages, CreditPackage};
pub use config::Config;
pub use credential::BearerToken;
pub use ledger::{CreditLedger, LedgerSnapshot, SpendOutcome};
pub use orchestrator::{
    AnalysisError, AnalysisOrchestrator, AnalysisOutcome, SubmitPhase, ANALYSIS_COST,
};
pub use remote::{AnalysisRequest, HistoryEntry, HttpRemoteClient, RemoteApi, RemoteError};
