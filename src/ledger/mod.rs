//! Credit ledger - optimistic local bookkeeping against the server balance.
//!
//! # Key Concepts
//! - Reconciliation: the server balance is authoritative; every successful
//!   balance fetch overwrites the cached value.
//! - Optimistic deduction: `try_spend` decrements the cached balance before
//!   the server confirms the spend, for immediate feedback.
//! - Compensation: each `try_spend` is paired with exactly one later
//!   `commit` or `refund`; the orchestrator owns that pairing.
//!
//! # Thread Safety
//! The ledger is the single owner of the balance. Concurrent submissions
//! share one ledger and serialize through its async accessors; nothing else
//! may mutate the cached balance.

use tokio::sync::RwLock;
use tracing::debug;

/// Result of an optimistic spend attempt. Insufficiency is a normal
/// outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendOutcome {
    Spent,
    InsufficientCredit,
}

/// Point-in-time view of the ledger for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LedgerSnapshot {
    pub balance: u64,
    pub pending_debits: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct LedgerState {
    balance: u64,
    pending_debits: u32,
}

/// Locally cached credit balance with optimistic deduction.
///
/// # Invariants
/// - `balance` never exceeds what the server would report once all
///   in-flight operations settle: every optimistic deduction is matched by
///   an eventually-applied `commit` or `refund`.
/// - `try_spend` mutates nothing when the balance is insufficient.
pub struct CreditLedger {
    state: RwLock<LedgerState>,
}

impl CreditLedger {
    /// Create a ledger with an unknown (zero) balance. The first successful
    /// balance fetch reconciles it.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Overwrite the cached balance with the authoritative server value.
    pub async fn reconcile(&self, server_balance: u64) {
        let mut state = self.state.write().await;
        if state.balance != server_balance {
            debug!(
                local = state.balance,
                server = server_balance,
                "reconciling credit balance"
            );
        }
        state.balance = server_balance;
    }

    /// Optimistically deduct `cost` credits.
    ///
    /// On success the deduction is pending until the matching `commit` or
    /// `refund`; on insufficiency nothing changes.
    pub async fn try_spend(&self, cost: u64) -> SpendOutcome {
        let mut state = self.state.write().await;
        if state.balance < cost {
            return SpendOutcome::InsufficientCredit;
        }
        state.balance -= cost;
        state.pending_debits += 1;
        debug!(cost, balance = state.balance, "optimistic spend");
        SpendOutcome::Spent
    }

    /// Settle a pending deduction after the server honored the spend. The
    /// balance stays as deducted; the server already reflects it.
    pub async fn commit(&self) {
        let mut state = self.state.write().await;
        state.pending_debits = state.pending_debits.saturating_sub(1);
        debug!(balance = state.balance, "spend committed");
    }

    /// Reverse a pending deduction the server did not honor.
    pub async fn refund(&self, amount: u64) {
        let mut state = self.state.write().await;
        state.balance += amount;
        state.pending_debits = state.pending_debits.saturating_sub(1);
        debug!(amount, balance = state.balance, "spend refunded");
    }

    /// Add purchased credits reported by the platform store collaborator.
    pub async fn credit(&self, amount: u64) {
        let mut state = self.state.write().await;
        state.balance += amount;
        debug!(amount, balance = state.balance, "credits purchased");
    }

    /// The cached balance.
    pub async fn balance(&self) -> u64 {
        self.state.read().await.balance
    }

    /// Number of optimistic deductions not yet committed or refunded.
    pub async fn pending_debits(&self) -> u32 {
        self.state.read().await.pending_debits
    }

    /// Consistent snapshot of balance and pending debits.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.read().await;
        LedgerSnapshot {
            balance: state.balance,
            pending_debits: state.pending_debits,
        }
    }
}

impl Default for CreditLedger {
    fn default() -> Self {
        Self::new()
    }
}
