//! Core data types for the Paisa AI dispatch library.
//!
//! This crate provides the foundation data types shared across the Paisa
//! workspace: the API credential newtype, the financial snapshot handed in
//! by the host application, the structured insight returned by the AI, and
//! the per-request options consumed by the dispatcher.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credential;
mod insight;
mod request;
mod snapshot;

pub use credential::Credential;
pub use insight::{AiInsight, AiInsightBuilder};
pub use request::{RequestOptions, RequestOptionsBuilder};
pub use snapshot::{
    BudgetStatus, BudgetStatusBuilder, CategorySpend, CategorySpendBuilder, DaySpend,
    DaySpendBuilder, FinancialSnapshot, FinancialSnapshotBuilder, GoalProgress,
    GoalProgressBuilder, RecentTransaction, RecentTransactionBuilder, SnapshotTotals,
    SnapshotTotalsBuilder,
};
