pub mod ledger_model;
pub mod ledger_service;

pub use ledger_model::{FinancialSummary, Insight, InsightKind};
pub use ledger_service::{LedgerService, LedgerServiceTrait};
