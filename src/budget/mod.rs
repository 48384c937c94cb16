pub mod budget_model;
pub mod budget_repository;
pub mod budget_service;
pub mod budget_traits;

pub use budget_model::{AlertSeverity, BudgetAlert, BudgetThreshold, ThresholdInput};
pub use budget_repository::BudgetRepository;
pub use budget_service::BudgetService;
pub use budget_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
