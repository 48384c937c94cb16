pub mod chores_errors;
pub mod chores_model;
pub mod chores_repository;
pub mod chores_service;
pub mod chores_traits;

pub use chores_errors::ChoreError;
pub use chores_model::{Allowance, Chore, ChoreStatus, NewAllowance, NewChore};
pub use chores_repository::{AllowanceRepository, ChoreRepository};
pub use chores_service::ChoreService;
pub use chores_traits::{AllowanceRepositoryTrait, ChoreRepositoryTrait, ChoreServiceTrait};
