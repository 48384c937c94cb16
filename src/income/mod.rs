pub mod income_errors;
pub mod income_model;
pub mod income_repository;
pub mod income_service;
pub mod income_traits;

pub use income_errors::IncomeError;
pub use income_model::{Income, IncomeUpdate, NewIncome};
pub use income_repository::IncomeRepository;
pub use income_service::IncomeService;
pub use income_traits::{IncomeRepositoryTrait, IncomeServiceTrait};
