pub mod db;

pub mod accounts;
pub mod budget;
pub mod chores;
pub mod expenses;
pub mod goals;
pub mod income;
pub mod ledger;
pub mod parental;

pub mod constants;
pub mod errors;
pub mod models;
pub mod schema;
pub mod streaks;
pub mod validation;

pub use errors::{Error, Result};
