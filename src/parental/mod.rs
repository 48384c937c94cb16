pub mod parental_errors;
pub mod parental_model;
pub mod parental_repository;
pub mod parental_service;
pub mod parental_traits;

pub use parental_errors::ParentalError;
pub use parental_model::{
    ActionCheck, ApprovalRequest, ApprovalStatus, ApprovalType, NewApprovalRequest,
    NewRestriction, ParentChildLink, Restriction, RestrictionType,
};
pub use parental_repository::{ApprovalRepository, LinkRepository, RestrictionRepository};
pub use parental_service::ParentalService;
pub use parental_traits::{
    ApprovalRepositoryTrait, LinkRepositoryTrait, ParentalServiceTrait, RestrictionRepositoryTrait,
};
