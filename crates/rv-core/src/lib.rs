//! # rv-core
//!
//! Core types shared across the rvlake crates.
//!
//! - Entity records emitted by the report assembler (VMs, hosts, datastores,
//!   networks, OS histogram, vCenter summaries)
//! - Concern types produced by VM validators and persisted by the concern store
//! - The closed set of report domains ([`QueryType`]) and their table prerequisites
//! - The [`VmValidator`] collaborator contract
//!
//! Field names on the entity records are an output contract: they serialize in
//! camelCase exactly as downstream consumers expect them.

pub mod entities;
pub mod enums;
pub mod errors;
pub mod validator;

pub use enums::QueryType;
pub use errors::ValidatorError;
pub use validator::VmValidator;
