//! core
//!
//! Core domain types, paths, configuration, and the error taxonomy.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Digest, BranchName
//! - [`errors`] - The RepoError taxonomy shared by all components
//! - [`paths`] - Centralized path routing for repository storage
//! - [`config`] - Repository configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - All storage paths route through one helper
//! - Errors are typed; only the CLI renders them

pub mod config;
pub mod errors;
pub mod paths;
pub mod types;
