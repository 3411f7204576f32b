//! Stratum - a minimal content-addressed version control engine
//!
//! Stratum is a single-binary tool that stages file snapshots, freezes
//! them into immutable hash-identified commits, organizes commits into
//! named branches, and reconciles divergent branches with three-way
//! merges.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the repository)
//! - [`repo`] - The `Repository` handle orchestrating every operation
//! - [`core`] - Domain types, paths, configuration, and the error taxonomy
//! - [`store`] - Persistent state: objects, staging index, refs, lock
//! - [`graph`] - Commit records, canonical serialization, ancestry walks
//! - [`merge`] - Three-way merge resolution
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! Stratum maintains the following invariants:
//!
//! 1. Every digest referenced by a branch or a commit parent resolves in
//!    the object store (or is the root-commit sentinel)
//! 2. Stored objects are immutable; rewriting a digest is a no-op
//! 3. The staging index is empty immediately after a successful commit
//! 4. Ref and HEAD updates are atomic with respect to abrupt termination

pub mod cli;
pub mod core;
pub mod graph;
pub mod merge;
pub mod repo;
pub mod store;
pub mod ui;
