//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Opens (or initializes) the repository and calls into it
//! 3. Formats and displays the result
//!
//! Handlers do NOT mutate repository state directly; every mutation goes
//! through [`crate::repo::Repository`].

mod add;
mod branch;
mod clone;
mod commit;
mod completion;
mod init;
mod log_cmd;
mod merge;
mod switch;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use branch::branch;
pub use clone::clone;
pub use commit::commit;
pub use completion::completion;
pub use init::init;
pub use log_cmd::log;
pub use merge::merge;
pub use switch::switch;

use anyhow::Result;

use super::args::Command;
use super::Context;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init { branch } => init(ctx, branch.as_deref()),
        Command::Add { paths } => add(ctx, &paths),
        Command::Commit { message } => commit(ctx, &message),
        Command::Log { json } => log(ctx, json),
        Command::Branch { name } => branch(ctx, name.as_deref()),
        Command::Switch { name } => switch(ctx, &name),
        Command::Merge { name } => merge(ctx, &name),
        Command::Clone { target } => clone(ctx, &target),
        Command::Completion { shell } => completion(shell),
    }
}
