//! switch command - Move HEAD to another branch

use anyhow::Result;

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::repo::{Repository, SwitchOutcome};
use crate::ui::output;

/// Point HEAD at another branch.
pub fn switch(ctx: &Context, name: &str) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let repo = Repository::discover(&cwd)?;
    let name = BranchName::new(name)?;

    match repo.switch(&name)? {
        SwitchOutcome::Switched => {
            output::print(format!("Switched to branch '{name}'."), ctx.verbosity())
        }
        SwitchOutcome::AlreadyOn => {
            output::print(format!("Already on branch '{name}'."), ctx.verbosity())
        }
    }
    Ok(())
}
