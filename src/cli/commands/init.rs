//! init command - Initialize a repository

use anyhow::Result;

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::repo::{InitOutcome, Repository};
use crate::ui::output;

/// Initialize a repository in the working directory.
///
/// Re-initializing is benign: an existing repository is left untouched
/// and the command still succeeds.
pub fn init(ctx: &Context, branch: Option<&str>) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let branch = branch.map(BranchName::new).transpose()?;

    let (repo, outcome) = Repository::init_at(&cwd, branch.as_ref())?;
    match outcome {
        InitOutcome::Created => output::print(
            format!(
                "Initialized empty repository in {} (branch {})",
                repo.paths().repo_dir().display(),
                repo.config().default_branch
            ),
            ctx.verbosity(),
        ),
        InitOutcome::AlreadyInitialized => {
            output::print("Repository already initialized.", ctx.verbosity())
        }
    }
    Ok(())
}
