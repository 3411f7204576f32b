//! branch command - Create a branch or list branches

use anyhow::Result;

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::repo::Repository;
use crate::ui::output;

/// With a name, create a branch at the current tip; without one, list
/// all branches with the active branch marked.
pub fn branch(ctx: &Context, name: Option<&str>) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let repo = Repository::discover(&cwd)?;

    match name {
        Some(name) => {
            let name = BranchName::new(name)?;
            repo.create_branch(&name)?;
            output::print(format!("Created branch '{name}'."), ctx.verbosity());
        }
        None => {
            let (branches, current) = repo.branches()?;
            for branch in branches {
                let marker = if branch == current { "*" } else { " " };
                output::print(format!("{marker} {branch}"), ctx.verbosity());
            }
        }
    }
    Ok(())
}
