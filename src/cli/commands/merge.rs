//! merge command - Reconcile another branch into the current one

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::merge::MergeOutcome;
use crate::repo::Repository;
use crate::ui::output;

/// Merge `name` into the current branch and render the outcome.
///
/// Conflicts are reported path by path and the command exits non-zero;
/// nothing is written in that case and both branch refs are unchanged.
pub fn merge(ctx: &Context, name: &str) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let mut repo = Repository::discover(&cwd)?;
    let name = BranchName::new(name)?;

    let report = repo.merge(&name)?;
    match &report.outcome {
        MergeOutcome::AlreadyUpToDate => {
            output::print("Already up to date.", ctx.verbosity());
        }
        MergeOutcome::FastForward { new_tip } => {
            output::print(
                format!(
                    "Fast-forwarded '{}' to {}.",
                    report.current,
                    new_tip.short(12)
                ),
                ctx.verbosity(),
            );
        }
        MergeOutcome::Merged { new_commit } => {
            output::print(
                format!(
                    "Merged '{}' into '{}' as {}.",
                    report.other,
                    report.current,
                    new_commit.short(12)
                ),
                ctx.verbosity(),
            );
        }
        MergeOutcome::Conflict { paths } => {
            output::error(format!(
                "merging '{}' into '{}' conflicts in {} path(s):",
                report.other,
                report.current,
                paths.len()
            ));
            for path in paths {
                eprintln!("  both modified: {path}");
            }
            bail!("automatic merge failed; resolve the conflicting paths, stage, and commit");
        }
    }
    Ok(())
}
