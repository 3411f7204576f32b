//! commit command - Freeze the staged snapshot

use anyhow::Result;

use crate::cli::Context;
use crate::repo::Repository;
use crate::ui::output;

/// Commit the staged entries to the current branch.
pub fn commit(ctx: &Context, message: &str) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let mut repo = Repository::discover(&cwd)?;

    let staged = repo.staged_len();
    let digest = repo.commit(message)?;
    output::print(
        format!(
            "[{}] {} ({} {})",
            repo.current_branch()?,
            digest.short(12),
            staged,
            if staged == 1 { "entry" } else { "entries" }
        ),
        ctx.verbosity(),
    );
    Ok(())
}
