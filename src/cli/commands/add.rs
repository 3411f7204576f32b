//! add command - Stage file snapshots

use anyhow::Result;

use crate::cli::Context;
use crate::repo::Repository;
use crate::ui::output;

/// Stage one or more worktree files.
///
/// Each file's content is hashed into the object store and the staging
/// index maps the path to the resulting digest. Staging the same path
/// again replaces the earlier entry.
pub fn add(ctx: &Context, paths: &[String]) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let mut repo = Repository::discover(&cwd)?;

    for path in paths {
        let digest = repo.add(path)?;
        output::debug(format!("{path} -> {digest}"), ctx.verbosity());
        output::print(format!("staged {path}"), ctx.verbosity());
    }
    Ok(())
}
