//! clone command - Copy the repository to a new directory

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::repo::Repository;
use crate::ui::output;

/// Byte-for-byte copy of the repository directory into `<target>`.
pub fn clone(ctx: &Context, target: &Path) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let repo = Repository::discover(&cwd)?;

    // A relative target is resolved against the working directory.
    let target = if target.is_absolute() {
        target.to_path_buf()
    } else {
        cwd.join(target)
    };

    repo.clone_to(&target)?;
    output::print(
        format!("Cloned repository to {}.", target.display()),
        ctx.verbosity(),
    );
    Ok(())
}
