//! log command - Display the commit history of the current branch

use anyhow::Result;
use chrono::{TimeZone, Utc};
use serde::Serialize;

use crate::cli::Context;
use crate::core::types::Digest;
use crate::repo::Repository;
use crate::store::index::IndexEntry;
use crate::ui::output;

/// One history record for `--json` output.
#[derive(Debug, Serialize)]
struct LogRecord {
    digest: Digest,
    parent: Option<Digest>,
    timestamp: i64,
    message: String,
    entries: Vec<IndexEntry>,
}

/// Walk the current branch's history, newest first.
///
/// A dangling parent pointer aborts the walk with an error naming both
/// the last good commit and the missing digest; history is never
/// silently truncated.
pub fn log(ctx: &Context, json: bool) -> Result<()> {
    let cwd = ctx.working_dir()?;
    let repo = Repository::discover(&cwd)?;
    let branch = repo.current_branch()?;

    let Some(history) = repo.history()? else {
        if json {
            println!("[]");
        } else {
            output::print(
                format!("No commits yet on branch '{branch}'."),
                ctx.verbosity(),
            );
        }
        return Ok(());
    };

    if json {
        let mut records = Vec::new();
        for step in history {
            let (digest, commit) = step?;
            records.push(LogRecord {
                digest,
                parent: commit.parent,
                timestamp: commit.timestamp,
                message: commit.message,
                entries: commit.entries,
            });
        }
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for step in history {
        let (digest, commit) = step?;
        let date = Utc
            .timestamp_opt(commit.timestamp, 0)
            .single()
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| format!("@{}", commit.timestamp));

        output::print(format!("commit {digest}"), ctx.verbosity());
        output::print(format!("Date:   {date}"), ctx.verbosity());
        output::print("", ctx.verbosity());
        for line in commit.message.lines() {
            output::print(format!("    {line}"), ctx.verbosity());
        }
        output::print(
            format!(
                "\n    ({} {})\n",
                commit.entries.len(),
                if commit.entries.len() == 1 {
                    "entry"
                } else {
                    "entries"
                }
            ),
            ctx.verbosity(),
        );
    }
    Ok(())
}
