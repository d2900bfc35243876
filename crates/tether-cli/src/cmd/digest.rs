//! `tt digest` — the full workflow digest.

use std::io::Write;
use std::path::Path;

use clap::Args;

use tether_core::model::CandidateFilter;
use tether_core::source::WorkItemSource;
use tether_engine::digest::StatusDigest;

use crate::cmd::{open_store, summary_line};
use crate::output::{OutputMode, pretty_section, render_error, render_mode};

/// Rows shown per section in pretty mode; JSON carries everything.
const PRETTY_SECTION_LIMIT: usize = 10;

/// Arguments for `tt digest`.
#[derive(Args, Debug, Default)]
pub struct DigestArgs {}

/// Execute `tt digest`.
pub fn run_digest(
    _args: &DigestArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let store = match open_store(project_root) {
        Ok(store) => store,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let items = store.list_candidates(&CandidateFilter::default())?;
    let digest = StatusDigest::build(&items);

    render_mode(
        output,
        &digest,
        |digest, w| render_digest_text(digest, w),
        |digest, w| render_digest_pretty(digest, w),
    )
}

fn render_digest_text(digest: &StatusDigest, w: &mut dyn Write) -> std::io::Result<()> {
    let counts: Vec<String> = digest
        .by_status
        .iter()
        .map(|(status, count)| format!("{status}={count}"))
        .collect();
    writeln!(w, "total={}  {}", digest.total, counts.join("  "))?;

    writeln!(
        w,
        "ready={}  blocked={}  tagged_blocked={}  quick_wins={}",
        digest.ready.len(),
        digest.blocked.len(),
        digest.tag_blocked.len(),
        digest.quick_wins.len()
    )?;

    if let Some(best) = &digest.recommendation.best {
        writeln!(w, "{}  next  {}", best.id, best.title)?;
    }
    Ok(())
}

fn render_digest_pretty(digest: &StatusDigest, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Workflow digest")?;

    writeln!(w, "Items: {}", digest.total)?;
    for (status, count) in &digest.by_status {
        writeln!(w, "  {status:<12} {count}")?;
    }
    if !digest.by_kind.is_empty() {
        writeln!(w, "By kind:")?;
        for (kind, count) in &digest.by_kind {
            writeln!(w, "  {kind:<12} {count}")?;
        }
    }

    writeln!(w)?;
    writeln!(w, "Ready now ({}):", digest.ready.len())?;
    for item in digest.ready.iter().take(PRETTY_SECTION_LIMIT) {
        writeln!(w, "  {}", summary_line(item))?;
    }
    if digest.ready.len() > PRETTY_SECTION_LIMIT {
        writeln!(w, "  … and {} more", digest.ready.len() - PRETTY_SECTION_LIMIT)?;
    }

    if !digest.quick_wins.is_empty() {
        writeln!(w)?;
        writeln!(w, "Quick wins:")?;
        for item in digest.quick_wins.iter().take(PRETTY_SECTION_LIMIT) {
            writeln!(w, "  {}", summary_line(item))?;
        }
    }

    if !digest.blocked.is_empty() || !digest.tag_blocked.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "Blocked ({} by dependencies, {} tagged):",
            digest.blocked.len(),
            digest.tag_blocked.len()
        )?;
        for blocked in digest.blocked.iter().take(PRETTY_SECTION_LIMIT) {
            writeln!(
                w,
                "  {}  (waiting on {})",
                summary_line(&blocked.item),
                blocked.reasons.join(", ")
            )?;
        }
        for item in digest.tag_blocked.iter().take(PRETTY_SECTION_LIMIT) {
            writeln!(w, "  {}  (tagged blocked)", summary_line(item))?;
        }
    }

    writeln!(w)?;
    match &digest.recommendation.best {
        Some(best) => {
            writeln!(w, "Recommended next:")?;
            writeln!(w, "  {}", summary_line(best))?;
        }
        None => writeln!(w, "No available tasks found")?,
    }
    Ok(())
}
