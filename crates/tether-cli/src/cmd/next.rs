//! `tt next` — recommend the single best actionable item.
//!
//! Local mode builds the snapshot from the markdown store. `--remote` builds
//! it from the configured tracker and additionally confirms each candidate's
//! dependency links against the backend (fail-open) before selecting it.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::{CandidateFilter, WorkItem};
use tether_core::source::WorkItemSource;
use tether_engine::recommend::{Recommendation, reasons, recommend_next, recommend_next_confirmed};
use tether_engine::score::score;

use crate::cmd::{open_store, remote_source};
use crate::output::{OutputMode, pretty_rule, pretty_section, render, render_error, render_mode};

/// Arguments for `tt next`.
#[derive(Args, Debug, Default)]
pub struct NextArgs {
    /// Recommend from the configured remote tracker instead of the local
    /// store.
    #[arg(long)]
    pub remote: bool,
}

#[derive(Debug, Serialize)]
struct NextPick {
    id: String,
    title: String,
    score: f64,
    reasons: Vec<String>,
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Serialize)]
struct Alternative {
    id: String,
    title: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct EmptyNext {
    message: String,
}

/// Execute `tt next`.
pub fn run_next(args: &NextArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let recommendation = build_recommendation(args, output, project_root)?;

    let Some(best) = recommendation.best else {
        let empty = EmptyNext {
            message: "No available tasks found".to_string(),
        };
        return render(output, &empty, |empty, w| writeln!(w, "{}", empty.message));
    };

    let pick = NextPick {
        id: best.id.clone(),
        title: best.title.clone(),
        score: score(&best),
        reasons: reasons(&best),
        alternatives: recommendation
            .alternatives
            .iter()
            .map(|item| Alternative {
                id: item.id.clone(),
                title: item.title.clone(),
                score: score(item),
            })
            .collect(),
    };

    render_mode(
        output,
        &pick,
        |pick, w| render_next_text(pick, w),
        |pick, w| render_next_pretty(pick, w),
    )
}

/// Build the recommendation, rendering any setup error before failing.
fn build_recommendation(
    args: &NextArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<Recommendation> {
    if args.remote {
        let source = match remote_source(project_root) {
            Ok(source) => source,
            Err(cli_err) => {
                render_error(output, &cli_err)?;
                anyhow::bail!(cli_err.message);
            }
        };
        let items: Vec<WorkItem> = source.list_candidates(&CandidateFilter::default())?;
        return Ok(recommend_next_confirmed(&items, &source));
    }

    let store = match open_store(project_root) {
        Ok(store) => store,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };
    let items = store.list_candidates(&CandidateFilter::default())?;
    Ok(recommend_next(&items))
}

fn render_next_text(pick: &NextPick, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{}  next  score={:.1}  {}  why={}",
        pick.id,
        pick.score,
        pick.title,
        pick.reasons.join("; ")
    )?;
    for alt in &pick.alternatives {
        writeln!(w, "{}  alt  score={:.1}  {}", alt.id, alt.score, alt.title)?;
    }
    Ok(())
}

fn render_next_pretty(pick: &NextPick, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Next task")?;
    writeln!(w, "ID:    {}", pick.id)?;
    writeln!(w, "Title: {}", pick.title)?;
    writeln!(w, "Score: {:.1}", pick.score)?;
    writeln!(w, "Why:   {}", pick.reasons.join("; "))?;

    if !pick.alternatives.is_empty() {
        writeln!(w)?;
        writeln!(w, "Alternatives")?;
        pretty_rule(w)?;
        for alt in &pick.alternatives {
            writeln!(w, "{:<24}  {:>8.1}  {}", alt.id, alt.score, alt.title)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick() -> NextPick {
        NextPick {
            id: "fix-login".to_string(),
            title: "Fix login timeout".to_string(),
            score: 60.0,
            reasons: vec!["bug fixes need immediate attention".to_string()],
            alternatives: vec![Alternative {
                id: "docs".to_string(),
                title: "Write docs".to_string(),
                score: 400.0,
            }],
        }
    }

    #[test]
    fn text_rendering_is_one_line_per_item() {
        let mut buf = Vec::new();
        render_next_text(&pick(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("fix-login"));
        assert!(lines[0].contains("why="));
        assert!(lines[1].contains("alt"));
    }

    #[test]
    fn pretty_rendering_includes_alternatives_section() {
        let mut buf = Vec::new();
        render_next_pretty(&pick(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.contains("Next task"));
        assert!(text.contains("Why:"));
        assert!(text.contains("Alternatives"));
        assert!(text.contains("docs"));
    }
}
