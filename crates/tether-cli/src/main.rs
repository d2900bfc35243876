#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tether: mirror work items between markdown files and remote trackers",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a tether project",
        long_about = "Initialize a tether project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    tt init\n\n    # Emit machine-readable output\n    tt init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a new work item",
        long_about = "Create a new markdown work item under .tether/items/.",
        after_help = "EXAMPLES:\n    # Create a task\n    tt create --title \"Fix login timeout\"\n\n    # Create a priority-1 bug with a dependency\n    tt create --title \"Sessions drop\" --kind bug --priority 1 --depends-on refresh-tokens\n\n    # Emit machine-readable output\n    tt create --title \"Fix login timeout\" --json"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Read",
        about = "List work items",
        long_about = "List work items with optional filters.",
        after_help = "EXAMPLES:\n    # List everything\n    tt list\n\n    # Filter by status and tag\n    tt list --status open --tag backend\n\n    # Emit machine-readable output\n    tt list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one work item",
        long_about = "Show full details for a single work item, including readiness.",
        after_help = "EXAMPLES:\n    # Show an item\n    tt show fix-login\n\n    # Use a short prefix when unique\n    tt show fix\n\n    # Emit machine-readable output\n    tt show fix-login --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Mark item as in progress",
        long_about = "Transition a work item to the in_progress status.",
        after_help = "EXAMPLES:\n    # Start work on an item\n    tt start fix-login\n\n    # Emit machine-readable output\n    tt start fix-login --json"
    )]
    Start(cmd::start::StartArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Mark item as closed",
        long_about = "Transition a work item to the closed status.",
        after_help = "EXAMPLES:\n    # Complete an item\n    tt done fix-login\n\n    # Emit machine-readable output\n    tt done fix-login --json"
    )]
    Done(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Advise",
        about = "Recommend the next task",
        long_about = "Recommend the single best actionable item, with reasons and alternatives.",
        after_help = "EXAMPLES:\n    # Recommend from the local store\n    tt next\n\n    # Recommend from the configured remote, confirming dependency links\n    tt next --remote\n\n    # Emit machine-readable output\n    tt next --json"
    )]
    Next(cmd::next::NextArgs),

    #[command(
        next_help_heading = "Advise",
        about = "List blocked items and why",
        long_about = "List dependency-blocked items with their unresolved ids, plus items manually tagged as blocked.",
        after_help = "EXAMPLES:\n    # Show blockers in the local store\n    tt blocked\n\n    # Show blockers on the configured remote\n    tt blocked --remote\n\n    # Emit machine-readable output\n    tt blocked --json"
    )]
    Blocked(cmd::blocked::BlockedArgs),

    #[command(
        next_help_heading = "Advise",
        about = "Daily standup summary",
        long_about = "Summarize in-progress work, the recommended next item, and blockers.",
        after_help = "EXAMPLES:\n    # Whole-team standup\n    tt standup\n\n    # Scope to one assignee\n    tt standup --assignee alice\n\n    # Emit machine-readable output\n    tt standup --json"
    )]
    Standup(cmd::standup::StandupArgs),

    #[command(
        next_help_heading = "Advise",
        about = "Workflow digest",
        long_about = "Full digest: counts by status/kind, ready and blocked partitions, quick wins, and the recommendation.",
        after_help = "EXAMPLES:\n    # Digest of the local store\n    tt digest\n\n    # Emit machine-readable output\n    tt digest --json"
    )]
    Digest(cmd::digest::DigestArgs),

    #[command(
        next_help_heading = "Sync",
        about = "Mirror remote items into the local store",
        long_about = "Fetch a snapshot from the configured remote tracker and write it into .tether/items/.",
        after_help = "EXAMPLES:\n    # Pull new items from the configured remote\n    tt pull\n\n    # Overwrite local copies of items that already exist\n    tt pull --overwrite\n\n    # Emit machine-readable output\n    tt pull --json"
    )]
    Pull(cmd::pull::PullArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    tt completions bash\n\n    # Generate zsh completions\n    tt completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TETHER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tether=debug,info"
        } else {
            "tether=info,warn"
        })
    });

    let format = env::var("TETHER_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let user_config = tether_core::config::load_user_config().unwrap_or_default();
    let output = output::resolve_output_mode(cli.format, cli.json, user_config.output.as_deref());
    let project_root = std::env::current_dir()?;

    match cli.command {
        Commands::Init(args) => cmd::init::run_init(&args, output, &project_root),
        Commands::Create(args) => cmd::create::run_create(&args, output, &project_root),
        Commands::List(args) => cmd::list::run_list(&args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(&args, output, &project_root),
        Commands::Start(args) => cmd::start::run_start(&args, output, &project_root),
        Commands::Done(args) => cmd::done::run_done(&args, output, &project_root),
        Commands::Next(args) => cmd::next::run_next(&args, output, &project_root),
        Commands::Blocked(args) => cmd::blocked::run_blocked(&args, output, &project_root),
        Commands::Standup(args) => cmd::standup::run_standup(&args, output, &project_root),
        Commands::Digest(args) => cmd::digest::run_digest(&args, output, &project_root),
        Commands::Pull(args) => cmd::pull::run_pull(&args, output, &project_root),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
