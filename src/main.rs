//! sidediff - side-by-side viewer for unified diffs
//!
//! Parses the unified diff produced by git (or read from a file) and shows
//! old and new content in two aligned, colored columns.

mod config;
mod diff;
mod git;
mod pairing;
mod render;
mod style;
mod syntax;
mod terminal;
mod unified;
mod viewer;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use crate::config::{Config, Overrides};
use crate::diff::parse_unified_diff;
use crate::git::{find_repo_root, DiffMode, GitRunner};
use crate::syntax::SyntaxHighlighter;
use crate::terminal::resolve_width;
use crate::viewer::{split_files, Viewer};

#[derive(Parser)]
#[command(name = "sidediff")]
#[command(about = "Side-by-side colored viewer for unified diffs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args)]
struct DisplayArgs {
    /// Plain colored unified output instead of two columns
    #[arg(long, global = true)]
    unified: bool,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    /// Hide the line number gutter
    #[arg(long, global = true)]
    no_line_numbers: bool,

    /// Disable syntax highlighting of unchanged lines
    #[arg(long, global = true)]
    no_syntax: bool,

    /// Maximum output width in columns
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Context lines requested from git
    #[arg(short = 'U', long = "context", global = true)]
    context: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl DisplayArgs {
    fn overrides(&self) -> Overrides {
        let use_colors = match self.color {
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
            ColorChoice::Auto => (!io::stdout().is_terminal()).then_some(false),
        };

        Overrides {
            use_colors,
            side_by_side: self.unified.then_some(false),
            show_line_numbers: self.no_line_numbers.then_some(false),
            syntax_highlighting: self.no_syntax.then_some(false),
            context_lines: self.context,
            terminal_width: self.width,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show working tree or staged changes
    Diff {
        /// Compare the index against HEAD instead of the working tree
        #[arg(long)]
        staged: bool,

        /// Limit the diff to these paths
        paths: Vec<String>,
    },

    /// Show changes between two revisions, or one commit against its parent
    Show {
        /// Base revision, or the commit to show when TO is omitted
        from: String,

        /// Target revision
        to: Option<String>,
    },

    /// Render unified diff text from a file or stdin
    Render {
        /// Input file (default: stdin)
        file: Option<PathBuf>,
    },

    /// Print the parsed structure of a unified diff
    Parse {
        /// Input file (default: stdin)
        file: Option<PathBuf>,

        /// Emit JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    InitConfig,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        let path = Config::create_default()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = Config::load()
        .context("Failed to load config")?
        .with_overrides(&cli.display.overrides());

    let result = match cli.command {
        Commands::Diff { staged, paths } => {
            let mode = if staged {
                DiffMode::Staged
            } else {
                DiffMode::Unstaged
            };
            cmd_git(&config, &mode, &paths)
        }
        Commands::Show { from, to } => {
            let mode = match to {
                Some(to) => DiffMode::Commits { from, to },
                None => DiffMode::Show { commit: from },
            };
            cmd_git(&config, &mode, &[])
        }
        Commands::Render { file } => cmd_render(&config, file),
        Commands::Parse { file, json } => cmd_parse(file, json),
        Commands::InitConfig => Ok(()),
    };

    match result {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        other => other,
    }
}

fn cmd_git(config: &Config, mode: &DiffMode, paths: &[String]) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let repo_path = find_repo_root(&cwd)?;
    let runner = GitRunner::new(repo_path, config.display.context_lines);
    let text = runner.diff(mode, paths)?;
    show_text(config, &text)
}

fn cmd_render(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let text = read_input(file)?;
    show_text(config, &text)
}

fn cmd_parse(file: Option<PathBuf>, json: bool) -> Result<()> {
    let text = read_input(file)?;
    let chunks = split_files(&text);

    let mut diffs = Vec::new();
    for chunk in chunks {
        match parse_unified_diff(chunk) {
            Ok(diff) => diffs.push(diff),
            Err(err) => log::warn!("skipping section: {}", err),
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&diffs).context("Failed to serialize diff")?;
        println!("{}", out);
        return Ok(());
    }

    if diffs.is_empty() {
        println!("No differences");
        return Ok(());
    }

    for diff in &diffs {
        println!(
            "{}: +{} -{} ({} hunks)",
            diff.display_path(),
            diff.additions,
            diff.deletions,
            diff.hunks.len()
        );
        for hunk in &diff.hunks {
            println!("  {} ({} lines)", hunk.header, hunk.lines.len());
        }
    }

    Ok(())
}

fn show_text(config: &Config, text: &str) -> Result<()> {
    let settings = &config.display;
    let width = resolve_width(settings.terminal_width);
    let highlighter = (settings.side_by_side && settings.use_colors && settings.syntax_highlighting)
        .then(|| SyntaxHighlighter::new(config.syntax_theme.as_deref()));
    let viewer = Viewer::new(settings, width, highlighter.as_ref());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !viewer.show_all(text, &mut out)? {
        writeln!(out, "No differences")?;
    }
    out.flush()?;

    Ok(())
}

/// Read `file`, or stdin when it is absent or `-`
fn read_input(file: Option<PathBuf>) -> Result<String> {
    let bytes = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
