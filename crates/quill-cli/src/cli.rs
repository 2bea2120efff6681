//! CLI definition and command dispatch for Quill.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the client.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--root`, `--engine`, `--timeout`)
//! 2. Environment variables (`QUILL_ROOT`, `QUILL_ENGINE`, `QUILL_TIMEOUT`, ...)
//! 3. Config file (`~/.quill/config.yaml` or path from `--config`/`QUILL_CONFIG`)
//! 4. Built-in defaults

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use crate::ui::table::{self, FileRow, HistoryRow, RepoRow};
use crate::ui::{ColorMode, MessageType, Progress, ProgressMode, Style};

use quill_core::{
    parse, DiffOutcome, DiffReport, DispatchContext, QuillClient, QuillConfig, QuillError, RepoOpened,
    NO_DIFFERENCES,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Quill – drive a snapshot-based file versioning engine
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing the repositories (default: current directory)
    #[arg(long, global = true, env = "QUILL_ROOT")]
    pub root: Option<PathBuf>,

    /// Repository to operate on (default: defaultRepository from config)
    #[arg(short = 'r', long, global = true, env = "QUILL_REPO")]
    pub repo: Option<String>,

    /// Path to the engine executable (default: ./myvcs)
    #[arg(long, global = true, env = "QUILL_ENGINE")]
    pub engine: Option<PathBuf>,

    /// Engine timeout in seconds (default: 30)
    #[arg(long, global = true, env = "QUILL_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file (default: ~/.quill/config.yaml)
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "QUILL_VERBOSE")]
    pub verbose: bool,

    /// Suppress spinners, hints and informational messages
    #[arg(short, long, global = true, env = "QUILL_QUIET")]
    pub quiet: bool,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "QUILL_COLOR", default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a repository, creating it if it does not exist
    #[command(after_help = r#"EXAMPLES:
    # Open or create the default repository
    quill open

    # Open or create a named repository
    quill open Notes
"#)]
    Open {
        /// Repository name (default: --repo or defaultRepository)
        name: Option<String>,
    },

    /// List repositories under the root
    Repos {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List files in the repository
    Files {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List raw snapshot files in the repository
    Snapshots {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the recorded versions of a file
    #[command(after_help = r#"EXAMPLES:
    quill history todo.txt
    quill -r Notes history todo.txt --json
"#)]
    History {
        /// File name
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Add a file to the repository (created empty when no content is given)
    #[command(after_help = r#"EXAMPLES:
    # Create an empty file and register it
    quill add todo.txt

    # Register a file with content
    quill add todo.txt --content "buy milk"
    quill add todo.txt --content-file ./draft.txt
"#)]
    Add {
        /// File name
        file: String,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Replace the content of a tracked file
    Update {
        /// File name
        file: String,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Record a new version of a file
    #[command(after_help = r#"EXAMPLES:
    quill commit todo.txt -m "weekly list"
    quill commit todo.txt --content-file ./draft.txt
"#)]
    Commit {
        /// File name
        file: String,

        /// Message stored with the version
        #[arg(short, long)]
        message: Option<String>,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Restore a file from a recorded version (latest by default)
    #[command(after_help = r#"EXAMPLES:
    # Back to the latest version
    quill revert todo.txt

    # Back to a specific version
    quill revert todo.txt --tag 20240101093000
"#)]
    Revert {
        /// File name
        file: String,

        /// Version tag to restore (see `quill history`)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Write a readable copy of a file next to the engine
    Checkout {
        /// File name
        file: String,
    },

    /// Compare the latest version of a file with its working copy
    Diff {
        /// File name
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show engine status for the repository
    Status,

    /// Show engine log for the repository or one file
    Log {
        /// Restrict to this file
        file: Option<String>,
    },

    /// Suggest the next step
    Suggest {
        /// File name
        file: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run the workflow matching a spoken-style command
    ///
    /// Options go before the words; everything after the first word is part
    /// of the command.
    #[command(after_help = r#"EXAMPLES:
    quill say initialize repository
    quill say --file todo.txt -m "done" commit this please
    quill say --file todo.txt please revert to last save
"#)]
    Say {
        /// Words of the command
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        words: Vec<String>,

        /// File the command applies to
        #[arg(short, long)]
        file: Option<String>,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        #[command(flatten)]
        content: ContentArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show which action a command maps to without running it
    Parse {
        /// Words of the command
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        words: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// File content given inline or read from disk.
#[derive(clap::Args, Debug, Default)]
pub struct ContentArgs {
    /// Content to write
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read content from this file
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,
}

impl ContentArgs {
    fn resolve(self) -> Result<Option<String>, QuillError> {
        match (self.content, self.content_file) {
            (Some(text), _) => Ok(Some(text)),
            (None, Some(path)) => fs::read_to_string(&path).map(Some).map_err(|e| {
                QuillError::Other(anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
            }),
            (None, None) => Ok(None),
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Always show warnings; debug only with --verbose
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("quill_core={},quill_cli={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let color_mode = cli.color.parse::<ColorMode>().unwrap_or_default();
    let style = Style::new(color_mode);

    let config = match load_config(&cli, &style) {
        Ok(config) => config,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => "Check your global config at ~/.quill/config.yaml".to_string(),
            };
            eprintln!(
                "{}",
                style.error_with_context("Failed to load configuration", Some(&e.to_string()), Some(&hint))
            );
            return ExitCode::FAILURE;
        }
    };

    let client = QuillClient::from_config(&config);
    let repo = cli.repo.clone().unwrap_or_else(|| config.default_repository.clone());
    let quiet = cli.quiet;

    let result = match cli.command {
        Command::Open { name } => handle_open(&style, &client, name.as_deref().unwrap_or(&repo), quiet),
        Command::Repos { json } => handle_repos(&style, &client, json),
        Command::Files { json } => handle_files(&style, &client, &repo, json),
        Command::Snapshots { json } => handle_snapshots(&style, &client, &repo, json),
        Command::History { file, json } => handle_history(&style, &client, &repo, &file, json),
        Command::Add { file, content } => handle_add(&style, &client, &repo, &file, content, quiet),
        Command::Update { file, content } => handle_update(&style, &client, &repo, &file, content, quiet),
        Command::Commit { file, message, content } => {
            handle_commit(&style, &client, &repo, &file, message.as_deref(), content, quiet)
        }
        Command::Revert { file, tag } => handle_revert(&style, &client, &repo, &file, tag.as_deref(), quiet),
        Command::Checkout { file } => handle_checkout(&style, &client, &repo, &file, quiet),
        Command::Diff { file, json } => handle_diff(&style, &client, &repo, &file, json),
        Command::Status => handle_status(&client, &repo, quiet),
        Command::Log { file } => handle_log(&client, &repo, file.as_deref(), quiet),
        Command::Suggest { file, json } => handle_suggest(&style, &client, &repo, file.as_deref(), json),
        Command::Say {
            words,
            file,
            message,
            content,
            json,
        } => handle_say(&style, &client, &repo, &words, file, message, content, json, quiet),
        Command::Parse { words, json } => handle_parse(&style, &words, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style.message(MessageType::Err, &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Load the config file, apply flag/env overrides on top, then validate.
fn load_config(cli: &Cli, style: &Style) -> Result<QuillConfig, QuillError> {
    let mut config = match &cli.config {
        Some(path) => QuillConfig::from_path(path)?,
        None => QuillConfig::load_default()?,
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(engine) = &cli.engine {
        config.engine.executable = engine.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.engine.timeout_secs = timeout;
    }

    for warning in config.validate()? {
        eprintln!("{}", style.message(MessageType::Warn, &warning));
    }
    tracing::debug!(
        root = %config.root.display(),
        engine = %config.engine.executable.display(),
        timeout_secs = config.engine.timeout_secs,
        "resolved configuration"
    );
    Ok(config)
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_open(style: &Style, client: &QuillClient, repo: &str, quiet: bool) -> Result<(), QuillError> {
    let progress = Progress::spinner("Opening repository...", ProgressMode::detect(quiet, false));
    let opened = client.open_or_init(repo);
    progress.finish_clear();

    match opened? {
        RepoOpened::Opened => {
            println!(
                "{}",
                style.message(MessageType::Ok, &format!("Opened repository {}", style.file_path(repo)))
            );
        }
        RepoOpened::Created(message) => {
            println!(
                "{}",
                style.message(MessageType::Ok, &format!("Created repository {}", style.file_path(repo)))
            );
            println!("{}", style.message_detail("Engine", &message));
        }
    }
    print_suggestion(style, client, repo, None, quiet);
    Ok(())
}

fn handle_repos(style: &Style, client: &QuillClient, json: bool) -> Result<(), QuillError> {
    let resolver = client.resolver();
    let rows: Vec<RepoRow> = resolver
        .list_repositories()
        .into_iter()
        .map(|name| RepoRow {
            initialized: resolver.repository_exists(&name),
            files: resolver.list_files(&name).len(),
            name,
        })
        .collect();

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|r| json!({ "name": r.name, "initialized": r.initialized, "files": r.files }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if rows.is_empty() {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("No repositories under {}", resolver.root().display())
            )
        );
    } else {
        println!("{}", table::render_repos_table(&rows));
    }
    Ok(())
}

fn handle_files(style: &Style, client: &QuillClient, repo: &str, json: bool) -> Result<(), QuillError> {
    let resolver = client.resolver();
    require_repository(client, repo)?;

    let rows: Vec<FileRow> = resolver
        .list_files(repo)
        .into_iter()
        .map(|name| {
            let tags = resolver.list_version_tags(repo, &name);
            let size_bytes = fs::metadata(resolver.working_file_path(repo, &name))
                .map(|m| m.len())
                .unwrap_or(0);
            FileRow {
                size_bytes,
                versions: tags.len(),
                latest: tags.last().cloned(),
                name,
            }
        })
        .collect();

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "sizeBytes": r.size_bytes,
                    "versions": r.versions,
                    "latest": r.latest,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if rows.is_empty() {
        println!(
            "{}",
            style.message(MessageType::Info, &format!("No files in {}", style.file_path(repo)))
        );
    } else {
        println!("{}", table::render_files_table(&rows));
    }
    Ok(())
}

fn handle_snapshots(style: &Style, client: &QuillClient, repo: &str, json: bool) -> Result<(), QuillError> {
    require_repository(client, repo)?;
    let artifacts = client.resolver().list_snapshot_artifacts(repo);

    if json {
        println!("{}", serde_json::to_string_pretty(&artifacts)?);
    } else if artifacts.is_empty() {
        println!("{}", style.message(MessageType::Info, "No snapshots recorded yet"));
    } else {
        println!("{}", style.section("SNAPSHOTS"));
        for name in &artifacts {
            println!("{}", style.list_item("-", name));
        }
    }
    Ok(())
}

fn handle_history(style: &Style, client: &QuillClient, repo: &str, file: &str, json: bool) -> Result<(), QuillError> {
    require_repository(client, repo)?;
    quill_core::validate_filename(file)?;
    let history = client.resolver().history(repo, file);

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }
    if history.is_empty() {
        println!(
            "{}",
            style.message(MessageType::Info, &format!("No versions of {} yet", style.file_path(file)))
        );
        return Ok(());
    }

    let rows: Vec<HistoryRow> = history
        .into_iter()
        .map(|info| HistoryRow {
            tag: info.tag,
            recorded_at: info.recorded_at,
            message: info.message,
        })
        .collect();
    println!("{}", table::render_history_table(&rows));
    Ok(())
}

fn handle_add(
    style: &Style,
    client: &QuillClient,
    repo: &str,
    file: &str,
    content: ContentArgs,
    quiet: bool,
) -> Result<(), QuillError> {
    let content = content.resolve()?;
    let message = with_spinner("Adding file...", quiet, || client.add_file(repo, file, content.as_deref()))?;
    println!("{}", style.message(MessageType::Ok, &message));
    print_suggestion(style, client, repo, Some(file), quiet);
    Ok(())
}

fn handle_update(
    style: &Style,
    client: &QuillClient,
    repo: &str,
    file: &str,
    content: ContentArgs,
    quiet: bool,
) -> Result<(), QuillError> {
    let Some(content) = content.resolve()? else {
        return Err(QuillError::Other(anyhow::anyhow!(
            "No content given. Pass --content or --content-file."
        )));
    };
    let message = with_spinner("Updating content...", quiet, || client.update_content(repo, file, &content))?;
    println!("{}", style.message(MessageType::Ok, &message));
    Ok(())
}

fn handle_commit(
    style: &Style,
    client: &QuillClient,
    repo: &str,
    file: &str,
    commit_message: Option<&str>,
    content: ContentArgs,
    quiet: bool,
) -> Result<(), QuillError> {
    let content = content.resolve()?;
    let message = with_spinner("Committing...", quiet, || {
        client.commit(repo, file, content.as_deref(), commit_message)
    })?;
    println!("{}", style.message(MessageType::Ok, &message));
    if let Some(tag) = client.resolver().latest_version_tag(repo, file) {
        println!("{}", style.message_detail("Latest", &style.tag(&tag)));
    }
    Ok(())
}

fn handle_revert(
    style: &Style,
    client: &QuillClient,
    repo: &str,
    file: &str,
    tag: Option<&str>,
    quiet: bool,
) -> Result<(), QuillError> {
    let message = with_spinner("Reverting...", quiet, || client.revert(repo, file, tag))?;
    println!("{}", style.message(MessageType::Ok, &message));
    Ok(())
}

fn handle_checkout(style: &Style, client: &QuillClient, repo: &str, file: &str, quiet: bool) -> Result<(), QuillError> {
    let message = with_spinner("Checking out...", quiet, || client.checkout(repo, file))?;
    println!("{}", style.message(MessageType::Ok, &message));
    Ok(())
}

fn handle_diff(style: &Style, client: &QuillClient, repo: &str, file: &str, json: bool) -> Result<(), QuillError> {
    let report = client.diff_latest(repo, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report {
        DiffReport::NoSnapshot => {
            println!(
                "{}",
                style.message(
                    MessageType::Info,
                    &format!("No committed version of {} to compare against", style.file_path(file))
                )
            );
        }
        DiffReport::Compared { tag, diff } => {
            println!("{}", style.section(&format!("{} @ {}", file, style.tag(&tag))));
            match &diff {
                DiffOutcome::NoDifferences => {
                    println!("{}", style.message(MessageType::Ok, NO_DIFFERENCES));
                }
                DiffOutcome::Changes(lines) => {
                    for line in lines {
                        println!("{}", style.diff_line(line));
                    }
                    let stats = diff.stats();
                    println!();
                    println!(
                        "{}",
                        style.message_detail(
                            "Changes",
                            &format!("{} added, {} removed", stats.added, stats.removed)
                        )
                    );
                }
            }
        }
    }
    Ok(())
}

fn handle_status(client: &QuillClient, repo: &str, quiet: bool) -> Result<(), QuillError> {
    let text = with_spinner("Querying status...", quiet, || client.status(repo))?;
    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}

fn handle_log(client: &QuillClient, repo: &str, file: Option<&str>, quiet: bool) -> Result<(), QuillError> {
    let text = with_spinner("Reading log...", quiet, || client.log(repo, file))?;
    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}

fn handle_suggest(
    style: &Style,
    client: &QuillClient,
    repo: &str,
    file: Option<&str>,
    json: bool,
) -> Result<(), QuillError> {
    let suggestion = client.suggest(repo, file);
    if json {
        let value = json!({
            "suggestion": suggestion,
            "label": suggestion.label(),
            "message": suggestion.message(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", style.message(MessageType::Hint, suggestion.message()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_say(
    style: &Style,
    client: &QuillClient,
    repo: &str,
    words: &[String],
    file: Option<String>,
    message: Option<String>,
    content: ContentArgs,
    json: bool,
    quiet: bool,
) -> Result<(), QuillError> {
    let context = DispatchContext {
        repository: repo.to_string(),
        filename: file,
        content: content.resolve()?,
        message,
    };
    let utterance = words.join(" ");
    let mode = ProgressMode::detect(quiet, json);
    let progress = Progress::spinner("Working...", mode);
    let dispatch = client.dispatch(&utterance, &context);
    progress.finish_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&dispatch)?);
    } else if !quiet {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("Heard \"{}\" as {}", dispatch.intent.utterance, dispatch.intent.action)
            )
        );
    }

    if !dispatch.success {
        return Err(QuillError::Other(anyhow::anyhow!(dispatch.message)));
    }
    if !json {
        println!("{}", style.message(MessageType::Ok, &dispatch.message));
    }
    Ok(())
}

fn handle_parse(style: &Style, words: &[String], json: bool) -> Result<(), QuillError> {
    let intent = parse(&words.join(" "));
    if json {
        println!("{}", serde_json::to_string_pretty(&intent)?);
    } else {
        println!("{}", style.key_value("action", intent.action.as_str()));
        println!("{}", style.key_value("utterance", &intent.utterance));
        if intent.is_unknown() {
            println!("{}", style.message(MessageType::Hint, quill_core::Action::hint()));
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn require_repository(client: &QuillClient, repo: &str) -> Result<(), QuillError> {
    quill_core::validate_repo_name(repo)?;
    if client.resolver().repository_exists(repo) {
        Ok(())
    } else {
        Err(QuillError::RepositoryNotFound(repo.to_string()))
    }
}

/// Run an engine-backed operation behind a spinner.
fn with_spinner<T>(message: &str, quiet: bool, op: impl FnOnce() -> Result<T, QuillError>) -> Result<T, QuillError> {
    let progress = Progress::spinner(message, ProgressMode::detect(quiet, false));
    let result = op();
    progress.finish_clear();
    result
}

fn print_suggestion(style: &Style, client: &QuillClient, repo: &str, file: Option<&str>, quiet: bool) {
    if quiet {
        return;
    }
    let suggestion = client.suggest(repo, file);
    println!("{}", style.message(MessageType::Hint, &format!("Next: {}", suggestion.label())));
}
