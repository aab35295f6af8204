use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use open_remote::config::Config;
use open_remote::git::GitCli;
use open_remote::link::{FileTarget, Link, LinkError, LinkOptions};
use open_remote::revision::RevisionPriority;

const EXIT_SUCCESS: i32 = 0;
const EXIT_LINK: i32 = 1;
const EXIT_GIT: i32 = 2;
const EXIT_BROWSER: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the repository tree (default if no subcommand)
    Repo,
    /// Open a file, optionally at a line or line range
    File {
        /// File to open, absolute or relative to the working directory
        path: Option<PathBuf>,

        /// First line to highlight (1-based)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        line: Option<u32>,

        /// Last line to highlight (1-based)
        #[arg(short, long, requires = "line", value_parser = clap::value_parser!(u32).range(1..))]
        end_line: Option<u32>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    Branch,
    Commit,
}

impl From<PriorityArg> for RevisionPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Branch => RevisionPriority::BranchFirst,
            PriorityArg::Commit => RevisionPriority::CommitFirst,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "open-remote")]
#[command(about = "Open the web page of a repository, file, or line range", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/open-remote/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", global = true)]
    directory: Option<PathBuf>,

    /// Remote to link (defaults to the push default, then origin)
    #[arg(short, long, global = true)]
    remote: Option<String>,

    /// Link the branch or the commit when both are available
    #[arg(short, long, global = true, value_enum)]
    priority: Option<PriorityArg>,

    /// Link this branch, tag, or commit instead of resolving one
    #[arg(long = "rev", global = true)]
    rev: Option<String>,

    /// Print the URL instead of opening it
    #[arg(long, global = true)]
    print: bool,

    /// Print the link as JSON instead of opening it
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Repo);

    if let Err(e) = open_remote::logging::init_logging(cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match open_remote::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = open_remote::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let options = LinkOptions {
        remote: cli.remote.or_else(|| config.remote.clone()),
        priority: cli.priority.map(Into::into).unwrap_or(config.priority),
        revision: cli.rev,
        commit_check: config.commit_check,
    };
    let request = LinkRequest {
        directory: cli.directory,
        options,
        timeout: Duration::from_secs(config.git_timeout_secs),
        json: cli.json,
        print_only: cli.print || !config.open_browser,
    };

    let code = match command {
        Commands::Config => print_config(&config),
        Commands::Repo => link_and_deliver(request, None).await,
        Commands::File {
            path,
            line,
            end_line,
        } => {
            let target = FileTarget {
                path,
                line_start: line,
                line_end: end_line,
            };
            link_and_deliver(request, Some(target)).await
        }
    };

    std::process::exit(code);
}

/// Everything a `repo` or `file` invocation needs besides the target.
struct LinkRequest {
    directory: Option<PathBuf>,
    options: LinkOptions,
    timeout: Duration,
    json: bool,
    print_only: bool,
}

fn print_config(config: &Config) -> i32 {
    match serde_saphyr::to_string(config) {
        Ok(yaml) => {
            print!("{}", yaml);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render config: {}", e);
            EXIT_CONFIG
        }
    }
}

/// Build the tree URL, or the file URL when a target is given, then deliver it.
async fn link_and_deliver(request: LinkRequest, target: Option<FileTarget>) -> i32 {
    let work_dir = match resolve_work_dir(request.directory) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_GIT;
        }
    };

    let gateway = GitCli::new(work_dir.clone()).with_timeout(request.timeout);

    let result = match target {
        Some(target) => open_remote::link::file_url(&gateway, &work_dir, &target, &request.options).await,
        None => open_remote::link::tree_url(&gateway, &request.options).await,
    };

    match result {
        Ok(link) => deliver(&link, request.json, request.print_only),
        Err(e) => {
            eprintln!("{}", e);
            exit_code(&e)
        }
    }
}

/// Absolute working directory: `-C` resolved against the current directory, or
/// the current directory itself.
fn resolve_work_dir(directory: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let work_dir = match directory {
        Some(dir) => std::path::absolute(&dir)
            .with_context(|| format!("Cannot resolve directory {}", dir.display()))?,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    if !work_dir.is_dir() {
        anyhow::bail!("Not a directory: {}", work_dir.display());
    }
    Ok(work_dir)
}

/// Print or open the link; returns the exit code.
fn deliver(link: &Link, json: bool, print_only: bool) -> i32 {
    if json {
        return match open_remote::output::format_json(link) {
            Ok(json) => {
                println!("{}", json);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize link: {}", e);
                EXIT_LINK
            }
        };
    }

    if print_only {
        println!("{}", link.url);
        return EXIT_SUCCESS;
    }

    let use_colors = open_remote::output::should_use_colors();
    match open_remote::browser::open_url(&link.url) {
        Ok(()) => {
            println!("{}", open_remote::output::format_opening(link, use_colors));
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = %e.source, "browser launch failed");
            eprintln!("{}", open_remote::output::format_open_failed(&e.url, use_colors));
            EXIT_BROWSER
        }
    }
}

fn exit_code(error: &LinkError) -> i32 {
    match error {
        LinkError::NoRemoteConfigured { .. }
        | LinkError::UnparseableRemoteUrl(_)
        | LinkError::NoActiveFile
        | LinkError::FileOutsideRepository { .. } => EXIT_LINK,
        LinkError::Git(_) => EXIT_GIT,
    }
}
