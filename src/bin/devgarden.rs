//! devgarden command line
//!
//! Usage:
//!   devgarden --user 1 login --platform gitlab --code <CODE> --redirect-uri <URI>
//!   devgarden --user 1 repos --platform gitlab
//!   devgarden --user 1 files --platform github --owner octo --repo hello --path src
//!
//! Results are printed as pretty JSON. Ctrl-C cancels the in-flight request.

use clap::{Args, Parser, Subcommand};
use devgarden::{
    CancellationToken, GardenConfig, GardenPaths, HttpRawClient, Platform, ServiceDispatcher,
    TokenStore, YamlTokenStore,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "devgarden")]
#[command(about = "Unified GitHub, GitLab and Gitea access", version)]
struct Cli {
    /// Config file (default: ~/.config/devgarden/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Token store (default: ~/.config/devgarden/tokens.yaml)
    #[arg(long, global = true)]
    tokens: Option<PathBuf>,

    /// Local user id the tokens belong to
    #[arg(long, global = true, default_value = "1")]
    user: i64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RepoArgs {
    /// github, gitlab or gitea
    #[arg(long)]
    platform: String,

    #[arg(long)]
    owner: String,

    #[arg(long)]
    repo: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange an authorization code and store the access token
    Login {
        #[arg(long)]
        platform: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        redirect_uri: String,
    },
    /// List repositories
    Repos {
        #[arg(long)]
        platform: String,
    },
    /// List issues
    Issues {
        #[arg(long)]
        platform: String,
    },
    /// Show one repository
    Repo(RepoArgs),
    /// List commits
    Commits(RepoArgs),
    /// Show one commit
    Commit {
        #[command(flatten)]
        target: RepoArgs,
        #[arg(long)]
        sha: String,
    },
    /// List branches
    Branches(RepoArgs),
    /// Show one branch
    Branch {
        #[command(flatten)]
        target: RepoArgs,
        #[arg(long)]
        name: String,
    },
    /// List a directory
    Files {
        #[command(flatten)]
        target: RepoArgs,
        /// Directory path, repository root when omitted
        #[arg(long, default_value = "")]
        path: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,devgarden=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = GardenPaths::new();
    let mut config = GardenConfig::load(&cli.config.unwrap_or_else(|| paths.config_file()))?;
    config.apply_env(|key| std::env::var(key).ok());

    let tokens: Arc<dyn TokenStore> = Arc::new(YamlTokenStore::with_path(
        cli.tokens.unwrap_or_else(|| paths.tokens_file()),
    ));
    let raw = Arc::new(HttpRawClient::new()?);
    let dispatcher = ServiceDispatcher::from_config(raw, tokens.clone(), config);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("received ctrl-c, cancelling");
            on_signal.cancel();
        }
    });

    let user = cli.user;
    match cli.command {
        Command::Login {
            platform,
            code,
            redirect_uri,
        } => {
            let token = dispatcher
                .exchange_token(&platform, &code, &redirect_uri, &cancel)
                .await?;
            let platform: Platform = platform.parse()?;
            tokens.put(user, platform, &token).await?;
            info!(user, platform = %platform, "access token stored");
            println!("Logged in to {platform}");
        }
        Command::Repos { platform } => {
            print_json(&dispatcher.repositories(user, &platform, &cancel).await?)?;
        }
        Command::Issues { platform } => {
            print_json(&dispatcher.issues(user, &platform, &cancel).await?)?;
        }
        Command::Repo(t) => {
            print_json(&dispatcher.repository(user, &t.platform, &t.owner, &t.repo, &cancel).await?)?;
        }
        Command::Commits(t) => {
            print_json(&dispatcher.commits(user, &t.platform, &t.owner, &t.repo, &cancel).await?)?;
        }
        Command::Commit { target: t, sha } => {
            let commit = dispatcher
                .commit(user, &t.platform, &t.owner, &t.repo, &sha, &cancel)
                .await?;
            print_json(&commit)?;
        }
        Command::Branches(t) => {
            print_json(&dispatcher.branches(user, &t.platform, &t.owner, &t.repo, &cancel).await?)?;
        }
        Command::Branch { target: t, name } => {
            let branch = dispatcher
                .branch(user, &t.platform, &t.owner, &t.repo, &name, &cancel)
                .await?;
            print_json(&branch)?;
        }
        Command::Files { target: t, path } => {
            let files = dispatcher
                .files(user, &t.platform, &t.owner, &t.repo, &path, &cancel)
                .await?;
            print_json(&files)?;
        }
    }

    Ok(())
}
