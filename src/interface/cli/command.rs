//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

use crate::application::usecases::sync_branch::SyncRequest;

#[derive(Debug, Parser)]
#[command(name = "lintpilot")]
#[command(about = "Sync code style findings as Stash pull request comments")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check every open pull request from a branch and sync its comments
    Sync {
        /// Branch name or full ref (refs/heads/...)
        branch: String,
        /// Project key
        slug: String,
        /// Repository slug
        repo: String,
    },
    /// Run the webhook server
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show effective merged config and checker command availability
    Config,
}

#[derive(Debug)]
pub enum CliAction {
    Sync(SyncRequest),
    Serve { bind: Option<String> },
    InspectConfig,
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Self::parse().into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        match self.command {
            Commands::Sync { branch, slug, repo } => {
                if [&branch, &slug, &repo].iter().any(|v| v.trim().is_empty()) {
                    return Err("empty slug or branch or repo".to_string());
                }
                Ok(CliAction::Sync(SyncRequest::new(branch, slug, repo)))
            }
            Commands::Serve { bind } => Ok(CliAction::Serve { bind }),
            Commands::Config => Ok(CliAction::InspectConfig),
        }
    }
}
