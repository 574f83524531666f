//! `lintpilot` 바이너리 진입점.

use std::sync::Arc;

use anyhow::{Context, Result};
use lintpilot::application::config::{Config, DEFAULT_LOG_LEVEL};
use lintpilot::interface::cli::{Cli, CliAction};
use lintpilot::interface::composition::AppComposition;
use lintpilot::interface::webhook;

#[tokio::main]
async fn main() {
    let composition = AppComposition::default();
    // 설정 파일이 깨져 있어도 로깅은 켜고, 오류는 실제 명령에서 보고한다.
    let config = composition.load_config();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(config.as_ref().ok()).into()),
        )
        .init();

    let action = match Cli::parse_action() {
        Ok(action) => action,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    if let Err(err) = dispatch(composition, action, config).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn dispatch(
    composition: AppComposition,
    action: CliAction,
    config: Result<Config>,
) -> Result<()> {
    match action {
        CliAction::InspectConfig => {
            println!("{}", composition.inspect_config_usecase().execute()?);
        }
        CliAction::Sync(request) => {
            let report = composition.sync_usecase().execute(&request).await?;
            let json = serde_json::to_string_pretty(&report.comments())
                .context("failed to serialize sync report")?;
            println!("{json}");
        }
        CliAction::Serve { bind } => {
            let bind = serve_bind(bind, config)?;
            webhook::serve(Arc::new(composition), &bind).await?;
        }
    }
    Ok(())
}

fn log_filter(config: Option<&Config>) -> String {
    config
        .map(Config::log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// `--bind`가 있으면 설정을 보지 않는다.
fn serve_bind(bind: Option<String>, config: Result<Config>) -> Result<String> {
    match bind {
        Some(bind) => Ok(bind),
        None => Ok(config
            .context("failed to load lintpilot config")?
            .bind_address()),
    }
}
