//! 적용 설정 진단(inspection) 뷰 모델.

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::{resolve_installed_paths, resolve_password};
use super::utils::{command_exists, working_root};
use crate::application::config::{CheckerConfig, CheckerKind, Config};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub stash: StashInspection,
    pub checker: CheckerInspection,
    pub log_level: String,
    pub bind: String,
}

/// 비밀번호 값은 노출하지 않고 출처만 보여준다.
#[derive(Debug, Clone, Serialize)]
pub struct StashInspection {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password_source: Option<String>,
    pub password_resolved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckerInspection {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
    pub command_available: bool,
    pub args: Vec<String>,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = &loaded.config;
        let password = resolve_password(&config.stash);

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            stash: StashInspection {
                url: config.stash.url.clone(),
                username: config.stash.username.clone(),
                password_resolved: password.password.is_some(),
                password_source: password.source,
            },
            checker: CheckerInspection::from_config(config),
            log_level: config.log_level(),
            bind: config.bind_address(),
        }
    }
}

impl CheckerInspection {
    fn from_config(config: &Config) -> Self {
        let CheckerConfig { phpcs, cpplint, .. } = &config.checker;
        let kind = config.checker_kind();

        let (command, args, extensions, ignore_patterns) = match kind {
            CheckerKind::Phpcs => {
                let cfg = phpcs.clone().unwrap_or_default();
                let mut args = vec![
                    format!("--standard={}", cfg.standard()),
                    format!("--encoding={}", cfg.encoding()),
                ];
                if let Some(paths) = cfg.installed_paths.as_deref() {
                    args.push(format!(
                        "installed_paths={}",
                        resolve_installed_paths(paths, &working_root())
                    ));
                }
                (
                    cfg.command(),
                    args,
                    cfg.extensions(),
                    cfg.ignore_patterns.clone().unwrap_or_default(),
                )
            }
            CheckerKind::Cpplint => {
                let cfg = cpplint.clone().unwrap_or_default();
                (
                    cfg.python(),
                    vec![cfg.script(), format!("--linelength={}", cfg.line_length())],
                    cfg.extensions(),
                    Vec::new(),
                )
            }
        };

        Self {
            kind: kind.code().to_string(),
            command_available: command_exists(&command),
            command,
            args,
            extensions,
            ignore_patterns,
        }
    }
}
