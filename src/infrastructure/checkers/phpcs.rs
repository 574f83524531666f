//! PHP_CodeSniffer(phpcs) 체커.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::process::run_command;
use crate::application::config::PhpCsConfig;
use crate::application::ports::CodeChecker;
use crate::domain::error::{SyncError, SyncResult};
use crate::domain::policy::CheckError;
use crate::infrastructure::config::resolve_installed_paths;

pub struct PhpCsChecker {
    command: String,
    standard: String,
    encoding: String,
    installed_paths: Option<String>,
    extensions: Vec<String>,
    ignore_patterns: Vec<Regex>,
    include_warnings: bool,
}

impl PhpCsChecker {
    /// `root`는 `installed_paths`의 `%root%` 치환 기준이다.
    pub fn new(cfg: &PhpCsConfig, root: &Path) -> Result<Self> {
        let ignore_patterns = cfg
            .ignore_patterns
            .iter()
            .flatten()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("invalid phpcs ignore pattern '{pattern}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        let installed_paths = cfg
            .installed_paths
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| resolve_installed_paths(p, root));
        if let Some(paths) = &installed_paths {
            debug!(installed_paths = %paths, "phpcs installed paths");
        }

        Ok(Self {
            command: cfg.command(),
            standard: cfg.standard(),
            encoding: cfg.encoding(),
            installed_paths,
            extensions: cfg
                .extensions()
                .into_iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            ignore_patterns,
            include_warnings: cfg.include_warnings.unwrap_or(false),
        })
    }

    fn args(&self, path: &str) -> Vec<String> {
        let mut args = vec![
            "--report=json".to_string(),
            format!("--standard={}", self.standard),
            format!("--encoding={}", self.encoding),
        ];
        if let Some(paths) = &self.installed_paths {
            args.push("--runtime-set".to_string());
            args.push("installed_paths".to_string());
            args.push(paths.clone());
        }
        args.push(format!("--stdin-path={path}"));
        args.push("-".to_string());
        args
    }
}

#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    files: BTreeMap<String, FileReport>,
}

#[derive(Debug, Deserialize)]
struct FileReport {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
    line: u32,
    #[serde(rename = "type", default)]
    kind: String,
}

/// phpcs JSON 리포트에서 지적 사항을 줄 순서대로 추출한다.
fn parse_report(raw: &str, include_warnings: bool) -> SyncResult<Vec<CheckError>> {
    let report: Report = serde_json::from_str(raw.trim())
        .map_err(|err| SyncError::Checker(format!("invalid phpcs JSON report: {err}")))?;

    let mut errors: Vec<CheckError> = report
        .files
        .into_values()
        .flat_map(|f| f.messages)
        .filter(|m| include_warnings || m.kind.eq_ignore_ascii_case("ERROR"))
        .map(|m| CheckError::new(m.line, m.message))
        .collect();
    errors.sort_by_key(|e| e.line);
    Ok(errors)
}

#[async_trait]
impl CodeChecker for PhpCsChecker {
    fn name(&self) -> &'static str {
        "phpcs"
    }

    fn should_ignore(&self, path: &str, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        !self.extensions.contains(&extension)
            || self.ignore_patterns.iter().any(|p| p.is_match(path))
    }

    async fn check(
        &self,
        path: &str,
        _extension: &str,
        content: &str,
    ) -> SyncResult<Vec<CheckError>> {
        let output = run_command(&self.command, &self.args(path), Some(content)).await?;
        // phpcs는 지적 사항이 있으면 0이 아닌 코드로 끝나므로 상태 대신 출력을 본다.
        if output.stdout.trim().is_empty() {
            return Err(SyncError::Checker(format!(
                "phpcs produced no report ({}): {}",
                output.status,
                output.stderr.trim()
            )));
        }
        parse_report(&output.stdout, self.include_warnings)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn checker(json: &str) -> PhpCsChecker {
        let cfg: PhpCsConfig = serde_json::from_str(json).unwrap();
        PhpCsChecker::new(&cfg, &PathBuf::from("/srv/lint")).unwrap()
    }

    #[test]
    fn report_keeps_errors_sorted_by_line() {
        let raw = r#"{
            "totals": { "errors": 2, "warnings": 1, "fixable": 0 },
            "files": {
                "STDIN": {
                    "errors": 2, "warnings": 1,
                    "messages": [
                        { "message": "Missing docblock", "line": 9, "column": 1, "type": "ERROR", "severity": 5 },
                        { "message": "Line exceeds 120 characters", "line": 4, "column": 121, "type": "WARNING", "severity": 5 },
                        { "message": "Expected 1 space", "line": 3, "column": 7, "type": "ERROR", "severity": 5 }
                    ]
                }
            }
        }"#;

        let errors = parse_report(raw, false).unwrap();
        assert_eq!(
            errors,
            vec![CheckError::new(3, "Expected 1 space"), CheckError::new(9, "Missing docblock")]
        );
        assert_eq!(parse_report(raw, true).unwrap().len(), 3);
    }

    #[test]
    fn garbage_report_is_a_checker_error() {
        let err = parse_report("PHP Fatal error: oops", false).unwrap_err();
        assert!(matches!(err, SyncError::Checker(_)));
    }

    #[test]
    fn ignores_foreign_extensions_and_pattern_matches() {
        let checker = checker(r#"{ "ignore_patterns": ["^vendor/", "\\.tpl\\.php$"] }"#);

        assert!(!checker.should_ignore("src/App.php", "PHP"));
        assert!(checker.should_ignore("src/app.js", "js"));
        assert!(checker.should_ignore("vendor/lib/x.php", "php"));
        assert!(checker.should_ignore("views/page.tpl.php", "php"));
    }

    #[test]
    fn arguments_carry_standard_and_resolved_installed_paths() {
        let checker = checker(r#"{ "standard": "Custom", "installed_paths": "%root%/standards" }"#);

        let args = checker.args("src/a.php");
        assert_eq!(args[0], "--report=json");
        assert!(args.contains(&"--standard=Custom".to_string()));
        assert!(args.contains(&"/srv/lint/standards".to_string()));
        assert_eq!(args[args.len() - 2], "--stdin-path=src/a.php");
        assert_eq!(args.last().unwrap(), "-");
    }

    #[test]
    fn invalid_ignore_pattern_fails_construction() {
        let cfg: PhpCsConfig = serde_json::from_str(r#"{ "ignore_patterns": ["("] }"#).unwrap();
        assert!(PhpCsChecker::new(&cfg, &PathBuf::from(".")).is_err());
    }
}
