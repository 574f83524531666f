//! cpplint(Google C++ 스타일) 체커. 임시 파일에 내용을 쓰고 외부 스크립트를 실행한다.

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::process::run_command;
use crate::application::config::CpplintConfig;
use crate::application::ports::CodeChecker;
use crate::domain::error::{SyncError, SyncResult};
use crate::domain::policy::CheckError;

/// `<file>:<line>:  <message>  [<category>] [<confidence>]`
static REPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.+?:(?P<line>\d+):\s+(?P<message>.+?)\s+\[[^\]]+\]\s+\[\d+\]\s*$")
        .expect("valid cpplint report pattern")
});

pub struct CpplintChecker {
    python: String,
    script: String,
    line_length: u32,
    extensions: Vec<String>,
    tmp_dir: Option<PathBuf>,
}

impl CpplintChecker {
    pub fn new(cfg: &CpplintConfig) -> Self {
        Self {
            python: cfg.python(),
            script: cfg.script(),
            line_length: cfg.line_length(),
            extensions: cfg
                .extensions()
                .into_iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            tmp_dir: cfg.tmp_dir.as_ref().map(PathBuf::from),
        }
    }

    fn temp_file(&self, extension: &str) -> SyncResult<tempfile::NamedTempFile> {
        let suffix = format!(".{extension}");
        let mut builder = tempfile::Builder::new();
        builder.prefix("lintpilot-").suffix(&suffix);
        let file = match &self.tmp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        file.map_err(|err| SyncError::Checker(format!("failed to create temp file: {err}")))
    }
}

/// cpplint 출력에서 지적 사항을 추출한다. 형식이 다른 줄(요약 등)은 무시한다.
fn parse_output(output: &str) -> Vec<CheckError> {
    output
        .lines()
        .filter_map(|line| {
            let caps = REPORT_LINE.captures(line)?;
            let number = caps["line"].parse().ok()?;
            Some(CheckError::new(number, caps["message"].trim()))
        })
        .collect()
}

#[async_trait]
impl CodeChecker for CpplintChecker {
    fn name(&self) -> &'static str {
        "cpplint"
    }

    fn should_ignore(&self, _path: &str, extension: &str) -> bool {
        !self.extensions.contains(&extension.to_ascii_lowercase())
    }

    async fn check(
        &self,
        path: &str,
        extension: &str,
        content: &str,
    ) -> SyncResult<Vec<CheckError>> {
        let file = self.temp_file(extension)?;
        tokio::fs::write(file.path(), content)
            .await
            .map_err(|err| SyncError::Checker(format!("failed to write temp file: {err}")))?;

        let args = vec![
            self.script.clone(),
            format!("--linelength={}", self.line_length),
            file.path().display().to_string(),
        ];
        let output = run_command(&self.python, &args, None).await?;
        debug!(path, status = %output.status, "cpplint finished");

        // cpplint는 지적 사항을 stderr로 출력한다.
        let mut errors = parse_output(&output.stderr);
        errors.extend(parse_output(&output.stdout));
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_lines_and_skips_summaries() {
        let output = "\
/tmp/lintpilot-abc.cpp:0:  No copyright message found.  [legal/copyright] [5]
/tmp/lintpilot-abc.cpp:12:  Lines should be <= 120 characters long  [whitespace/line_length] [2]
/tmp/lintpilot-abc.cpp:12:  Missing space before {  [whitespace/braces] [5]
Done processing /tmp/lintpilot-abc.cpp
Total errors found: 3
";

        assert_eq!(
            parse_output(output),
            vec![
                CheckError::new(0, "No copyright message found."),
                CheckError::new(12, "Lines should be <= 120 characters long"),
                CheckError::new(12, "Missing space before {"),
            ]
        );
    }

    #[test]
    fn only_configured_extensions_are_checked() {
        let checker = CpplintChecker::new(&CpplintConfig::default());
        assert!(!checker.should_ignore("src/a.cpp", "cpp"));
        assert!(!checker.should_ignore("proto/a.proto", "proto"));
        assert!(checker.should_ignore("src/a.php", "php"));
        assert!(checker.should_ignore("Makefile", ""));
    }

    #[test]
    fn temp_file_keeps_the_source_extension() {
        let dir = tempfile::tempdir().unwrap();
        let checker = CpplintChecker::new(&CpplintConfig {
            tmp_dir: Some(dir.path().display().to_string()),
            ..CpplintConfig::default()
        });

        let file = checker.temp_file("hpp").unwrap();

        assert!(file.path().starts_with(dir.path()));
        assert_eq!(file.path().extension().unwrap(), "hpp");
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_checker_error() {
        let checker = CpplintChecker::new(&CpplintConfig {
            python: Some("/nonexistent/python-for-lintpilot".into()),
            ..CpplintConfig::default()
        });

        let err = checker.check("a.cpp", "cpp", "int main() {}\n").await.unwrap_err();

        assert!(matches!(err, SyncError::Checker(_)));
    }
}
