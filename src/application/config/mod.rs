//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_PHPCS_COMMAND: &str = "phpcs";
pub const DEFAULT_PHPCS_STANDARD: &str = "PSR2";
pub const DEFAULT_PHPCS_ENCODING: &str = "utf-8";
pub const DEFAULT_PYTHON: &str = "python";
pub const DEFAULT_CPPLINT_SCRIPT: &str = "cpplint.py";
pub const DEFAULT_CPPLINT_LINE_LENGTH: u32 = 120;
pub const DEFAULT_CPPLINT_EXTENSIONS: [&str; 4] = ["cpp", "h", "hpp", "proto"];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Stash 서버 접속 정보
    #[serde(default)]
    pub stash: StashConfig,
    /// 체커 선택과 체커별 설정
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StashConfig {
    /// 서버 기본 URL (예: https://stash.example.com/)
    pub url: Option<String>,
    /// 요청 주체이자 로봇 코멘트 작성자
    pub username: Option<String>,
    /// 고정 비밀번호(민감정보: 권장하지 않음)
    pub password: Option<String>,
    /// 비밀번호를 읽을 환경변수 이름
    pub password_env: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckerKind {
    #[default]
    Phpcs,
    Cpplint,
}

impl CheckerKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::Phpcs => "phpcs",
            Self::Cpplint => "cpplint",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CheckerConfig {
    #[serde(rename = "type")]
    pub kind: Option<CheckerKind>,
    pub phpcs: Option<PhpCsConfig>,
    pub cpplint: Option<CpplintConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PhpCsConfig {
    /// phpcs 실행 파일
    pub command: Option<String>,
    pub standard: Option<String>,
    pub encoding: Option<String>,
    /// 추가 표준 경로. `%root%`는 작업 디렉터리로 치환된다.
    pub installed_paths: Option<String>,
    /// 검사 대상 확장자(기본: php)
    pub extensions: Option<Vec<String>>,
    /// 경로가 일치하면 무시할 정규식 목록
    pub ignore_patterns: Option<Vec<String>>,
    /// 경고(warning)도 지적 사항으로 포함할지 여부(기본 false)
    pub include_warnings: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CpplintConfig {
    /// cpplint 스크립트를 실행할 인터프리터
    pub python: Option<String>,
    pub script: Option<String>,
    pub line_length: Option<u32>,
    pub extensions: Option<Vec<String>>,
    /// 임시 파일 디렉터리(기본: 시스템 임시 디렉터리)
    pub tmp_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    /// tracing env-filter 지시어 (`RUST_LOG`가 있으면 그쪽이 우선)
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

impl Config {
    pub fn checker_kind(&self) -> CheckerKind {
        self.checker.kind.unwrap_or_default()
    }

    pub fn log_level(&self) -> String {
        self.logging
            .level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn bind_address(&self) -> String {
        self.server
            .bind
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.stash.merge_from(other.stash);
        self.checker.merge_from(other.checker);
        if other.logging.level.is_some() {
            self.logging.level = other.logging.level;
        }
        if other.server.bind.is_some() {
            self.server.bind = other.server.bind;
        }
    }
}

impl StashConfig {
    pub fn merge_from(&mut self, other: StashConfig) {
        if other.url.is_some() {
            self.url = other.url;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.password_env.is_some() {
            self.password_env = other.password_env;
        }
    }
}

impl CheckerConfig {
    pub fn merge_from(&mut self, other: CheckerConfig) {
        if other.kind.is_some() {
            self.kind = other.kind;
        }
        match (self.phpcs.as_mut(), other.phpcs) {
            (Some(existing), Some(next)) => existing.merge_from(next),
            (None, Some(next)) => self.phpcs = Some(next),
            _ => {}
        }
        match (self.cpplint.as_mut(), other.cpplint) {
            (Some(existing), Some(next)) => existing.merge_from(next),
            (None, Some(next)) => self.cpplint = Some(next),
            _ => {}
        }
    }
}

impl PhpCsConfig {
    pub fn command(&self) -> String {
        self.command
            .clone()
            .unwrap_or_else(|| DEFAULT_PHPCS_COMMAND.to_string())
    }

    pub fn standard(&self) -> String {
        self.standard
            .clone()
            .unwrap_or_else(|| DEFAULT_PHPCS_STANDARD.to_string())
    }

    pub fn encoding(&self) -> String {
        self.encoding
            .clone()
            .unwrap_or_else(|| DEFAULT_PHPCS_ENCODING.to_string())
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions
            .clone()
            .unwrap_or_else(|| vec!["php".to_string()])
    }

    pub fn merge_from(&mut self, other: PhpCsConfig) {
        if other.command.is_some() {
            self.command = other.command;
        }
        if other.standard.is_some() {
            self.standard = other.standard;
        }
        if other.encoding.is_some() {
            self.encoding = other.encoding;
        }
        if other.installed_paths.is_some() {
            self.installed_paths = other.installed_paths;
        }
        if other.extensions.is_some() {
            self.extensions = other.extensions;
        }
        if other.ignore_patterns.is_some() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.include_warnings.is_some() {
            self.include_warnings = other.include_warnings;
        }
    }
}

impl CpplintConfig {
    pub fn python(&self) -> String {
        self.python
            .clone()
            .unwrap_or_else(|| DEFAULT_PYTHON.to_string())
    }

    pub fn script(&self) -> String {
        self.script
            .clone()
            .unwrap_or_else(|| DEFAULT_CPPLINT_SCRIPT.to_string())
    }

    pub fn line_length(&self) -> u32 {
        self.line_length.unwrap_or(DEFAULT_CPPLINT_LINE_LENGTH)
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions.clone().unwrap_or_else(|| {
            DEFAULT_CPPLINT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect()
        })
    }

    pub fn merge_from(&mut self, other: CpplintConfig) {
        if other.python.is_some() {
            self.python = other.python;
        }
        if other.script.is_some() {
            self.script = other.script;
        }
        if other.line_length.is_some() {
            self.line_length = other.line_length;
        }
        if other.extensions.is_some() {
            self.extensions = other.extensions;
        }
        if other.tmp_dir.is_some() {
            self.tmp_dir = other.tmp_dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_override_field_by_field() {
        let mut base: Config = serde_json::from_str(
            r#"{
                "stash": { "url": "https://stash.local/", "username": "bot", "password_env": "PW" },
                "checker": { "type": "phpcs", "phpcs": { "standard": "PSR2", "encoding": "cp1251" } }
            }"#,
        )
        .unwrap();
        let overlay: Config = serde_json::from_str(
            r#"{
                "stash": { "username": "robot" },
                "checker": { "type": "cpplint", "phpcs": { "standard": "Squiz" } },
                "logging": { "level": "debug" }
            }"#,
        )
        .unwrap();

        base.merge_from(overlay);

        assert_eq!(base.stash.url.as_deref(), Some("https://stash.local/"));
        assert_eq!(base.stash.username.as_deref(), Some("robot"));
        assert_eq!(base.stash.password_env.as_deref(), Some("PW"));
        assert_eq!(base.checker_kind(), CheckerKind::Cpplint);
        assert_eq!(base.log_level(), "debug");
        let phpcs = base.checker.phpcs.as_ref().unwrap();
        assert_eq!(phpcs.standard(), "Squiz");
        assert_eq!(phpcs.encoding(), "cp1251");
    }

    #[test]
    fn defaults_apply_when_sections_are_missing() {
        let config = Config::default();
        assert_eq!(config.checker_kind(), CheckerKind::Phpcs);
        assert_eq!(config.bind_address(), DEFAULT_BIND);
        assert_eq!(CpplintConfig::default().extensions().len(), 4);
        assert_eq!(PhpCsConfig::default().extensions(), vec!["php"]);
    }
}
