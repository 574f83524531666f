//! 코드 스타일 체커 구현(phpcs, cpplint).
//! 둘 다 외부 프로세스로 실행하며, 설정은 생성 시점에 명시적으로 주입된다.

pub mod cpplint;
pub mod phpcs;
mod process;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::application::config::{CheckerKind, Config};
use crate::application::ports::CodeChecker;
use crate::infrastructure::config::command_exists;

pub use cpplint::CpplintChecker;
pub use phpcs::PhpCsChecker;

/// `checker.type`에 맞는 체커를 만든다.
pub fn build_checker(config: &Config, root: &Path) -> Result<Box<dyn CodeChecker>> {
    let checker: Box<dyn CodeChecker> = match config.checker_kind() {
        CheckerKind::Phpcs => {
            let cfg = config.checker.phpcs.clone().unwrap_or_default();
            warn_if_missing(&cfg.command());
            Box::new(PhpCsChecker::new(&cfg, root)?)
        }
        CheckerKind::Cpplint => {
            let cfg = config.checker.cpplint.clone().unwrap_or_default();
            warn_if_missing(&cfg.python());
            Box::new(CpplintChecker::new(&cfg))
        }
    };
    info!(checker = checker.name(), "checker ready");
    Ok(checker)
}

fn warn_if_missing(command: &str) {
    if !command_exists(command) {
        warn!(command, "checker command not found in PATH; files will be skipped");
    }
}
