//! 설정 모듈 공용 유틸리티.

use std::env;
use std::path::{Path, PathBuf};

/// 체커 실행 파일이 실행 가능한지 탐지한다.
pub fn command_exists(command: &str) -> bool {
    let command = command.trim();
    if command.is_empty() {
        return false;
    }

    // 경로가 주어지면 파일 존재만 검사한다.
    let command_path = Path::new(command);
    if command_path.components().count() > 1 {
        return command_path.is_file();
    }

    env::var_os("PATH")
        .map(|path_var| env::split_paths(&path_var).any(|dir| candidates(&dir, command)))
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn candidates(dir: &Path, command: &str) -> bool {
    dir.join(command).is_file()
}

#[cfg(windows)]
fn candidates(dir: &Path, command: &str) -> bool {
    if dir.join(command).is_file() {
        return true;
    }
    let pathext = env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT;.COM".into());
    pathext
        .split(';')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .any(|ext| dir.join(format!("{command}{ext}")).is_file())
}

/// `%root%` 치환 기준 디렉터리(현재 작업 디렉터리).
pub fn working_root() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_missing_commands_are_not_available() {
        assert!(!command_exists("   "));
        assert!(!command_exists("./definitely/not/here/phpcs"));
    }
}
