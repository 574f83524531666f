//! 체커 외부 프로세스 실행기.

use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::domain::error::{SyncError, SyncResult};

#[derive(Debug)]
pub(super) struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// 명령을 실행하고 출력 전체를 모은다. `stdin`이 있으면 파이프로 전달한다.
pub(super) async fn run_command(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
) -> SyncResult<CommandOutput> {
    debug!(program, ?args, "running checker command");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|err| SyncError::Checker(format!("failed to spawn '{program}': {err}")))?;

    if let Some(input) = stdin {
        let mut pipe = child
            .stdin
            .take()
            .ok_or_else(|| SyncError::Checker(format!("failed to open stdin of '{program}'")))?;
        pipe.write_all(input.as_bytes())
            .await
            .map_err(|err| SyncError::Checker(format!("failed to write to '{program}': {err}")))?;
        drop(pipe);
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|err| SyncError::Checker(format!("'{program}' execution failed: {err}")))?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
