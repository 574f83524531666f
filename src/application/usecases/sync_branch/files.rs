//! 파일 단위 단계: 변경 줄 계산 → 내용 복원 → 체크 → 코멘트 동기화.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use super::branch::BranchSync;
use super::reconcile::CommentReconciler;
use crate::domain::diff::FileDiff;
use crate::domain::error::{SyncError, SyncResult};
use crate::domain::policy::{
    CheckError, DesiredComments, build_desired_comments, human_readable_intervals,
};
use crate::domain::report::FileOutcome;

/// 파일 하나를 처리한다.
///
/// 파일 국소 오류(충돌, 과대 응답, 체커 실패)는 `Skipped`로 돌려주며 이 경우 원격
/// 코멘트는 건드리지 않는다. 그 밖의 오류는 PR 경계까지 전파한다.
pub(super) async fn sync_file(
    sync: &BranchSync<'_>,
    pull_request_id: u64,
    path: &str,
    file: &FileDiff,
    handled: &mut HashSet<u64>,
) -> SyncResult<FileOutcome> {
    let extension = file.extension();
    let affected = file.affected_lines();
    info!(
        pull_request = pull_request_id,
        path,
        lines = %human_readable_intervals(affected.iter().copied()),
        "changed lines"
    );

    let ignored = sync.checker.should_ignore(path, &extension);
    let desired = if ignored {
        debug!(pull_request = pull_request_id, path, %extension, "ignored by checker");
        DesiredComments::new()
    } else if affected.is_empty() {
        DesiredComments::new()
    } else {
        match check_file(sync, pull_request_id, path, &extension).await {
            Ok(errors) => build_desired_comments(&errors, &affected),
            Err(err) if err.is_file_local() => {
                log_skip(pull_request_id, path, &err);
                return Ok(FileOutcome::Skipped {
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    };

    CommentReconciler::new(sync.gateway, pull_request_id)
        .reconcile_file(path, &desired, handled)
        .await?;

    Ok(if ignored {
        FileOutcome::Ignored
    } else {
        FileOutcome::Reconciled { comments: desired }
    })
}

async fn check_file(
    sync: &BranchSync<'_>,
    pull_request_id: u64,
    path: &str,
    extension: &str,
) -> SyncResult<Vec<CheckError>> {
    let content = sync
        .gateway
        .fetch_file_content(pull_request_id, path)
        .await?;
    let errors = sync.checker.check(path, extension, &content).await?;
    debug!(
        pull_request = pull_request_id,
        path,
        checker = sync.checker.name(),
        count = errors.len(),
        "checker finished"
    );
    Ok(errors)
}

fn log_skip(pull_request_id: u64, path: &str, err: &SyncError) {
    match err {
        SyncError::OversizedResponse(_) => {
            error!(pull_request = pull_request_id, path, error = %err, "skipping file")
        }
        _ => warn!(pull_request = pull_request_id, path, error = %err, "skipping file"),
    }
}
