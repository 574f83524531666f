//! PR 단위 고아(orphaned) 로봇 코멘트 정리 단계.
//!
//! 파일 코멘트 목록에 나오지 않는, 서버가 orphaned로 표시한 코멘트를 활동 목록에서 찾아
//! 파일 단위 동기화와 같은 규칙(삭제 또는 취소선)으로 처리한다.

use std::collections::HashSet;

use tracing::info;

use super::reconcile::{CommentReconciler, ReconcileSummary};
use crate::application::ports::StashGateway;
use crate::domain::error::SyncResult;

pub(super) async fn sweep_orphaned_comments(
    gateway: &dyn StashGateway,
    pull_request_id: u64,
    handled: &mut HashSet<u64>,
) -> SyncResult<ReconcileSummary> {
    let identity = gateway.identity();
    let activities = gateway.list_activities(pull_request_id).await?;

    let deleted: HashSet<u64> = activities
        .iter()
        .filter_map(|a| a.deleted_comment_id())
        .collect();

    let orphans: Vec<_> = activities
        .iter()
        .filter_map(|a| a.added_comment())
        .filter(|c| c.is_authored_by(identity) && c.is_orphaned())
        .filter(|c| !deleted.contains(&c.id))
        .collect();

    let reconciler = CommentReconciler::new(gateway, pull_request_id);
    let mut summary = ReconcileSummary::default();

    for comment in orphans {
        if !handled.insert(comment.id) {
            continue;
        }
        let path = comment
            .anchor
            .as_ref()
            .and_then(|a| a.path.as_deref())
            .unwrap_or("<unknown>");
        info!(
            pull_request = pull_request_id,
            path,
            comment_id = comment.id,
            "found orphaned comment"
        );
        let result = reconciler.retract(path, comment).await;
        summary.record(result, &format!("#{}", comment.id))?;
    }

    Ok(summary)
}
