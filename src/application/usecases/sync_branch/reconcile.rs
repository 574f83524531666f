//! 파일 단위 코멘트 동기화(원하는 코멘트 집합 ↔ 원격 로봇 코멘트).

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::application::ports::StashGateway;
use crate::domain::error::SyncResult;
use crate::domain::policy::{
    DesiredComments, StaleCommentAction, stale_comment_action, texts_match,
};
use crate::domain::pull_request::RemoteComment;

/// 원격 쓰기 한 건의 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Write {
    Created,
    Updated,
    Deleted,
    Struck,
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub struck: usize,
    pub unchanged: usize,
    /// version 충돌로 건너뛴 쓰기
    pub conflicts: usize,
}

impl ReconcileSummary {
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted + self.struck
    }

    /// 쓰기 결과를 집계한다. version 충돌은 재시도 없이 건너뛰고 나머지 오류는 전파한다.
    pub fn record(&mut self, result: SyncResult<Write>, comment: &str) -> SyncResult<()> {
        match result {
            Ok(Write::Created) => self.created += 1,
            Ok(Write::Updated) => self.updated += 1,
            Ok(Write::Deleted) => self.deleted += 1,
            Ok(Write::Struck) => self.struck += 1,
            Ok(Write::Unchanged) => self.unchanged += 1,
            Err(err) if err.is_conflict() => {
                warn!(comment, error = %err, "skipping write after version conflict");
                self.conflicts += 1;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

pub(super) struct CommentReconciler<'a> {
    gateway: &'a dyn StashGateway,
    pull_request_id: u64,
}

impl<'a> CommentReconciler<'a> {
    pub fn new(gateway: &'a dyn StashGateway, pull_request_id: u64) -> Self {
        Self {
            gateway,
            pull_request_id,
        }
    }

    /// 원격 코멘트를 `desired`와 일치시킨다.
    ///
    /// 자신이 작성한 코멘트만 비교/수정 대상이며, 처리한 코멘트 id는 `handled`에 남겨
    /// PR 단위 고아 코멘트 정리에서 다시 다루지 않게 한다.
    pub async fn reconcile_file(
        &self,
        path: &str,
        desired: &DesiredComments,
        handled: &mut HashSet<u64>,
    ) -> SyncResult<ReconcileSummary> {
        let identity = self.gateway.identity();
        let existing = self
            .gateway
            .list_comments(self.pull_request_id, path)
            .await?;
        info!(
            pull_request = self.pull_request_id,
            path,
            count = existing.len(),
            "found comments on file"
        );

        let mut pending = desired.clone();
        let mut summary = ReconcileSummary::default();

        for comment in existing.iter().filter(|c| c.is_authored_by(identity)) {
            let Some(line) = comment.line() else {
                continue;
            };
            handled.insert(comment.id);

            let result = match pending.remove(&line) {
                None => self.retract(path, comment).await,
                Some(text) if !texts_match(&comment.text, &text) => {
                    info!(
                        pull_request = self.pull_request_id,
                        path,
                        line,
                        comment_id = comment.id,
                        old_text = %comment.text,
                        new_text = %text,
                        "updating comment"
                    );
                    self.gateway
                        .update_comment(self.pull_request_id, comment.id, comment.version, &text)
                        .await
                        .map(|_| Write::Updated)
                }
                Some(_) => Ok(Write::Unchanged),
            };
            summary.record(result, &format!("#{}", comment.id))?;
        }

        for (line, text) in pending {
            info!(
                pull_request = self.pull_request_id,
                path,
                line,
                text = %text,
                "adding comment"
            );
            let result = self
                .gateway
                .add_comment(self.pull_request_id, path, line, &text)
                .await
                .map(|_| Write::Created);
            summary.record(result, &format!("{path}:{line}"))?;
        }

        debug!(pull_request = self.pull_request_id, path, ?summary, "file reconciled");
        Ok(summary)
    }

    /// 더 이상 유효하지 않은 로봇 코멘트를 삭제하거나, 답글이 있으면 취소선 처리한다.
    pub async fn retract(&self, path: &str, comment: &RemoteComment) -> SyncResult<Write> {
        match stale_comment_action(comment) {
            StaleCommentAction::Delete => {
                info!(
                    pull_request = self.pull_request_id,
                    path,
                    line = ?comment.line(),
                    comment_id = comment.id,
                    "deleting comment"
                );
                self.gateway
                    .delete_comment(self.pull_request_id, comment.id, comment.version)
                    .await?;
                Ok(Write::Deleted)
            }
            StaleCommentAction::StrikeThrough(text) => {
                info!(
                    pull_request = self.pull_request_id,
                    path,
                    line = ?comment.line(),
                    comment_id = comment.id,
                    "striking through comment with replies"
                );
                self.gateway
                    .update_comment(self.pull_request_id, comment.id, comment.version, &text)
                    .await?;
                Ok(Write::Struck)
            }
            StaleCommentAction::Keep => Ok(Write::Unchanged),
        }
    }
}
