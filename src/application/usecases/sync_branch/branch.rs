//! PR 단위 상태 기계: 리뷰어 등록 → diff 조회 → 파일별 동기화 → 고아 정리 → 승인 결정.

use std::collections::HashSet;

use tracing::{error, info, warn};

use super::files::sync_file;
use super::orphans::sweep_orphaned_comments;
use crate::application::ports::{CodeChecker, StashGateway};
use crate::domain::diff::ZERO_CONTEXT_LINES;
use crate::domain::error::SyncResult;
use crate::domain::pull_request::PullRequest;
use crate::domain::report::{PullRequestOutcome, PullRequestReport, SyncReport};

/// 게이트웨이와 체커를 주입받아 한 브랜치의 열린 PR을 순서대로 처리한다.
pub struct BranchSync<'a> {
    pub(super) gateway: &'a dyn StashGateway,
    pub(super) checker: &'a dyn CodeChecker,
}

impl<'a> BranchSync<'a> {
    pub fn new(gateway: &'a dyn StashGateway, checker: &'a dyn CodeChecker) -> Self {
        Self { gateway, checker }
    }

    /// PR 목록 조회 실패만 전체 실패로 돌려주고, 개별 PR 오류는 `Aborted`로 기록한다.
    pub async fn run(&self, branch_ref: &str) -> SyncResult<SyncReport> {
        let pull_requests = self.gateway.list_open_pull_requests(branch_ref).await?;
        info!(
            branch = branch_ref,
            count = pull_requests.len(),
            "found open pull requests"
        );

        let mut reports = Vec::with_capacity(pull_requests.len());
        for pull_request in &pull_requests {
            let mut report = PullRequestReport::new(pull_request.id);
            let outcome = match self.process_pull_request(pull_request, &mut report).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(
                        pull_request = pull_request.id,
                        error = %err,
                        "pull request processing aborted"
                    );
                    PullRequestOutcome::Aborted {
                        reason: err.to_string(),
                    }
                }
            };
            report.outcome = outcome;
            reports.push(report);
        }

        Ok(SyncReport {
            branch_ref: branch_ref.to_string(),
            pull_requests: reports,
        })
    }

    async fn process_pull_request(
        &self,
        pull_request: &PullRequest,
        report: &mut PullRequestReport,
    ) -> SyncResult<PullRequestOutcome> {
        let id = pull_request.id;
        info!(
            pull_request = id,
            author = %pull_request.author,
            commits = %pull_request.commit_range(),
            "processing pull request"
        );

        if pull_request.needs_reviewer(self.gateway.identity()) {
            info!(pull_request = id, "adding self as reviewer");
            self.gateway.add_reviewer(id).await?;
        }

        let diff = self
            .gateway
            .fetch_diff(id, ZERO_CONTEXT_LINES, None)
            .await?;
        if diff.truncated {
            warn!(
                pull_request = id,
                "diff was truncated by the server; some files may be missing"
            );
        }

        let mut handled = HashSet::new();
        for file in &diff.files {
            let Some(path) = file.destination.as_deref() else {
                info!(pull_request = id, path = file.display_path(), "file was removed");
                continue;
            };
            let outcome = sync_file(self, id, path, file, &mut handled).await?;
            report.files.insert(path.to_string(), outcome);
        }

        let swept = sweep_orphaned_comments(self.gateway, id, &mut handled).await?;
        if swept.writes() > 0 {
            info!(pull_request = id, retracted = swept.writes(), "orphaned comments retracted");
        }

        self.apply_approval(id, report.has_findings()).await
    }

    /// 현재 지적 사항 기준으로 승인/승인 취소를 결정한다(이전 상태와 무관).
    async fn apply_approval(&self, id: u64, has_findings: bool) -> SyncResult<PullRequestOutcome> {
        let (result, outcome) = if has_findings {
            info!(pull_request = id, "findings remain; unapproving");
            (self.gateway.unapprove(id).await, PullRequestOutcome::Unapproved)
        } else {
            info!(pull_request = id, "no findings; approving");
            (self.gateway.approve(id).await, PullRequestOutcome::Approved)
        };

        match result {
            Ok(()) => Ok(outcome),
            Err(err) if err.is_conflict() => {
                warn!(pull_request = id, error = %err, "approval state not changed");
                Ok(outcome)
            }
            Err(err) => Err(err),
        }
    }
}
