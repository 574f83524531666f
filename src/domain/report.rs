//! 동기화 실행 결과(파일/PR 단위 결과 값).

use std::collections::BTreeMap;

use serde::Serialize;

use super::policy::DesiredComments;

/// 파일 하나의 처리 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// 체크 후 코멘트를 동기화함(`comments`가 현재 지적 사항).
    Reconciled { comments: DesiredComments },
    /// 체커 무시 대상. 기존 로봇 코멘트 회수만 수행함.
    Ignored,
    /// 이번 실행에서 건너뜀. 원격 코멘트는 건드리지 않는다.
    Skipped { reason: String },
}

impl FileOutcome {
    pub fn comments(&self) -> Option<&DesiredComments> {
        match self {
            FileOutcome::Reconciled { comments } => Some(comments),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PullRequestOutcome {
    Approved,
    Unapproved,
    /// 이 PR 처리만 중단됨(다른 PR은 계속 진행).
    Aborted { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestReport {
    pub id: u64,
    pub outcome: PullRequestOutcome,
    pub files: BTreeMap<String, FileOutcome>,
}

impl PullRequestReport {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            outcome: PullRequestOutcome::Unapproved,
            files: BTreeMap::new(),
        }
    }

    /// 모든 파일의 현재 지적 사항이 비어 있는지 여부.
    pub fn has_findings(&self) -> bool {
        self.files
            .values()
            .filter_map(FileOutcome::comments)
            .any(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub branch_ref: String,
    pub pull_requests: Vec<PullRequestReport>,
}

impl SyncReport {
    /// PR id → 파일 경로 → 줄 번호 → 코멘트 본문.
    pub fn comments(&self) -> BTreeMap<u64, BTreeMap<String, DesiredComments>> {
        self.pull_requests
            .iter()
            .map(|pr| {
                let files = pr
                    .files
                    .iter()
                    .filter_map(|(path, outcome)| {
                        outcome.comments().map(|c| (path.clone(), c.clone()))
                    })
                    .collect();
                (pr.id, files)
            })
            .collect()
    }
}
