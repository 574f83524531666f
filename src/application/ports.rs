//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, StashConfig};
use crate::domain::diff::{Diff, FULL_CONTEXT_LINES};
use crate::domain::error::{SyncError, SyncResult};
use crate::domain::policy::CheckError;
use crate::domain::pull_request::{Activity, PullRequest, RemoteComment};
use crate::domain::target::SyncTarget;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 하나의 저장소(project/repo)에 묶인 Stash REST 연동 포트.
///
/// 모든 쓰기는 `version` 기반 낙관적 동시성 제어를 받으며, 불일치 시
/// `SyncError::Conflict`로 실패한다. 재시도는 하지 않는다.
#[async_trait]
pub trait StashGateway: Send + Sync {
    /// 요청 주체(로봇 코멘트 작성자) 이름
    fn identity(&self) -> &str;
    /// 브랜치에서 나가는 열린 PR 목록 (최대 100개)
    async fn list_open_pull_requests(&self, branch_ref: &str) -> SyncResult<Vec<PullRequest>>;
    /// PR diff 조회. `path`가 있으면 해당 파일만.
    async fn fetch_diff(
        &self,
        pull_request_id: u64,
        context_lines: u32,
        path: Option<&str>,
    ) -> SyncResult<Diff>;
    async fn list_comments(&self, pull_request_id: u64, path: &str)
    -> SyncResult<Vec<RemoteComment>>;
    async fn add_comment(
        &self,
        pull_request_id: u64,
        path: &str,
        line: u32,
        text: &str,
    ) -> SyncResult<()>;
    async fn update_comment(
        &self,
        pull_request_id: u64,
        comment_id: u64,
        version: u32,
        text: &str,
    ) -> SyncResult<()>;
    async fn delete_comment(
        &self,
        pull_request_id: u64,
        comment_id: u64,
        version: u32,
    ) -> SyncResult<()>;
    async fn list_activities(&self, pull_request_id: u64) -> SyncResult<Vec<Activity>>;
    async fn add_reviewer(&self, pull_request_id: u64) -> SyncResult<()>;
    async fn approve(&self, pull_request_id: u64) -> SyncResult<()>;
    async fn unapprove(&self, pull_request_id: u64) -> SyncResult<()>;

    /// 큰 context diff에서 destination 파일 전체 내용을 복원한다.
    async fn fetch_file_content(&self, pull_request_id: u64, path: &str) -> SyncResult<String> {
        let diff = self
            .fetch_diff(pull_request_id, FULL_CONTEXT_LINES, Some(path))
            .await?;
        if diff.truncated {
            return Err(SyncError::OversizedResponse(format!(
                "diff for {path} was truncated by the server"
            )));
        }
        let file = diff.file(path).ok_or_else(|| SyncError::MalformedResponse {
            url: format!("pull-requests/{pull_request_id}/diff/{path}"),
            reason: format!("diff response does not contain {path}"),
        })?;
        file.reconstruct_content()
    }
}

/// 설정/대상에 맞는 Stash 게이트웨이를 생성하는 팩토리 포트.
pub trait GatewayFactory: Send + Sync {
    fn build(&self, config: &StashConfig, target: &SyncTarget) -> Result<Box<dyn StashGateway>>;
}

/// 코드 스타일 체커 포트.
#[async_trait]
pub trait CodeChecker: Send + Sync {
    fn name(&self) -> &'static str;
    fn should_ignore(&self, path: &str, extension: &str) -> bool;
    /// 같은 입력에는 같은 결과를 돌려줘야 한다(1-based destination 줄 번호).
    async fn check(&self, path: &str, extension: &str, content: &str)
    -> SyncResult<Vec<CheckError>>;
}

/// 설정에 맞는 체커를 생성하는 팩토리 포트.
pub trait CheckerFactory: Send + Sync {
    fn build(&self, config: &Config) -> Result<Box<dyn CodeChecker>>;
}
