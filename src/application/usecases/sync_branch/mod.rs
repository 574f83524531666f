//! 브랜치의 열린 PR 전체에 대한 린트 코멘트 동기화 유스케이스.

mod branch;
mod files;
mod orphans;
mod reconcile;

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{CheckerFactory, ConfigRepository, GatewayFactory};
use crate::domain::report::SyncReport;
use crate::domain::target::SyncTarget;

pub use branch::BranchSync;

/// 트리거(CLI/웹훅)에서 들어온 원본 인자.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    pub branch: Option<String>,
    pub slug: Option<String>,
    pub repo: Option<String>,
}

impl SyncRequest {
    pub fn new(
        branch: impl Into<String>,
        slug: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            branch: Some(branch.into()),
            slug: Some(slug.into()),
            repo: Some(repo.into()),
        }
    }
}

/// 인자 검증, 설정 로딩, 게이트웨이/체커 조립 후 브랜치 동기화를 실행한다.
pub struct SyncBranchUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub gateway_factory: &'a dyn GatewayFactory,
    pub checker_factory: &'a dyn CheckerFactory,
}

impl<'a> SyncBranchUseCase<'a> {
    /// 인자가 비어 있으면 설정/원격 호출 없이 `InvalidArgument`로 실패한다.
    pub async fn execute(&self, request: &SyncRequest) -> Result<SyncReport> {
        let target = SyncTarget::parse(
            request.branch.as_deref(),
            request.slug.as_deref(),
            request.repo.as_deref(),
        )?;

        let config = self
            .config_repo
            .load()
            .context("failed to load lintpilot config")?;
        let gateway = self
            .gateway_factory
            .build(&config.stash, &target)
            .context("failed to build stash client")?;
        let checker = self
            .checker_factory
            .build(&config)
            .context("failed to build checker")?;

        info!(%target, checker = checker.name(), "starting branch sync");
        let sync = BranchSync::new(gateway.as_ref(), checker.as_ref());
        let report = sync.run(&target.branch_ref).await?;
        Ok(report)
    }
}
