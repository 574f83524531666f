//! Stash 게이트웨이 팩토리 포트 구현 어댑터.

use anyhow::Result;

use crate::application::config::StashConfig;
use crate::application::ports::{GatewayFactory, StashGateway};
use crate::domain::target::SyncTarget;
use crate::infrastructure::{config, vcs};

/// 설정의 접속 정보를 해석해 대상 저장소용 Stash 클라이언트를 만든다.
pub struct StashGatewayFactory;

impl GatewayFactory for StashGatewayFactory {
    fn build(&self, stash: &StashConfig, target: &SyncTarget) -> Result<Box<dyn StashGateway>> {
        let resolved = config::resolve_stash(stash)?;
        vcs::build_stash_client(&resolved, target)
    }
}
