//! 애플리케이션 조립(composition root) 모듈.

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::ConfigRepository;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::sync_branch::SyncBranchUseCase;
use crate::infrastructure::adapters::{
    CheckerFactoryAdapter, JsonConfigRepository, StashGatewayFactory,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    gateway_factory: StashGatewayFactory,
    checker_factory: CheckerFactoryAdapter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            gateway_factory: StashGatewayFactory,
            checker_factory: CheckerFactoryAdapter,
        }
    }
}

impl AppComposition {
    /// 설정 저장소를 통해 병합 설정을 읽는다.
    pub fn load_config(&self) -> Result<Config> {
        self.config_repo.load()
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 브랜치 동기화 유스케이스를 생성한다.
    pub fn sync_usecase(&self) -> SyncBranchUseCase<'_> {
        SyncBranchUseCase {
            config_repo: &self.config_repo,
            gateway_factory: &self.gateway_factory,
            checker_factory: &self.checker_factory,
        }
    }
}
