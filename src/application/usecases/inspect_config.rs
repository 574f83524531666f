//! 병합된 설정과 체커 실행 가능 여부를 확인하는 유스케이스.

use anyhow::{Context, Result};

use crate::application::ports::ConfigRepository;

pub struct InspectConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
}

impl<'a> InspectConfigUseCase<'a> {
    /// 탐색 경로, 로딩된 파일, 적용 값을 JSON 문자열로 돌려준다(비밀번호 값은 제외).
    pub fn execute(&self) -> Result<String> {
        self.config_repo
            .inspect_pretty_json()
            .context("failed to inspect lintpilot config")
    }
}
