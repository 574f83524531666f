//! 체커 팩토리 포트 구현 어댑터.

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::{CheckerFactory, CodeChecker};
use crate::infrastructure::{checkers, config};

/// 작업 디렉터리를 `%root%` 기준으로 삼아 설정된 체커를 만든다.
pub struct CheckerFactoryAdapter;

impl CheckerFactory for CheckerFactoryAdapter {
    fn build(&self, config: &Config) -> Result<Box<dyn CodeChecker>> {
        checkers::build_checker(config, &config::working_root())
    }
}
