//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod checker_factory;
mod config_repository;
mod vcs_factory;

pub use checker_factory::CheckerFactoryAdapter;
pub use config_repository::JsonConfigRepository;
pub use vcs_factory::StashGatewayFactory;
