//! 유스케이스 모음.

pub mod inspect_config;
pub mod sync_branch;
