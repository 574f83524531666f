//! 외부 트리거(CLI, 웹훅)와 의존성 조립 계층.

pub mod cli;
pub mod composition;
pub mod webhook;
