//! Infrastructure layer
//! 외부 시스템(Stash API/체커 프로세스/파일시스템)과 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod checkers;
pub mod config;
pub mod vcs;
