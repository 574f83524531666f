//! Domain layer
//! diff 분석, 코멘트 정책, 오류 분류를 외부 의존성 없이 표현한다.

pub mod diff;
pub mod error;
pub mod policy;
pub mod pull_request;
pub mod report;
pub mod target;
