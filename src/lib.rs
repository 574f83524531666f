//! lintpilot library root.
//! Clean Architecture + DDD 계층을 외부에 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use application::usecases::sync_branch::SyncRequest;
use domain::report::SyncReport;
use interface::composition::AppComposition;

/// 라이브러리 직접 호출용 브랜치 동기화 함수.
pub async fn run_sync(branch: &str, slug: &str, repo: &str) -> Result<SyncReport> {
    let composition = AppComposition::default();
    composition
        .sync_usecase()
        .execute(&SyncRequest::new(branch, slug, repo))
        .await
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_config_pretty_json() -> Result<String> {
    let composition = AppComposition::default();
    composition.inspect_config_usecase().execute()
}
