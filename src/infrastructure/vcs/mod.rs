//! 코드 호스팅 서버 연동 계층.
//! Stash REST 클라이언트와 응답 JSON 매핑을 묶는다.

pub mod stash;
mod wire;

use anyhow::{Result, bail};

use crate::application::ports::StashGateway;
use crate::domain::target::SyncTarget;
use crate::infrastructure::config::ResolvedStash;

pub use stash::StashClient;

/// 해석된 접속 정보와 대상 저장소로 게이트웨이를 만든다.
pub fn build_stash_client(
    stash: &ResolvedStash,
    target: &SyncTarget,
) -> Result<Box<dyn StashGateway>> {
    let Some(password) = stash.password.clone() else {
        bail!(
            "missing stash password. Configure stash.password or stash.password_env ({})",
            stash.password_source.as_deref().unwrap_or("not set")
        );
    };

    Ok(Box::new(StashClient::new(
        &stash.url,
        stash.username.clone(),
        password,
        target.project_key.clone(),
        target.repository.clone(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> SyncTarget {
        SyncTarget::parse(Some("feature"), Some("PRJ"), Some("app")).unwrap()
    }

    #[test]
    fn missing_password_names_its_source() {
        let stash = ResolvedStash {
            url: "https://stash.example.com".into(),
            username: "lint-bot".into(),
            password: None,
            password_source: Some("env:STASH_PASSWORD".into()),
        };

        let err = build_stash_client(&stash, &target()).err().unwrap();

        assert!(err.to_string().contains("env:STASH_PASSWORD"));
    }

    #[test]
    fn builds_client_bound_to_identity() {
        let stash = ResolvedStash {
            url: "https://stash.example.com/".into(),
            username: "lint-bot".into(),
            password: Some("secret".into()),
            password_source: Some("inline".into()),
        };

        let gateway = build_stash_client(&stash, &target()).unwrap();

        assert_eq!(gateway.identity(), "lint-bot");
    }
}
