//! 설정 값(비밀번호/env/경로 치환 등)을 실제 런타임 값으로 해석하는 유틸리티.
//!
//! - 환경변수/작업 디렉터리 접근은 인프라 계층에서만 수행한다.

use std::env;
use std::path::Path;

use anyhow::{Result, bail};

use crate::application::config::StashConfig;

const ROOT_PLACEHOLDER: &str = "%root%";

/// 비밀번호 해석 결과. `source`는 진단 출력용이다.
#[derive(Debug, Clone)]
pub struct PasswordResolution {
    pub password: Option<String>,
    pub source: Option<String>,
}

/// 게이트웨이 생성에 필요한 접속 정보.
#[derive(Debug, Clone)]
pub struct ResolvedStash {
    pub url: String,
    pub username: String,
    pub password: Option<String>,
    pub password_source: Option<String>,
}

/// URL/사용자 이름은 필수이며, 비밀번호는 inline → env 순서로 해석한다.
pub fn resolve_stash(cfg: &StashConfig) -> Result<ResolvedStash> {
    let Some(url) = non_empty(cfg.url.as_deref()) else {
        bail!("missing stash.url in config");
    };
    let Some(username) = non_empty(cfg.username.as_deref()) else {
        bail!("missing stash.username in config");
    };
    let resolution = resolve_password(cfg);

    Ok(ResolvedStash {
        url: url.to_string(),
        username: username.to_string(),
        password: resolution.password,
        password_source: resolution.source,
    })
}

pub fn resolve_password(cfg: &StashConfig) -> PasswordResolution {
    if let Some(password) = non_empty(cfg.password.as_deref()) {
        return PasswordResolution {
            password: Some(password.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let Some(env_name) = non_empty(cfg.password_env.as_deref()) else {
        return PasswordResolution {
            password: None,
            source: None,
        };
    };

    match env::var(env_name).ok().filter(|v| !v.trim().is_empty()) {
        Some(v) => PasswordResolution {
            password: Some(v),
            source: Some(format!("env:{env_name}")),
        },
        None => PasswordResolution {
            password: None,
            source: Some(format!("env:{env_name} (missing)")),
        },
    }
}

/// `installed_paths`의 `%root%`를 주어진 디렉터리로 치환한다.
pub fn resolve_installed_paths(raw: &str, root: &Path) -> String {
    raw.replace(ROOT_PLACEHOLDER, &root.display().to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
