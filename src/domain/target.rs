//! 트리거 입력(branch/slug/repo)을 동기화 대상으로 해석하는 모듈.

use super::error::{SyncError, SyncResult};

const BRANCH_REF_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// `refs/heads/...` 형태의 전체 ref
    pub branch_ref: String,
    /// Stash 프로젝트 키(slug)
    pub project_key: String,
    /// 저장소 slug
    pub repository: String,
}

impl SyncTarget {
    /// 세 인자 중 하나라도 비어 있으면 원격 호출 없이 실패한다.
    pub fn parse(branch: Option<&str>, slug: Option<&str>, repo: Option<&str>) -> SyncResult<Self> {
        let (Some(branch), Some(slug), Some(repo)) = (
            non_empty(branch),
            non_empty(slug),
            non_empty(repo),
        ) else {
            return Err(SyncError::InvalidArgument(
                "empty slug or branch or repo".to_string(),
            ));
        };

        Ok(Self {
            branch_ref: full_branch_ref(branch),
            project_key: slug.to_string(),
            repository: repo.to_string(),
        })
    }
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.project_key, self.repository, self.branch_ref)
    }
}

/// 짧은 브랜치 이름이면 `refs/heads/`를 붙인다.
pub fn full_branch_ref(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("{BRANCH_REF_PREFIX}{branch}")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_branch_names_become_full_refs() {
        let target = SyncTarget::parse(Some("feature/x"), Some("PRJ"), Some("app")).unwrap();
        assert_eq!(target.branch_ref, "refs/heads/feature/x");
        assert_eq!(target.to_string(), "PRJ/app@refs/heads/feature/x");

        let target = SyncTarget::parse(Some("refs/heads/main"), Some("PRJ"), Some("app")).unwrap();
        assert_eq!(target.branch_ref, "refs/heads/main");
    }

    #[test]
    fn missing_or_blank_arguments_are_rejected() {
        for (branch, slug, repo) in [
            (None, Some("PRJ"), Some("app")),
            (Some("main"), Some("  "), Some("app")),
            (Some("main"), Some("PRJ"), Some("")),
        ] {
            let err = SyncTarget::parse(branch, slug, repo).unwrap_err();
            assert!(matches!(err, SyncError::InvalidArgument(_)));
        }
    }
}
