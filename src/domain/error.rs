//! 동기화 엔진 오류 분류.
//!
//! 파일 단위로 건너뛸 오류(`Conflict`, `OversizedResponse`)와
//! PR 단위로 중단할 오류를 호출 측에서 구분할 수 있도록 타입으로 나눈다.

use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// 트리거 입력 오류. 원격 호출 전에 실패한다.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// version 불일치 또는 머지 충돌 마커.
    #[error("conflict: {0}")]
    Conflict(String),

    /// 서버 응답 크기 상한에 걸려 잘린 payload.
    #[error("oversized response: {0}")]
    OversizedResponse(String),

    /// 성공 상태이지만 해석할 수 없는 본문.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// 4xx/5xx 응답.
    #[error("stash {} error: {method} {url} ({status}): {body}", transport_kind(.status))]
    Transport {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// 상태 코드 없는 전송 실패(DNS/connect/timeout).
    #[error("network error: {method} {url}: {message}")]
    Network {
        method: String,
        url: String,
        message: String,
    },

    #[error("checker failed: {0}")]
    Checker(String),
}

impl SyncError {
    /// 파일 하나만 건너뛰고 다음 파일로 진행해도 되는 오류인지 여부.
    pub fn is_file_local(&self) -> bool {
        matches!(
            self,
            SyncError::Conflict(_) | SyncError::OversizedResponse(_) | SyncError::Checker(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SyncError::Conflict(_))
    }
}

fn transport_kind(status: &u16) -> &'static str {
    if *status >= 500 { "server" } else { "client" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_names_client_or_server() {
        let client = SyncError::Transport {
            method: "GET".into(),
            url: "http://stash/x".into(),
            status: 404,
            body: "nope".into(),
        };
        let server = SyncError::Transport {
            method: "PUT".into(),
            url: "http://stash/y".into(),
            status: 502,
            body: String::new(),
        };

        assert!(client.to_string().starts_with("stash client error: GET"));
        assert!(server.to_string().starts_with("stash server error: PUT"));
    }

    #[test]
    fn only_conflict_oversized_and_checker_are_file_local() {
        assert!(SyncError::Conflict("x".into()).is_file_local());
        assert!(SyncError::OversizedResponse("x".into()).is_file_local());
        assert!(SyncError::Checker("x".into()).is_file_local());
        assert!(!SyncError::InvalidArgument("x".into()).is_file_local());
        assert!(
            !SyncError::MalformedResponse {
                url: "u".into(),
                reason: "r".into()
            }
            .is_file_local()
        );
    }
}
