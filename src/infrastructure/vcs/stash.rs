//! Stash(Bitbucket Server) REST 1.0 연동 구현.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

use super::wire::{ActivityDto, CommentDto, DiffDto, Page, PullRequestDto};
use crate::application::ports::StashGateway;
use crate::domain::diff::Diff;
use crate::domain::error::{SyncError, SyncResult};
use crate::domain::pull_request::{Activity, PullRequest, RemoteComment};

const HTTP_TIMEOUT: Duration = Duration::from_secs(90);
const PULL_REQUEST_LIMIT: u32 = 100;
const COMMENT_LIMIT: u32 = 1000;

/// 경로 세그먼트 인코딩 집합(RFC 3986 unreserved 문자는 유지).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// 하나의 project/repo에 묶인 Stash 클라이언트.
pub struct StashClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    project_key: String,
    repository: String,
}

impl StashClient {
    pub fn new(
        base_url: &str,
        username: String,
        password: String,
        project_key: String,
        repository: String,
    ) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid stash url: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("unsupported stash url scheme: {}", parsed.scheme());
        }
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed to build stash HTTP client")?;
        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            username,
            password,
            project_key,
            repository,
        })
    }

    fn api_base(&self) -> String {
        format!("{}/rest/api/1.0", self.base_url)
    }

    fn repo_endpoint(&self) -> String {
        format!(
            "{}/projects/{}/repos/{}",
            self.api_base(),
            encode_segment(&self.project_key),
            encode_segment(&self.repository)
        )
    }

    fn pull_request_endpoint(&self, pull_request_id: u64) -> String {
        format!("{}/pull-requests/{pull_request_id}", self.repo_endpoint())
    }

    fn comment_endpoint(&self, pull_request_id: u64, comment_id: u64) -> String {
        format!(
            "{}/comments/{comment_id}",
            self.pull_request_endpoint(pull_request_id)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        // 공통 헤더/인증 적용.
        self.client
            .request(method, url)
            .header("Accept", "application/json")
            .basic_auth(&self.username, Some(&self.password))
    }

    /// 요청을 보내고 본문 문자열을 돌려준다.
    ///
    /// 409는 `Conflict`, 그 밖의 4xx/5xx는 `Transport`, 본문 읽기 중단은 `OversizedResponse`.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> SyncResult<String> {
        debug!(method = %method, url, "stash request");
        let response = request.send().await.map_err(|err| SyncError::Network {
            method: method.to_string(),
            url: url.to_string(),
            message: err.to_string(),
        })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) if err.is_body() || err.is_decode() => {
                return Err(SyncError::OversizedResponse(format!(
                    "{method} {url}: response body was cut off: {err}"
                )));
            }
            Err(err) => {
                return Err(SyncError::Network {
                    method: method.to_string(),
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
        };

        if status == StatusCode::CONFLICT {
            return Err(SyncError::Conflict(format!(
                "{method} {url} was rejected: {}",
                body.trim()
            )));
        }

        if !status.is_success() {
            let kind = if status.is_server_error() { "server" } else { "client" };
            error!(
                method = %method,
                url,
                status = status.as_u16(),
                kind,
                body = %body,
                "error integrating with stash"
            );
            return Err(SyncError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// 조회 요청. 빈 본문은 빈 payload로 취급하고, 본문이 있으면 JSON이어야 한다.
    async fn fetch<T>(&self, url: &str, query: &[(&str, String)]) -> SyncResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.request(Method::GET, url).query(query);
        let body = self.execute(Method::GET, url, request).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&body).map_err(|err| SyncError::MalformedResponse {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }

    /// 쓰기 요청. 빈 본문은 성공이며, 본문이 있으면 JSON이어야 한다.
    async fn submit(&self, method: Method, url: &str, request: RequestBuilder) -> SyncResult<()> {
        let body = self.execute(method, url, request).await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        serde_json::from_str::<Value>(&body)
            .map(|_| ())
            .map_err(|err| SyncError::MalformedResponse {
                url: url.to_string(),
                reason: err.to_string(),
            })
    }
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// 파일 경로는 `/` 구분을 유지한 채 세그먼트별로 인코딩한다.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl StashGateway for StashClient {
    fn identity(&self) -> &str {
        &self.username
    }

    async fn list_open_pull_requests(&self, branch_ref: &str) -> SyncResult<Vec<PullRequest>> {
        let url = format!("{}/pull-requests", self.repo_endpoint());
        let page: Page<PullRequestDto> = self
            .fetch(
                &url,
                &[
                    ("state", "OPEN".to_string()),
                    ("at", branch_ref.to_string()),
                    ("direction", "OUTGOING".to_string()),
                    ("limit", PULL_REQUEST_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(page.values.into_iter().map(PullRequest::from).collect())
    }

    async fn fetch_diff(
        &self,
        pull_request_id: u64,
        context_lines: u32,
        path: Option<&str>,
    ) -> SyncResult<Diff> {
        let mut url = format!("{}/diff", self.pull_request_endpoint(pull_request_id));
        if let Some(path) = path {
            url.push('/');
            url.push_str(&encode_path(path));
        }
        let dto: DiffDto = self
            .fetch(
                &url,
                &[
                    ("contextLines", context_lines.to_string()),
                    ("withComments", "false".to_string()),
                ],
            )
            .await?;
        Ok(Diff::from(dto))
    }

    async fn list_comments(
        &self,
        pull_request_id: u64,
        path: &str,
    ) -> SyncResult<Vec<RemoteComment>> {
        let url = format!("{}/comments", self.pull_request_endpoint(pull_request_id));
        let page: Page<CommentDto> = self
            .fetch(
                &url,
                &[
                    ("path", path.to_string()),
                    ("limit", COMMENT_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(page.values.into_iter().map(RemoteComment::from).collect())
    }

    async fn add_comment(
        &self,
        pull_request_id: u64,
        path: &str,
        line: u32,
        text: &str,
    ) -> SyncResult<()> {
        let url = format!("{}/comments", self.pull_request_endpoint(pull_request_id));
        let request = self.request(Method::POST, &url).json(&json!({
            "text": text,
            "anchor": {
                "line": line,
                "lineType": "ADDED",
                "fileType": "TO",
                "path": path,
                "srcPath": path,
            }
        }));
        self.submit(Method::POST, &url, request).await
    }

    async fn update_comment(
        &self,
        pull_request_id: u64,
        comment_id: u64,
        version: u32,
        text: &str,
    ) -> SyncResult<()> {
        let url = self.comment_endpoint(pull_request_id, comment_id);
        let request = self
            .request(Method::PUT, &url)
            .json(&json!({ "version": version, "text": text }));
        self.submit(Method::PUT, &url, request).await
    }

    async fn delete_comment(
        &self,
        pull_request_id: u64,
        comment_id: u64,
        version: u32,
    ) -> SyncResult<()> {
        let url = self.comment_endpoint(pull_request_id, comment_id);
        let request = self
            .request(Method::DELETE, &url)
            .query(&[("version", version.to_string())]);
        self.submit(Method::DELETE, &url, request).await
    }

    async fn list_activities(&self, pull_request_id: u64) -> SyncResult<Vec<Activity>> {
        let url = format!("{}/activities", self.pull_request_endpoint(pull_request_id));
        let page: Page<ActivityDto> = self
            .fetch(&url, &[("limit", COMMENT_LIMIT.to_string())])
            .await?;
        Ok(page.values.into_iter().map(Activity::from).collect())
    }

    async fn add_reviewer(&self, pull_request_id: u64) -> SyncResult<()> {
        let url = format!("{}/participants", self.pull_request_endpoint(pull_request_id));
        let request = self.request(Method::POST, &url).json(&json!({
            "user": { "name": self.username },
            "role": "REVIEWER",
        }));
        self.submit(Method::POST, &url, request).await
    }

    async fn approve(&self, pull_request_id: u64) -> SyncResult<()> {
        let url = format!("{}/approve", self.pull_request_endpoint(pull_request_id));
        let request = self.request(Method::POST, &url);
        self.submit(Method::POST, &url, request).await
    }

    async fn unapprove(&self, pull_request_id: u64) -> SyncResult<()> {
        let url = format!("{}/approve", self.pull_request_endpoint(pull_request_id));
        let request = self.request(Method::DELETE, &url);
        self.submit(Method::DELETE, &url, request).await
    }
}
