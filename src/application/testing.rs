//! 유스케이스 테스트용 인메모리 게이트웨이/체커.
//! 쓰기 호출을 기록하고, 서버처럼 코멘트 저장소와 version을 갱신한다.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{CodeChecker, StashGateway};
use crate::domain::diff::Diff;
use crate::domain::error::{SyncError, SyncResult};
use crate::domain::policy::CheckError;
use crate::domain::pull_request::{Activity, CommentAnchor, PullRequest, RemoteComment};

pub const BOT: &str = "lint-bot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddReviewer(u64),
    AddComment { line: u32, path: String, text: String },
    UpdateComment { id: u64, text: String },
    DeleteComment { id: u64 },
    Approve(u64),
    Unapprove(u64),
}

impl Call {
    pub fn is_comment_write(&self) -> bool {
        matches!(
            self,
            Call::AddComment { .. } | Call::UpdateComment { .. } | Call::DeleteComment { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum ContentStub {
    Text(String),
    Conflict,
    Oversized,
}

#[derive(Default)]
struct Store {
    comments: HashMap<(u64, String), Vec<RemoteComment>>,
    activities: HashMap<u64, Vec<Activity>>,
    calls: Vec<Call>,
    next_id: u64,
}

pub struct FakeGateway {
    pull_requests: Vec<PullRequest>,
    diffs: HashMap<u64, Diff>,
    contents: HashMap<String, ContentStub>,
    failing_diffs: HashSet<u64>,
    /// 쓰기가 항상 version 충돌로 실패하는 코멘트 id
    conflicting_comments: HashSet<u64>,
    conflicting_approval: bool,
    store: Mutex<Store>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            pull_requests: Vec::new(),
            diffs: HashMap::new(),
            contents: HashMap::new(),
            failing_diffs: HashSet::new(),
            conflicting_comments: HashSet::new(),
            conflicting_approval: false,
            store: Mutex::new(Store {
                next_id: 1000,
                ..Store::default()
            }),
        }
    }

    pub fn with_pull_request(mut self, id: u64, author: &str, diff: Diff) -> Self {
        self.pull_requests.push(PullRequest {
            id,
            author: author.to_string(),
            reviewers: Vec::new(),
            from_commit: Some("from".into()),
            to_commit: Some("to".into()),
        });
        self.diffs.insert(id, diff);
        self
    }

    pub fn with_content(mut self, path: &str, content: ContentStub) -> Self {
        self.contents.insert(path.to_string(), content);
        self
    }

    pub fn with_failing_diff(mut self, pull_request_id: u64) -> Self {
        self.failing_diffs.insert(pull_request_id);
        self
    }

    /// 다른 쓰기 주체가 먼저 고친 것처럼 해당 코멘트 쓰기를 충돌시킨다.
    pub fn with_conflicting_comment(mut self, comment_id: u64) -> Self {
        self.conflicting_comments.insert(comment_id);
        self
    }

    pub fn with_conflicting_approval(mut self) -> Self {
        self.conflicting_approval = true;
        self
    }

    fn comment_conflict(&self, comment_id: u64) -> SyncResult<()> {
        if self.conflicting_comments.contains(&comment_id) {
            return Err(SyncError::Conflict(format!(
                "comment {comment_id} was modified concurrently"
            )));
        }
        Ok(())
    }

    fn approval_conflict(&self, pull_request_id: u64) -> SyncResult<()> {
        if self.conflicting_approval {
            return Err(SyncError::Conflict(format!(
                "pull request {pull_request_id} was updated concurrently"
            )));
        }
        Ok(())
    }

    pub fn with_comment(self, pull_request_id: u64, path: &str, comment: RemoteComment) -> Self {
        self.store
            .lock()
            .unwrap()
            .comments
            .entry((pull_request_id, path.to_string()))
            .or_default()
            .push(comment);
        self
    }

    pub fn with_activity(self, pull_request_id: u64, activity: Activity) -> Self {
        self.store
            .lock()
            .unwrap()
            .activities
            .entry(pull_request_id)
            .or_default()
            .push(activity);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.store.lock().unwrap().calls.clear();
    }

    pub fn comments(&self, pull_request_id: u64, path: &str) -> Vec<RemoteComment> {
        self.store
            .lock()
            .unwrap()
            .comments
            .get(&(pull_request_id, path.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.store.lock().unwrap().calls.push(call);
    }

    fn find_comment<'a>(
        comments: &'a mut HashMap<(u64, String), Vec<RemoteComment>>,
        pull_request_id: u64,
        comment_id: u64,
    ) -> Option<(&'a mut Vec<RemoteComment>, usize)> {
        comments
            .iter_mut()
            .filter(|((pr, _), _)| *pr == pull_request_id)
            .find_map(|(_, list)| {
                let idx = list.iter().position(|c| c.id == comment_id)?;
                Some((list, idx))
            })
    }
}

pub fn robot_comment(
    id: u64,
    line: u32,
    path: &str,
    text: &str,
    has_replies: bool,
) -> RemoteComment {
    comment_by(BOT, id, line, path, text, has_replies)
}

pub fn comment_by(
    author: &str,
    id: u64,
    line: u32,
    path: &str,
    text: &str,
    has_replies: bool,
) -> RemoteComment {
    RemoteComment {
        id,
        version: 1,
        author: author.to_string(),
        anchor: Some(CommentAnchor {
            line: Some(line),
            path: Some(path.to_string()),
            orphaned: false,
        }),
        text: text.to_string(),
        has_replies,
    }
}

#[async_trait]
impl StashGateway for FakeGateway {
    fn identity(&self) -> &str {
        BOT
    }

    async fn list_open_pull_requests(&self, _branch_ref: &str) -> SyncResult<Vec<PullRequest>> {
        Ok(self.pull_requests.clone())
    }

    async fn fetch_diff(
        &self,
        pull_request_id: u64,
        _context_lines: u32,
        _path: Option<&str>,
    ) -> SyncResult<Diff> {
        if self.failing_diffs.contains(&pull_request_id) {
            return Err(SyncError::Transport {
                method: "GET".into(),
                url: format!("pull-requests/{pull_request_id}/diff"),
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(self.diffs.get(&pull_request_id).cloned().unwrap_or_default())
    }

    async fn fetch_file_content(&self, _pull_request_id: u64, path: &str) -> SyncResult<String> {
        match self.contents.get(path) {
            Some(ContentStub::Text(text)) => Ok(text.clone()),
            Some(ContentStub::Conflict) => Err(SyncError::Conflict(format!("{path} in conflict"))),
            Some(ContentStub::Oversized) => {
                Err(SyncError::OversizedResponse(format!("{path} too large")))
            }
            None => Ok(String::new()),
        }
    }

    async fn list_comments(
        &self,
        pull_request_id: u64,
        path: &str,
    ) -> SyncResult<Vec<RemoteComment>> {
        Ok(self.comments(pull_request_id, path))
    }

    async fn add_comment(
        &self,
        pull_request_id: u64,
        path: &str,
        line: u32,
        text: &str,
    ) -> SyncResult<()> {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id;
        store
            .comments
            .entry((pull_request_id, path.to_string()))
            .or_default()
            .push(robot_comment(id, line, path, text, false));
        store.calls.push(Call::AddComment {
            line,
            path: path.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn update_comment(
        &self,
        pull_request_id: u64,
        comment_id: u64,
        version: u32,
        text: &str,
    ) -> SyncResult<()> {
        self.comment_conflict(comment_id)?;
        let mut store = self.store.lock().unwrap();
        let Some((list, idx)) = Self::find_comment(&mut store.comments, pull_request_id, comment_id)
        else {
            return Err(SyncError::Transport {
                method: "PUT".into(),
                url: format!("comments/{comment_id}"),
                status: 404,
                body: String::new(),
            });
        };
        if list[idx].version != version {
            return Err(SyncError::Conflict(format!("comment {comment_id} is stale")));
        }
        list[idx].text = text.to_string();
        list[idx].version += 1;
        store.calls.push(Call::UpdateComment {
            id: comment_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_comment(
        &self,
        pull_request_id: u64,
        comment_id: u64,
        version: u32,
    ) -> SyncResult<()> {
        self.comment_conflict(comment_id)?;
        let mut store = self.store.lock().unwrap();
        let found = Self::find_comment(&mut store.comments, pull_request_id, comment_id);
        if let Some((list, idx)) = found {
            if list[idx].version != version {
                return Err(SyncError::Conflict(format!("comment {comment_id} is stale")));
            }
            list.remove(idx);
        }
        store.calls.push(Call::DeleteComment { id: comment_id });
        Ok(())
    }

    async fn list_activities(&self, pull_request_id: u64) -> SyncResult<Vec<Activity>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .activities
            .get(&pull_request_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_reviewer(&self, pull_request_id: u64) -> SyncResult<()> {
        self.record(Call::AddReviewer(pull_request_id));
        Ok(())
    }

    async fn approve(&self, pull_request_id: u64) -> SyncResult<()> {
        self.approval_conflict(pull_request_id)?;
        self.record(Call::Approve(pull_request_id));
        Ok(())
    }

    async fn unapprove(&self, pull_request_id: u64) -> SyncResult<()> {
        self.approval_conflict(pull_request_id)?;
        self.record(Call::Unapprove(pull_request_id));
        Ok(())
    }
}

/// 미리 정한 (경로, 오류 목록)을 돌려주는 체커. 호출된 경로를 기록한다.
pub struct FakeChecker {
    errors: HashMap<String, Vec<CheckError>>,
    ignored: BTreeSet<String>,
    checked: Mutex<Vec<String>>,
}

impl FakeChecker {
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
            ignored: BTreeSet::new(),
            checked: Mutex::new(Vec::new()),
        }
    }

    pub fn with_errors(mut self, path: &str, errors: Vec<CheckError>) -> Self {
        self.errors.insert(path.to_string(), errors);
        self
    }

    pub fn ignoring(mut self, path: &str) -> Self {
        self.ignored.insert(path.to_string());
        self
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeChecker for FakeChecker {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn should_ignore(&self, path: &str, _extension: &str) -> bool {
        self.ignored.contains(path)
    }

    async fn check(
        &self,
        path: &str,
        _extension: &str,
        _content: &str,
    ) -> SyncResult<Vec<CheckError>> {
        self.checked.lock().unwrap().push(path.to_string());
        Ok(self.errors.get(path).cloned().unwrap_or_default())
    }
}
