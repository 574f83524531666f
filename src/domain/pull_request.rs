//! Pull request, 코멘트, 활동(activity) 엔티티.
//! 원격 서버가 소유한 상태를 실행마다 새로 읽어 담는 읽기 전용 값들이다.

#[derive(Debug, Clone)]
pub struct PullRequest {
    pub id: u64,
    pub author: String,
    pub reviewers: Vec<String>,
    pub from_commit: Option<String>,
    pub to_commit: Option<String>,
}

impl PullRequest {
    /// 자신이 작성자도 리뷰어도 아니면 리뷰어로 추가해야 한다.
    pub fn needs_reviewer(&self, identity: &str) -> bool {
        self.author != identity && !self.reviewers.iter().any(|r| r == identity)
    }

    pub fn commit_range(&self) -> String {
        format!(
            "{}..{}",
            self.from_commit.as_deref().unwrap_or("?"),
            self.to_commit.as_deref().unwrap_or("?")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentAnchor {
    pub line: Option<u32>,
    pub path: Option<String>,
    pub orphaned: bool,
}

#[derive(Debug, Clone)]
pub struct RemoteComment {
    pub id: u64,
    /// 낙관적 동시성 토큰
    pub version: u32,
    pub author: String,
    pub anchor: Option<CommentAnchor>,
    pub text: String,
    pub has_replies: bool,
}

impl RemoteComment {
    pub fn is_authored_by(&self, identity: &str) -> bool {
        self.author == identity
    }

    pub fn line(&self) -> Option<u32> {
        self.anchor.as_ref().and_then(|a| a.line)
    }

    pub fn is_orphaned(&self) -> bool {
        self.anchor.as_ref().is_some_and(|a| a.orphaned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Added,
    Edited,
    Deleted,
    Other,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub id: u64,
    /// `COMMENTED`, `APPROVED`, `RESCOPED` 등 서버 값 그대로
    pub action: String,
    pub comment_action: Option<CommentAction>,
    pub comment: Option<RemoteComment>,
}

impl Activity {
    pub fn is_commented(&self) -> bool {
        self.action == "COMMENTED"
    }

    /// 코멘트 추가 활동이면 해당 코멘트를 돌려준다.
    pub fn added_comment(&self) -> Option<&RemoteComment> {
        if self.is_commented() && self.comment_action == Some(CommentAction::Added) {
            self.comment.as_ref()
        } else {
            None
        }
    }

    pub fn deleted_comment_id(&self) -> Option<u64> {
        if self.is_commented() && self.comment_action == Some(CommentAction::Deleted) {
            self.comment.as_ref().map(|c| c.id)
        } else {
            None
        }
    }
}
