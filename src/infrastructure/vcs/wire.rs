//! Stash REST 1.0 응답 JSON 구조와 도메인 모델 변환.

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::domain::diff::{Diff, FileDiff, Hunk, Line, Segment, SegmentType};
use crate::domain::pull_request::{
    Activity, CommentAction, CommentAnchor, PullRequest, RemoteComment,
};

#[derive(Debug, Deserialize)]
pub(super) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ParticipantDto {
    pub user: UserDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefDto {
    pub latest_commit: Option<String>,
    /// 구버전 서버 필드명
    pub latest_changeset: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PullRequestDto {
    pub id: u64,
    pub author: ParticipantDto,
    #[serde(default)]
    pub reviewers: Vec<ParticipantDto>,
    #[serde(default)]
    pub from_ref: RefDto,
    #[serde(default)]
    pub to_ref: RefDto,
}

impl From<PullRequestDto> for PullRequest {
    fn from(dto: PullRequestDto) -> Self {
        Self {
            id: dto.id,
            author: dto.author.user.name,
            reviewers: dto.reviewers.into_iter().map(|r| r.user.name).collect(),
            from_commit: dto.from_ref.latest_commit.or(dto.from_ref.latest_changeset),
            to_commit: dto.to_ref.latest_commit.or(dto.to_ref.latest_changeset),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AnchorDto {
    pub line: Option<u32>,
    pub path: Option<String>,
    #[serde(default)]
    pub orphaned: bool,
}

impl From<AnchorDto> for CommentAnchor {
    fn from(dto: AnchorDto) -> Self {
        Self {
            line: dto.line,
            path: dto.path,
            orphaned: dto.orphaned,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CommentDto {
    pub id: u64,
    pub version: u32,
    #[serde(default)]
    pub text: String,
    pub author: UserDto,
    pub anchor: Option<AnchorDto>,
    /// 답글 목록. 개수만 필요하다.
    #[serde(default)]
    pub comments: Vec<IgnoredAny>,
}

impl From<CommentDto> for RemoteComment {
    fn from(dto: CommentDto) -> Self {
        Self {
            id: dto.id,
            version: dto.version,
            author: dto.author.name,
            anchor: dto.anchor.map(CommentAnchor::from),
            text: dto.text,
            has_replies: !dto.comments.is_empty(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActivityDto {
    pub id: u64,
    pub action: String,
    pub comment_action: Option<String>,
    pub comment: Option<CommentDto>,
    pub comment_anchor: Option<AnchorDto>,
}

impl From<ActivityDto> for Activity {
    fn from(dto: ActivityDto) -> Self {
        let comment_anchor = dto.comment_anchor;
        let comment = dto.comment.map(|mut c| {
            // 활동의 앵커가 orphaned 여부를 담고 있으므로 우선한다.
            if let Some(anchor) = comment_anchor {
                c.anchor = Some(anchor);
            }
            RemoteComment::from(c)
        });
        Self {
            id: dto.id,
            action: dto.action,
            comment_action: dto.comment_action.as_deref().map(comment_action),
            comment,
        }
    }
}

fn comment_action(raw: &str) -> CommentAction {
    match raw {
        "ADDED" => CommentAction::Added,
        "EDITED" => CommentAction::Edited,
        "DELETED" => CommentAction::Deleted,
        _ => CommentAction::Other,
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DiffDto {
    #[serde(default)]
    pub diffs: Vec<FileDiffDto>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct PathDto {
    #[serde(rename = "toString")]
    pub path: String,
    pub extension: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileDiffDto {
    pub source: Option<PathDto>,
    pub destination: Option<PathDto>,
    #[serde(default)]
    pub hunks: Vec<HunkDto>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct HunkDto {
    #[serde(default)]
    pub segments: Vec<SegmentDto>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct SegmentDto {
    #[serde(rename = "type")]
    pub kind: SegmentTypeDto,
    #[serde(default)]
    pub lines: Vec<LineDto>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub(super) enum SegmentTypeDto {
    Context,
    Added,
    Removed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LineDto {
    pub destination: Option<u32>,
    #[serde(default)]
    pub line: String,
    /// MARKER/OURS/THEIRS 중 하나. 값이 있으면 충돌 영역이다.
    pub conflict_marker: Option<String>,
}

impl From<DiffDto> for Diff {
    fn from(dto: DiffDto) -> Self {
        Self {
            files: dto.diffs.into_iter().map(FileDiff::from).collect(),
            truncated: dto.truncated,
        }
    }
}

impl From<FileDiffDto> for FileDiff {
    fn from(dto: FileDiffDto) -> Self {
        let extension = dto
            .destination
            .as_ref()
            .and_then(|d| d.extension.clone());
        Self {
            source: dto.source.map(|s| s.path),
            destination: dto.destination.map(|d| d.path),
            extension,
            hunks: dto.hunks.into_iter().map(Hunk::from).collect(),
            truncated: dto.truncated,
        }
    }
}

impl From<HunkDto> for Hunk {
    fn from(dto: HunkDto) -> Self {
        Self {
            segments: dto.segments.into_iter().map(Segment::from).collect(),
            truncated: dto.truncated,
        }
    }
}

impl From<SegmentDto> for Segment {
    fn from(dto: SegmentDto) -> Self {
        let kind = match dto.kind {
            SegmentTypeDto::Context => SegmentType::Context,
            SegmentTypeDto::Added => SegmentType::Added,
            SegmentTypeDto::Removed => SegmentType::Removed,
        };
        let lines = dto
            .lines
            .into_iter()
            .map(|l| Line {
                // 삭제 줄의 destination은 삽입 위치일 뿐 실제 줄이 아니다.
                destination: if kind == SegmentType::Removed {
                    None
                } else {
                    l.destination
                },
                text: l.line,
                conflict_marker: l.conflict_marker.is_some(),
            })
            .collect();
        Self {
            kind,
            lines,
            truncated: dto.truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_json_maps_segments_and_drops_removed_destinations() {
        let raw = r#"{
            "fromHash": "a", "toHash": "b", "contextLines": 0,
            "diffs": [{
                "source": { "toString": "src/a.php", "extension": "php" },
                "destination": { "toString": "src/a.php", "extension": "php" },
                "hunks": [{
                    "sourceLine": 1, "destinationLine": 1,
                    "segments": [
                        { "type": "REMOVED", "lines": [{ "source": 2, "destination": 2, "line": "old" }] },
                        { "type": "ADDED", "lines": [{ "source": 2, "destination": 2, "line": "new", "conflictMarker": "OURS" }] }
                    ]
                }]
            }, {
                "source": { "toString": "gone.php" },
                "destination": null,
                "hunks": []
            }],
            "truncated": false
        }"#;

        let diff = Diff::from(serde_json::from_str::<DiffDto>(raw).unwrap());

        assert_eq!(diff.files.len(), 2);
        let file = &diff.files[0];
        assert_eq!(file.extension(), "php");
        let segments = &file.hunks[0].segments;
        assert_eq!(segments[0].lines[0].destination, None);
        assert_eq!(segments[1].lines[0].destination, Some(2));
        assert!(segments[1].lines[0].conflict_marker);
        assert_eq!(diff.files[1].destination, None);
        assert_eq!(diff.files[1].display_path(), "gone.php");
    }

    #[test]
    fn activity_prefers_comment_anchor_and_counts_replies() {
        let raw = r#"{
            "id": 77, "action": "COMMENTED", "commentAction": "ADDED",
            "comment": {
                "id": 5, "version": 3, "text": "Missing docblock",
                "author": { "name": "lint-bot" },
                "comments": [{ "id": 6, "text": "ok" }]
            },
            "commentAnchor": { "line": 12, "path": "src/a.php", "orphaned": true }
        }"#;

        let activity = Activity::from(serde_json::from_str::<ActivityDto>(raw).unwrap());
        let comment = activity.added_comment().unwrap();

        assert!(comment.is_orphaned());
        assert!(comment.has_replies);
        assert_eq!(comment.line(), Some(12));
        assert_eq!(comment.version, 3);
    }

    #[test]
    fn pull_request_falls_back_to_legacy_changeset_fields() {
        let raw = r#"{
            "id": 9,
            "author": { "user": { "name": "alice" }, "role": "AUTHOR" },
            "reviewers": [{ "user": { "name": "lint-bot" }, "approved": false }],
            "fromRef": { "latestChangeset": "abc" },
            "toRef": { "latestCommit": "def" }
        }"#;

        let pr = PullRequest::from(serde_json::from_str::<PullRequestDto>(raw).unwrap());

        assert_eq!(pr.commit_range(), "abc..def");
        assert!(!pr.needs_reviewer("lint-bot"));
    }
}
