//! PR diff 모델과 분석 규칙.
//!
//! - `affected_lines`: 사람이 실제로 추가/수정한 destination 줄 번호 집합
//! - `reconstruct_content`: 전체 context diff에서 destination 파일 내용을 복원

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::error::{SyncError, SyncResult};

/// 코멘트 대상 줄 계산용 diff의 context 줄 수.
pub const ZERO_CONTEXT_LINES: u32 = 0;
/// 파일 전체 복원용 diff의 context 줄 수.
pub const FULL_CONTEXT_LINES: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType {
    Context,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 순수 삭제 줄은 `None`
    pub destination: Option<u32>,
    pub text: String,
    pub conflict_marker: bool,
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub kind: SegmentType,
    pub lines: Vec<Line>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Hunk {
    pub segments: Vec<Segment>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FileDiff {
    pub source: Option<String>,
    /// 삭제된 파일이면 `None`
    pub destination: Option<String>,
    pub extension: Option<String>,
    pub hunks: Vec<Hunk>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Diff {
    pub files: Vec<FileDiff>,
    pub truncated: bool,
}

impl Diff {
    pub fn file(&self, path: &str) -> Option<&FileDiff> {
        self.files
            .iter()
            .find(|f| f.destination.as_deref() == Some(path))
    }
}

impl FileDiff {
    /// 로그 표시용 경로(삭제된 파일은 source 경로).
    pub fn display_path(&self) -> &str {
        self.destination
            .as_deref()
            .or(self.source.as_deref())
            .unwrap_or("<unknown>")
    }

    /// 서버가 준 확장자가 없으면 destination 경로에서 추출한다.
    pub fn extension(&self) -> String {
        if let Some(ext) = self.extension.as_deref().filter(|e| !e.is_empty()) {
            return ext.to_string();
        }
        self.destination
            .as_deref()
            .and_then(|p| Path::new(p).extension())
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// CONTEXT/REMOVED 세그먼트를 제외한 줄의 destination 번호 집합.
    pub fn affected_lines(&self) -> BTreeSet<u32> {
        self.hunks
            .iter()
            .flat_map(|h| &h.segments)
            .filter(|s| !matches!(s.kind, SegmentType::Context | SegmentType::Removed))
            .flat_map(|s| &s.lines)
            .filter_map(|l| l.destination)
            .collect()
    }

    fn is_truncated(&self) -> bool {
        self.truncated
            || self
                .hunks
                .iter()
                .any(|h| h.truncated || h.segments.iter().any(|s| s.truncated))
    }

    /// destination 줄을 번호 순으로 이어 붙여 파일 내용을 복원한다.
    ///
    /// 충돌 마커가 하나라도 있으면 `Conflict`, 잘린 응답이거나 줄 번호에 빈 구간이
    /// 있으면 `OversizedResponse`로 실패한다.
    pub fn reconstruct_content(&self) -> SyncResult<String> {
        let path = self.display_path();

        if let Some(line) = self
            .hunks
            .iter()
            .flat_map(|h| &h.segments)
            .flat_map(|s| &s.lines)
            .find(|l| l.conflict_marker)
        {
            return Err(SyncError::Conflict(format!(
                "{path} has a merge conflict marker near line {}; resolve it before checking",
                line.destination.map_or_else(|| "?".to_string(), |n| n.to_string())
            )));
        }

        if self.is_truncated() {
            return Err(SyncError::OversizedResponse(format!(
                "diff for {path} was truncated by the server"
            )));
        }

        let mut lines: BTreeMap<u32, &str> = BTreeMap::new();
        for segment in self.hunks.iter().flat_map(|h| &h.segments) {
            if segment.kind == SegmentType::Removed {
                continue;
            }
            for line in &segment.lines {
                if let Some(destination) = line.destination {
                    lines.insert(destination, &line.text);
                }
            }
        }

        let mut expected = 1;
        for number in lines.keys() {
            if *number != expected {
                return Err(SyncError::OversizedResponse(format!(
                    "content of {path} is incomplete: destination line {expected} is missing"
                )));
            }
            expected += 1;
        }

        if lines.is_empty() {
            return Ok(String::new());
        }

        let mut content = lines.into_values().collect::<Vec<_>>().join("\n");
        content.push('\n');
        Ok(content)
    }
}
