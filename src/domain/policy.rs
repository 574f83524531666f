//! 도메인 정책(코멘트 생성/비교 규칙, 취소선 처리, 줄 구간 표기).

use std::collections::{BTreeMap, BTreeSet};

use super::pull_request::RemoteComment;

/// 체커가 보고한 오류 하나. 같은 줄에 여러 개가 올 수 있다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub line: u32,
    pub message: String,
}

impl CheckError {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// destination 줄 번호 → 게시할 코멘트 본문.
pub type DesiredComments = BTreeMap<u32, String>;

/// 영향받은 줄의 오류만 남기고, 줄별 메시지를 중복 제거 후 개행으로 합친다.
pub fn build_desired_comments(errors: &[CheckError], affected: &BTreeSet<u32>) -> DesiredComments {
    let mut per_line: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for error in errors {
        if !affected.contains(&error.line) {
            continue;
        }
        let message = error.message.trim();
        if message.is_empty() {
            continue;
        }
        let messages = per_line.entry(error.line).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    per_line
        .into_iter()
        .map(|(line, messages)| (line, messages.join("\n")))
        .collect()
}

/// 앞뒤 공백을 무시하고 본문이 같은지 비교한다.
pub fn texts_match(existing: &str, desired: &str) -> bool {
    existing.trim() == desired.trim()
}

/// 공백이 아닌 모든 줄을 markdown 취소선(`~~`)으로 감싼다.
pub fn strike_through(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || is_struck_line(trimmed) {
                trimmed.to_string()
            } else {
                format!("~~{trimmed}~~")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_struck_through(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .all(is_struck_line)
}

fn is_struck_line(line: &str) -> bool {
    line.len() > 4 && line.starts_with("~~") && line.ends_with("~~")
}

/// 더 이상 유효하지 않은 로봇 코멘트 처리 방식.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleCommentAction {
    Delete,
    /// 답글 스레드를 보존하기 위해 본문만 취소선으로 바꾼다.
    StrikeThrough(String),
    Keep,
}

pub fn stale_comment_action(comment: &RemoteComment) -> StaleCommentAction {
    if !comment.has_replies {
        return StaleCommentAction::Delete;
    }
    if is_struck_through(&comment.text) {
        StaleCommentAction::Keep
    } else {
        StaleCommentAction::StrikeThrough(strike_through(&comment.text))
    }
}

/// 줄 번호 집합을 `1-4,10,11` 형태로 표기한다.
/// 길이 1 구간은 숫자 하나, 길이 2 구간은 숫자 두 개, 3 이상은 `first-last`.
pub fn human_readable_intervals<I>(numbers: I) -> String
where
    I: IntoIterator<Item = u32>,
{
    let sorted: BTreeSet<u32> = numbers.into_iter().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut run: Option<(u32, u32)> = None;

    for n in sorted {
        run = match run {
            Some((first, last)) if last + 1 == n => Some((first, n)),
            Some((first, last)) => {
                push_run(&mut tokens, first, last);
                Some((n, n))
            }
            None => Some((n, n)),
        };
    }
    if let Some((first, last)) = run {
        push_run(&mut tokens, first, last);
    }

    tokens.join(",")
}

fn push_run(tokens: &mut Vec<String>, first: u32, last: u32) {
    match last - first {
        0 => tokens.push(first.to_string()),
        1 => {
            tokens.push(first.to_string());
            tokens.push(last.to_string());
        }
        _ => tokens.push(format!("{first}-{last}")),
    }
}
