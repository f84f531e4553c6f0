//! 레이블 별칭 템플릿.
//!
//! `{{label}}`, `{{{label}}}`, `{{& label}}` 치환과 `{{! 주석 }}`만 지원하는
//! mustache 부분 집합. 섹션/부분 템플릿 태그나 시리즈에 없는 레이블은
//! 렌더 실패로 처리하여 호출자가 원래 이름으로 되돌아가게 한다.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// 템플릿 렌더 실패
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// 닫히지 않은 태그
    #[error("닫히지 않은 태그 (위치 {0})")]
    Unclosed(usize),

    /// `{{{`/`}}}` 짝이 맞지 않음
    #[error("중괄호 짝 불일치: {0}")]
    Mismatched(String),

    /// 이름이 빈 태그
    #[error("빈 태그 (위치 {0})")]
    EmptyTag(usize),

    /// 지원하지 않는 태그 (섹션, 부분 템플릿 등)
    #[error("지원하지 않는 태그: {0}")]
    Unsupported(String),

    /// 시리즈에 없는 레이블
    #[error("레이블 없음: {0}")]
    MissingLabel(String),

    /// 태그 패턴 컴파일 실패
    #[error("태그 패턴 에러: {0}")]
    Pattern(String),
}

fn tag_regex() -> Result<&'static Regex, TemplateError> {
    static TAG: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"\{\{(\{)?([^{}]*)(\})?\}\}"))
        .as_ref()
        .map_err(|e| TemplateError::Pattern(e.to_string()))
}

/// 리터럴 구간에 남은 여는 태그 검사
fn check_literal(literal: &str, offset: usize) -> Result<(), TemplateError> {
    match literal.find("{{") {
        Some(pos) => Err(TemplateError::Unclosed(offset + pos)),
        None => Ok(()),
    }
}

/// 템플릿을 레이블 맵으로 렌더링
pub fn render(template: &str, labels: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in tag_regex()?.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let literal = &template[last..whole.start()];
        check_literal(literal, last)?;
        out.push_str(literal);
        last = whole.end();

        if caps.get(1).is_some() != caps.get(3).is_some() {
            return Err(TemplateError::Mismatched(whole.as_str().to_string()));
        }

        let tag = caps.get(2).map_or("", |m| m.as_str()).trim();
        let name = match tag.chars().next() {
            None => return Err(TemplateError::EmptyTag(whole.start())),
            Some('!') => continue,
            Some('#' | '^' | '/' | '>' | '=') => {
                return Err(TemplateError::Unsupported(whole.as_str().to_string()))
            }
            Some('&') => tag[1..].trim(),
            Some(_) => tag,
        };
        if name.is_empty() {
            return Err(TemplateError::EmptyTag(whole.start()));
        }

        let value = labels
            .get(name)
            .ok_or_else(|| TemplateError::MissingLabel(name.to_string()))?;
        out.push_str(value);
    }

    let tail = &template[last..];
    check_literal(tail, last)?;
    out.push_str(tail);
    Ok(out)
}
