//! 数学文本解析
//!
//! 把包含 `$...$`（行内）和 `$$...$$`（块级）公式的文本切分为有序片段，
//! 公式内容原样保留，交给渲染层处理

use regex::Regex;
use std::sync::LazyLock;

/// 块级优先，非贪婪，不跨行
static MATH_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$.*?\$\$|\$.*?\$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathSegment {
    Text(String),
    Inline(String),
    Block(String),
}

impl MathSegment {
    pub fn content(&self) -> &str {
        match self {
            MathSegment::Text(s) | MathSegment::Inline(s) | MathSegment::Block(s) => s,
        }
    }

    pub fn is_math(&self) -> bool {
        !matches!(self, MathSegment::Text(_))
    }
}

/// 解析数学文本，保持片段原有顺序；空的普通文本片段会被丢弃
pub fn parse_math_text(text: &str) -> Vec<MathSegment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for span in MATH_SPAN.find_iter(text) {
        push_text(&mut segments, &text[last..span.start()]);
        segments.push(classify_span(span.as_str()));
        last = span.end();
    }
    push_text(&mut segments, &text[last..]);

    segments
}

fn push_text(segments: &mut Vec<MathSegment>, piece: &str) {
    if !piece.is_empty() {
        segments.push(MathSegment::Text(piece.to_string()));
    }
}

/// `span` 一定以 `$` 开头和结尾
fn classify_span(span: &str) -> MathSegment {
    if span.starts_with("$$") && span.ends_with("$$") {
        let inner = span.get(2..span.len().saturating_sub(2)).unwrap_or_default();
        MathSegment::Block(inner.to_string())
    } else {
        let inner = span.get(1..span.len().saturating_sub(1)).unwrap_or_default();
        MathSegment::Inline(inner.to_string())
    }
}
