//! 题目内容渲染
//!
//! `render_content` 按内容类型生成 `Presentation`（与输出介质无关），
//! `Presentation::to_text` 再把它排版为终端文本。
//! 公式与代码原样输出，只标注类型与语言。

use crate::models::{Content, Question, TableData};
use crate::services::math_text::{parse_math_text, MathSegment};

/// 代码块未指定语言时使用的语言
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// 一道题目的展示结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    General {
        question: String,
        answer: String,
    },
    Table(TableData),
    Equation(String),
    MathProblem {
        problem: Vec<MathSegment>,
        solution: Option<Vec<MathSegment>>,
    },
    Programming {
        question: String,
        answer: String,
        code: Option<CodeBlock>,
    },
}

/// 生成题目的展示结构
///
/// # 返回
/// 缺少该类型必需的数据或类型未知时返回 `None`（不渲染，也不报错）
pub fn render_content(question: &Question) -> Option<Presentation> {
    match &question.content {
        Content::Text => (!question.question.is_empty()).then(|| Presentation::General {
            question: question.question.clone(),
            answer: question.answer.clone(),
        }),
        Content::Table(table) => table.clone().map(Presentation::Table),
        Content::Equation(equation) => equation
            .as_deref()
            .filter(|eq| !eq.is_empty())
            .map(|eq| Presentation::Equation(eq.to_string())),
        Content::MathProblem { problem } => {
            let problem = problem
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or(&question.question);
            let solution =
                (!question.answer.is_empty()).then(|| parse_math_text(&question.answer));
            Some(Presentation::MathProblem {
                problem: parse_math_text(problem),
                solution,
            })
        }
        Content::Programming { language, code } => Some(Presentation::Programming {
            question: question.question.clone(),
            answer: question.answer.clone(),
            code: code.as_deref().filter(|c| !c.is_empty()).map(|c| CodeBlock {
                language: language
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string()),
                code: c.to_string(),
            }),
        }),
        Content::Unsupported { .. } => None,
    }
}

/// 按换行拆分答案文本，空行保留为空字符串
pub fn format_text_with_breaks(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

impl Presentation {
    /// 排版为终端文本
    ///
    /// # 参数
    /// - `width`: 分隔线长度与公式居中的宽度
    pub fn to_text(&self, width: usize) -> String {
        let mut lines: Vec<String> = Vec::new();

        match self {
            Presentation::General { question, answer } => {
                lines.push(format!("Q. {}", question));
                push_section(&mut lines, "Answer", answer, width);
            }
            Presentation::Table(table) => lines.extend(render_table(table)),
            Presentation::Equation(equation) => {
                lines.extend(equation.lines().map(|line| center(line, width)));
            }
            Presentation::MathProblem { problem, solution } => {
                let mut problem_lines = render_math(problem).into_iter();
                let first = problem_lines.next().unwrap_or_default();
                lines.push(format!("Q. {}", first));
                lines.extend(problem_lines);

                if let Some(solution) = solution {
                    lines.push(rule(width));
                    lines.push("Solution".to_string());
                    lines.extend(render_math(solution));
                }
            }
            Presentation::Programming {
                question,
                answer,
                code,
            } => {
                lines.push(format!("Q. {}", question));
                push_section(&mut lines, "Answer", answer, width);
                if let Some(block) = code {
                    lines.push(format!("```{}", block.language));
                    lines.extend(block.code.lines().map(str::to_string));
                    lines.push("```".to_string());
                }
            }
        }

        lines.join("\n")
    }
}

fn rule(width: usize) -> String {
    "─".repeat(width)
}

fn push_section(lines: &mut Vec<String>, title: &str, body: &str, width: usize) {
    lines.push(rule(width));
    lines.push(title.to_string());
    lines.extend(format_text_with_breaks(body));
}

fn center(line: &str, width: usize) -> String {
    let len = line.chars().count();
    if len >= width {
        return line.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), line)
}

/// 行内公式写作 `\(x\)`，块级公式独占一行写作 `\[y\]`
fn render_math(segments: &[MathSegment]) -> Vec<String> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            MathSegment::Text(text) => out.push_str(text),
            MathSegment::Inline(math) => {
                out.push_str("\\(");
                out.push_str(math);
                out.push_str("\\)");
            }
            MathSegment::Block(math) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("\\[");
                out.push_str(math);
                out.push_str("\\]\n");
            }
        }
    }

    out.trim_end_matches('\n')
        .split('\n')
        .map(|line| line.trim_end().to_string())
        .collect()
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// 网格表格；短行补空单元格，长行保留多出的列
fn render_table(table: &TableData) -> Vec<String> {
    let columns = table.column_count();
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&table.headers).chain(&table.rows) {
        for (idx, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(cell(row.as_slice(), idx).chars().count());
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let format_row = |row: &[String]| {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(idx, w)| {
                let value = cell(row, idx);
                let pad = w - value.chars().count();
                format!(" {}{} ", value, " ".repeat(pad))
            })
            .collect();
        format!("|{}|", cells.join("|"))
    };

    let mut lines = vec![
        border.clone(),
        format_row(table.headers.as_slice()),
        border.clone(),
    ];
    lines.extend(table.rows.iter().map(|row| format_row(row.as_slice())));
    lines.push(border);
    lines
}
