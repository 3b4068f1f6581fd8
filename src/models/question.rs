use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 题目内容类型（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Table,
    Equation,
    MathProblem,
    Programming,
}

impl ContentType {
    /// 全部内容类型，按筛选下拉框的顺序排列
    pub const ALL: [ContentType; 5] = [
        ContentType::Text,
        ContentType::Table,
        ContentType::Equation,
        ContentType::MathProblem,
        ContentType::Programming,
    ];

    /// 数据文件中使用的名称
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Table => "table",
            ContentType::Equation => "equation",
            ContentType::MathProblem => "math_problem",
            ContentType::Programming => "programming",
        }
    }

    /// 筛选选项的显示名称
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Text => "Text Only",
            ContentType::Table => "Tables",
            ContentType::Equation => "Equations",
            ContentType::MathProblem => "Math Problems",
            ContentType::Programming => "Programming",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 无法识别的内容类型名称
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("未知内容类型: '{0}' (可选: text, table, equation, math_problem, programming)")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

/// 表格数据
///
/// 每行长度应与 `headers` 一致，但不做强制校验
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// 表格列数：表头与最长行中的较大者
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// 行长度与表头不一致的行号
    pub fn ragged_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != self.headers.len())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// 题目内容
///
/// 每个变体只携带与其类型相关的字段；字段缺失时对应部分不渲染
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text,
    Table(Option<TableData>),
    Equation(Option<String>),
    MathProblem {
        problem: Option<String>,
    },
    Programming {
        language: Option<String>,
        code: Option<String>,
    },
    /// 数据文件中出现了未知的 `content_type`，渲染为空
    Unsupported {
        kind: String,
    },
}

impl Content {
    /// 对应的内容类型，未知类型返回 `None`
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            Content::Text => Some(ContentType::Text),
            Content::Table(_) => Some(ContentType::Table),
            Content::Equation(_) => Some(ContentType::Equation),
            Content::MathProblem { .. } => Some(ContentType::MathProblem),
            Content::Programming { .. } => Some(ContentType::Programming),
            Content::Unsupported { .. } => None,
        }
    }

    /// 数据文件中的类型名称
    pub fn kind_name(&self) -> &str {
        match self {
            Content::Unsupported { kind } => kind,
            other => other
                .content_type()
                .map(ContentType::as_str)
                .unwrap_or_default(),
        }
    }
}

/// 单个题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    /// 组内唯一编号
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub content: Content,
}

impl Question {
    pub fn new(id: i64, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            content: Content::Text,
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.content.content_type()
    }
}

/// 数据文件中的扁平题目记录
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionRecord {
    id: i64,
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
    content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_data: Option<TableData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    equation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    problem: Option<String>,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let content = match record.content_type.parse::<ContentType>() {
            Ok(ContentType::Text) => Content::Text,
            Ok(ContentType::Table) => Content::Table(record.table_data),
            Ok(ContentType::Equation) => Content::Equation(record.equation),
            Ok(ContentType::MathProblem) => Content::MathProblem {
                problem: record.problem,
            },
            Ok(ContentType::Programming) => Content::Programming {
                language: record.language,
                code: record.code,
            },
            Err(_) => Content::Unsupported {
                kind: record.content_type,
            },
        };

        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
            content,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let mut record = QuestionRecord {
            id: question.id,
            question: question.question,
            answer: question.answer,
            content_type: question.content.kind_name().to_string(),
            table_data: None,
            equation: None,
            language: None,
            code: None,
            problem: None,
        };

        match question.content {
            Content::Text | Content::Unsupported { .. } => {}
            Content::Table(table_data) => record.table_data = table_data,
            Content::Equation(equation) => record.equation = equation,
            Content::MathProblem { problem } => record.problem = problem,
            Content::Programming { language, code } => {
                record.language = language;
                record.code = code;
            }
        }

        record
    }
}

/// 题组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroup {
    /// 题组名称，章节内唯一
    pub question_group: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// 章节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_no: i64,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<QuestionGroup>,
}
