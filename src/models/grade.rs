use serde::{Deserialize, Serialize};

/// `grade_index.json` 中的年级条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeData {
    pub id: u32,
    pub name: String,
}

/// 内置年级目录条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeInfo {
    pub id: u32,
    pub name: &'static str,
    pub subjects: &'static [&'static str],
}

/// 内置年级目录
pub const GRADE_CATALOG: [GradeInfo; 2] = [
    GradeInfo {
        id: 9,
        name: "Grade 9",
        subjects: &["Computer Science"],
    },
    GradeInfo {
        id: 10,
        name: "Grade 10",
        subjects: &["Computer Science"],
    },
];

impl GradeInfo {
    /// 根据路由参数查找年级
    pub fn find(grade_id: &str) -> Option<Self> {
        let id: u32 = grade_id.trim().parse().ok()?;
        GRADE_CATALOG.into_iter().find(|grade| grade.id == id)
    }

    /// 主科目（年级页只展示第一个科目的章节）
    pub fn primary_subject(&self) -> Option<&'static str> {
        self.subjects.first().copied()
    }

    pub fn to_grade_data(self) -> GradeData {
        GradeData {
            id: self.id,
            name: self.name.to_string(),
        }
    }
}

/// 内置年级列表，`grade_index.json` 不可用时作为首页数据
pub fn builtin_grades() -> Vec<GradeData> {
    GRADE_CATALOG
        .into_iter()
        .map(GradeInfo::to_grade_data)
        .collect()
}

/// 年级页中的章节摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    /// 路由中使用的章节 ID（文件名去掉 `.json`）
    pub chapter_id: String,
    pub chapter_no: i64,
    pub name: String,
    pub total_questions: usize,
}

/// 章节文件名转换为章节 ID
pub fn chapter_id_from_file(file: &str) -> &str {
    file.strip_suffix(".json").unwrap_or(file)
}
