//! 题目筛选 - 业务能力层
//!
//! 纯函数：不修改输入，按 分组 / 内容类型 / 搜索词 三个条件生成新的分组列表

use crate::models::{Chapter, ContentFilter, ContentType, GroupFilter, Question, QuestionGroup};
use std::collections::HashSet;

/// 三个筛选维度的组合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub content: ContentFilter,
    pub group: GroupFilter,
}

impl FilterCriteria {
    pub fn new(search: impl Into<String>, content: ContentFilter, group: GroupFilter) -> Self {
        Self {
            search: search.into(),
            content,
            group,
        }
    }

    /// 是否为默认条件（不做任何筛选）
    pub fn is_default(&self) -> bool {
        self.search.is_empty() && self.content == ContentFilter::All && self.group == GroupFilter::All
    }

    pub fn apply(&self, groups: &[QuestionGroup]) -> Vec<QuestionGroup> {
        filter_questions(groups, &self.search, &self.content, &self.group)
    }
}

/// 筛选题目
///
/// 1. 只保留名称匹配 `group_filter` 的分组
/// 2. 组内只保留类型匹配且题干或答案包含搜索词（不区分大小写）的题目
/// 3. 丢弃筛选后为空的分组
///
/// 保持原有顺序；空搜索词匹配所有题目
pub fn filter_questions(
    groups: &[QuestionGroup],
    search_query: &str,
    content_filter: &ContentFilter,
    group_filter: &GroupFilter,
) -> Vec<QuestionGroup> {
    let needle = search_query.to_lowercase();

    groups
        .iter()
        .filter(|group| group_filter.matches(&group.question_group))
        .filter_map(|group| {
            let questions: Vec<Question> = group
                .questions
                .iter()
                .filter(|q| content_filter.matches(q.content_type()) && matches_search(q, &needle))
                .cloned()
                .collect();

            (!questions.is_empty()).then(|| QuestionGroup {
                question_group: group.question_group.clone(),
                questions,
            })
        })
        .collect()
}

/// `needle` 需已转为小写
fn matches_search(question: &Question, needle: &str) -> bool {
    needle.is_empty()
        || question.question.to_lowercase().contains(needle)
        || question.answer.to_lowercase().contains(needle)
}

/// 章节题目总数
pub fn total_questions(chapter: &Chapter) -> usize {
    count_questions(&chapter.questions)
}

pub fn count_questions(groups: &[QuestionGroup]) -> usize {
    groups.iter().map(|group| group.questions.len()).sum()
}

/// 出现过的内容类型，按首次出现顺序
pub fn unique_content_types(groups: &[QuestionGroup]) -> Vec<ContentType> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|group| &group.questions)
        .filter_map(Question::content_type)
        .filter(|kind| seen.insert(*kind))
        .collect()
}

/// 分组名称列表
pub fn unique_question_groups(groups: &[QuestionGroup]) -> Vec<&str> {
    groups
        .iter()
        .map(|group| group.question_group.as_str())
        .collect()
}

/// 题目结构是否完整：编号非零、题干与答案非空、类型可识别
///
/// 只用于诊断，不会拒绝数据
pub fn validate_question(question: &Question) -> bool {
    question.id != 0
        && !question.question.is_empty()
        && !question.answer.is_empty()
        && question.content_type().is_some()
}

/// 列表中题目的唯一键
pub fn question_key(group_name: &str, question_id: i64) -> String {
    format!("{}-{}", group_name, question_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, TableData};

    fn sample_groups() -> Vec<QuestionGroup> {
        vec![
            QuestionGroup {
                question_group: "Short Questions".to_string(),
                questions: vec![
                    Question::new(1, "What is a CPU?", "The Central Processing Unit"),
                    Question::new(2, "Define RAM", "Random access memory"),
                ],
            },
            QuestionGroup {
                question_group: "Long Questions".to_string(),
                questions: vec![
                    Question::new(1, "Compare storage devices", "See table").with_content(
                        Content::Table(Some(TableData {
                            headers: vec!["Device".into(), "Speed".into()],
                            rows: vec![vec!["HDD".into(), "Slow".into()]],
                        })),
                    ),
                    Question::new(2, "Write hello world", "print it").with_content(
                        Content::Programming {
                            language: Some("python".into()),
                            code: Some("print('hello')".into()),
                        },
                    ),
                ],
            },
        ]
    }

    #[test]
    fn test_defaults_are_identity() {
        let groups = sample_groups();
        let filtered = filter_questions(&groups, "", &ContentFilter::All, &GroupFilter::All);
        assert_eq!(filtered, groups);
    }

    #[test]
    fn test_content_filter_keeps_only_that_type() {
        let groups = sample_groups();
        let filtered = filter_questions(
            &groups,
            "",
            &ContentFilter::Only(ContentType::Programming),
            &GroupFilter::All,
        );

        assert_eq!(filtered.len(), 1);
        assert!(filtered
            .iter()
            .flat_map(|g| &g.questions)
            .all(|q| q.content_type() == Some(ContentType::Programming)));
    }

    #[test]
    fn test_search_is_case_insensitive_and_checks_answer() {
        let groups = sample_groups();
        let upper = filter_questions(&groups, "RANDOM", &ContentFilter::All, &GroupFilter::All);
        let lower = filter_questions(&groups, "random", &ContentFilter::All, &GroupFilter::All);

        assert_eq!(upper, lower);
        assert_eq!(count_questions(&upper), 1);
        assert_eq!(upper[0].questions[0].id, 2);
    }

    #[test]
    fn test_groups_without_matches_are_dropped() {
        let groups = sample_groups();
        let filtered = filter_questions(&groups, "cpu", &ContentFilter::All, &GroupFilter::All);

        assert_eq!(unique_question_groups(&filtered), vec!["Short Questions"]);
        assert!(filtered.iter().all(|g| !g.questions.is_empty()));
    }

    #[test]
    fn test_group_filter_selects_by_exact_name() {
        let groups = sample_groups();
        let filtered = filter_questions(
            &groups,
            "",
            &ContentFilter::All,
            &GroupFilter::Named("Long Questions".into()),
        );
        assert_eq!(unique_question_groups(&filtered), vec!["Long Questions"]);

        let none = filter_questions(
            &groups,
            "",
            &ContentFilter::All,
            &GroupFilter::Named("long questions".into()),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let groups = sample_groups();
        let filtered = filter_questions(&groups, "e", &ContentFilter::All, &GroupFilter::All);
        let ids: Vec<_> = filtered
            .iter()
            .flat_map(|g| g.questions.iter().map(|q| question_key(&g.question_group, q.id)))
            .collect();
        assert_eq!(
            ids,
            vec![
                "Short Questions-1",
                "Short Questions-2",
                "Long Questions-1",
                "Long Questions-2"
            ]
        );
    }

    #[test]
    fn test_unique_content_types_in_first_seen_order() {
        let groups = sample_groups();
        assert_eq!(
            unique_content_types(&groups),
            vec![ContentType::Text, ContentType::Table, ContentType::Programming]
        );
    }

    #[test]
    fn test_validate_question() {
        assert!(validate_question(&Question::new(1, "Q", "A")));
        assert!(!validate_question(&Question::new(0, "Q", "A")));
        assert!(!validate_question(&Question::new(1, "", "A")));
        assert!(!validate_question(
            &Question::new(1, "Q", "A").with_content(Content::Unsupported {
                kind: "video".into()
            })
        ));
    }

    #[test]
    fn test_criteria_apply_matches_free_function() {
        let groups = sample_groups();
        let criteria = FilterCriteria::new(
            "hello",
            ContentFilter::Only(ContentType::Programming),
            GroupFilter::All,
        );
        assert!(!criteria.is_default());
        assert_eq!(
            criteria.apply(&groups),
            filter_questions(&groups, "hello", &criteria.content, &criteria.group)
        );
        assert!(FilterCriteria::default().is_default());
    }
}
