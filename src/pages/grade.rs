use crate::api::DataApi;
use crate::error::{AppResult, PageError};
use crate::infrastructure::Transport;
use crate::models::{chapter_id_from_file, ChapterSummary, GradeInfo};
use crate::pages::{back_link, banner, Route};
use crate::services::{total_questions, validate_question};
use futures::future::try_join_all;
use tracing::{debug, info};

/// 年级页：科目与章节列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradePage {
    pub grade: GradeInfo,
    pub chapters: Vec<ChapterSummary>,
}

impl GradePage {
    /// 加载年级下的全部章节
    ///
    /// # 参数
    /// - `api`: 数据接口
    /// - `grade_id`: 路由中的年级编号
    ///
    /// # 返回
    /// 未知年级返回 `PageError::UnknownGrade`；任一章节读取失败则整体失败
    pub async fn load<T: Transport>(api: &DataApi<T>, grade_id: &str) -> AppResult<Self> {
        let grade = GradeInfo::find(grade_id).ok_or_else(|| PageError::UnknownGrade {
            grade_id: grade_id.to_string(),
        })?;

        let files = api.chapter_files(grade_id).await?;
        let chapter_ids: Vec<&str> = files.iter().map(|f| chapter_id_from_file(f)).collect();

        let chapters = try_join_all(
            chapter_ids
                .iter()
                .map(|chapter_id| api.chapter(grade_id, chapter_id)),
        )
        .await?;

        let chapters: Vec<ChapterSummary> = chapter_ids
            .iter()
            .zip(chapters)
            .map(|(chapter_id, chapter)| {
                let incomplete = chapter
                    .questions
                    .iter()
                    .flat_map(|group| &group.questions)
                    .filter(|q| !validate_question(q))
                    .count();
                if incomplete > 0 {
                    debug!("章节 {} 有 {} 道题目数据不完整", chapter_id, incomplete);
                }
                ChapterSummary {
                    chapter_id: chapter_id.to_string(),
                    chapter_no: chapter.chapter_no,
                    total_questions: total_questions(&chapter),
                    name: chapter.name,
                }
            })
            .collect();

        info!("✓ {} 共加载 {} 个章节", grade.name, chapters.len());
        Ok(Self { grade, chapters })
    }

    pub fn render(&self, width: usize) -> String {
        let route = Route::Grade {
            grade_id: self.grade.id.to_string(),
        };
        let mut lines = vec![
            back_link(&route),
            self.grade.name.to_string(),
            "Choose a subject to explore chapters".to_string(),
            banner(width),
            "Subjects".to_string(),
            format!("Available subjects for {}", self.grade.name),
        ];
        lines.extend(self.grade.subjects.iter().map(|s| format!("  • {}", s)));

        // 章节都归在主科目下
        if let Some(subject) = self.grade.primary_subject() {
            lines.push(String::new());
            lines.push(subject.to_string());
            lines.push("─".repeat(width));
            for chapter in &self.chapters {
                let link = Route::Chapter {
                    grade_id: self.grade.id.to_string(),
                    chapter_id: chapter.chapter_id.clone(),
                };
                lines.push(format!("Chapter {}", chapter.chapter_no));
                lines.push(format!("  {}", chapter.name));
                lines.push(format!("  {} Questions", chapter.total_questions));
                lines.push(format!("  View QAs → {}", link));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::infrastructure::ManualClock;
    use crate::services::fetcher::test_support::ScriptedTransport;
    use crate::services::{FetchOptions, Fetcher, MemoryCache, DEFAULT_CACHE_TTL};
    use std::sync::Arc;

    fn api(transport: ScriptedTransport) -> DataApi<ScriptedTransport> {
        let cache = Arc::new(MemoryCache::new(
            DEFAULT_CACHE_TTL,
            Arc::new(ManualClock::new()),
        ));
        let options = FetchOptions {
            retry_attempts: 0,
            ..FetchOptions::default()
        };
        DataApi::new(Fetcher::new(Arc::new(transport), cache, options))
    }

    #[tokio::test]
    async fn test_loads_chapter_summaries_in_index_order() {
        let api = api(ScriptedTransport::new()
            .with_json("/data/9/index.json", r#"["2.json", "1.json"]"#)
            .with_json(
                "/data/9/1.json",
                r#"{"chapter_no": 1, "name": "Basics", "questions": [
                    {"question_group": "Short", "questions": [
                        {"id": 1, "question": "Q1", "answer": "A1", "content_type": "text"},
                        {"id": 2, "question": "Q2", "answer": "A2", "content_type": "text"}
                    ]}
                ]}"#,
            )
            .with_json(
                "/data/9/2.json",
                r#"{"chapter_no": 2, "name": "Networks", "questions": []}"#,
            ));

        let page = GradePage::load(&api, "9").await.unwrap();
        let ids: Vec<_> = page.chapters.iter().map(|c| c.chapter_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(page.chapters[1].total_questions, 2);

        let text = page.render(20);
        assert!(text.contains("Available subjects for Grade 9"));
        assert!(text.contains("Chapter 1\n  Basics\n  2 Questions\n  View QAs → /grade/9/1"));
    }

    #[tokio::test]
    async fn test_unknown_grade_is_page_error() {
        let api = api(ScriptedTransport::new());
        let err = GradePage::load(&api, "12").await.unwrap_err();
        assert!(matches!(err, AppError::Page(PageError::UnknownGrade { .. })));
    }

    #[tokio::test]
    async fn test_missing_chapter_fails_whole_page() {
        let api = api(ScriptedTransport::new()
            .with_json("/data/10/index.json", r#"["1.json"]"#));
        let err = GradePage::load(&api, "10").await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(e) if e.status() == Some(404)));
    }
}
