//! 章节页
//!
//! `ChapterSession` 持有一个章节的全部交互状态：
//! 数据资源、防抖搜索、内容类型筛选与分组筛选。
//! 每次渲染都基于当前状态重新筛选，不缓存筛选结果。

use crate::api::endpoints;
use crate::infrastructure::Transport;
use crate::models::{Chapter, ContentFilter, ContentType, GroupFilter, QuestionGroup, UnknownContentType};
use crate::pages::{back_link, error_panel, Route};
use crate::services::{
    count_questions, render_content, total_questions, unique_question_groups, DebouncedSearch,
    Fetcher, FilterCriteria,
};
use crate::workflow::{FetchState, Resource};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// 交互命令解析错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("未知命令: {0} (可用: :type, :group, :refetch, :back, :quit)")]
    Unknown(String),
    #[error(transparent)]
    ContentType(#[from] UnknownContentType),
}

/// 交互模式下的一行输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// 普通文本：更新搜索框
    Search(String),
    /// `:type <kind|all>`
    ContentType(ContentFilter),
    /// `:group <name|all>`
    Group(GroupFilter),
    /// `:refetch`
    Refetch,
    /// `:back`
    Back,
    /// `:quit`
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return Ok(SessionCommand::Search(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "type" => Ok(SessionCommand::ContentType(arg.parse()?)),
            "group" => Ok(SessionCommand::Group(GroupFilter::from(arg))),
            "refetch" => Ok(SessionCommand::Refetch),
            "back" => Ok(SessionCommand::Back),
            "quit" | "q" => Ok(SessionCommand::Quit),
            other => Err(CommandError::Unknown(format!(":{}", other))),
        }
    }
}

/// 执行命令后调用方应采取的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// 等待防抖后的搜索词
    Pending,
    /// 立即重新渲染
    Render,
    /// 等待数据加载后渲染
    Reload,
    /// 离开章节页
    Navigate(Route),
    Quit,
}

pub struct ChapterSession<T: Transport> {
    grade_id: String,
    chapter_id: String,
    resource: Resource<T, Chapter>,
    search: DebouncedSearch,
    content_filter: ContentFilter,
    group_filter: GroupFilter,
    width: usize,
}

impl<T: Transport> ChapterSession<T> {
    /// 创建会话并开始加载章节
    ///
    /// 必须在 tokio 运行时内调用
    pub fn open(
        fetcher: Fetcher<T>,
        grade_id: &str,
        chapter_id: &str,
        debounce: Duration,
        width: usize,
    ) -> Self {
        let mut resource = Resource::new(fetcher);
        resource.set_key(Some(endpoints::chapter_data(grade_id, chapter_id)));
        info!("📖 打开章节 {}/{}", grade_id, chapter_id);

        Self {
            grade_id: grade_id.to_string(),
            chapter_id: chapter_id.to_string(),
            resource,
            search: DebouncedSearch::new(debounce),
            content_filter: ContentFilter::All,
            group_filter: GroupFilter::All,
            width,
        }
    }

    pub fn route(&self) -> Route {
        Route::Chapter {
            grade_id: self.grade_id.clone(),
            chapter_id: self.chapter_id.clone(),
        }
    }

    pub fn state(&self) -> FetchState<Chapter> {
        self.resource.state()
    }

    /// 等待章节加载结束
    pub async fn wait(&mut self) -> FetchState<Chapter> {
        self.resource.wait().await
    }

    pub fn search(&self) -> &DebouncedSearch {
        &self.search
    }

    /// 输入搜索词（防抖）
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search.set(text);
    }

    /// 立即应用当前搜索词
    pub fn flush_search(&mut self) {
        self.search.flush();
    }

    /// 等待下一次防抖发布
    pub async fn search_settled(&mut self) -> String {
        self.search.changed().await
    }

    pub fn set_content_filter(&mut self, filter: ContentFilter) {
        self.content_filter = filter;
    }

    pub fn set_group_filter(&mut self, filter: GroupFilter) {
        self.group_filter = filter;
    }

    pub fn refetch(&mut self) {
        self.resource.refetch();
    }

    /// 当前生效的筛选条件（搜索词取防抖后的值）
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.search.debounced_value(),
            self.content_filter,
            self.group_filter.clone(),
        )
    }

    /// 筛选后的分组；数据未就绪时为空
    pub fn visible_groups(&self) -> Vec<QuestionGroup> {
        self.state()
            .data
            .map(|chapter| self.criteria().apply(&chapter.questions))
            .unwrap_or_default()
    }

    /// 执行一条交互命令
    pub fn apply(&mut self, command: SessionCommand) -> SessionAction {
        match command {
            SessionCommand::Search(text) => {
                self.set_search(text);
                SessionAction::Pending
            }
            SessionCommand::ContentType(filter) => {
                debug!("内容类型筛选: {}", filter);
                self.set_content_filter(filter);
                SessionAction::Render
            }
            SessionCommand::Group(filter) => {
                debug!("分组筛选: {}", filter);
                self.set_group_filter(filter);
                SessionAction::Render
            }
            SessionCommand::Refetch => {
                self.refetch();
                SessionAction::Reload
            }
            SessionCommand::Back => SessionAction::Navigate(self.route().back()),
            SessionCommand::Quit => SessionAction::Quit,
        }
    }

    /// 渲染当前视图
    pub fn render(&self) -> String {
        let state = self.state();
        let route = self.route();

        if let Some(message) = &state.error {
            return error_panel(message, &route, self.width);
        }

        let title = state
            .data
            .as_ref()
            .map(|chapter| chapter.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Chapter {}", self.chapter_id));

        let mut lines = vec![back_link(&route), title];

        let Some(chapter) = state.data else {
            lines.push("═".repeat(self.width));
            lines.push("Loading…".to_string());
            return lines.join("\n");
        };

        lines.push(format!("{} questions available", total_questions(&chapter)));
        lines.push("═".repeat(self.width));
        lines.extend(self.filter_legend(&chapter));
        lines.push("─".repeat(self.width));

        let groups = self.criteria().apply(&chapter.questions);
        if groups.is_empty() {
            lines.push(String::new());
            lines.push("No questions found".to_string());
            lines.push("Try adjusting your search criteria".to_string());
            return lines.join("\n");
        }

        let card_width = self.width.saturating_sub(2).max(1);
        for group in &groups {
            lines.push(String::new());
            lines.push(format!("## {}", group.question_group));
            for question in &group.questions {
                let Some(presentation) = render_content(question) else {
                    continue;
                };
                lines.push(String::new());
                lines.extend(
                    presentation
                        .to_text(card_width)
                        .lines()
                        .map(|line| format!("  {}", line).trim_end().to_string()),
                );
            }
        }

        lines.join("\n")
    }

    fn filter_legend(&self, chapter: &Chapter) -> Vec<String> {
        let search = self.search.search_value();
        let group = match &self.group_filter {
            GroupFilter::All => "All Groups".to_string(),
            GroupFilter::Named(name) => name.clone(),
        };
        let kinds: Vec<&str> = ContentType::ALL.iter().map(|kind| kind.as_str()).collect();
        let visible = count_questions(&self.visible_groups());

        vec![
            format!(
                "Search: \"{}\"   Type: {}   Group: {}   ({} shown)",
                search,
                self.content_filter.label(),
                group,
                visible
            ),
            format!("Types: all | {}", kinds.join(" | ")),
            format!(
                "Groups: all | {}",
                unique_question_groups(&chapter.questions).join(" | ")
            ),
        ]
    }
}
