//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：选择数据源（HTTP / 本地目录），创建缓存与数据接口
//! 2. **路由分发**：把路由交给对应页面，页面出错时渲染错误面板
//! 3. **交互会话**：章节页逐行读取输入，驱动搜索、筛选、重新加载与返回
//!
//! 只负责"把页面串起来"，不处理题目、缓存或筛选的细节

use crate::api::DataApi;
use crate::cli::Args;
use crate::clients::AnyClient;
use crate::config::Config;
use crate::error::PageError;
use crate::infrastructure::{SystemClock, Transport};
use crate::models::{ContentFilter, GroupFilter};
use crate::pages::{
    error_panel, ChapterSession, GradePage, HomePage, Route, SessionAction, SessionCommand,
};
use crate::services::{FetchOptions, Fetcher, MemoryCache};
use crate::utils::{log_startup, measure_render, truncate_text};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// 一次运行的请求参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub route: String,
    pub search: Option<String>,
    pub content: ContentFilter,
    pub group: GroupFilter,
    pub interactive: bool,
}

impl RunRequest {
    pub fn from_args(args: &Args) -> Self {
        Self {
            route: args.route.clone(),
            search: args.search.clone(),
            content: args.content_type,
            group: args.group.clone(),
            interactive: args.interactive,
        }
    }
}

/// 交互循环中的事件
enum Event {
    Line(Option<String>),
    SearchSettled,
}

/// 应用主结构
pub struct App {
    config: Config,
    api: DataApi<AnyClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let transport = AnyClient::from_config(&config);
        log_startup(&config, &transport.describe());

        let cache = Arc::new(MemoryCache::new(config.cache_ttl(), Arc::new(SystemClock)));
        let fetcher = Fetcher::new(
            Arc::new(transport),
            cache,
            FetchOptions::from_config(&config),
        );

        Ok(Self {
            config,
            api: DataApi::new(fetcher),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑：渲染一次路由，章节页可进入交互模式
    pub async fn run(&self, request: &RunRequest) -> Result<()> {
        let route = Route::parse(&request.route);
        let mut stdout = std::io::stdout();

        if request.interactive {
            if let Route::Chapter { .. } = route {
                let input = tokio::io::BufReader::new(tokio::io::stdin());
                return self.run_interactive(request, input, &mut stdout).await;
            }
            warn!("⚠️ 交互模式只适用于章节页，按普通模式渲染 {}", route);
        }

        let text = self.render_route(&route, request).await;
        writeln!(stdout, "{}", text).context("无法写入标准输出")?;
        Ok(())
    }

    /// 渲染路由对应的页面
    ///
    /// 数据获取失败时返回错误面板，不返回 `Err`
    pub async fn render_route(&self, route: &Route, request: &RunRequest) -> String {
        let width = self.config.render_width;
        let perf = self.config.environment.is_development();
        info!("📄 渲染页面: {}", route);

        match route {
            Route::Home => {
                let page = HomePage::load(&self.api).await;
                measure_render("Home", perf, || page.render(width))
            }
            Route::Grade { grade_id } => match GradePage::load(&self.api, grade_id).await {
                Ok(page) => measure_render("Grade", perf, || page.render(width)),
                Err(e) => {
                    warn!("⚠️ 年级页加载失败: {}", e);
                    error_panel(&e.to_string(), route, width)
                }
            },
            Route::Chapter {
                grade_id,
                chapter_id,
            } => {
                let mut session = self.open_chapter(grade_id, chapter_id, request);
                session.flush_search();
                session.wait().await;
                measure_render("Chapter", perf, || session.render())
            }
            Route::NotFound { path } => {
                let error = PageError::NotFound { path: path.clone() };
                error_panel(&error.to_string(), route, width)
            }
        }
    }

    /// 交互式章节会话
    ///
    /// # 参数
    /// - `request`: 路由与初始筛选条件（路由必须是章节页）
    /// - `input`: 逐行输入，普通文本为搜索词，`:` 开头为命令
    /// - `out`: 页面输出
    pub async fn run_interactive<R, W>(
        &self,
        request: &RunRequest,
        input: R,
        out: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let Route::Chapter {
            grade_id,
            chapter_id,
        } = Route::parse(&request.route)
        else {
            anyhow::bail!("交互模式需要章节路由，实际为 {}", request.route);
        };

        let perf = self.config.environment.is_development();
        let mut session = self.open_chapter(&grade_id, &chapter_id, request);
        session.flush_search();
        session.wait().await;
        writeln!(out, "{}", measure_render("Chapter", perf, || session.render()))?;

        let mut lines = input.lines();
        loop {
            let event = tokio::select! {
                line = lines.next_line() => Event::Line(line.context("读取输入失败")?),
                _ = session.search_settled() => Event::SearchSettled,
            };

            let action = match event {
                Event::SearchSettled => SessionAction::Render,
                Event::Line(None) => {
                    // 输入结束时立即应用尚未稳定的搜索词
                    if session.search().is_pending() {
                        session.flush_search();
                        writeln!(out, "{}", session.render())?;
                    }
                    break;
                }
                Event::Line(Some(line)) => match SessionCommand::parse(&line) {
                    Ok(command) => {
                        if let SessionCommand::Search(text) = &command {
                            info!("🔍 搜索: {}", truncate_text(text, 40));
                        }
                        session.apply(command)
                    }
                    Err(e) => {
                        warn!("⚠️ {}", e);
                        continue;
                    }
                },
            };

            match action {
                SessionAction::Pending => {}
                SessionAction::Render => {
                    writeln!(out, "{}", measure_render("Chapter", perf, || session.render()))?;
                }
                SessionAction::Reload => {
                    session.wait().await;
                    writeln!(out, "{}", measure_render("Chapter", perf, || session.render()))?;
                }
                SessionAction::Navigate(route) => {
                    let text = self.render_route(&route, &RunRequest::default()).await;
                    writeln!(out, "{}", text)?;
                    break;
                }
                SessionAction::Quit => break,
            }
        }

        info!("✓ 会话结束");
        Ok(())
    }

    fn open_chapter(
        &self,
        grade_id: &str,
        chapter_id: &str,
        request: &RunRequest,
    ) -> ChapterSession<AnyClient> {
        let mut session = ChapterSession::open(
            self.api.fetcher().clone(),
            grade_id,
            chapter_id,
            self.config.debounce(),
            self.config.render_width,
        );
        session.set_content_filter(request.content);
        session.set_group_filter(request.group.clone());
        if let Some(search) = &request.search {
            session.set_search(search.clone());
        }
        session
    }
}
