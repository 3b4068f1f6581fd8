//! # QA Reference
//!
//! 分年级、分章节的问答资料浏览器
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，数据流为：
//! 路由 → 数据获取（缓存 + 重试）→ 筛选（防抖搜索 + 类型 + 题组）→ 按内容类型渲染
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不含业务
//! - `Transport` - 按路径读取原始响应的通道
//! - `Clock` - 可替换的时间源（缓存过期判断）
//! - `ScopedTask` - 可取消的延迟任务（防抖定时器、重试退避）
//!
//! ### ② 数据源（Clients）
//! - `HttpClient` - 通过 HTTP 读取静态数据
//! - `FileClient` - 读取本地数据目录
//! - `AnyClient` - 运行时选择数据源
//!
//! ### ③ 业务能力层（Services）
//! - `MemoryCache` / `Fetcher` - 带有效期的缓存与指数退避重试
//! - `filter` - 纯函数筛选
//! - `DebouncedSearch` - 防抖搜索
//! - `math_text` / `content_renderer` - 数学文本解析与题目渲染
//!
//! ### ④ 流程层（Workflow）
//! - `Resource` - 按键加载的 `data / loading / error` 状态，丢弃过期结果
//!
//! ### ⑤ 页面与编排层（Pages / Orchestration）
//! - `pages/` - 首页、年级页、章节页
//! - `orchestrator/` - 应用初始化、路由分发与交互会话
//!
//! ## 模块结构

pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod pages;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::DataApi;
pub use clients::{AnyClient, FileClient, HttpClient};
pub use config::{Config, Environment};
pub use error::{AppError, AppResult, ConfigError, FetchError, PageError};
pub use infrastructure::{Clock, ManualClock, SystemClock, Transport};
pub use models::{Chapter, Content, ContentFilter, ContentType, GroupFilter, Question, QuestionGroup};
pub use orchestrator::{App, RunRequest};
pub use pages::{ChapterSession, Route};
pub use services::{
    filter_questions, parse_math_text, render_content, CacheStore, DebouncedSearch, FetchOptions,
    Fetcher, MemoryCache,
};
pub use workflow::{FetchState, Resource};
