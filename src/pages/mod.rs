//! 页面控制器
//!
//! 每个页面负责：按路由取数据 → 组合业务能力 → 排版为终端文本。
//! 数据获取失败不会向上传播为崩溃，而是渲染为错误面板。

pub mod chapter;
pub mod grade;
pub mod home;
pub mod route;

pub use chapter::{ChapterSession, CommandError, SessionAction, SessionCommand};
pub use grade::GradePage;
pub use home::HomePage;
pub use route::Route;

/// 页面标题下的双线
pub(crate) fn banner(width: usize) -> String {
    "═".repeat(width)
}

/// 返回链接
pub(crate) fn back_link(route: &Route) -> String {
    format!("← {} ({})", route.back_label(), route.back())
}

/// 错误面板：错误信息 + 重试 / 返回 提示
pub fn error_panel(message: &str, route: &Route, width: usize) -> String {
    [
        back_link(route),
        banner(width),
        "Something went wrong".to_string(),
        message.to_string(),
        String::new(),
        format!(
            "[:refetch] Retry    [:back] {} ({})",
            route.back_label(),
            route.back()
        ),
    ]
    .join("\n")
}
