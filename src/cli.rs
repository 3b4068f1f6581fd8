//! 命令行参数
//!
//! 命令行参数优先级最高：配置文件 < 环境变量 < 命令行

use crate::config::Config;
use crate::models::{ContentFilter, GroupFilter};
use clap::Parser;
use std::path::PathBuf;

/// 在终端中浏览分年级、分章节的问答资料
#[derive(Debug, Parser)]
#[command(name = "qa_reference", version)]
pub struct Args {
    /// 页面路由：`/`、`/grade/<grade>` 或 `/grade/<grade>/<chapter>`
    #[arg(default_value = "/")]
    pub route: String,

    /// 静态数据服务地址
    #[arg(long, conflicts_with = "data_dir")]
    pub base_url: Option<String>,

    /// 本地数据目录（对应站点的 `/data`）
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// 章节页搜索词
    #[arg(long, short)]
    pub search: Option<String>,

    /// 内容类型：all、text、table、equation、math_problem、programming
    #[arg(long = "type", short = 't', default_value = "all")]
    pub content_type: ContentFilter,

    /// 题组名称，`all` 表示全部
    #[arg(long, short, default_value = "all")]
    pub group: GroupFilter,

    /// 章节页交互模式：逐行读取搜索词与命令
    #[arg(long, short)]
    pub interactive: bool,

    /// TOML 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 关闭内存缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 渲染宽度
    #[arg(long)]
    pub width: Option<usize>,
}

impl Args {
    /// 用命令行参数覆盖配置
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
            config.data_dir = None;
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = Some(data_dir.clone());
        }
        if self.no_cache {
            config.enable_cache = false;
        }
        if let Some(width) = self.width {
            config.render_width = width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    #[test]
    fn test_parse_chapter_invocation() {
        let args = Args::try_parse_from([
            "qa_reference",
            "/grade/9/1",
            "--data-dir",
            "./public/data",
            "--type",
            "table",
            "--search",
            "binary",
            "--no-cache",
        ])
        .unwrap();

        assert_eq!(args.route, "/grade/9/1");
        assert_eq!(args.content_type, ContentFilter::Only(ContentType::Table));
        assert_eq!(args.group, GroupFilter::All);

        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.data_dir, Some(PathBuf::from("./public/data")));
        assert!(!config.enable_cache);
    }

    #[test]
    fn test_rejects_unknown_content_type() {
        assert!(Args::try_parse_from(["qa_reference", "--type", "video"]).is_err());
    }

    #[test]
    fn test_base_url_conflicts_with_data_dir() {
        assert!(Args::try_parse_from([
            "qa_reference",
            "--base-url",
            "http://localhost:8080",
            "--data-dir",
            "data"
        ])
        .is_err());
    }
}
