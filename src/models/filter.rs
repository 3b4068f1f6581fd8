use crate::models::question::{ContentType, UnknownContentType};
use std::fmt;
use std::str::FromStr;

/// "全部" 选项的取值
pub const FILTER_ALL: &str = "all";

/// 内容类型筛选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentFilter {
    #[default]
    All,
    Only(ContentType),
}

impl ContentFilter {
    pub fn matches(&self, content_type: Option<ContentType>) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Only(wanted) => content_type == Some(*wanted),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentFilter::All => "All Content Types",
            ContentFilter::Only(kind) => kind.label(),
        }
    }
}

impl FromStr for ContentFilter {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == FILTER_ALL {
            Ok(ContentFilter::All)
        } else {
            s.parse().map(ContentFilter::Only)
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFilter::All => f.write_str(FILTER_ALL),
            ContentFilter::Only(kind) => write!(f, "{}", kind),
        }
    }
}

/// 题组筛选
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    All,
    Named(String),
}

impl GroupFilter {
    pub fn matches(&self, group_name: &str) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Named(name) => name == group_name,
        }
    }
}

impl From<&str> for GroupFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == FILTER_ALL {
            GroupFilter::All
        } else {
            GroupFilter::Named(value.to_string())
        }
    }
}

impl FromStr for GroupFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GroupFilter::from(s))
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFilter::All => f.write_str(FILTER_ALL),
            GroupFilter::Named(name) => f.write_str(name),
        }
    }
}
