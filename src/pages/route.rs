use std::fmt;

/// 页面路由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/grade/:grade_id`
    Grade { grade_id: String },
    /// `/grade/:grade_id/:chapter_id`
    Chapter {
        grade_id: String,
        chapter_id: String,
    },
    /// 无法匹配的路径
    NotFound { path: String },
}

impl Route {
    /// 解析路径；忽略首尾斜杠、查询串与片段
    pub fn parse(path: &str) -> Self {
        let trimmed = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["grade", grade_id] => Route::Grade {
                grade_id: grade_id.to_string(),
            },
            ["grade", grade_id, chapter_id] => Route::Chapter {
                grade_id: grade_id.to_string(),
                chapter_id: chapter_id.to_string(),
            },
            _ => Route::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// 返回上一级页面
    pub fn back(&self) -> Route {
        match self {
            Route::Chapter { grade_id, .. } => Route::Grade {
                grade_id: grade_id.clone(),
            },
            Route::Home | Route::Grade { .. } | Route::NotFound { .. } => Route::Home,
        }
    }

    /// "返回" 链接的文字
    pub fn back_label(&self) -> String {
        match self {
            Route::Chapter { grade_id, .. } => format!("Back to Grade {}", grade_id),
            _ => "Back to Grades".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Grade { grade_id } => write!(f, "/grade/{}", grade_id),
            Route::Chapter {
                grade_id,
                chapter_id,
            } => write!(f, "/grade/{}/{}", grade_id, chapter_id),
            Route::NotFound { path } => f.write_str(path),
        }
    }
}
