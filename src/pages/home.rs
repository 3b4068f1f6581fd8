use crate::api::DataApi;
use crate::infrastructure::Transport;
use crate::models::{builtin_grades, GradeData, GradeInfo};
use crate::pages::{banner, Route};
use tracing::{info, warn};

/// 首页：年级选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub grades: Vec<GradeData>,
    /// 是否使用了内置年级列表
    pub fallback: bool,
}

impl HomePage {
    /// 读取 `grade_index.json`，失败时退回内置年级列表
    pub async fn load<T: Transport>(api: &DataApi<T>) -> Self {
        match api.grade_index().await {
            Ok(grades) if !grades.is_empty() => {
                info!("✓ 加载年级列表: {} 个年级", grades.len());
                Self {
                    grades,
                    fallback: false,
                }
            }
            Ok(_) => {
                warn!("⚠️ 年级列表为空，使用内置年级列表");
                Self::builtin()
            }
            Err(e) => {
                warn!("⚠️ 无法加载年级列表 ({})，使用内置年级列表", e);
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        Self {
            grades: builtin_grades(),
            fallback: true,
        }
    }

    pub fn render(&self, width: usize) -> String {
        let mut lines = vec![
            "Question & Answer Platform".to_string(),
            banner(width),
            "Select Your Grade Level".to_string(),
        ];

        for grade in &self.grades {
            let route = Route::Grade {
                grade_id: grade.id.to_string(),
            };
            let subjects = GradeInfo::find(&grade.id.to_string())
                .map(|info| info.subjects.join(", "))
                .unwrap_or_default();

            lines.push(String::new());
            if subjects.is_empty() {
                lines.push(format!("  [{}] {}", grade.id, grade.name));
            } else {
                lines.push(format!("  [{}] {} ({})", grade.id, grade.name, subjects));
            }
            lines.push(format!("      Explore Grade {} → {}", grade.id, route));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_home_lists_both_grades() {
        let page = HomePage::builtin();
        assert!(page.fallback);

        let text = page.render(20);
        assert!(text.contains("Select Your Grade Level"));
        assert!(text.contains("[9] Grade 9 (Computer Science)"));
        assert!(text.contains("Explore Grade 10 → /grade/10"));
    }
}
