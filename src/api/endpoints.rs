//! 数据文件路径
//!
//! 所有路径都是站点根下的绝对路径，由传输通道负责拼接主机或本地目录

/// 年级列表
pub const GRADE_INDEX: &str = "/data/grade_index.json";

/// 年级下的章节文件列表
pub fn chapter_index(grade_id: &str) -> String {
    format!("/data/{}/index.json", grade_id)
}

/// 单个章节
pub fn chapter_data(grade_id: &str, chapter_id: &str) -> String {
    format!("/data/{}/{}.json", grade_id, chapter_id)
}
