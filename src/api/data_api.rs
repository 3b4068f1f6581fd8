//! 类型化数据读取
//!
//! 在 `Fetcher` 之上按路径约定读取年级列表、章节列表与章节内容

use crate::api::endpoints;
use crate::error::FetchError;
use crate::infrastructure::Transport;
use crate::models::{Chapter, GradeData};
use crate::services::Fetcher;
use tracing::debug;

pub struct DataApi<T> {
    fetcher: Fetcher<T>,
}

impl<T> Clone for DataApi<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<T: Transport> DataApi<T> {
    pub fn new(fetcher: Fetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// 读取 `grade_index.json`
    pub async fn grade_index(&self) -> Result<Vec<GradeData>, FetchError> {
        self.fetcher.fetch_as(endpoints::GRADE_INDEX).await
    }

    /// 读取年级下的章节文件名（如 `1.json`）
    pub async fn chapter_files(&self, grade_id: &str) -> Result<Vec<String>, FetchError> {
        let files: Vec<String> = self
            .fetcher
            .fetch_as(&endpoints::chapter_index(grade_id))
            .await?;
        debug!("年级 {} 共有 {} 个章节文件", grade_id, files.len());
        Ok(files)
    }

    /// 读取单个章节
    pub async fn chapter(&self, grade_id: &str, chapter_id: &str) -> Result<Chapter, FetchError> {
        self.fetcher
            .fetch_as(&endpoints::chapter_data(grade_id, chapter_id))
            .await
    }
}
