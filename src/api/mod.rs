//! API 模块
//!
//! 负责与静态数据文件的交互：路径约定与类型化读取

pub mod data_api;
pub mod endpoints;

pub use data_api::DataApi;
