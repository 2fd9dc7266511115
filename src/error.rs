//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("节点不存在: {0}")]
    NodeNotFound(String),

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("CSV 解析错误: {0}")]
    CsvError(#[from] csv::Error),

    #[error("检测到从 {0} 可达的负权环")]
    NegativeCycle(String),

    #[error("服务器错误: {0}")]
    ServerError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}
