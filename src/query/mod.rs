//! 查询模块
//!
//! 校验用户的 (起点, 终点, 算法) 选择，分发到最短路径或最大流算法，
//! 并生成可读的结果说明

mod outcome;
mod request;
mod service;

pub use outcome::{FlowAssignment, FlowSummary, QueryOutcome, QueryResponse};
pub use request::{QueryRequest, SelectionIssue};
pub use service::QueryService;
