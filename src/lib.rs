//! hydronet - 城市供水网络路线与流量分析
//!
//! 从 CSV 边列表加载有向供水网络（河流、水处理厂、蓄水池、泵站、用水点），支持：
//! - 按管道距离的最短路线（Bellman-Ford）
//! - 按管道容量的最大流量（Edmonds-Karp）
//! - HTTP API 与交互式命令行

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod logging;
pub mod metrics;
pub mod query;
pub mod server;
pub mod types;

// 重导出常用类型
pub use algorithm::{BellmanFord, EdmondsKarp, MaxFlow, ShortestPath};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, EdgeRecord, Graph, Node, NodeId};
pub use import::{load_network, EdgeListImporter, ImportStats};
pub use query::{QueryOutcome, QueryRequest, QueryService};
pub use types::{Algorithm, NodeKind};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
