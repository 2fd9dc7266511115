//! 图算法模块
//!
//! 包含最短路径（Bellman-Ford）和最大流（Edmonds-Karp）算法

mod max_flow;
mod shortest_path;

pub use max_flow::{EdmondsKarp, MaxFlow};
pub use shortest_path::{BellmanFord, ShortestPath};
