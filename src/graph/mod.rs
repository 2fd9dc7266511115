//! 图核心模块
//!
//! 定义节点、边和图的核心数据结构

mod edge;
mod graph;
mod index;
mod node;

pub use edge::{Edge, EdgeId, EdgeRecord};
pub use graph::Graph;
pub use index::{EdgeIndex, NodeIndex};
pub use node::{Node, NodeId};
