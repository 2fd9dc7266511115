//! 边定义
//!
//! 有向管道：携带距离（km）和流量容量（L/s）

use crate::graph::node::NodeId;
use serde::{Deserialize, Serialize};

/// 边 ID（全局唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// 边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 源节点 ID
    src: NodeId,
    /// 目标节点 ID
    dst: NodeId,
    /// 距离（km），最短路径的权重
    distance: f64,
    /// 流量容量（L/s），最大流的上界
    capacity: f64,
}

impl Edge {
    /// 创建新边
    pub fn new(id: EdgeId, src: NodeId, dst: NodeId, distance: f64, capacity: f64) -> Self {
        Self {
            id,
            src,
            dst,
            distance,
            capacity,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn src(&self) -> NodeId {
        self.src
    }

    pub fn dst(&self) -> NodeId {
        self.dst
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// 覆盖属性（同一有向点对重复添加时，后写入者生效）
    pub(crate) fn overwrite(&mut self, distance: f64, capacity: f64) {
        self.distance = distance;
        self.capacity = capacity;
    }
}

/// 带节点名称的边视图，用于对外输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub destination: String,
    pub distance: f64,
    pub capacity: f64,
}
