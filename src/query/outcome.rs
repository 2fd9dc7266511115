//! 查询结果

use super::request::SelectionIssue;
use crate::algorithm::ShortestPath;
use serde::{Deserialize, Serialize};

/// 单条边上的流量分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAssignment {
    pub source: String,
    pub destination: String,
    /// 分配的流量（L/s）
    pub flow: f64,
    /// 该边容量（L/s）
    pub capacity: f64,
}

/// 最大流查询摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub source: String,
    pub sink: String,
    /// 最大流量（L/s）
    pub value: f64,
    /// 正流量的边，按 (source, destination) 排序
    pub assignments: Vec<FlowAssignment>,
    /// 流量等于容量的边
    pub bottlenecks: Vec<FlowAssignment>,
}

impl FlowSummary {
    /// 没有可行流
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

/// 一次查询的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// 选择无效，未执行任何算法
    InvalidSelection { issue: SelectionIssue },
    /// 找到最短路线
    Path(ShortestPath),
    /// 起点到终点没有路线
    Unreachable { origin: String, destination: String },
    /// 最大流结果（可能为 0）
    Flow(FlowSummary),
}

impl QueryOutcome {
    /// 给用户看的文字说明
    pub fn summary(&self) -> String {
        match self {
            QueryOutcome::InvalidSelection { issue } => match issue {
                SelectionIssue::MissingSelection => "请选择起点、终点和算法。".to_string(),
                SelectionIssue::SameNode => "起点和终点不能相同。".to_string(),
                SelectionIssue::UnknownAlgorithm(name) => format!("无法识别的算法: {}", name),
                SelectionIssue::UnknownNode(name) => format!("节点不存在: {}", name),
            },
            QueryOutcome::Path(path) => format!(
                "从 {} 到 {} 的最优路线: {}\n总距离: {} km",
                path.source,
                path.target,
                path.path.join(" -> "),
                path.distance
            ),
            QueryOutcome::Unreachable {
                origin,
                destination,
            } => format!("{} 与 {} 之间没有可用路线。", origin, destination),
            QueryOutcome::Flow(flow) => format!(
                "从 {} 到 {} 的最大流量: {} L/s",
                flow.source, flow.sink, flow.value
            ),
        }
    }

    /// 是否为无效选择
    pub fn is_invalid(&self) -> bool {
        matches!(self, QueryOutcome::InvalidSelection { .. })
    }
}

/// 带文字说明的查询结果（API 和 CLI 共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub outcome: QueryOutcome,
    pub summary: String,
}

impl From<QueryOutcome> for QueryResponse {
    fn from(outcome: QueryOutcome) -> Self {
        let summary = outcome.summary();
        Self { outcome, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_summary() {
        let outcome = QueryOutcome::Path(ShortestPath {
            source: "A".into(),
            target: "C".into(),
            distance: 12.0,
            path: vec!["A".into(), "B".into(), "C".into()],
            nodes: Vec::new(),
        });
        assert_eq!(
            outcome.summary(),
            "从 A 到 C 的最优路线: A -> B -> C\n总距离: 12 km"
        );
    }

    #[test]
    fn test_guidance_messages() {
        let missing = QueryOutcome::InvalidSelection {
            issue: SelectionIssue::MissingSelection,
        };
        assert_eq!(missing.summary(), "请选择起点、终点和算法。");
        assert!(missing.is_invalid());

        let unreachable = QueryOutcome::Unreachable {
            origin: "C".into(),
            destination: "A".into(),
        };
        assert_eq!(unreachable.summary(), "C 与 A 之间没有可用路线。");
        assert!(!unreachable.is_invalid());
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = QueryOutcome::InvalidSelection {
            issue: SelectionIssue::UnknownNode("Z".into()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "invalid_selection");
        assert_eq!(json["issue"]["reason"], "unknown_node");
        assert_eq!(json["issue"]["value"], "Z");

        let flow = QueryOutcome::Flow(FlowSummary {
            source: "A".into(),
            sink: "B".into(),
            value: 0.0,
            assignments: Vec::new(),
            bottlenecks: Vec::new(),
        });
        let json = serde_json::to_value(&flow).unwrap();
        assert_eq!(json["outcome"], "flow");
        assert_eq!(json["value"], 0.0);
    }
}
