//! 供水网络领域类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 节点类型（由节点名称或 CSV 中的 Node Type 列推断）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// 河流水源
    Source,
    /// 水处理厂 (PTAP)
    TreatmentPlant,
    /// 蓄水池
    Reservoir,
    /// 泵站
    PumpingStation,
    /// 用水点（家庭等）
    ConsumptionPoint,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Source,
        NodeKind::TreatmentPlant,
        NodeKind::Reservoir,
        NodeKind::PumpingStation,
        NodeKind::ConsumptionPoint,
    ];

    /// 根据节点名称分类
    pub fn classify(name: &str) -> Self {
        if name.contains("PTAP") {
            NodeKind::TreatmentPlant
        } else if name.contains("Reservorio") {
            NodeKind::Reservoir
        } else if name.contains("Estación") || name.contains("Estaciones") {
            NodeKind::PumpingStation
        } else if name.starts_with("Río") || name.starts_with("Rio ") {
            NodeKind::Source
        } else {
            NodeKind::ConsumptionPoint
        }
    }

    /// 解析 CSV 中声明的节点类型，无法识别时返回 None
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared.trim().to_lowercase().as_str() {
            "water source" | "source" | "river" => Some(NodeKind::Source),
            "water treatment plant" | "treatment plant" => Some(NodeKind::TreatmentPlant),
            "storage tank" | "reservoir" => Some(NodeKind::Reservoir),
            "pumping station" => Some(NodeKind::PumpingStation),
            "consumption point" => Some(NodeKind::ConsumptionPoint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::TreatmentPlant => "treatment_plant",
            NodeKind::Reservoir => "reservoir",
            NodeKind::PumpingStation => "pumping_station",
            NodeKind::ConsumptionPoint => "consumption_point",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .or_else(|| NodeKind::from_declared(s))
            .ok_or_else(|| format!("未知的节点类型: {}", s))
    }
}

/// 查询算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// 最短路径（Bellman-Ford，按距离）
    ShortestPath,
    /// 最大流（Ford-Fulkerson / Edmonds-Karp，按容量）
    MaxFlow,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::ShortestPath => "shortest-path",
            Algorithm::MaxFlow => "max-flow",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shortest-path" | "shortest_path" | "bellman-ford" | "path" => {
                Ok(Algorithm::ShortestPath)
            }
            "max-flow" | "max_flow" | "maxflow" | "ford-fulkerson" | "flow" => {
                Ok(Algorithm::MaxFlow)
            }
            other => Err(format!("未知的算法: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_name() {
        assert_eq!(NodeKind::classify("PTAP La Atarjea"), NodeKind::TreatmentPlant);
        assert_eq!(
            NodeKind::classify("Reservorio de Huachipa"),
            NodeKind::Reservoir
        );
        assert_eq!(
            NodeKind::classify("Estación de Bombeo de Atarjea"),
            NodeKind::PumpingStation
        );
        assert_eq!(
            NodeKind::classify("Estaciones en Ventanilla"),
            NodeKind::PumpingStation
        );
        assert_eq!(NodeKind::classify("Río Rímac"), NodeKind::Source);
        assert_eq!(
            NodeKind::classify("Hogar Miraflores 3"),
            NodeKind::ConsumptionPoint
        );
    }

    #[test]
    fn test_declared_kind() {
        assert_eq!(
            NodeKind::from_declared("Storage Tank"),
            Some(NodeKind::Reservoir)
        );
        assert_eq!(NodeKind::from_declared("  Pumping Station "), Some(NodeKind::PumpingStation));
        assert_eq!(NodeKind::from_declared("Valve"), None);
        assert_eq!("treatment-plant".parse::<NodeKind>(), Ok(NodeKind::TreatmentPlant));
    }

    #[test]
    fn test_algorithm_aliases() {
        assert_eq!("bellman-ford".parse::<Algorithm>(), Ok(Algorithm::ShortestPath));
        assert_eq!("Ford-Fulkerson".parse::<Algorithm>(), Ok(Algorithm::MaxFlow));
        assert_eq!("max-flow".parse::<Algorithm>(), Ok(Algorithm::MaxFlow));
        assert!("dijkstra".parse::<Algorithm>().is_err());
    }
}
