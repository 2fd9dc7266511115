//! 查询请求与选择校验

use crate::types::Algorithm;
use serde::{Deserialize, Serialize};

/// 用户选择的 (起点, 终点, 算法)
///
/// 三个字段都可能缺失；空白字符串视同缺失。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
}

impl QueryRequest {
    pub fn new(origin: &str, destination: &str, algorithm: &str) -> Self {
        Self {
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            algorithm: Some(algorithm.to_string()),
        }
    }

    /// 去除首尾空白后的起点
    pub fn origin(&self) -> Option<&str> {
        non_blank(&self.origin)
    }

    pub fn destination(&self) -> Option<&str> {
        non_blank(&self.destination)
    }

    pub fn algorithm(&self) -> Option<&str> {
        non_blank(&self.algorithm)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 选择无效的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum SelectionIssue {
    /// 起点、终点或算法未填写
    MissingSelection,
    /// 起点与终点相同
    SameNode,
    /// 算法名称无法识别
    UnknownAlgorithm(String),
    /// 节点不在网络中
    UnknownNode(String),
}

/// 通过校验的选择
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Selection<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub algorithm: Algorithm,
}

/// 校验顺序：缺失 -> 相同节点 -> 算法 -> 节点存在性
pub(crate) fn validate<'a>(
    request: &'a QueryRequest,
    node_exists: impl Fn(&str) -> bool,
) -> std::result::Result<Selection<'a>, SelectionIssue> {
    let (Some(origin), Some(destination), Some(algorithm)) = (
        request.origin(),
        request.destination(),
        request.algorithm(),
    ) else {
        return Err(SelectionIssue::MissingSelection);
    };

    if origin == destination {
        return Err(SelectionIssue::SameNode);
    }

    let algorithm = algorithm
        .parse::<Algorithm>()
        .map_err(|_| SelectionIssue::UnknownAlgorithm(algorithm.to_string()))?;

    for name in [origin, destination] {
        if !node_exists(name) {
            return Err(SelectionIssue::UnknownNode(name.to_string()));
        }
    }

    Ok(Selection {
        origin,
        destination,
        algorithm,
    })
}
