//! 结果打印器
//!
//! 以表格形式输出节点、管道和流量分配

use crate::graph::{EdgeRecord, Graph, Node};
use crate::query::FlowSummary;
use crate::types::NodeKind;
use prettytable::{format, row, Table};

/// 结果打印器
#[derive(Default)]
pub struct Printer;

impl Printer {
    pub fn new() -> Self {
        Self
    }

    fn table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table
    }

    /// 网络统计
    pub fn print_stats(&self, graph: &Graph) -> String {
        let mut table = Self::table();
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Node Count", graph.node_count()]);
        table.add_row(row!["Edge Count", graph.edge_count()]);
        for kind in NodeKind::ALL {
            table.add_row(row![kind.as_str(), graph.nodes_by_kind(kind).len()]);
        }
        table.to_string()
    }

    /// 节点列表
    pub fn print_nodes(&self, graph: &Graph, nodes: &[&Node]) -> String {
        if nodes.is_empty() {
            return "Empty set\n".to_string();
        }

        let mut table = Self::table();
        table.set_titles(row!["Name", "Kind", "Out", "In"]);
        for node in nodes {
            table.add_row(row![
                node.name(),
                node.kind(),
                graph.out_degree(node.id()),
                graph.in_degree(node.id())
            ]);
        }
        format!("{}{} node(s)\n", table, nodes.len())
    }

    /// 单个节点及其出入管道
    pub fn print_node(&self, graph: &Graph, node: &Node) -> String {
        let mut output = format!("{} ({})\n", node.name(), node.kind());

        let outgoing = graph.out_edges(node.name());
        if !outgoing.is_empty() {
            output.push_str("出水管道:\n");
            output.push_str(&self.print_edges(&outgoing));
        }

        let incoming = graph.in_edges(node.name());
        if !incoming.is_empty() {
            output.push_str("进水管道:\n");
            output.push_str(&self.print_edges(&incoming));
        }

        output
    }

    /// 管道列表
    pub fn print_edges(&self, edges: &[EdgeRecord]) -> String {
        let mut table = Self::table();
        table.set_titles(row!["Source", "Destination", "Distance (km)", "Capacity (L/s)"]);
        for edge in edges {
            table.add_row(row![
                edge.source,
                edge.destination,
                edge.distance,
                edge.capacity
            ]);
        }
        table.to_string()
    }

    /// 从起点到各可达节点的距离
    pub fn print_distances(&self, origin: &str, distances: &[(String, f64)]) -> String {
        let mut table = Self::table();
        table.set_titles(row!["Node", "Distance (km)"]);
        for (name, distance) in distances {
            table.add_row(row![name, distance]);
        }
        format!("从 {} 出发:\n{}{} node(s)\n", origin, table, distances.len())
    }

    /// 流量分配，瓶颈边标记 *
    pub fn print_flow(&self, summary: &FlowSummary) -> String {
        let mut table = Self::table();
        table.set_titles(row!["Source", "Destination", "Flow (L/s)", "Capacity (L/s)", ""]);
        for a in &summary.assignments {
            let saturated = summary
                .bottlenecks
                .iter()
                .any(|b| b.source == a.source && b.destination == a.destination);
            let mark = if saturated { "*" } else { "" };
            table.add_row(row![a.source, a.destination, a.flow, a.capacity, mark]);
        }
        table.to_string()
    }

    /// 帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   hydronet 命令帮助
═══════════════════════════════════════════════════════════════

  help, h, ?                 显示帮助
  quit, exit, q              退出程序
  stats, info                显示网络统计

  nodes [类型]               列出节点
                             类型: source, treatment_plant, reservoir,
                                   pumping_station, consumption_point
  node <名称>                查看节点及其管道

  path <起点> -> <终点>      按距离查找最优路线（Bellman-Ford）
                             示例: path Río Rímac -> Hogar Miraflores 3
  flow <源点> -> <汇点>      计算最大流量（Ford-Fulkerson）
                             示例: flow Río Rímac -> Reservorio de Huachipa
  reach <起点> -> <终点>     检查是否存在路线
  distances, dist <起点>     列出到各可达节点的最短距离

  query <算法> <起点> -> <终点>
                             算法: shortest-path, bellman-ford,
                                   max-flow, ford-fulkerson

提示: Tab 可补全命令和节点名称
═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}
