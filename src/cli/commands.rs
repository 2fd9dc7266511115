//! 交互命令解析与执行
//!
//! 路线和流量命令使用 `->` 分隔起点和终点，节点名称可以包含空格

use super::printer::Printer;
use crate::query::{QueryOutcome, QueryRequest, QueryService};
use crate::types::{Algorithm, NodeKind};

/// 命令执行结果
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 已解析的命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Stats,
    /// 列出节点，可按类型过滤
    Nodes(Option<NodeKind>),
    /// 查看单个节点及其管道
    Node(String),
    /// 执行一次查询；algorithm 原样交给查询服务校验
    Query {
        algorithm: String,
        origin: String,
        destination: String,
    },
    /// 可达性检查
    Reach { origin: String, destination: String },
    /// 从某节点出发到各可达节点的距离
    Distances(String),
}

/// 命令名称（用于补全）
pub const COMMAND_NAMES: &[&str] = &[
    "help", "quit", "exit", "stats", "nodes", "node", "path", "flow", "reach", "distances",
    "query",
];

impl Command {
    /// 解析一行输入；空行返回 `Ok(None)`
    pub fn parse(input: &str) -> Result<Option<Command>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        let command = match cmd.to_lowercase().as_str() {
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "stats" | "info" => Command::Stats,
            "nodes" | "ls" => {
                if rest.is_empty() {
                    Command::Nodes(None)
                } else {
                    Command::Nodes(Some(rest.parse::<NodeKind>()?))
                }
            }
            "node" | "n" => {
                if rest.is_empty() {
                    return Err("用法: node <名称>".to_string());
                }
                Command::Node(rest.to_string())
            }
            "path" | "route" => {
                let (origin, destination) = split_pair(rest, "path")?;
                Command::Query {
                    algorithm: Algorithm::ShortestPath.to_string(),
                    origin,
                    destination,
                }
            }
            "flow" | "maxflow" => {
                let (origin, destination) = split_pair(rest, "flow")?;
                Command::Query {
                    algorithm: Algorithm::MaxFlow.to_string(),
                    origin,
                    destination,
                }
            }
            "reach" => {
                let (origin, destination) = split_pair(rest, "reach")?;
                Command::Reach {
                    origin,
                    destination,
                }
            }
            "distances" | "dist" => {
                if rest.is_empty() {
                    return Err("用法: distances <起点>".to_string());
                }
                Command::Distances(rest.to_string())
            }
            "query" => {
                let (algorithm, pair) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "用法: query <算法> <起点> -> <终点>".to_string())?;
                let (origin, destination) = split_pair(pair.trim(), "query <算法>")?;
                Command::Query {
                    algorithm: algorithm.to_string(),
                    origin,
                    destination,
                }
            }
            other => return Err(format!("未知命令: {}，输入 help 查看帮助", other)),
        };

        Ok(Some(command))
    }
}

/// 拆分 "起点 -> 终点"
fn split_pair(args: &str, usage: &str) -> Result<(String, String), String> {
    let (origin, destination) = args
        .split_once("->")
        .ok_or_else(|| format!("用法: {} <起点> -> <终点>", usage))?;
    Ok((origin.trim().to_string(), destination.trim().to_string()))
}

/// 交互会话
pub struct Session {
    service: QueryService,
    printer: Printer,
}

impl Session {
    pub fn new(service: QueryService) -> Self {
        Self {
            service,
            printer: Printer::new(),
        }
    }

    /// 节点名称（用于补全）
    pub fn node_names(&self) -> Vec<String> {
        self.service
            .graph()
            .node_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// 解析并执行一行输入
    pub fn execute(&self, input: &str) -> CommandResult {
        match Command::parse(input) {
            Ok(Some(command)) => self.execute_command(&command),
            Ok(None) => CommandResult::Continue,
            Err(e) => CommandResult::Error(e),
        }
    }

    pub fn execute_command(&self, command: &Command) -> CommandResult {
        let graph = self.service.graph();

        match command {
            Command::Help => CommandResult::Message(Printer::print_help()),
            Command::Quit => CommandResult::Exit,
            Command::Stats => CommandResult::Message(self.printer.print_stats(graph)),
            Command::Nodes(kind) => {
                let nodes: Vec<_> = match kind {
                    Some(kind) => graph.nodes_by_kind(*kind),
                    None => graph.nodes().collect(),
                };
                CommandResult::Message(self.printer.print_nodes(graph, &nodes))
            }
            Command::Node(name) => match graph.node(name) {
                Some(node) => CommandResult::Message(self.printer.print_node(graph, node)),
                None => CommandResult::Error(format!("节点不存在: {}", name)),
            },
            Command::Reach {
                origin,
                destination,
            } => {
                let verdict = if graph.has_path(origin, destination) {
                    "可达"
                } else {
                    "不可达"
                };
                CommandResult::Message(format!("{} -> {}: {}", origin, destination, verdict))
            }
            Command::Distances(origin) => {
                if graph.node(origin).is_none() {
                    return CommandResult::Error(format!("节点不存在: {}", origin));
                }
                match self.service.distances_from(origin) {
                    Ok(distances) => {
                        CommandResult::Message(self.printer.print_distances(origin, &distances))
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }
            Command::Query {
                algorithm,
                origin,
                destination,
            } => {
                let request = QueryRequest::new(origin, destination, algorithm);
                match self.service.run(&request) {
                    Ok(outcome) => self.render_outcome(&outcome),
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }
        }
    }

    fn render_outcome(&self, outcome: &QueryOutcome) -> CommandResult {
        if outcome.is_invalid() {
            return CommandResult::Error(outcome.summary());
        }
        match outcome {
            QueryOutcome::Flow(summary) if !summary.is_zero() => CommandResult::Message(format!(
                "{}\n{}",
                outcome.summary(),
                self.printer.print_flow(summary)
            )),
            _ => CommandResult::Message(outcome.summary()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::metrics::Metrics;
    use std::sync::Arc;

    fn session() -> Session {
        let graph = Arc::new(Graph::from_edges([
            ("Río Rímac", "PTAP La Atarjea", 5.0, 10.0),
            ("PTAP La Atarjea", "Hogar 1", 7.0, 4.0),
        ]));
        Session::new(QueryService::with_metrics(graph, Arc::new(Metrics::new())))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("QUIT").unwrap(), Some(Command::Quit));
        assert_eq!(
            Command::parse("nodes reservoir").unwrap(),
            Some(Command::Nodes(Some(NodeKind::Reservoir)))
        );
        assert_eq!(
            Command::parse("path Río Rímac  ->  Hogar 1").unwrap(),
            Some(Command::Query {
                algorithm: "shortest-path".into(),
                origin: "Río Rímac".into(),
                destination: "Hogar 1".into(),
            })
        );
        assert_eq!(
            Command::parse("query bellman-ford A -> B").unwrap(),
            Some(Command::Query {
                algorithm: "bellman-ford".into(),
                origin: "A".into(),
                destination: "B".into(),
            })
        );
        assert_eq!(
            Command::parse("dist PTAP La Atarjea").unwrap(),
            Some(Command::Distances("PTAP La Atarjea".into()))
        );
        assert!(Command::parse("distances").is_err());
        assert!(Command::parse("path A B").is_err());
        assert!(Command::parse("nodes valve").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }

    #[test]
    fn test_path_and_flow_commands() {
        let session = session();

        match session.execute("path Río Rímac -> Hogar 1") {
            CommandResult::Message(msg) => {
                assert!(msg.contains("Río Rímac -> PTAP La Atarjea -> Hogar 1"));
                assert!(msg.contains("12 km"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        match session.execute("flow Río Rímac -> Hogar 1") {
            CommandResult::Message(msg) => assert!(msg.contains("4 L/s")),
            other => panic!("unexpected result: {:?}", other),
        }

        match session.execute("path Hogar 1 -> Río Rímac") {
            CommandResult::Message(msg) => assert!(msg.contains("没有可用路线")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_selection_is_an_error_line() {
        let session = session();

        assert_eq!(
            session.execute("flow Hogar 1 -> Hogar 1"),
            CommandResult::Error("起点和终点不能相同。".into())
        );
        assert_eq!(
            session.execute("query dijkstra Río Rímac -> Hogar 1"),
            CommandResult::Error("无法识别的算法: dijkstra".into())
        );
    }

    #[test]
    fn test_distances_command() {
        let session = session();

        match session.execute("distances Río Rímac") {
            CommandResult::Message(msg) => {
                assert!(msg.contains("PTAP La Atarjea"));
                assert!(msg.contains("Hogar 1"));
                assert!(msg.contains("12"));
                assert!(msg.contains("3 node(s)"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            session.execute("distances Nowhere"),
            CommandResult::Error("节点不存在: Nowhere".into())
        );
    }

    #[test]
    fn test_reach_and_node() {
        let session = session();

        assert_eq!(
            session.execute("reach Río Rímac -> Hogar 1"),
            CommandResult::Message("Río Rímac -> Hogar 1: 可达".into())
        );
        assert!(matches!(session.execute("node Nowhere"), CommandResult::Error(_)));
        assert!(matches!(
            session.execute("node PTAP La Atarjea"),
            CommandResult::Message(_)
        ));
        assert_eq!(session.execute("exit"), CommandResult::Exit);
        assert_eq!(session.execute(""), CommandResult::Continue);
    }
}
