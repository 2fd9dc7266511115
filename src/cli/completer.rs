//! 命令与节点名称补全器
//!
//! 基于 rustyline 实现 Tab 补全功能

use super::commands::COMMAND_NAMES;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// 算法名称（query 命令的第一个参数）
const ALGORITHM_NAMES: &[&str] = &["shortest-path", "bellman-ford", "max-flow", "ford-fulkerson"];

/// 命令参数中需要补全节点名称的命令
const NODE_COMMANDS: &[&str] = &["node", "path", "flow", "reach", "distances", "dist"];

/// hydronet CLI 补全器
#[derive(Default)]
pub struct NetworkCompleter {
    node_names: Vec<String>,
}

impl NetworkCompleter {
    pub fn new(node_names: Vec<String>) -> Self {
        Self { node_names }
    }

    /// 计算补全位置和候选项
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let line_to_cursor = &line[..pos];

        // 第一个单词：命令名
        let Some(space) = line_to_cursor.find(char::is_whitespace) else {
            let prefix = line_to_cursor.to_lowercase();
            let matches = COMMAND_NAMES
                .iter()
                .filter(|cmd| cmd.starts_with(&prefix))
                .map(|cmd| cmd.to_string())
                .collect();
            return (0, matches);
        };

        let command = line_to_cursor[..space].to_lowercase();
        let mut start = space + leading_whitespace(&line_to_cursor[space..]);

        if command == "query" {
            let args = &line_to_cursor[start..];
            match args.find(char::is_whitespace) {
                None => {
                    let matches = ALGORITHM_NAMES
                        .iter()
                        .filter(|alg| alg.starts_with(args))
                        .map(|alg| alg.to_string())
                        .collect();
                    return (start, matches);
                }
                Some(end) => {
                    start += end + leading_whitespace(&args[end..]);
                }
            }
        } else if !NODE_COMMANDS.contains(&command.as_str()) {
            return (pos, Vec::new());
        }

        // "->" 之后补全终点
        if let Some(arrow) = line_to_cursor[start..].find("->") {
            let after = start + arrow + 2;
            start = after + leading_whitespace(&line_to_cursor[after..]);
        }

        let prefix = line_to_cursor[start..].to_lowercase();
        let matches = self
            .node_names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect();
        (start, matches)
    }
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

impl Completer for NetworkCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(line, pos);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for NetworkCompleter {
    type Hint = String;
}

impl Highlighter for NetworkCompleter {}

impl Validator for NetworkCompleter {}

impl Helper for NetworkCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer() -> NetworkCompleter {
        NetworkCompleter::new(vec![
            "Río Rímac".to_string(),
            "Reservorio de Huachipa".to_string(),
            "PTAP La Atarjea".to_string(),
        ])
    }

    #[test]
    fn test_complete_command() {
        let (start, matches) = completer().candidates("pa", 2);
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["path"]);

        let (_, matches) = completer().candidates("no", 2);
        assert_eq!(matches, vec!["nodes", "node"]);

        let (_, matches) = completer().candidates("di", 2);
        assert_eq!(matches, vec!["distances"]);
    }

    #[test]
    fn test_complete_origin_and_destination() {
        let line = "path r";
        let (start, matches) = completer().candidates(line, line.len());
        assert_eq!(start, 5);
        assert_eq!(matches, vec!["Río Rímac", "Reservorio de Huachipa"]);

        let line = "flow Río Rímac -> PT";
        let (start, matches) = completer().candidates(line, line.len());
        assert_eq!(&line[start..], "PT");
        assert_eq!(matches, vec!["PTAP La Atarjea"]);

        let line = "distances Res";
        let (start, matches) = completer().candidates(line, line.len());
        assert_eq!(start, 10);
        assert_eq!(matches, vec!["Reservorio de Huachipa"]);
    }

    #[test]
    fn test_complete_query_algorithm() {
        let line = "query max";
        let (start, matches) = completer().candidates(line, line.len());
        assert_eq!(start, 6);
        assert_eq!(matches, vec!["max-flow"]);

        let line = "query max-flow Res";
        let (start, matches) = completer().candidates(line, line.len());
        assert_eq!(&line[start..], "Res");
        assert_eq!(matches, vec!["Reservorio de Huachipa"]);
    }

    #[test]
    fn test_no_completion_for_other_commands() {
        let (_, matches) = completer().candidates("stats x", 7);
        assert!(matches.is_empty());
    }
}
