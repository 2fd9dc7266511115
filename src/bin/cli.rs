//! hydronet CLI 工具
//!
//! 交互式命令行界面

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use hydronet::cli::{CommandResult, NetworkCompleter, Session};
use hydronet::import::load_network;
use hydronet::logging::init_tracing;
use hydronet::query::QueryService;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hydronet-cli")]
#[command(about = "hydronet 供水网络命令行工具")]
struct Args {
    /// 边列表 CSV 文件
    #[arg(short, long, env = "HYDRONET_DATASET", default_value = "data/lima_sample.csv")]
    dataset: String,

    /// CSV 字段分隔符（单个 ASCII 字符）
    #[arg(long, env = "HYDRONET_DELIMITER", default_value_t = ',')]
    delimiter: char,

    /// 执行单个命令后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(short, long, env = "HYDRONET_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow::anyhow!("分隔符必须是单个 ASCII 字符: {:?}", args.delimiter))?;
    let graph = load_network(&args.dataset, delimiter)
        .with_context(|| format!("无法加载数据集 {}", args.dataset))?;
    let session = Session::new(QueryService::new(graph.clone()));

    // 单个命令模式
    if let Some(command) = args.execute {
        return match session.execute(&command) {
            CommandResult::Error(e) => Err(anyhow::anyhow!(e)),
            result => {
                print_result(result);
                Ok(())
            }
        };
    }

    println!("{}", "hydronet - 供水网络路线与流量分析".bold());
    println!("=====================================");
    println!("数据集: {}", args.dataset);
    println!("  节点数: {}", graph.node_count());
    println!("  管道数: {}", graph.edge_count());
    println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

    let mut editor: Editor<NetworkCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(NetworkCompleter::new(session.node_names())));

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("hydronet> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match session.execute(line) {
                    CommandResult::Exit => break,
                    result => print_result(result),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "错误:".red(), e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    println!("再见！");
    Ok(())
}

fn print_result(result: CommandResult) {
    match result {
        CommandResult::Message(msg) => println!("{}", msg),
        CommandResult::Error(e) => println!("{} {}", "错误:".red(), e.yellow()),
        CommandResult::Continue | CommandResult::Exit => {}
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hydronet_history"))
}
