//! 交互式命令行
//!
//! 命令解析、Tab 补全和表格输出

mod commands;
mod completer;
mod printer;

pub use commands::{Command, CommandResult, Session, COMMAND_NAMES};
pub use completer::NetworkCompleter;
pub use printer::Printer;
