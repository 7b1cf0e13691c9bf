//! 会话条件评估命令行
//!
//! 针对一份会话快照（扁平 JSON 对象）评估单个条件定义。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use personalisation_shared::observability;
use session_criteria::{
    InMemorySessionProvider, PersonalisationGroupCriteria, ServiceConfig, SessionCriteria,
    SessionMatch,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 会话条件命令行工具
#[derive(Parser, Debug)]
#[command(name = "session-criteria")]
#[command(version, about = "会话个性化条件评估工具")]
#[command(propagate_version = true)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 评估条件定义，输出 true / false
    Evaluate {
        /// 条件定义 JSON，如 '{"key":"visits","match":"GreaterThanValue","value":"3"}'
        #[arg(short, long)]
        definition: String,

        /// 会话快照文件（扁平 JSON 对象）
        #[arg(short, long)]
        session: PathBuf,
    },

    /// 列出支持的匹配操作符
    Operators,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 统一加载配置：从 config/session-criteria.toml 等分层加载
    let mut config = ServiceConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        ServiceConfig::default()
    });
    if let Some(level) = &cli.log_level {
        config.observability = config.observability.with_log_level(level);
    }
    let _guard = observability::init(&config.observability)?;

    match cli.command {
        Commands::Evaluate {
            definition,
            session,
        } => {
            let matched = run_evaluate(&config, &definition, &session)?;
            println!("{}", matched);
        }
        Commands::Operators => {
            for op in SessionMatch::ALL {
                let usage = if op.requires_value() {
                    "requires value"
                } else {
                    "no value"
                };
                println!("{:<20} {}", op.as_str(), usage);
            }
        }
    }

    Ok(())
}

fn run_evaluate(config: &ServiceConfig, definition: &str, session: &Path) -> Result<bool> {
    let raw = std::fs::read_to_string(session)
        .with_context(|| format!("读取会话文件失败: {}", session.display()))?;
    let provider = InMemorySessionProvider::from_json(&raw)
        .with_context(|| format!("解析会话文件失败: {}", session.display()))?;
    info!(keys = provider.len(), "会话已加载");

    let criteria = SessionCriteria::with_config(provider, &config.criteria);
    let matched = criteria
        .matches_visitor(Some(definition))
        .inspect_err(|e| warn!(error = %e, "条件评估失败"))?;

    info!(criteria = criteria.alias(), matched, "评估完成");
    Ok(matched)
}
