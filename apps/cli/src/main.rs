//! # Strider CLI
//!
//! 资源层级检查与租约附加演练工具。
//!
//! ```bash
//! # 校验资源层级描述文件
//! strider-cli tree check robot.toml
//!
//! # 列出某子树下的叶子资源
//! strider-cli tree leaves robot.toml --root arm
//!
//! # 演练：按配置为请求附加租约（不发送任何请求）
//! strider-cli stamp --leases leases.json --subtree body
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{CompareCommand, ConfigCommand, StampCommand, TreeCommand};

/// Strider CLI - 租约工具
#[derive(Parser, Debug)]
#[command(name = "strider-cli")]
#[command(about = "Inspect resource trees and dry-run lease stamping", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 资源层级
    #[command(subcommand)]
    Tree(TreeCommand),

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 演练租约附加
    Stamp {
        #[command(flatten)]
        args: StampCommand,
    },

    /// 比较两个租约
    Compare {
        #[command(flatten)]
        args: CompareCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strider_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tree(cmd) => cmd.execute(),
        Commands::Config(cmd) => cmd.execute(),
        Commands::Stamp { args } => args.execute(),
        Commands::Compare { args } => args.execute(),
    }
}
