//! 配置管理命令
//!
//! 管理租约客户端配置文件（持有者标识、默认资源、保活、资源层级）

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use strider_tools::LeaseClientConfig;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入一份默认配置
    Init {
        /// 配置文件路径（默认为用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },

    /// 显示当前配置
    Show {
        /// 配置文件路径（默认为用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// 检查配置（包括资源层级）
    Check {
        /// 配置文件路径（默认为用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Init { path, force } => Self::init_(path, force),
            ConfigCommand::Show { path } => Self::show_(path),
            ConfigCommand::Check { path } => Self::check_(path),
        }
    }

    fn init_(path: Option<PathBuf>, force: bool) -> Result<()> {
        let path = resolve_path(path)?;
        if path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }

        LeaseClientConfig::default()
            .save_to_file(&path)
            .context("Failed to write config file")?;
        println!("✅ Wrote default config: {}", path.display());
        Ok(())
    }

    fn show_(path: Option<PathBuf>) -> Result<()> {
        let config = load_config(path.as_deref())?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn check_(path: Option<PathBuf>) -> Result<()> {
        let config = load_config(path.as_deref())?;
        let forest = config
            .resource_forest()
            .context("Invalid resource tree in config")?;

        println!("Owner identity: {}", config.owner_identity);
        println!("Default resources: {}", config.resources.join(", "));
        println!(
            "Keep-alive: {} (every {} ms on '{}')",
            if config.keepalive.enabled { "on" } else { "off" },
            config.keepalive.interval_ms,
            config.keepalive.resource
        );

        if forest.is_empty() {
            println!("Resource tree: (not configured)");
            return Ok(());
        }

        let unknown: Vec<&str> = config
            .resources
            .iter()
            .map(String::as_str)
            .filter(|name| !forest.contains(name))
            .collect();
        if !unknown.is_empty() {
            bail!("Default resources not in resource tree: {}", unknown.join(", "));
        }
        println!("Resource tree: {} root(s)", forest.roots().len());
        Ok(())
    }
}

fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Ok(LeaseClientConfig::default_path()?),
    }
}

/// 加载配置；未指定路径时使用默认路径（文件不存在则取默认值）
pub fn load_config(path: Option<&Path>) -> Result<LeaseClientConfig> {
    let config = match path {
        Some(path) => LeaseClientConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LeaseClientConfig::load_or_default().context("Failed to load default config")?,
    };
    Ok(config)
}
