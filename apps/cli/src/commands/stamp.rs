//! 租约附加演练
//!
//! 把租约文件装入钱包，按配置（或命令行指定的资源）为一个示例请求附加租约，
//! 输出附加后的请求 JSON。不会发送任何请求。

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use strider_protocol::{Lease, PlayMissionRequest, RequestHeader, RobotCommandRequest};
use strider_tools::LeaseSession;

use super::config::load_config;

/// 演练参数
#[derive(Args, Debug)]
pub struct StampCommand {
    /// 租约文件（JSON，单个租约或数组）
    #[arg(short, long)]
    pub leases: PathBuf,

    /// 配置文件路径（默认为用户配置目录）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 指定资源（可重复；默认使用配置中的资源列表）
    #[arg(short, long = "resource")]
    pub resources: Vec<String>,

    /// 为该子树下的所有叶子资源附加租约（需要配置资源层级）
    #[arg(long, conflicts_with = "resources")]
    pub subtree: Option<String>,

    /// 使用单租约请求（RobotCommand）代替多租约请求（PlayMission）
    #[arg(long)]
    pub single: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LeaseFile {
    Many(Vec<Lease>),
    One(Lease),
}

impl StampCommand {
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let session = LeaseSession::from_config(config).context("Invalid lease config")?;

        for lease in load_leases(&self.leases)? {
            tracing::debug!("Adding lease {}", lease);
            session
                .wallet
                .add(lease)
                .context("Lease file contains an invalid lease")?;
        }

        let header = RequestHeader::new(session.wallet.owner_identity());
        let explicit = (!self.resources.is_empty()).then_some(self.resources.as_slice());

        let output = if self.single {
            let mut request = RobotCommandRequest::new(header, "dry-run");
            self.stamp(&session, &mut request, explicit)?;
            serde_json::to_string_pretty(&request)?
        } else {
            let mut request = PlayMissionRequest::new(header);
            self.stamp(&session, &mut request, explicit)?;
            serde_json::to_string_pretty(&request)?
        };
        println!("{}", output);
        Ok(())
    }

    fn stamp<R: strider_protocol::LeaseFields>(
        &self,
        session: &LeaseSession,
        request: &mut R,
        explicit: Option<&[String]>,
    ) -> Result<()> {
        match &self.subtree {
            Some(root) => session.requests.mutate_subtree(request, root),
            None => session.requests.mutate(request, explicit),
        }
        .context("Failed to attach leases")
    }
}

fn load_leases(path: &Path) -> Result<Vec<Lease>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read lease file {}", path.display()))?;
    let leases = match serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse lease file {}", path.display()))?
    {
        LeaseFile::Many(leases) => leases,
        LeaseFile::One(lease) => vec![lease],
    };
    Ok(leases)
}
