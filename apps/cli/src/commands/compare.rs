//! 租约比较命令

use anyhow::{Context, Result};
use clap::Args;
use strider_protocol::Lease;

/// 比较两个租约（JSON 字面量）
#[derive(Args, Debug)]
pub struct CompareCommand {
    /// 左侧租约，如 '{"resource":"body","epoch":"E","sequence":[1,2]}'
    pub left: String,

    /// 右侧租约
    pub right: String,
}

impl CompareCommand {
    pub fn execute(self) -> Result<()> {
        let left = parse_lease(&self.left).context("Invalid left lease")?;
        let right = parse_lease(&self.right).context("Invalid right lease")?;

        let result = left.compare(&right);
        tracing::debug!("{} vs {}: {:?}", left, right, result);
        println!("{:?}", result);
        Ok(())
    }
}

fn parse_lease(text: &str) -> Result<Lease> {
    Ok(serde_json::from_str(text)?)
}
