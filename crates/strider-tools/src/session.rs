//! 租约会话
//!
//! 按配置组装钱包、资源层级与请求/响应处理器，供应用层直接使用。

use std::sync::Arc;

use strider_lease::{
    LeaseKeepAlive, LeaseRequestProcessor, LeaseResponseProcessor, LeaseRetainer, LeaseWallet,
    ResourceForest,
};

use crate::config::LeaseClientConfig;
use crate::error::ConfigError;

/// 一个客户端进程的租约组件集合
#[derive(Debug, Clone)]
pub struct LeaseSession {
    pub wallet: Arc<LeaseWallet>,
    pub resources: Arc<ResourceForest>,
    pub requests: LeaseRequestProcessor,
    pub responses: LeaseResponseProcessor,
    config: LeaseClientConfig,
}

impl LeaseSession {
    /// 按配置构建
    ///
    /// 配置了资源层级时，请求处理器会校验资源名。
    pub fn from_config(config: LeaseClientConfig) -> Result<Self, ConfigError> {
        let resources = Arc::new(config.resource_forest()?);
        let wallet = Arc::new(LeaseWallet::new(config.owner_identity.clone()));

        let mut requests = LeaseRequestProcessor::new(wallet.clone(), config.resources.clone());
        if !resources.is_empty() {
            requests = requests.with_tree(resources.clone());
        }
        let responses = LeaseResponseProcessor::new(wallet.clone());

        Ok(Self {
            wallet,
            resources,
            requests,
            responses,
            config,
        })
    }

    pub fn config(&self) -> &LeaseClientConfig {
        &self.config
    }

    /// 按配置启动保活
    pub fn start_keepalive<R: LeaseRetainer>(&self, retainer: R) -> LeaseKeepAlive {
        LeaseKeepAlive::start(
            self.wallet.clone(),
            retainer,
            self.config.keepalive_config(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_lease::LeaseError;
    use strider_protocol::{Lease, PlayMissionRequest, ResourceTreeSpec};

    #[test]
    fn test_session_without_tree() {
        let session = LeaseSession::from_config(LeaseClientConfig::default()).unwrap();
        assert_eq!(session.wallet.owner_identity(), "strider-client");
        assert!(session.resources.is_empty());

        session
            .wallet
            .add(Lease::new("body", "E", vec![1], vec![]))
            .unwrap();
        let mut request = PlayMissionRequest::default();
        session.requests.mutate(&mut request, None).unwrap();
        assert_eq!(request.leases[0].client_names, vec!["strider-client"]);
    }

    #[test]
    fn test_session_with_tree_validates_names() {
        let config = LeaseClientConfig {
            resources: vec!["tail".to_string()],
            resource_tree: vec![ResourceTreeSpec::leaf("body")],
            ..Default::default()
        };
        let session = LeaseSession::from_config(config).unwrap();

        let mut request = PlayMissionRequest::default();
        assert!(matches!(
            session.requests.mutate(&mut request, None),
            Err(LeaseError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_session_rejects_malformed_tree() {
        let config = LeaseClientConfig {
            resource_tree: vec![ResourceTreeSpec::node(
                "body",
                vec![ResourceTreeSpec::leaf("body")],
            )],
            ..Default::default()
        };
        assert!(matches!(
            LeaseSession::from_config(config),
            Err(ConfigError::Spec(_))
        ));
    }
}
