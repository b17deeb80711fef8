//! 请求 / 响应租约处理
//!
//! - `LeaseRequestProcessor`: 发送前给请求附加追加过条目的租约
//! - `LeaseResponseProcessor`: 收到响应后把服务端的租约判定合并回钱包
//!
//! # 附加规则
//!
//! 1. 请求类型没有租约字段 → 不处理
//! 2. 调用方已显式填写租约 → 不处理（显式优先）
//! 3. 资源列表为空 → 不附加任何租约（显式放弃）
//! 4. 否则对列表中每个资源 `advance` 后附加；任一资源缺失则返回
//!    `NoSuchLease`，请求保持原样
//!
//! # 示例
//!
//! ```rust
//! use std::sync::Arc;
//! use strider_lease::{LeaseRequestProcessor, LeaseWallet};
//! use strider_protocol::{Lease, PlayMissionRequest, RequestHeader};
//!
//! let wallet = Arc::new(LeaseWallet::new("client"));
//! wallet
//!     .add(Lease::new("body", "epoch", vec![1], vec!["root".to_string()]))
//!     .unwrap();
//!
//! let processor = LeaseRequestProcessor::new(wallet, ["body"]);
//! let mut request = PlayMissionRequest::new(RequestHeader::new("client"));
//! processor.mutate(&mut request, None).unwrap();
//!
//! assert_eq!(request.leases[0].sequence, vec![1, 1]);
//! ```

use std::sync::Arc;

use strider_protocol::{LeaseFields, LeaseSlot, LeaseUseResults};

use crate::error::LeaseError;
use crate::tree::ResourceForest;
use crate::wallet::LeaseWallet;

/// 请求的租约状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLeaseState {
    /// 是否支持多租约；`None` 表示请求类型没有租约字段
    pub multi_lease: Option<bool>,
    /// 是否已经携带租约
    pub has_lease: bool,
}

/// 请求租约处理器
///
/// 绑定一个钱包和一组默认资源，在发送前给请求盖章。
#[derive(Debug, Clone)]
pub struct LeaseRequestProcessor {
    wallet: Arc<LeaseWallet>,
    resource_list: Vec<String>,
    resources: Option<Arc<ResourceForest>>,
}

impl LeaseRequestProcessor {
    /// 创建处理器
    ///
    /// `resource_list` 是 `mutate` 未指定资源时使用的默认列表。
    pub fn new<I, S>(wallet: Arc<LeaseWallet>, resource_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            wallet,
            resource_list: resource_list.into_iter().map(Into::into).collect(),
            resources: None,
        }
    }

    /// 绑定资源层级，用于校验资源名
    #[must_use]
    pub fn with_tree(mut self, resources: Arc<ResourceForest>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn wallet(&self) -> &Arc<LeaseWallet> {
        &self.wallet
    }

    pub fn resource_list(&self) -> &[String] {
        &self.resource_list
    }

    /// 查询请求的租约状态
    pub fn get_lease_state<R: LeaseFields>(&self, request: &R) -> RequestLeaseState {
        RequestLeaseState {
            multi_lease: R::SHAPE.multi_lease(),
            has_lease: request.has_lease(),
        }
    }

    /// 给请求附加租约
    ///
    /// `resource_list` 为 `None` 时使用默认列表；`Some(&[])` 表示不附加。
    ///
    /// # 错误
    ///
    /// - `NoSuchLease`: 钱包中缺少某个资源的租约
    /// - `UnknownResource`: 绑定了资源层级且资源名不在其中
    /// - `AmbiguousSingleLease`: 单租约请求指定了多个资源
    ///
    /// 出错时请求保持原样。
    pub fn mutate<R: LeaseFields>(
        &self,
        request: &mut R,
        resource_list: Option<&[String]>,
    ) -> Result<(), LeaseError> {
        let state = self.get_lease_state(request);
        if state.multi_lease.is_none() || state.has_lease {
            return Ok(());
        }

        let resources = resource_list.unwrap_or(self.resource_list.as_slice());
        if resources.is_empty() {
            return Ok(());
        }
        self.check_known(resources)?;

        match request.lease_slot() {
            LeaseSlot::None => {},
            LeaseSlot::Single(slot) => {
                if resources.len() > 1 {
                    return Err(LeaseError::AmbiguousSingleLease {
                        count: resources.len(),
                    });
                }
                let lease = self.wallet.advance(&resources[0])?;
                tracing::trace!("Attached lease {}", lease);
                *slot = Some(lease);
            },
            LeaseSlot::Repeated(slot) => {
                let leases = self.wallet.advance_all(resources)?;
                tracing::trace!("Attached {} leases", leases.len());
                slot.extend(leases);
            },
        }
        Ok(())
    }

    /// 为某资源子树下的所有叶子资源附加租约
    ///
    /// 需要先通过 `with_tree` 绑定资源层级。
    pub fn mutate_subtree<R: LeaseFields>(
        &self,
        request: &mut R,
        root: &str,
    ) -> Result<(), LeaseError> {
        let leaves: Vec<String> = self
            .resources
            .as_ref()
            .and_then(|forest| forest.subtree(root))
            .map(|subtree| subtree.leaf_names().into_iter().collect())
            .ok_or_else(|| LeaseError::UnknownResource {
                resource: root.to_string(),
            })?;
        self.mutate(request, Some(&leaves))
    }

    fn check_known(&self, resources: &[String]) -> Result<(), LeaseError> {
        let Some(forest) = &self.resources else {
            return Ok(());
        };
        match resources.iter().find(|name| !forest.contains(name)) {
            Some(unknown) => Err(LeaseError::UnknownResource {
                resource: unknown.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// 响应租约处理器
///
/// 把响应里的 `LeaseUseResult` 逐条交给钱包合并。
#[derive(Debug, Clone)]
pub struct LeaseResponseProcessor {
    wallet: Arc<LeaseWallet>,
}

impl LeaseResponseProcessor {
    pub fn new(wallet: Arc<LeaseWallet>) -> Self {
        Self { wallet }
    }

    /// 处理响应，返回被替换的钱包条目数量
    pub fn process<R: LeaseUseResults>(&self, response: &R) -> usize {
        response
            .lease_use_results()
            .iter()
            .filter(|result| self.wallet.on_lease_use_result(result))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_protocol::{
        Lease, LeaseUseResult, LeaseUseStatus, PlayMissionRequest, PlayMissionResponse,
        RequestHeader, ResourceTreeSpec, RobotCommandRequest, RobotStateRequest,
    };

    use crate::tree::ResourceTree;

    fn wallet() -> Arc<LeaseWallet> {
        let wallet = Arc::new(LeaseWallet::new("client-a"));
        wallet
            .add(Lease::new("body", "E", vec![1], vec!["root".to_string()]))
            .unwrap();
        wallet
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_lease_state() {
        let processor = LeaseRequestProcessor::new(wallet(), ["body"]);

        let state = processor.get_lease_state(&RobotStateRequest::default());
        assert_eq!(state.multi_lease, None);
        assert!(!state.has_lease);

        let mut single = RobotCommandRequest::default();
        assert_eq!(
            processor.get_lease_state(&single).multi_lease,
            Some(false)
        );
        single.lease = Some(Lease::default());
        assert!(processor.get_lease_state(&single).has_lease);

        let state = processor.get_lease_state(&PlayMissionRequest::default());
        assert_eq!(state.multi_lease, Some(true));
    }

    #[test]
    fn test_mutate_single() {
        let processor = LeaseRequestProcessor::new(wallet(), ["body"]);
        let mut request = RobotCommandRequest::new(RequestHeader::new("client-a"), "sit");
        processor.mutate(&mut request, None).unwrap();

        let lease = request.lease.unwrap();
        assert_eq!(lease.resource, "body");
        assert_eq!(lease.sequence, vec![1, 1]);
    }

    #[test]
    fn test_mutate_single_with_many_resources() {
        let wallet = wallet();
        wallet
            .add(Lease::new("arm", "E", vec![1], vec![]))
            .unwrap();
        let processor = LeaseRequestProcessor::new(wallet, ["body", "arm"]);

        let mut request = RobotCommandRequest::default();
        assert_eq!(
            processor.mutate(&mut request, None),
            Err(LeaseError::AmbiguousSingleLease { count: 2 })
        );
        assert!(request.lease.is_none());
    }

    #[test]
    fn test_mutate_no_lease_field_is_noop() {
        let processor = LeaseRequestProcessor::new(wallet(), ["missing"]);
        let mut request = RobotStateRequest::default();
        // 没有租约字段时不会去查钱包
        assert!(processor.mutate(&mut request, None).is_ok());
    }

    #[test]
    fn test_mutate_missing_resource_leaves_request_untouched() {
        let processor = LeaseRequestProcessor::new(wallet(), ["body"]);
        let mut request = PlayMissionRequest::default();
        let result = processor.mutate(&mut request, Some(&names(&["body", "arm"])));

        assert!(matches!(result, Err(LeaseError::NoSuchLease { .. })));
        assert!(request.leases.is_empty());
    }

    #[test]
    fn test_mutate_checks_tree() {
        let forest = Arc::new(ResourceForest::from(
            ResourceTree::build(&ResourceTreeSpec::node(
                "body",
                vec![ResourceTreeSpec::leaf("arm")],
            ))
            .unwrap(),
        ));
        let processor = LeaseRequestProcessor::new(wallet(), ["body"]).with_tree(forest);

        let mut request = PlayMissionRequest::default();
        assert_eq!(
            processor.mutate(&mut request, Some(&names(&["tail"]))),
            Err(LeaseError::UnknownResource {
                resource: "tail".to_string()
            })
        );
        // 在树中但钱包没有
        assert_eq!(
            processor.mutate(&mut request, Some(&names(&["arm"]))),
            Err(LeaseError::NoSuchLease {
                resource: "arm".to_string()
            })
        );
    }

    #[test]
    fn test_mutate_subtree() {
        let forest = Arc::new(
            ResourceForest::build(&[ResourceTreeSpec::node(
                "body",
                vec![
                    ResourceTreeSpec::leaf("mobility"),
                    ResourceTreeSpec::leaf("arm"),
                ],
            )])
            .unwrap(),
        );
        let wallet = wallet();
        wallet.add(Lease::new("arm", "E", vec![2], vec![])).unwrap();
        wallet
            .add(Lease::new("mobility", "E", vec![5], vec![]))
            .unwrap();
        let processor = LeaseRequestProcessor::new(wallet, Vec::<String>::new()).with_tree(forest);

        let mut request = PlayMissionRequest::default();
        processor.mutate_subtree(&mut request, "body").unwrap();
        let resources: Vec<_> = request.leases.iter().map(|l| l.resource.as_str()).collect();
        assert_eq!(resources, vec!["arm", "mobility"]);

        let mut request = PlayMissionRequest::default();
        assert!(matches!(
            processor.mutate_subtree(&mut request, "tail"),
            Err(LeaseError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_response_processor() {
        let wallet = wallet();
        let processor = LeaseResponseProcessor::new(wallet.clone());

        let latest = Lease::new("body", "E", vec![3], vec!["other".to_string()]);
        let response = PlayMissionResponse {
            lease_use_results: vec![
                LeaseUseResult {
                    status: LeaseUseStatus::Older,
                    owner: Some("other".to_string()),
                    attempted_lease: Some(wallet.advance("body").unwrap()),
                    latest_known_lease: Some(latest.clone()),
                },
                LeaseUseResult::default(),
            ],
            ..Default::default()
        };

        assert_eq!(processor.process(&response), 1);
        assert_eq!(wallet.get("body").unwrap(), latest);
    }
}
