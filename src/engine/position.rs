// ==========================================
// CFS装箱计划系统 - 箱位状态适配器
// ==========================================
// 职责: 查询集装箱最近一次在场位置, 按箱号缓存
// 红线: 结果仅用于门控 CONFIRMED 转换; 未知一律视为未就绪,
//       快照允许过期 (advisory), 最终正确性由服务端保证
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::join_all;

use crate::domain::types::PositionState;
use crate::engine::duplicate::normalize_container_number;
use crate::store::plan_store::PositionLookup;

/// 就绪判定要求的箱位值 (集装箱须在 CFS 内)
pub const POSITION_IN_CFS: &str = "IN_CFS";

// ==========================================
// PositionStatus - 箱位查询结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionStatus {
    pub state: PositionState,
    pub value: Option<String>,
}

impl PositionStatus {
    /// 尚未查询
    pub fn idle() -> Self {
        Self {
            state: PositionState::Idle,
            value: None,
        }
    }

    /// 查询中
    pub fn loading() -> Self {
        Self {
            state: PositionState::Loading,
            value: None,
        }
    }

    /// 查询成功
    pub fn success(value: &str) -> Self {
        Self {
            state: PositionState::Success,
            value: Some(value.to_string()),
        }
    }

    /// 查询失败
    pub fn error() -> Self {
        Self {
            state: PositionState::Error,
            value: None,
        }
    }

    /// 判断查询是否成功
    pub fn is_success(&self) -> bool {
        self.state == PositionState::Success
    }

    /// 判断箱位是否在 CFS 内
    pub fn is_in_cfs(&self) -> bool {
        self.is_success() && self.value.as_deref() == Some(POSITION_IN_CFS)
    }
}

// ==========================================
// PositionStatusAdapter - 箱位状态适配器
// ==========================================

/// 箱位状态适配器
///
/// 按归一化箱号缓存查询结果; 每次工作台加载/聚焦时整体刷新,
/// 刷新成本低且必须反映堆场实况, 因此不提供手工失效接口。
pub struct PositionStatusAdapter {
    lookup: Arc<dyn PositionLookup>,
    cache: Mutex<HashMap<String, PositionStatus>>,
}

impl PositionStatusAdapter {
    /// 创建新的适配器实例
    pub fn new(lookup: Arc<dyn PositionLookup>) -> Self {
        Self {
            lookup,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// 读取缓存中的箱位状态 (未查询过 → IDLE)
    pub fn cached(&self, container_number: &str) -> PositionStatus {
        let key = normalize_container_number(container_number);
        self.guard()
            .get(&key)
            .cloned()
            .unwrap_or_else(PositionStatus::idle)
    }

    /// 刷新单个箱号的箱位状态
    ///
    /// # 规则
    /// - 查询期间缓存置为 LOADING
    /// - 查询成功且有周转记录 → SUCCESS + 位置值
    /// - 查询成功但无周转记录 → ERROR (无法核验, 保守处理)
    /// - 查询失败 → ERROR
    pub async fn refresh(&self, container_number: &str) -> PositionStatus {
        let key = normalize_container_number(container_number);
        if key.is_empty() {
            return PositionStatus::idle();
        }

        self.guard().insert(key.clone(), PositionStatus::loading());

        let status = match self.lookup.container_position(&key).await {
            Ok(Some(value)) => PositionStatus::success(&value),
            Ok(None) => PositionStatus::error(),
            Err(e) => {
                tracing::warn!("箱位查询失败: container_number={}, err={}", key, e);
                PositionStatus::error()
            }
        };

        self.guard().insert(key, status.clone());
        status
    }

    /// 批量刷新多个箱号 (并发发起, 全部落缓存)
    pub async fn refresh_all(&self, container_numbers: &[String]) {
        let futures: Vec<_> = container_numbers
            .iter()
            .map(|number| self.refresh(number))
            .collect();
        join_all(futures).await;
    }

    // 缓存锁中毒时继续使用内部数据 (缓存本身可安全重建)
    fn guard(&self) -> std::sync::MutexGuard<'_, HashMap<String, PositionStatus>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
