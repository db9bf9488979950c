// ==========================================
// CFS装箱计划系统 - 重复箱号检测
// ==========================================
// 职责: 跨计划检测同一物理箱号是否已被活跃计划占用
// 红线: 基于快照的咨询性预检, 不是事务性保证;
//       权威唯一性约束由服务端执行
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::plan::StuffingPlan;
use crate::store::error::StoreResult;
use crate::store::plan_store::PlanStore;
use crate::store::types::PlanQuery;

/// 归一化箱号: 去除全部空白并转大写
///
/// 唯一性比较一律基于归一化结果
pub fn normalize_container_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

// ==========================================
// ContainerOwner - 箱号占用方
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerOwner {
    pub plan_id: String,
    pub plan_label: String, // 计划编号 (用户可见)
    pub container_id: String,
}

// ==========================================
// ContainerOwnershipIndex - 箱号归属索引
// ==========================================

/// 箱号归属索引
///
/// 由全量非 DONE 计划快照构建的临时映射:
/// 归一化箱号 → 占用方列表。只存在于一次检测过程中, 不持久化。
#[derive(Debug, Default)]
pub struct ContainerOwnershipIndex {
    entries: HashMap<String, Vec<ContainerOwner>>,
}

impl ContainerOwnershipIndex {
    /// 从计划快照构建索引
    ///
    /// # 规则
    /// - DONE 计划不参与 (其箱号视为已释放)
    /// - 空箱号/未指定箱号的集装箱不参与
    pub fn from_plans(plans: &[StuffingPlan]) -> Self {
        let mut entries: HashMap<String, Vec<ContainerOwner>> = HashMap::new();

        for plan in plans {
            if !plan.status.is_active() {
                continue;
            }
            for container in &plan.containers {
                let Some(number) = container.container_number.as_deref() else {
                    continue;
                };
                let key = normalize_container_number(number);
                if key.is_empty() {
                    continue;
                }
                entries.entry(key).or_default().push(ContainerOwner {
                    plan_id: plan.plan_id.clone(),
                    plan_label: plan.plan_code.clone(),
                    container_id: container.container_id.clone(),
                });
            }
        }

        Self { entries }
    }

    /// 查询箱号占用方
    ///
    /// # 参数
    /// - container_number: 待查箱号 (任意写法, 内部归一化)
    /// - excluding_container_id: 正在编辑的集装箱自身 (编辑场景下排除)
    pub fn find_owners(
        &self,
        container_number: &str,
        excluding_container_id: Option<&str>,
    ) -> Vec<ContainerOwner> {
        let key = normalize_container_number(container_number);
        if key.is_empty() {
            return Vec::new();
        }

        self.entries
            .get(&key)
            .map(|owners| {
                owners
                    .iter()
                    .filter(|o| Some(o.container_id.as_str()) != excluding_container_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 索引中不同箱号的数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 判断索引是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// DuplicateDetector - 重复箱号检测器
// ==========================================

/// 重复箱号检测器
///
/// 每次检测都重新拉取活跃计划的批量快照并即时建索引,
/// 保证保存前的预检尽量贴近实况 (仍可能与并发编辑竞争)。
pub struct DuplicateDetector {
    store: Arc<dyn PlanStore>,
    page_size: u32,
}

impl DuplicateDetector {
    /// 创建新的检测器实例
    pub fn new(store: Arc<dyn PlanStore>, page_size: u32) -> Self {
        Self { store, page_size }
    }

    /// 拉取快照并查询箱号占用方
    pub async fn find_owners(
        &self,
        container_number: &str,
        excluding_container_id: Option<&str>,
    ) -> StoreResult<Vec<ContainerOwner>> {
        let index = self.build_index().await?;
        Ok(index.find_owners(container_number, excluding_container_id))
    }

    /// 构建箱号归属索引 (分页拉全所有计划)
    pub async fn build_index(&self) -> StoreResult<ContainerOwnershipIndex> {
        let mut plans: Vec<StuffingPlan> = Vec::new();
        let mut query = PlanQuery::bulk_snapshot(self.page_size);

        loop {
            let page = self.store.list_plans(&query).await?;
            let has_more = page.has_more();
            plans.extend(page.items);
            if !has_more {
                break;
            }
            query = query.next_page();
        }

        tracing::debug!("箱号归属索引构建完成: plans={}", plans.len());
        Ok(ContainerOwnershipIndex::from_plans(&plans))
    }
}
