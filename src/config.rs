// ==========================================
// CFS装箱计划系统 - 工作台配置
// ==========================================
// 职责: 工作台级别的可调参数 (非业务规则)
// 说明: 就绪条件与状态机守卫不走配置, 属于固定业务红线
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::PlanStatus;
use crate::store::{OrderDir, PlanQuery};

/// 工作台配置
///
/// # 字段
/// - duplicate_scan_page_size: 重复箱号检测的批量拉取页大小
/// - plan_order_by: 计划列表默认排序字段
/// - plan_order_dir: 计划列表默认排序方向
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub duplicate_scan_page_size: u32,
    pub plan_order_by: String,
    pub plan_order_dir: OrderDir,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            // 重复检测需要一次性覆盖所有活跃计划, 页大小取大值
            duplicate_scan_page_size: 500,
            plan_order_by: "createdAt".to_string(),
            plan_order_dir: OrderDir::Desc,
        }
    }
}

impl WorkspaceConfig {
    /// 构造计划列表查询 (应用配置中的默认排序)
    pub fn plan_query(&self, status: Option<PlanStatus>, page: u32) -> PlanQuery {
        PlanQuery {
            status,
            order_by: self.plan_order_by.clone(),
            order_dir: self.plan_order_dir,
            page,
            ..PlanQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkspaceConfig::default();
        assert_eq!(config.duplicate_scan_page_size, 500);
        assert_eq!(config.plan_order_by, "createdAt");
    }

    #[test]
    fn test_plan_query_applies_configured_ordering() {
        let config = WorkspaceConfig {
            plan_order_by: "planCode".to_string(),
            plan_order_dir: OrderDir::Asc,
            ..WorkspaceConfig::default()
        };
        let query = config.plan_query(Some(PlanStatus::InProgress), 2);
        assert_eq!(query.order_by, "planCode");
        assert_eq!(query.order_dir, OrderDir::Asc);
        assert_eq!(query.status, Some(PlanStatus::InProgress));
        assert_eq!(query.page, 2);
    }
}
