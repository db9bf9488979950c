// ==========================================
// CFS装箱计划系统 - Plan Store 访问接口
// ==========================================
// 职责: 以 trait 描述远程 Plan Store 的能力边界
// 红线: 一致性由服务端保证; 本地引擎把每次响应当作新的事实,
//       不在本地做乐观变更或增量推算
// ==========================================

use async_trait::async_trait;

use crate::domain::plan::{PlanContainer, StuffingPlan};
use crate::domain::types::ContainerStatus;
use crate::store::error::StoreResult;
use crate::store::types::{AssignmentPair, ContainerPayload, PlanPage, PlanQuery};

// ==========================================
// PlanStore - 计划存储接口
// ==========================================

/// 远程 Plan Store 接口
///
/// 对应的概念端点见各方法注释。实现方负责传输与编码,
/// 非 2xx 响应应转换为 `StoreError::Remote` (带服务端文案)。
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// GET /plans?status=&orderBy=&orderDir=&page=&itemsPerPage=
    async fn list_plans(&self, query: &PlanQuery) -> StoreResult<PlanPage>;

    /// GET /plans/{id}
    async fn get_plan(&self, plan_id: &str) -> StoreResult<StuffingPlan>;

    /// DELETE /plans/{id}
    async fn delete_plan(&self, plan_id: &str) -> StoreResult<()>;

    /// POST /plans/{id}/containers
    async fn create_container(
        &self,
        plan_id: &str,
        payload: &ContainerPayload,
    ) -> StoreResult<PlanContainer>;

    /// PATCH /plans/{id}/containers/{id}
    async fn update_container(
        &self,
        plan_id: &str,
        container_id: &str,
        payload: &ContainerPayload,
    ) -> StoreResult<PlanContainer>;

    /// DELETE /plans/{id}/containers/{id}
    async fn delete_container(&self, plan_id: &str, container_id: &str) -> StoreResult<()>;

    /// PATCH /plans/{id}/containers/{id}/status
    async fn change_container_status(
        &self,
        plan_id: &str,
        container_id: &str,
        status: ContainerStatus,
    ) -> StoreResult<PlanContainer>;

    /// POST /plans/{id}/packing-lists/assign
    ///
    /// 整批分配对由服务端原子应用。
    async fn assign_packing_lists(
        &self,
        plan_id: &str,
        pairs: &[AssignmentPair],
    ) -> StoreResult<()>;
}

// ==========================================
// PositionLookup - 箱位查询接口
// ==========================================

/// 集装箱物理位置查询接口
///
/// 对应独立的箱号查询端点, 读取其 `currentCycle.containerStatus` 字段。
/// 返回 None 表示该箱号当前没有在场周转记录。
#[async_trait]
pub trait PositionLookup: Send + Sync {
    async fn container_position(&self, container_number: &str) -> StoreResult<Option<String>>;
}
