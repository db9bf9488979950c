// ==========================================
// CFS装箱计划系统 - 计划工作台编排器
// ==========================================
// 职责: 组合就绪引擎/分配协调器/重复检测/箱位适配器,
//       持有选择状态, 驱动每次变更后的服务端回读
// 红线: 变更成功后一律整计划回读, 不做本地乐观变更;
//       锁定集装箱 (≥ IN_PROGRESS) 上的一切操作统一拒绝
// ==========================================

use std::sync::Arc;

use crate::config::WorkspaceConfig;
use crate::domain::plan::{PlanContainer, StuffingPlan};
use crate::domain::types::{ContainerStatus, PlanStatus};
use crate::engine::assignment::{accepts_as_target, AssignmentCoordinator, AssignmentView};
use crate::engine::duplicate::{normalize_container_number, DuplicateDetector};
use crate::engine::error::{WorkspaceError, WorkspaceResult};
use crate::engine::position::PositionStatusAdapter;
use crate::engine::readiness::ReadinessCore;
use crate::store::plan_store::{PlanStore, PositionLookup};
use crate::store::types::{ContainerPayload, PlanPage};

// ==========================================
// ContainerModal - 集装箱弹窗状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerModal {
    Closed,
    Create,
    Edit(String),
}

// ==========================================
// PlanWorkspace - 计划工作台
// ==========================================

/// 计划工作台编排器
///
/// 职责:
/// 1. 加载/回读装箱计划 (服务端为唯一事实来源)
/// 2. 集装箱 CRUD 与状态转换的统一门控
/// 3. 配载单选择与分配/解除分配
/// 4. 引用失效自愈 (集装箱被并发删除后回退到未分配视图)
pub struct PlanWorkspace {
    store: Arc<dyn PlanStore>,
    position: Arc<PositionStatusAdapter>,
    detector: DuplicateDetector,
    coordinator: AssignmentCoordinator,
    config: WorkspaceConfig,
    plan: Option<StuffingPlan>,
    assign_target: Option<String>,
    modal: ContainerModal,
}

impl PlanWorkspace {
    /// 创建新的工作台实例
    pub fn new(
        store: Arc<dyn PlanStore>,
        lookup: Arc<dyn PositionLookup>,
        config: &WorkspaceConfig,
    ) -> Self {
        Self {
            detector: DuplicateDetector::new(store.clone(), config.duplicate_scan_page_size),
            position: Arc::new(PositionStatusAdapter::new(lookup)),
            store,
            coordinator: AssignmentCoordinator::new(),
            config: config.clone(),
            plan: None,
            assign_target: None,
            modal: ContainerModal::Closed,
        }
    }

    // ==========================================
    // 状态访问
    // ==========================================

    /// 当前加载的计划
    pub fn plan(&self) -> Option<&StuffingPlan> {
        self.plan.as_ref()
    }

    /// 当前活跃视图
    pub fn active_view(&self) -> &AssignmentView {
        self.coordinator.active_view()
    }

    /// 当前选择集
    pub fn selection(&self) -> &std::collections::HashSet<String> {
        self.coordinator.selection()
    }

    /// 当前分配目标集装箱
    pub fn assign_target(&self) -> Option<&str> {
        self.assign_target.as_deref()
    }

    /// 当前弹窗状态
    pub fn modal(&self) -> &ContainerModal {
        &self.modal
    }

    /// 查找集装箱 (未找到 → NotFound)
    pub fn container(&self, container_id: &str) -> WorkspaceResult<&PlanContainer> {
        self.require_plan()?
            .container(container_id)
            .ok_or_else(|| WorkspaceError::NotFound(format!("集装箱 {}", container_id)))
    }

    /// 集装箱的派生展示状态
    pub fn container_status(&self, container_id: &str) -> WorkspaceResult<ContainerStatus> {
        Ok(ReadinessCore::derived_status(self.container(container_id)?))
    }

    /// 集装箱未满足的就绪条件 (用缓存中的箱位状态评估)
    pub fn missing_requirements_for(&self, container_id: &str) -> WorkspaceResult<Vec<String>> {
        let container = self.container(container_id)?;
        let position = self.position_of(container);
        Ok(ReadinessCore::missing_requirements(container, &position))
    }

    /// 集装箱当前是否可确认
    pub fn can_confirm_container(&self, container_id: &str) -> WorkspaceResult<bool> {
        let container = self.container(container_id)?;
        let position = self.position_of(container);
        Ok(ReadinessCore::can_confirm(container, &position))
    }

    // ==========================================
    // 计划加载与回读
    // ==========================================

    /// 分页列出计划 (应用配置中的默认排序)
    pub async fn list_plans(
        &self,
        status: Option<PlanStatus>,
        page: u32,
    ) -> WorkspaceResult<PlanPage> {
        let query = self.config.plan_query(status, page);
        Ok(self.store.list_plans(&query).await?)
    }

    /// 加载装箱计划
    pub async fn load_plan(&mut self, plan_id: &str) -> WorkspaceResult<()> {
        let plan = self.store.get_plan(plan_id).await?;
        tracing::info!("计划加载完成: plan_id={}, containers={}", plan.plan_id, plan.containers.len());
        self.plan = Some(plan);
        self.reconcile();
        self.refresh_positions().await;
        Ok(())
    }

    /// 从服务端回读当前计划 (每次变更成功后调用)
    async fn reload(&mut self) -> WorkspaceResult<()> {
        let plan_id = self
            .plan
            .as_ref()
            .map(|p| p.plan_id.clone())
            .ok_or(WorkspaceError::PlanNotLoaded)?;
        let plan = self.store.get_plan(&plan_id).await?;
        self.plan = Some(plan);
        self.reconcile();
        self.refresh_positions().await;
        Ok(())
    }

    /// 引用自愈: 回读后丢弃指向已消失集装箱的视图/目标/弹窗
    fn reconcile(&mut self) {
        let Some(plan) = self.plan.as_ref() else {
            self.coordinator.set_active_view(AssignmentView::Unassigned);
            self.assign_target = None;
            self.modal = ContainerModal::Closed;
            return;
        };

        let view_dangling = self
            .coordinator
            .active_view()
            .container_id()
            .map(|id| plan.container(id).is_none())
            .unwrap_or(false);

        let target_invalid = match self.assign_target.as_deref() {
            Some(id) => plan.container(id).map(accepts_as_target) != Some(true),
            None => true,
        };
        let first_target = plan
            .containers
            .iter()
            .find(|c| accepts_as_target(c))
            .map(|c| c.container_id.clone());

        let modal_dangling = match &self.modal {
            ContainerModal::Edit(id) => plan.container(id).is_none(),
            _ => false,
        };

        if view_dangling {
            tracing::warn!("活跃视图指向的集装箱已不存在, 回退到未分配视图");
            self.coordinator.set_active_view(AssignmentView::Unassigned);
        }
        if target_invalid {
            self.assign_target = first_target;
        }
        if modal_dangling {
            self.modal = ContainerModal::Closed;
        }
    }

    /// 刷新箱位缓存: 仅派生状态为 SPECIFIED 且已指定箱号的集装箱
    /// (SPECIFIED 是箱位信息唯一影响决策的状态)
    async fn refresh_positions(&self) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        let numbers: Vec<String> = plan
            .containers
            .iter()
            .filter(|c| ReadinessCore::derived_status(c) == ContainerStatus::Specified)
            .filter_map(|c| c.container_number.clone())
            .filter(|n| !n.trim().is_empty())
            .collect();
        if !numbers.is_empty() {
            self.position.refresh_all(&numbers).await;
        }
    }

    // ==========================================
    // 视图与选择
    // ==========================================

    /// 切换活跃视图
    ///
    /// 进入未分配视图时, 分配目标默认为第一个可接收配载的集装箱
    pub fn set_active_view(&mut self, view: AssignmentView) -> WorkspaceResult<()> {
        let plan = self.require_plan()?;
        if let Some(id) = view.container_id() {
            if plan.container(id).is_none() {
                return Err(WorkspaceError::NotFound(format!("集装箱 {}", id)));
            }
        }

        let entering_unassigned = view == AssignmentView::Unassigned;
        let default_target = plan
            .containers
            .iter()
            .find(|c| accepts_as_target(c))
            .map(|c| c.container_id.clone());

        self.coordinator.set_active_view(view);
        if entering_unassigned {
            let current_valid = self
                .assign_target
                .as_deref()
                .and_then(|id| self.plan.as_ref().and_then(|p| p.container(id)))
                .map(accepts_as_target)
                .unwrap_or(false);
            if !current_valid {
                self.assign_target = default_target;
            }
        }
        Ok(())
    }

    /// 指定分配目标集装箱
    pub fn set_assign_target(&mut self, container_id: &str) -> WorkspaceResult<()> {
        let container = self.container(container_id)?;
        if !accepts_as_target(container) {
            return Err(WorkspaceError::AssignmentLocked {
                container_id: container.container_id.clone(),
                status: ReadinessCore::derived_status(container).to_string(),
            });
        }
        self.assign_target = Some(container_id.to_string());
        Ok(())
    }

    /// 切换配载单选中状态
    pub fn toggle_selection(&mut self, packing_list_id: &str) -> WorkspaceResult<()> {
        let plan = self.plan.as_ref().ok_or(WorkspaceError::PlanNotLoaded)?;
        self.coordinator.toggle(plan, packing_list_id)
    }

    /// 全选/全不选当前视图分组
    pub fn select_all(&mut self, on: bool) -> WorkspaceResult<()> {
        let plan = self.plan.as_ref().ok_or(WorkspaceError::PlanNotLoaded)?;
        self.coordinator.select_all(plan, on)
    }

    // ==========================================
    // 配载分配
    // ==========================================

    /// 把选中的配载单分配到当前目标集装箱
    pub async fn assign_selected(&mut self) -> WorkspaceResult<()> {
        let target = self
            .assign_target
            .clone()
            .ok_or_else(|| WorkspaceError::InvalidInput("未选择分配目标集装箱".to_string()))?;
        let plan = self.plan.as_ref().ok_or(WorkspaceError::PlanNotLoaded)?;
        let plan_id = plan.plan_id.clone();
        let pairs = self.coordinator.assign_request(plan, &target)?;

        self.store.assign_packing_lists(&plan_id, &pairs).await?;
        tracing::info!("配载分配完成: target={}, count={}", target, pairs.len());
        self.coordinator.clear_selection();
        self.reload().await
    }

    /// 解除选中配载单的分配
    pub async fn unassign_selected(&mut self) -> WorkspaceResult<()> {
        let plan = self.plan.as_ref().ok_or(WorkspaceError::PlanNotLoaded)?;
        let plan_id = plan.plan_id.clone();
        let pairs = self.coordinator.unassign_request(plan)?;

        self.store.assign_packing_lists(&plan_id, &pairs).await?;
        tracing::info!("配载解除完成: count={}", pairs.len());
        self.coordinator.clear_selection();
        self.reload().await
    }

    // ==========================================
    // 集装箱 CRUD
    // ==========================================

    /// 打开新建集装箱弹窗
    pub fn open_create_modal(&mut self) -> WorkspaceResult<()> {
        self.require_plan()?;
        self.modal = ContainerModal::Create;
        Ok(())
    }

    /// 打开编辑集装箱弹窗 (锁定集装箱拒绝)
    pub fn open_edit_modal(&mut self, container_id: &str) -> WorkspaceResult<()> {
        let container = self.container(container_id)?;
        if container.is_locked() {
            return Err(WorkspaceError::ContainerLocked(container_id.to_string()));
        }
        self.modal = ContainerModal::Edit(container_id.to_string());
        Ok(())
    }

    /// 关闭弹窗
    pub fn close_modal(&mut self) {
        self.modal = ContainerModal::Closed;
    }

    /// 新建集装箱
    pub async fn create_container(&mut self, payload: &ContainerPayload) -> WorkspaceResult<()> {
        let plan_id = self.require_plan()?.plan_id.clone();
        if payload.container_type_code.trim().is_empty() {
            return Err(WorkspaceError::InvalidInput("箱型不能为空".to_string()));
        }
        self.ensure_number_available(payload.container_number.as_deref(), None)
            .await?;

        self.store.create_container(&plan_id, payload).await?;
        tracing::info!("集装箱创建完成: plan_id={}", plan_id);
        self.modal = ContainerModal::Closed;
        self.reload().await
    }

    /// 编辑集装箱
    ///
    /// # 守卫
    /// - 锁定集装箱 (≥ IN_PROGRESS) 拒绝任何编辑
    /// - 箱号字段自 CONFIRMED 起不可变 (独立于整体锁定规则)
    /// - 箱号变更前过重复检测 (排除自身)
    pub async fn update_container(
        &mut self,
        container_id: &str,
        payload: &ContainerPayload,
    ) -> WorkspaceResult<()> {
        let container = self.container(container_id)?;
        if container.is_locked() {
            return Err(WorkspaceError::ContainerLocked(container_id.to_string()));
        }

        let current_number = container
            .container_number
            .as_deref()
            .map(normalize_container_number)
            .unwrap_or_default();
        let next_number = payload
            .container_number
            .as_deref()
            .map(normalize_container_number)
            .unwrap_or_default();
        let number_changed = current_number != next_number;

        if number_changed && container.number_frozen() {
            return Err(WorkspaceError::ContainerNumberFrozen);
        }

        let plan_id = container.plan_id.clone();
        if number_changed {
            self.ensure_number_available(payload.container_number.as_deref(), Some(container_id))
                .await?;
        }

        self.store
            .update_container(&plan_id, container_id, payload)
            .await?;
        tracing::info!("集装箱更新完成: container_id={}", container_id);
        self.modal = ContainerModal::Closed;
        self.reload().await
    }

    /// 删除集装箱
    pub async fn delete_container(&mut self, container_id: &str) -> WorkspaceResult<()> {
        let container = self.container(container_id)?;
        if !ReadinessCore::can_delete(container) {
            return Err(WorkspaceError::ContainerNotDeletable);
        }
        let plan_id = container.plan_id.clone();

        self.store.delete_container(&plan_id, container_id).await?;
        tracing::info!("集装箱删除完成: container_id={}", container_id);
        self.reload().await
    }

    // ==========================================
    // 状态转换
    // ==========================================

    /// 确认集装箱 (SPECIFIED → CONFIRMED, 就绪条件全满足时放行)
    pub async fn confirm_container(&mut self, container_id: &str) -> WorkspaceResult<()> {
        let container = self.container(container_id)?;
        if container.is_locked() {
            return Err(WorkspaceError::ContainerLocked(container_id.to_string()));
        }

        let status = ReadinessCore::derived_status(container);
        if !ReadinessCore::user_transition_allowed(status, ContainerStatus::Confirmed) {
            return Err(WorkspaceError::InvalidStatusTransition {
                from: status.to_string(),
                to: ContainerStatus::Confirmed.to_string(),
            });
        }

        let position = self.position_of(container);
        let missing = ReadinessCore::missing_requirements(container, &position);
        if !missing.is_empty() {
            return Err(WorkspaceError::NotReady(missing.join("; ")));
        }

        let plan_id = container.plan_id.clone();
        self.store
            .change_container_status(&plan_id, container_id, ContainerStatus::Confirmed)
            .await?;
        tracing::info!("集装箱确认完成: container_id={}", container_id);
        self.reload().await
    }

    /// 撤销确认 (CONFIRMED → SPECIFIED, 唯一允许的回退; 外围需二次确认)
    pub async fn unconfirm_container(&mut self, container_id: &str) -> WorkspaceResult<()> {
        self.change_status_from_confirmed(container_id, ContainerStatus::Specified)
            .await
    }

    /// 开始装箱 (CONFIRMED → IN_PROGRESS, UI 层不可逆; 外围需二次确认)
    pub async fn start_stuffing(&mut self, container_id: &str) -> WorkspaceResult<()> {
        self.change_status_from_confirmed(container_id, ContainerStatus::InProgress)
            .await
    }

    // ==========================================
    // 计划删除
    // ==========================================

    /// 删除当前计划 (仅 CREATED 且不含集装箱)
    pub async fn delete_plan(&mut self) -> WorkspaceResult<()> {
        let plan = self.require_plan()?;
        if !plan.is_deletable() {
            return Err(WorkspaceError::PlanNotDeletable);
        }
        let plan_id = plan.plan_id.clone();

        self.store.delete_plan(&plan_id).await?;
        tracing::info!("计划删除完成: plan_id={}", plan_id);
        self.plan = None;
        self.reconcile();
        Ok(())
    }

    // ===== 内部辅助 =====

    fn require_plan(&self) -> WorkspaceResult<&StuffingPlan> {
        self.plan.as_ref().ok_or(WorkspaceError::PlanNotLoaded)
    }

    fn position_of(&self, container: &PlanContainer) -> crate::engine::position::PositionStatus {
        match container.container_number.as_deref() {
            Some(number) => self.position.cached(number),
            None => crate::engine::position::PositionStatus::idle(),
        }
    }

    /// CONFIRMED 出发的两个用户转换共用守卫
    async fn change_status_from_confirmed(
        &mut self,
        container_id: &str,
        to: ContainerStatus,
    ) -> WorkspaceResult<()> {
        let container = self.container(container_id)?;
        if container.is_locked() {
            return Err(WorkspaceError::ContainerLocked(container_id.to_string()));
        }

        let status = ReadinessCore::derived_status(container);
        if !ReadinessCore::user_transition_allowed(status, to) {
            return Err(WorkspaceError::InvalidStatusTransition {
                from: status.to_string(),
                to: to.to_string(),
            });
        }

        let plan_id = container.plan_id.clone();
        self.store
            .change_container_status(&plan_id, container_id, to)
            .await?;
        tracing::info!(
            "集装箱状态转换完成: container_id={}, to={}",
            container_id,
            to
        );
        self.reload().await
    }

    /// 箱号可用性预检 (快照咨询; 冲突时列出全部占用计划)
    async fn ensure_number_available(
        &self,
        container_number: Option<&str>,
        excluding_container_id: Option<&str>,
    ) -> WorkspaceResult<()> {
        let Some(number) = container_number else {
            return Ok(());
        };
        let normalized = normalize_container_number(number);
        if normalized.is_empty() {
            return Ok(());
        }

        let owners = self
            .detector
            .find_owners(&normalized, excluding_container_id)
            .await?;
        if owners.is_empty() {
            return Ok(());
        }

        let plan_labels: Vec<&str> = owners.iter().map(|o| o.plan_label.as_str()).collect();
        Err(WorkspaceError::DuplicateContainerNumber {
            number: normalized,
            plan_labels: plan_labels.join(", "),
        })
    }
}
