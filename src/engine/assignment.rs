// ==========================================
// CFS装箱计划系统 - 配载分配协调器
// ==========================================
// 职责: 维护配载单选择集与活跃视图, 产出经过守卫校验的分配批次
// 红线: 本层只做校验与组批, 不执行 I/O;
//       批次由 Plan Store 原子应用, 计数/状态以服务端回读为准
// ==========================================

use std::collections::HashSet;

use crate::domain::plan::{PlanContainer, StuffingPlan};
use crate::engine::error::{WorkspaceError, WorkspaceResult};
use crate::engine::readiness::ReadinessCore;
use crate::store::types::AssignmentPair;

// ==========================================
// AssignmentView - 活跃视图
// ==========================================
// 选择集在任一时刻只属于一个视图: 未分配组 或 某个集装箱组
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentView {
    Unassigned,
    Container(String),
}

impl AssignmentView {
    /// 视图对应的集装箱ID (未分配组 → None)
    pub fn container_id(&self) -> Option<&str> {
        match self {
            AssignmentView::Unassigned => None,
            AssignmentView::Container(id) => Some(id),
        }
    }
}

// ==========================================
// AssignmentCoordinator - 配载分配协调器
// ==========================================
#[derive(Debug)]
pub struct AssignmentCoordinator {
    active_view: AssignmentView,
    selected: HashSet<String>,
}

impl Default for AssignmentCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentCoordinator {
    /// 创建新的协调器 (初始视图为未分配组)
    pub fn new() -> Self {
        Self {
            active_view: AssignmentView::Unassigned,
            selected: HashSet::new(),
        }
    }

    /// 当前活跃视图
    pub fn active_view(&self) -> &AssignmentView {
        &self.active_view
    }

    /// 当前选择集
    pub fn selection(&self) -> &HashSet<String> {
        &self.selected
    }

    /// 判断配载单是否已选中
    pub fn is_selected(&self, packing_list_id: &str) -> bool {
        self.selected.contains(packing_list_id)
    }

    /// 切换活跃视图 (视图变化时清空选择集)
    pub fn set_active_view(&mut self, view: AssignmentView) {
        if self.active_view != view {
            self.active_view = view;
            self.selected.clear();
        }
    }

    /// 清空选择集
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// 切换单张配载单的选中状态
    ///
    /// # 守卫
    /// - 活跃视图为锁定集装箱 (≥ IN_PROGRESS) → 拒绝 (控件置灰)
    /// - 配载单必须属于当前视图分组
    pub fn toggle(&mut self, plan: &StuffingPlan, packing_list_id: &str) -> WorkspaceResult<()> {
        self.ensure_view_unlocked(plan)?;

        if !self.in_active_group(plan, packing_list_id) {
            return Err(WorkspaceError::InvalidInput(format!(
                "配载单不属于当前视图分组: packing_list_id={}",
                packing_list_id
            )));
        }

        if !self.selected.remove(packing_list_id) {
            self.selected.insert(packing_list_id.to_string());
        }
        Ok(())
    }

    /// 全选/全不选当前视图分组
    pub fn select_all(&mut self, plan: &StuffingPlan, on: bool) -> WorkspaceResult<()> {
        self.ensure_view_unlocked(plan)?;

        self.selected.clear();
        if on {
            for p in self.active_group(plan) {
                self.selected.insert(p.packing_list_id.clone());
            }
        }
        Ok(())
    }

    /// 组装分配批次
    ///
    /// # 守卫 (全部在本地验证, 不发请求)
    /// - 活跃视图必须是未分配组
    /// - 选择集非空
    /// - 目标集装箱存在且派生状态 < CONFIRMED
    /// - 每张选中配载单的当前所在端与目标端均允许变更
    pub fn assign_request(
        &self,
        plan: &StuffingPlan,
        target_container_id: &str,
    ) -> WorkspaceResult<Vec<AssignmentPair>> {
        if self.active_view != AssignmentView::Unassigned {
            return Err(WorkspaceError::WrongView(
                "仅未分配组视图可执行分配".to_string(),
            ));
        }
        if self.selected.is_empty() {
            return Err(WorkspaceError::EmptySelection);
        }

        let target = plan.container(target_container_id).ok_or_else(|| {
            WorkspaceError::NotFound(format!("集装箱 {}", target_container_id))
        })?;
        let target_status = ReadinessCore::derived_status(target);
        if !target_status.accepts_assignments() {
            return Err(WorkspaceError::AssignmentLocked {
                container_id: target.container_id.clone(),
                status: target_status.to_string(),
            });
        }

        let mut pairs = Vec::with_capacity(self.selected.len());
        for id in self.sorted_selection() {
            let packing_list = plan.packing_list(&id).ok_or_else(|| {
                WorkspaceError::NotFound(format!("配载单 {}", id))
            })?;
            let current_status = packing_list
                .plan_container_id
                .as_deref()
                .and_then(|cid| plan.container(cid))
                .map(ReadinessCore::derived_status);
            if !ReadinessCore::assignment_change_allowed(current_status, Some(target_status)) {
                return Err(WorkspaceError::AssignmentLocked {
                    container_id: target.container_id.clone(),
                    status: target_status.to_string(),
                });
            }
            pairs.push(AssignmentPair::assign(&id, target_container_id));
        }
        Ok(pairs)
    }

    /// 组装解除分配批次
    ///
    /// # 守卫
    /// - 活跃视图必须是某个集装箱组, 且其派生状态 < CONFIRMED
    /// - 选择集非空
    /// - 已处于未分配状态的配载单照常纳入 (解除分配幂等, 不报错)
    pub fn unassign_request(&self, plan: &StuffingPlan) -> WorkspaceResult<Vec<AssignmentPair>> {
        let AssignmentView::Container(container_id) = &self.active_view else {
            return Err(WorkspaceError::WrongView(
                "仅集装箱组视图可执行解除分配".to_string(),
            ));
        };

        let container = plan.container(container_id).ok_or_else(|| {
            WorkspaceError::NotFound(format!("集装箱 {}", container_id))
        })?;
        let status = ReadinessCore::derived_status(container);
        if !status.accepts_assignments() {
            return Err(WorkspaceError::AssignmentLocked {
                container_id: container.container_id.clone(),
                status: status.to_string(),
            });
        }

        if self.selected.is_empty() {
            return Err(WorkspaceError::EmptySelection);
        }

        Ok(self
            .sorted_selection()
            .into_iter()
            .map(|id| AssignmentPair::unassign(&id))
            .collect())
    }

    // ===== 内部辅助 =====

    /// 活跃视图为锁定集装箱时拒绝选择操作
    fn ensure_view_unlocked(&self, plan: &StuffingPlan) -> WorkspaceResult<()> {
        if let AssignmentView::Container(id) = &self.active_view {
            if let Some(container) = plan.container(id) {
                if ReadinessCore::derived_status(container).is_locked() {
                    return Err(WorkspaceError::ContainerLocked(id.clone()));
                }
            }
        }
        Ok(())
    }

    /// 当前视图分组内的配载单
    fn active_group<'a>(&self, plan: &'a StuffingPlan) -> Vec<&'a crate::domain::plan::PackingListAssignment> {
        match &self.active_view {
            AssignmentView::Unassigned => plan.unassigned_packing_lists(),
            AssignmentView::Container(id) => plan.packing_lists_of(id),
        }
    }

    /// 判断配载单是否属于当前视图分组
    fn in_active_group(&self, plan: &StuffingPlan, packing_list_id: &str) -> bool {
        self.active_group(plan)
            .iter()
            .any(|p| p.packing_list_id == packing_list_id)
    }

    // 批次顺序稳定, 便于测试与日志比对
    fn sorted_selection(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }
}

/// 判断集装箱是否可作为分配目标 (派生状态 < CONFIRMED)
pub fn accepts_as_target(container: &PlanContainer) -> bool {
    ReadinessCore::derived_status(container).accepts_assignments()
}
