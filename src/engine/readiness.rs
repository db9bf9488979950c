// ==========================================
// CFS装箱计划系统 - 就绪判定核心 (纯函数库)
// ==========================================
// 职责: 集装箱就绪条件评估 / 状态派生 / 状态机守卫
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::plan::PlanContainer;
use crate::domain::types::ContainerStatus;
use crate::engine::position::{PositionStatus, POSITION_IN_CFS};

// ==========================================
// 就绪条件文案 (固定展示字符串, 按评估顺序)
// ==========================================
pub const REQ_ASSIGN_PACKING_LIST: &str = "Assign at least 1 packing list.";
pub const REQ_POSITION_UNVERIFIED: &str = "Cannot verify container position status";
pub const REQ_POSITION_NOT_IN_CFS: &str = "Container position status must be IN_CFS";
pub const REQ_EQUIPMENT_BOOKED: &str = "Equipment must be booked.";
pub const REQ_APPOINTMENT_BOOKED: &str = "Loading appointment must be booked.";
pub const REQ_ESTIMATED_STUFFING_AT: &str = "Estimated stuffing time must be set.";
pub const REQ_ESTIMATED_MOVE_AT: &str = "Estimated move time must be set.";

// ==========================================
// ReadinessCore - 纯函数工具类
// ==========================================
pub struct ReadinessCore;

impl ReadinessCore {
    /// 派生集装箱展示状态
    ///
    /// # 规则
    /// - CREATED ↔ SPECIFIED 为派生状态, 由配载单数量决定, 不信任存储值:
    ///   存储状态 ≤ SPECIFIED 时, 有配载单 → SPECIFIED, 无 → CREATED
    ///   (对称重算: 失去最后一张配载单即回读为 CREATED)
    /// - 存储状态 ≥ CONFIRMED 时原样透传
    ///
    /// # 参数
    /// - stored: 存储层返回的状态
    /// - assigned_count: 服务端派生的配载单数量
    pub fn derive_status(stored: ContainerStatus, assigned_count: i32) -> ContainerStatus {
        if stored >= ContainerStatus::Confirmed {
            return stored;
        }
        if assigned_count > 0 {
            ContainerStatus::Specified
        } else {
            ContainerStatus::Created
        }
    }

    /// 集装箱的派生状态 (便捷入口)
    pub fn derived_status(container: &PlanContainer) -> ContainerStatus {
        Self::derive_status(container.status, container.assigned_packing_list_count)
    }

    /// 计算未满足的就绪条件
    ///
    /// # 规则 (固定评估顺序, 文案直接用于展示与确认按钮门控)
    /// 1. 至少分配 1 张配载单
    /// 2. 箱号存在 且 位置查询成功 且 位置为 IN_CFS;
    ///    无箱号或查询未成功 → "Cannot verify ...",
    ///    查询成功但位置不对 → "... must be IN_CFS"
    /// 3. 机力已预约
    /// 4. 装箱预约已完成
    /// 5. 预计装箱时间已填写
    /// 6. 预计移箱时间已填写
    ///
    /// # 返回
    /// - Vec<String>: 未满足条件的展示文案 (空 = 全部满足)
    pub fn missing_requirements(
        container: &PlanContainer,
        position: &PositionStatus,
    ) -> Vec<String> {
        let mut missing = Vec::new();

        // 条件 1: 配载单数量
        if container.assigned_packing_list_count < 1 {
            missing.push(REQ_ASSIGN_PACKING_LIST.to_string());
        }

        // 条件 2: 箱位核验 (未知一律视为未就绪)
        let has_number = container
            .container_number
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        if !has_number || !position.is_success() {
            missing.push(REQ_POSITION_UNVERIFIED.to_string());
        } else if !position.is_in_cfs() {
            missing.push(REQ_POSITION_NOT_IN_CFS.to_string());
        }

        // 条件 3: 机力预约
        if !container.equipment_booked {
            missing.push(REQ_EQUIPMENT_BOOKED.to_string());
        }

        // 条件 4: 装箱预约
        if !container.appointment_booked {
            missing.push(REQ_APPOINTMENT_BOOKED.to_string());
        }

        // 条件 5: 预计装箱时间
        if container.estimated_stuffing_at.is_none() {
            missing.push(REQ_ESTIMATED_STUFFING_AT.to_string());
        }

        // 条件 6: 预计移箱时间
        if container.estimated_move_at.is_none() {
            missing.push(REQ_ESTIMATED_MOVE_AT.to_string());
        }

        missing
    }

    /// 判断是否可确认
    ///
    /// # 规则
    /// - 派生状态为 SPECIFIED 且就绪条件全部满足
    pub fn can_confirm(container: &PlanContainer, position: &PositionStatus) -> bool {
        Self::derived_status(container) == ContainerStatus::Specified
            && Self::missing_requirements(container, position).is_empty()
    }

    /// 判断用户触发的状态转换是否合法
    ///
    /// # 规则 (状态机)
    /// - SPECIFIED → CONFIRMED (确认; 就绪守卫由调用方叠加)
    /// - CONFIRMED → SPECIFIED (撤销确认, 唯一允许的回退)
    /// - CONFIRMED → IN_PROGRESS (开始装箱, UI 不可逆)
    /// - 其余转换 (含跳级推进) 一律拒绝;
    ///   CREATED→SPECIFIED 与 IN_PROGRESS→STUFFED 由外部驱动, 非用户转换
    pub fn user_transition_allowed(from: ContainerStatus, to: ContainerStatus) -> bool {
        matches!(
            (from, to),
            (ContainerStatus::Specified, ContainerStatus::Confirmed)
                | (ContainerStatus::Confirmed, ContainerStatus::Specified)
                | (ContainerStatus::Confirmed, ContainerStatus::InProgress)
        )
    }

    /// 判断集装箱是否可删除
    ///
    /// # 规则
    /// - 派生状态为 CREATED 或 SPECIFIED, 且配载单数量为 0
    pub fn can_delete(container: &PlanContainer) -> bool {
        Self::derived_status(container).is_deletable_status()
            && container.assigned_packing_list_count == 0
    }

    /// 判断配载单迁移是否合法
    ///
    /// # 规则
    /// - 当前所在集装箱 (如有) 与目标集装箱 (如有) 均须 < CONFIRMED
    pub fn assignment_change_allowed(
        current: Option<ContainerStatus>,
        target: Option<ContainerStatus>,
    ) -> bool {
        current.map(|s| s.accepts_assignments()).unwrap_or(true)
            && target.map(|s| s.accepts_assignments()).unwrap_or(true)
    }
}
