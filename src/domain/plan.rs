// ==========================================
// CFS装箱计划系统 - 装箱计划领域模型
// ==========================================
// 红线: assigned_packing_list_count 为服务端派生值,
//       本地只读, 不做增量修改
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContainerStatus, PlanStatus};

// ==========================================
// StuffingPlan - 装箱计划
// ==========================================
// 一次出口订单的装箱作业, 聚合集装箱与配载单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StuffingPlan {
    pub plan_id: String,                             // 计划ID
    pub plan_code: String,                           // 计划编号 (用户可见标签)
    pub status: PlanStatus,                          // 计划状态
    pub export_order_id: String,                     // 出口订单ID
    pub containers: Vec<PlanContainer>,              // 计划下集装箱 (内嵌)
    pub packing_lists: Vec<PackingListAssignment>,   // 计划下配载单 (内嵌)
    pub created_at: NaiveDateTime,                   // 创建时间
    pub updated_at: NaiveDateTime,                   // 更新时间
}

impl StuffingPlan {
    /// 按ID查找集装箱
    pub fn container(&self, container_id: &str) -> Option<&PlanContainer> {
        self.containers.iter().find(|c| c.container_id == container_id)
    }

    /// 按ID查找配载单
    pub fn packing_list(&self, packing_list_id: &str) -> Option<&PackingListAssignment> {
        self.packing_lists
            .iter()
            .find(|p| p.packing_list_id == packing_list_id)
    }

    /// 未分配到任何集装箱的配载单
    pub fn unassigned_packing_lists(&self) -> Vec<&PackingListAssignment> {
        self.packing_lists
            .iter()
            .filter(|p| p.plan_container_id.is_none())
            .collect()
    }

    /// 分配到指定集装箱的配载单
    pub fn packing_lists_of(&self, container_id: &str) -> Vec<&PackingListAssignment> {
        self.packing_lists
            .iter()
            .filter(|p| p.plan_container_id.as_deref() == Some(container_id))
            .collect()
    }

    /// 判断计划是否可删除 (CREATED 且无集装箱)
    pub fn is_deletable(&self) -> bool {
        self.status == PlanStatus::Created && self.containers.is_empty()
    }
}

// ==========================================
// PlanContainer - 计划内集装箱
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContainer {
    pub container_id: String,                        // 集装箱记录ID
    pub plan_id: String,                             // 所属计划
    pub container_number: Option<String>,            // 物理箱号 (指定前为空)
    pub container_type_code: String,                 // 箱型代码 (如 40HQ)
    pub status: ContainerStatus,                     // 存储状态 (读取时需经派生修正)
    pub equipment_booked: bool,                      // 机力已预约
    pub appointment_booked: bool,                    // 装箱预约已完成
    pub estimated_stuffing_at: Option<NaiveDateTime>,// 预计装箱时间
    pub estimated_move_at: Option<NaiveDateTime>,    // 预计移箱时间
    pub assigned_packing_list_count: i32,            // 已分配配载单数 (服务端派生)
    pub notes: Option<String>,                       // 备注
    pub created_at: NaiveDateTime,                   // 创建时间
    pub updated_at: NaiveDateTime,                   // 更新时间
}

impl PlanContainer {
    /// 判断集装箱是否锁定
    pub fn is_locked(&self) -> bool {
        self.status.is_locked()
    }

    /// 箱号是否已进入不可变期 (CONFIRMED 及之后)
    pub fn number_frozen(&self) -> bool {
        self.status >= ContainerStatus::Confirmed
    }
}

// ==========================================
// PackingListAssignment - 配载单分配记录
// ==========================================
// 红线: shipper/consignee/customs_ref 为来源配载单的展示快照,
//       本系统只读, 永不回写
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingListAssignment {
    pub packing_list_id: String,                     // 配载单ID
    pub plan_container_id: Option<String>,           // 分配目标 (None = 未分配)
    pub shipper: Option<String>,                     // 发货人 (快照)
    pub consignee: Option<String>,                   // 收货人 (快照)
    pub customs_ref: Option<String>,                 // 报关单号 (快照)
}

impl PackingListAssignment {
    /// 判断是否已分配
    pub fn is_assigned(&self) -> bool {
        self.plan_container_id.is_some()
    }

    /// 判断是否分配给指定集装箱
    pub fn is_assigned_to(&self, container_id: &str) -> bool {
        self.plan_container_id.as_deref() == Some(container_id)
    }
}
