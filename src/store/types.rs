// ==========================================
// CFS装箱计划系统 - 存储边界数据形态
// ==========================================
// 约定: 与 Plan Store 的 HTTP+JSON 负载一致 (camelCase)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::plan::StuffingPlan;
use crate::domain::types::PlanStatus;

// ==========================================
// OrderDir - 排序方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDir {
    Asc,
    Desc,
}

// ==========================================
// PlanQuery - 计划列表查询参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub status: Option<PlanStatus>, // None = 不过滤状态
    pub order_by: String,
    pub order_dir: OrderDir,
    pub page: u32,                  // 从 1 开始
    pub items_per_page: u32,
}

impl Default for PlanQuery {
    fn default() -> Self {
        Self {
            status: None,
            order_by: "createdAt".to_string(),
            order_dir: OrderDir::Desc,
            page: 1,
            items_per_page: 30,
        }
    }
}

impl PlanQuery {
    /// 重复箱号检测用的批量快照查询 (不过滤状态, 大页拉取)
    pub fn bulk_snapshot(items_per_page: u32) -> Self {
        Self {
            status: None,
            order_by: "createdAt".to_string(),
            order_dir: OrderDir::Asc,
            page: 1,
            items_per_page,
        }
    }

    /// 翻到下一页
    pub fn next_page(&self) -> Self {
        let mut q = self.clone();
        q.page += 1;
        q
    }
}

// ==========================================
// PlanPage - 计划分页结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPage {
    pub items: Vec<StuffingPlan>,
    pub total: u64,     // 满足条件的总条数
    pub page: u32,
    pub items_per_page: u32,
}

impl PlanPage {
    /// 判断后面是否还有数据
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page) * u64::from(self.items_per_page);
        seen < self.total
    }
}

// ==========================================
// ContainerPayload - 集装箱写入负载
// ==========================================
// 对应 POST/PATCH .../containers 的请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPayload {
    pub container_number: Option<String>,
    pub container_type_code: String,
    pub estimated_stuffing_at: Option<NaiveDateTime>,
    pub estimated_move_at: Option<NaiveDateTime>,
    pub equipment_booked: bool,
    pub appointment_booked: bool,
    pub notes: Option<String>,
}

// ==========================================
// AssignmentPair - 配载分配对
// ==========================================
// 对应 POST .../packing-lists/assign 的请求体条目;
// plan_container_id = None 表示解除分配。整批由服务端原子应用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPair {
    pub packing_list_id: String,
    pub plan_container_id: Option<String>,
}

impl AssignmentPair {
    /// 构造分配对
    pub fn assign(packing_list_id: &str, container_id: &str) -> Self {
        Self {
            packing_list_id: packing_list_id.to_string(),
            plan_container_id: Some(container_id.to_string()),
        }
    }

    /// 构造解除分配对
    pub fn unassign(packing_list_id: &str) -> Self {
        Self {
            packing_list_id: packing_list_id.to_string(),
            plan_container_id: None,
        }
    }
}
