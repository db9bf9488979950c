// ==========================================
// CFS装箱计划系统 - 领域层
// ==========================================
// 职责: 领域实体与类型定义
// ==========================================

pub mod plan;
pub mod types;

// 重导出核心类型
pub use plan::{PackingListAssignment, PlanContainer, StuffingPlan};
pub use types::{ContainerStatus, PlanStatus, PositionState};
