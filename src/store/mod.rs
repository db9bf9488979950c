// ==========================================
// CFS装箱计划系统 - 存储边界层
// ==========================================
// 职责: 定义远程 Plan Store 的访问接口与线上数据形态
// 红线: 本层只描述边界, 不包含传输实现 (HTTP 客户端在外围工程)
// ==========================================

pub mod error;
pub mod plan_store;
pub mod types;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use plan_store::{PlanStore, PositionLookup};
pub use types::{AssignmentPair, ContainerPayload, OrderDir, PlanPage, PlanQuery};
