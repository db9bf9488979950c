// ==========================================
// CFS装箱计划系统 - 引擎层
// ==========================================
// 职责: 装箱计划执行期的全部业务规则
// 分工: readiness (纯判定) / duplicate (跨计划预检) /
//       position (箱位缓存) / assignment (选择与组批) /
//       orchestrator (编排与门控)
// ==========================================

pub mod assignment;
pub mod duplicate;
pub mod error;
pub mod orchestrator;
pub mod position;
pub mod readiness;

// 重导出核心类型
pub use assignment::{AssignmentCoordinator, AssignmentView};
pub use duplicate::{
    normalize_container_number, ContainerOwner, ContainerOwnershipIndex, DuplicateDetector,
};
pub use error::{ErrorKind, WorkspaceError, WorkspaceResult};
pub use orchestrator::{ContainerModal, PlanWorkspace};
pub use position::{PositionStatus, PositionStatusAdapter, POSITION_IN_CFS};
pub use readiness::ReadinessCore;
