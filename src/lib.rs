// ==========================================
// CFS装箱计划系统 - 核心库
// ==========================================
// 系统定位: 装箱计划执行期的业务规则引擎 (人工最终控制权)
// 职责: 集装箱就绪状态机 + 配载单分配协调
// 红线: 服务端数据为唯一事实来源, 本地不做增量推算
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 存储边界层 - 远程 Plan Store 接口
pub mod store;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 工作台配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ContainerStatus, PlanStatus, PositionState};

// 领域实体
pub use domain::{PackingListAssignment, PlanContainer, StuffingPlan};

// 存储边界
pub use store::{
    AssignmentPair, ContainerPayload, OrderDir, PlanPage, PlanQuery, PlanStore, PositionLookup,
    StoreError, StoreResult,
};

// 引擎
pub use engine::{
    AssignmentCoordinator, AssignmentView, ContainerOwner, ContainerOwnershipIndex,
    DuplicateDetector, PlanWorkspace, PositionStatus, PositionStatusAdapter, ReadinessCore,
    WorkspaceError, WorkspaceResult,
};

// 配置
pub use config::WorkspaceConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CFS装箱计划系统";
