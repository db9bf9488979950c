// ==========================================
// CFS装箱计划系统 - 工作台错误类型
// ==========================================
// 职责: 面向用户的错误分类, 转换存储边界错误为可读文案
// 分类: 校验错误 / 前置条件错误 / 远程错误 (未找到单列, 供自愈路径识别)
// ==========================================

use thiserror::Error;

use crate::store::error::StoreError;

/// 错误类别 (用于外围 UI 决定提示方式)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 校验错误: 请求未发出, 表单内联提示
    Validation,
    /// 前置条件错误: 本地状态守卫拒绝, 请求未发出
    Precondition,
    /// 远程错误: 服务端或网络失败
    Remote,
    /// 引用失效: 目标已不存在, 工作台走自愈路径
    NotFound,
}

/// 工作台错误类型
///
/// 所有错误都带可直接展示的文案; 没有任何错误是进程致命的
#[derive(Error, Debug)]
pub enum WorkspaceError {
    // ==========================================
    // 校验错误 (请求未发出)
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("请先选择配载单")]
    EmptySelection,

    /// 重复箱号: 文案中列出全部冲突计划
    #[error("箱号 {number} 已被以下计划占用: {plan_labels}")]
    DuplicateContainerNumber { number: String, plan_labels: String },

    // ==========================================
    // 前置条件错误 (本地守卫拒绝)
    // ==========================================
    #[error("尚未加载装箱计划")]
    PlanNotLoaded,

    #[error("集装箱已锁定 (装箱中/已完成), 禁止该操作: container_id={0}")]
    ContainerLocked(String),

    #[error("集装箱不可接收配载变更: container_id={container_id}, status={status}")]
    AssignmentLocked {
        container_id: String,
        status: String,
    },

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("就绪条件未满足: {0}")]
    NotReady(String),

    // 文案为固定展示字符串, 与前端提示一致
    #[error("Only empty containers in CREATED or SPECIFIED status can be deleted")]
    ContainerNotDeletable,

    #[error("仅 CREATED 状态且不含集装箱的计划可删除")]
    PlanNotDeletable,

    #[error("箱号在确认后不可修改")]
    ContainerNumberFrozen,

    #[error("当前视图不允许该操作: {0}")]
    WrongView(String),

    // ==========================================
    // 引用失效
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 远程错误
    // ==========================================
    #[error(transparent)]
    Store(StoreError),
}

impl WorkspaceError {
    /// 错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkspaceError::InvalidInput(_)
            | WorkspaceError::EmptySelection
            | WorkspaceError::DuplicateContainerNumber { .. } => ErrorKind::Validation,

            WorkspaceError::PlanNotLoaded
            | WorkspaceError::ContainerLocked(_)
            | WorkspaceError::AssignmentLocked { .. }
            | WorkspaceError::InvalidStatusTransition { .. }
            | WorkspaceError::NotReady(_)
            | WorkspaceError::ContainerNotDeletable
            | WorkspaceError::PlanNotDeletable
            | WorkspaceError::ContainerNumberFrozen
            | WorkspaceError::WrongView(_) => ErrorKind::Precondition,

            WorkspaceError::NotFound(_) => ErrorKind::NotFound,

            WorkspaceError::Store(e) if e.is_not_found() => ErrorKind::NotFound,
            WorkspaceError::Store(_) => ErrorKind::Remote,
        }
    }
}

// ==========================================
// 从 StoreError 转换
// 目的: 未找到错误归入自愈类别, 其余原样透出服务端文案
// ==========================================
impl From<StoreError> for WorkspaceError {
    fn from(err: StoreError) -> Self {
        WorkspaceError::Store(err)
    }
}

/// Result 类型别名
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            WorkspaceError::EmptySelection.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            WorkspaceError::ContainerNotDeletable.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            WorkspaceError::NotFound("Container C1".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            WorkspaceError::Store(StoreError::Network("timeout".to_string())).kind(),
            ErrorKind::Remote
        );
    }

    #[test]
    fn test_store_not_found_maps_to_not_found_kind() {
        let err: WorkspaceError = StoreError::NotFound {
            entity: "Plan".to_string(),
            id: "P1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_guard_message_verbatim() {
        assert_eq!(
            WorkspaceError::ContainerNotDeletable.to_string(),
            "Only empty containers in CREATED or SPECIFIED status can be deleted"
        );
    }
}
