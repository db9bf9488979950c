// ==========================================
// CFS装箱计划系统 - 存储边界错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 服务端错误体为 {message} 或 {error} JSON,
//       无法解析时退回各操作的 "Failed to ..." 兜底文案
// ==========================================

use thiserror::Error;

/// 存储边界错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 远程响应错误 =====
    #[error("{message}")]
    Remote { status: u16, message: String },

    // ===== 网络错误 =====
    #[error("网络请求失败: {0}")]
    Network(String),

    // ===== 数据错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("响应解析失败: {0}")]
    Decode(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// 从非 2xx 响应体构造远程错误
    ///
    /// # 规则
    /// - 响应体为 JSON 且含 `message` 字段 → 使用该文案
    /// - 否则含 `error` 字段 → 使用该文案
    /// - 否则 → 使用调用方提供的兜底文案 ("Failed to ...")
    pub fn from_remote_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str().map(|s| s.to_string()))
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        StoreError::Remote { status, message }
    }

    /// 判断是否为未找到错误 (用于工作台自愈路径)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::Remote { status: 404, .. }
        )
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
