// ==========================================
// CFS装箱计划系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与 Plan Store 线上格式一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 计划状态 (Plan Status)
// ==========================================
// DONE 的计划退出所有活跃视图, 也退出重复箱号检测范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Created,    // 已创建
    InProgress, // 执行中
    Done,       // 已完结
}

impl PlanStatus {
    /// 判断计划是否活跃 (参与重复箱号检测)
    pub fn is_active(&self) -> bool {
        *self != PlanStatus::Done
    }

    /// 转换为线上格式的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Created => "CREATED",
            PlanStatus::InProgress => "IN_PROGRESS",
            PlanStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 集装箱状态 (Container Status)
// ==========================================
// 红线: 全序状态机, 只允许按序推进;
// 唯一允许的回退是 CONFIRMED → SPECIFIED (显式撤销确认)
// 派生顺序即状态顺序 (Ord 依赖声明顺序)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerStatus {
    Created,    // 已创建 (无配载单)
    Specified,  // 已指定 (至少1张配载单)
    Confirmed,  // 已确认 (就绪条件全部满足)
    InProgress, // 装箱中 (锁定)
    Stuffed,    // 装箱完成
}

impl ContainerStatus {
    /// 判断集装箱是否锁定 (≥ IN_PROGRESS 后字段与配载集合不可变)
    pub fn is_locked(&self) -> bool {
        *self >= ContainerStatus::InProgress
    }

    /// 判断是否可接收/释放配载单 (< CONFIRMED)
    pub fn accepts_assignments(&self) -> bool {
        *self < ContainerStatus::Confirmed
    }

    /// 判断是否处于可删除状态 (CREATED / SPECIFIED)
    pub fn is_deletable_status(&self) -> bool {
        *self <= ContainerStatus::Specified
    }

    /// 转换为线上格式的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Created => "CREATED",
            ContainerStatus::Specified => "SPECIFIED",
            ContainerStatus::Confirmed => "CONFIRMED",
            ContainerStatus::InProgress => "IN_PROGRESS",
            ContainerStatus::Stuffed => "STUFFED",
        }
    }

    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CREATED" => Some(ContainerStatus::Created),
            "SPECIFIED" => Some(ContainerStatus::Specified),
            "CONFIRMED" => Some(ContainerStatus::Confirmed),
            "IN_PROGRESS" => Some(ContainerStatus::InProgress),
            "STUFFED" => Some(ContainerStatus::Stuffed),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 箱位查询状态 (Position State)
// ==========================================
// 就绪判定对 "未知" 采取保守态度: 非 SUCCESS 一律视为未就绪
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    Idle,    // 尚未查询
    Loading, // 查询中
    Success, // 查询成功
    Error,   // 查询失败
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionState::Idle => write!(f, "IDLE"),
            PositionState::Loading => write!(f, "LOADING"),
            PositionState::Success => write!(f, "SUCCESS"),
            PositionState::Error => write!(f, "ERROR"),
        }
    }
}
