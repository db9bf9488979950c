// ==========================================
// 集成测试辅助 - 内存版 Plan Store
// ==========================================
// 模拟服务端语义: 分配批次原子应用, 配载计数与
// CREATED/SPECIFIED 状态由"服务端"重算
// ==========================================

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use cfs_stuffing::domain::plan::{PackingListAssignment, PlanContainer, StuffingPlan};
use cfs_stuffing::domain::types::{ContainerStatus, PlanStatus};
use cfs_stuffing::store::{
    AssignmentPair, ContainerPayload, PlanPage, PlanQuery, PlanStore, PositionLookup, StoreError,
    StoreResult,
};

pub fn dt() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// 构造空计划
pub fn plan(plan_id: &str, plan_code: &str, status: PlanStatus) -> StuffingPlan {
    StuffingPlan {
        plan_id: plan_id.to_string(),
        plan_code: plan_code.to_string(),
        status,
        export_order_id: format!("EO-{}", plan_id),
        containers: vec![],
        packing_lists: vec![],
        created_at: dt(),
        updated_at: dt(),
    }
}

/// 构造集装箱
pub fn container(container_id: &str, plan_id: &str, status: ContainerStatus) -> PlanContainer {
    PlanContainer {
        container_id: container_id.to_string(),
        plan_id: plan_id.to_string(),
        container_number: None,
        container_type_code: "40HQ".to_string(),
        status,
        equipment_booked: false,
        appointment_booked: false,
        estimated_stuffing_at: None,
        estimated_move_at: None,
        assigned_packing_list_count: 0,
        notes: None,
        created_at: dt(),
        updated_at: dt(),
    }
}

/// 构造就绪条件全满足的集装箱 (还差配载单与箱位)
pub fn ready_container(container_id: &str, plan_id: &str, number: &str) -> PlanContainer {
    PlanContainer {
        container_number: Some(number.to_string()),
        equipment_booked: true,
        appointment_booked: true,
        estimated_stuffing_at: Some(dt()),
        estimated_move_at: Some(dt()),
        ..container(container_id, plan_id, ContainerStatus::Created)
    }
}

/// 构造配载单
pub fn packing_list(packing_list_id: &str, target: Option<&str>) -> PackingListAssignment {
    PackingListAssignment {
        packing_list_id: packing_list_id.to_string(),
        plan_container_id: target.map(|s| s.to_string()),
        shipper: Some("上海某某贸易".to_string()),
        consignee: Some("Overseas Buyer".to_string()),
        customs_ref: None,
    }
}

// ==========================================
// MemoryPlanStore
// ==========================================

pub struct MemoryPlanStore {
    plans: Mutex<Vec<StuffingPlan>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryPlanStore {
    pub fn new(plans: Vec<StuffingPlan>) -> Self {
        let mut store = Self {
            plans: Mutex::new(plans),
            calls: Mutex::new(vec![]),
        };
        store.recompute_all();
        store
    }

    /// 指定操作的调用次数 (用于断言"请求未发出")
    pub fn calls_of(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == op)
            .count()
    }

    /// 直接篡改存储内容 (模拟并发会话的修改)
    pub fn mutate<F: FnOnce(&mut Vec<StuffingPlan>)>(&self, f: F) {
        let mut plans = self.plans.lock().unwrap();
        f(&mut plans);
        Self::recompute(&mut plans);
    }

    /// 读取存储内集装箱 (断言存储侧状态)
    pub fn stored_container(&self, plan_id: &str, container_id: &str) -> Option<PlanContainer> {
        self.plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.plan_id == plan_id)
            .and_then(|p| p.container(container_id).cloned())
    }

    pub fn stored_packing_list(
        &self,
        plan_id: &str,
        packing_list_id: &str,
    ) -> Option<PackingListAssignment> {
        self.plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.plan_id == plan_id)
            .and_then(|p| p.packing_list(packing_list_id).cloned())
    }

    fn record(&self, op: &str) {
        self.calls.lock().unwrap().push(op.to_string());
    }

    fn recompute_all(&mut self) {
        let mut plans = self.plans.lock().unwrap();
        Self::recompute(&mut plans);
    }

    /// 服务端真相: 配载计数与 CREATED/SPECIFIED 状态重算
    fn recompute(plans: &mut [StuffingPlan]) {
        for plan in plans.iter_mut() {
            let mut counts: HashMap<String, i32> = HashMap::new();
            for pl in &plan.packing_lists {
                if let Some(cid) = &pl.plan_container_id {
                    *counts.entry(cid.clone()).or_insert(0) += 1;
                }
            }
            for c in plan.containers.iter_mut() {
                c.assigned_packing_list_count =
                    counts.get(&c.container_id).copied().unwrap_or(0);
                if c.status < ContainerStatus::Confirmed {
                    c.status = if c.assigned_packing_list_count > 0 {
                        ContainerStatus::Specified
                    } else {
                        ContainerStatus::Created
                    };
                }
            }
        }
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn list_plans(&self, query: &PlanQuery) -> StoreResult<PlanPage> {
        self.record("list_plans");
        let plans = self.plans.lock().unwrap();
        let filtered: Vec<StuffingPlan> = plans
            .iter()
            .filter(|p| query.status.map(|s| p.status == s).unwrap_or(true))
            .cloned()
            .collect();

        let total = filtered.len() as u64;
        let start = ((query.page - 1) * query.items_per_page) as usize;
        let items: Vec<StuffingPlan> = filtered
            .into_iter()
            .skip(start)
            .take(query.items_per_page as usize)
            .collect();

        Ok(PlanPage {
            items,
            total,
            page: query.page,
            items_per_page: query.items_per_page,
        })
    }

    async fn get_plan(&self, plan_id: &str) -> StoreResult<StuffingPlan> {
        self.record("get_plan");
        self.plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.plan_id == plan_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            })
    }

    async fn delete_plan(&self, plan_id: &str) -> StoreResult<()> {
        self.record("delete_plan");
        let mut plans = self.plans.lock().unwrap();
        let before = plans.len();
        plans.retain(|p| p.plan_id != plan_id);
        if plans.len() == before {
            return Err(StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            });
        }
        Ok(())
    }

    async fn create_container(
        &self,
        plan_id: &str,
        payload: &ContainerPayload,
    ) -> StoreResult<PlanContainer> {
        self.record("create_container");
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.plan_id == plan_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            })?;

        let created = PlanContainer {
            container_id: Uuid::new_v4().to_string(),
            plan_id: plan_id.to_string(),
            container_number: payload.container_number.clone(),
            container_type_code: payload.container_type_code.clone(),
            status: ContainerStatus::Created,
            equipment_booked: payload.equipment_booked,
            appointment_booked: payload.appointment_booked,
            estimated_stuffing_at: payload.estimated_stuffing_at,
            estimated_move_at: payload.estimated_move_at,
            assigned_packing_list_count: 0,
            notes: payload.notes.clone(),
            created_at: dt(),
            updated_at: dt(),
        };
        plan.containers.push(created.clone());
        Ok(created)
    }

    async fn update_container(
        &self,
        plan_id: &str,
        container_id: &str,
        payload: &ContainerPayload,
    ) -> StoreResult<PlanContainer> {
        self.record("update_container");
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.plan_id == plan_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            })?;
        let container = plan
            .containers
            .iter_mut()
            .find(|c| c.container_id == container_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "PlanContainer".to_string(),
                id: container_id.to_string(),
            })?;

        container.container_number = payload.container_number.clone();
        container.container_type_code = payload.container_type_code.clone();
        container.estimated_stuffing_at = payload.estimated_stuffing_at;
        container.estimated_move_at = payload.estimated_move_at;
        container.equipment_booked = payload.equipment_booked;
        container.appointment_booked = payload.appointment_booked;
        container.notes = payload.notes.clone();
        Ok(container.clone())
    }

    async fn delete_container(&self, plan_id: &str, container_id: &str) -> StoreResult<()> {
        self.record("delete_container");
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.plan_id == plan_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            })?;
        let before = plan.containers.len();
        plan.containers.retain(|c| c.container_id != container_id);
        if plan.containers.len() == before {
            return Err(StoreError::NotFound {
                entity: "PlanContainer".to_string(),
                id: container_id.to_string(),
            });
        }
        Ok(())
    }

    async fn change_container_status(
        &self,
        plan_id: &str,
        container_id: &str,
        status: ContainerStatus,
    ) -> StoreResult<PlanContainer> {
        self.record("change_container_status");
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.plan_id == plan_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            })?;
        let container = plan
            .containers
            .iter_mut()
            .find(|c| c.container_id == container_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "PlanContainer".to_string(),
                id: container_id.to_string(),
            })?;
        container.status = status;
        Ok(container.clone())
    }

    async fn assign_packing_lists(
        &self,
        plan_id: &str,
        pairs: &[AssignmentPair],
    ) -> StoreResult<()> {
        self.record("assign_packing_lists");
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.plan_id == plan_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Plan".to_string(),
                id: plan_id.to_string(),
            })?;

        // 整批原子应用
        for pair in pairs {
            let pl = plan
                .packing_lists
                .iter_mut()
                .find(|p| p.packing_list_id == pair.packing_list_id)
                .ok_or_else(|| StoreError::NotFound {
                    entity: "PackingList".to_string(),
                    id: pair.packing_list_id.clone(),
                })?;
            pl.plan_container_id = pair.plan_container_id.clone();
        }
        drop(plan);
        Self::recompute(&mut plans);
        Ok(())
    }
}

// ==========================================
// MemoryPositionLookup
// ==========================================

pub struct MemoryPositionLookup {
    positions: Mutex<HashMap<String, String>>,
}

impl MemoryPositionLookup {
    pub fn new() -> Self {
        Self {
            positions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with(positions: &[(&str, &str)]) -> Self {
        let lookup = Self::new();
        for (number, value) in positions {
            lookup.set(number, value);
        }
        lookup
    }

    pub fn set(&self, container_number: &str, value: &str) {
        self.positions
            .lock()
            .unwrap()
            .insert(container_number.to_string(), value.to_string());
    }
}

#[async_trait]
impl PositionLookup for MemoryPositionLookup {
    async fn container_position(&self, container_number: &str) -> StoreResult<Option<String>> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .get(container_number)
            .cloned())
    }
}
