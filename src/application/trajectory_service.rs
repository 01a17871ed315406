use crate::common::{ApplicationResult, DomainError};
use crate::domains::coverage::{Point, TrajectoryRecord, TrajectoryStore};
use crate::domains::logger::DynLogger;
use std::sync::Arc;

pub const MAX_LISTING_LIMIT: usize = 1000;

/// Read side over stored trajectories.
pub struct TrajectoryService {
    store: Arc<dyn TrajectoryStore>,
    logger: DynLogger,
}

impl TrajectoryService {
    pub fn new(store: Arc<dyn TrajectoryStore>, logger: DynLogger) -> Self {
        Self { store, logger }
    }

    /// Most recent rows across all plans; `limit` is clamped to `1..=1000`.
    pub async fn recent(&self, limit: usize) -> ApplicationResult<Vec<TrajectoryRecord>> {
        let limit = limit.clamp(1, MAX_LISTING_LIMIT);
        Ok(self.store.recent(limit).await?)
    }

    pub async fn points(&self, plan_id: &str) -> ApplicationResult<Vec<Point>> {
        let points = self.store.load_by_plan(plan_id).await?;
        if points.is_empty() {
            return Err(DomainError::PlanNotFound {
                plan_id: plan_id.to_string(),
            }
            .into());
        }
        self.logger.info(&format!(
            "Returned {} points for plan_id={}",
            points.len(),
            plan_id
        ));
        Ok(points)
    }
}
