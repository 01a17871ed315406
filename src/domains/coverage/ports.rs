use super::types::{Point, TrajectoryRecord};
use crate::common::DomainResult;
use async_trait::async_trait;

/// Port for durable, ordered storage of plan points (Postgres, in-memory, ...).
#[async_trait]
pub trait TrajectoryStore: Send + Sync {
    /// Persist every point of a plan as one atomic unit. Readers never see
    /// a partially written plan.
    async fn save(&self, plan_id: &str, points: &[Point]) -> DomainResult<()>;

    /// Points of a plan in the order they were saved; empty when unknown.
    async fn load_by_plan(&self, plan_id: &str) -> DomainResult<Vec<Point>>;

    /// Most recently created rows first, at most `limit` of them.
    async fn recent(&self, limit: usize) -> DomainResult<Vec<TrajectoryRecord>>;
}
