use crate::common::DomainResult;
use crate::domains::coverage::{Point, TrajectoryRecord, TrajectoryStore};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Rows {
    records: Vec<TrajectoryRecord>,
    next_id: i64,
}

/// In-memory trajectory store for testing and development.
///
/// Rows are kept in insertion order with ids assigned like a serial primary
/// key. A plan is inserted under one write lock, so readers never observe a
/// partial plan.
#[derive(Debug, Default)]
pub struct InMemoryTrajectoryStore {
    rows: RwLock<Rows>,
}

impl InMemoryTrajectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn row_count(&self) -> usize {
        self.rows.read().await.records.len()
    }
}

#[async_trait]
impl TrajectoryStore for InMemoryTrajectoryStore {
    async fn save(&self, plan_id: &str, points: &[Point]) -> DomainResult<()> {
        let created_at = Utc::now();
        let mut rows = self.rows.write().await;
        rows.records.reserve(points.len());

        for point in points {
            rows.next_id += 1;
            let id = rows.next_id;
            rows.records.push(TrajectoryRecord {
                id,
                plan_id: plan_id.to_string(),
                x: point.x,
                y: point.y,
                timestamp: point.timestamp,
                created_at,
            });
        }

        Ok(())
    }

    async fn load_by_plan(&self, plan_id: &str) -> DomainResult<Vec<Point>> {
        let rows = self.rows.read().await;
        Ok(rows
            .records
            .iter()
            .filter(|record| record.plan_id == plan_id)
            .map(TrajectoryRecord::point)
            .collect())
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<TrajectoryRecord>> {
        let rows = self.rows.read().await;
        // Ids and creation times both grow with insertion order.
        Ok(rows.records.iter().rev().take(limit).cloned().collect())
    }
}
