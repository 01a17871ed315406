use crate::common::{DomainError, DomainResult};
use crate::config::PostgresConfig;
use crate::domains::coverage::{Point, TrajectoryRecord, TrajectoryStore};
use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use std::fmt::Display;
use tokio_postgres::NoTls;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS trajectories (
        id BIGSERIAL PRIMARY KEY,
        plan_id TEXT NOT NULL,
        x DOUBLE PRECISION NOT NULL,
        y DOUBLE PRECISION NOT NULL,
        ts DOUBLE PRECISION NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );

    CREATE INDEX IF NOT EXISTS idx_trajectories_plan_id
    ON trajectories(plan_id);

    CREATE INDEX IF NOT EXISTS idx_trajectories_created_at
    ON trajectories(created_at DESC);
"#;

pub struct PostgresTrajectoryStore {
    pool: Pool,
}

impl PostgresTrajectoryStore {
    /// Build a pool from configuration and make sure the schema exists.
    pub async fn connect(config: &PostgresConfig) -> DomainResult<Self> {
        let mut pg_config = Config::new();
        pg_config.url = Some(config.connection_string());
        pg_config.pool = Some(PoolConfig::new(config.max_connections));

        let pool = pg_config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(infra("Failed to create PostgreSQL pool"))?;

        let store = Self::from_pool(pool);
        store.initialize_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn initialize_schema(&self) -> DomainResult<()> {
        let client = self.client().await?;
        client
            .batch_execute(SCHEMA)
            .await
            .map_err(infra("Failed to initialize database schema"))?;
        Ok(())
    }

    async fn client(&self) -> DomainResult<deadpool_postgres::Client> {
        self.pool
            .get()
            .await
            .map_err(infra("Failed to get database connection"))
    }
}

fn infra<E: Display>(context: &'static str) -> impl Fn(E) -> DomainError {
    move |e| DomainError::InfrastructureError(format!("{}: {}", context, e))
}

#[async_trait]
impl TrajectoryStore for PostgresTrajectoryStore {
    async fn save(&self, plan_id: &str, points: &[Point]) -> DomainResult<()> {
        let mut client = self.client().await?;
        let tx = client
            .transaction()
            .await
            .map_err(infra("Failed to begin transaction"))?;

        let stmt = tx
            .prepare_cached("INSERT INTO trajectories (plan_id, x, y, ts) VALUES ($1, $2, $3, $4)")
            .await
            .map_err(infra("Failed to prepare statement"))?;

        for point in points {
            tx.execute(&stmt, &[&plan_id, &point.x, &point.y, &point.timestamp])
                .await
                .map_err(infra("Failed to insert trajectory point"))?;
        }

        // Dropping an uncommitted transaction rolls it back.
        tx.commit()
            .await
            .map_err(infra("Failed to commit trajectory points"))?;
        Ok(())
    }

    async fn load_by_plan(&self, plan_id: &str) -> DomainResult<Vec<Point>> {
        let client = self.client().await?;
        let rows = client
            .query(
                "SELECT x, y, ts FROM trajectories WHERE plan_id = $1 ORDER BY id ASC",
                &[&plan_id],
            )
            .await
            .map_err(infra("Failed to load trajectory points"))?;

        Ok(rows
            .iter()
            .map(|row| Point {
                x: row.get(0),
                y: row.get(1),
                timestamp: row.get(2),
            })
            .collect())
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<TrajectoryRecord>> {
        let client = self.client().await?;
        let rows = client
            .query(
                "SELECT id, plan_id, x, y, ts, created_at
                 FROM trajectories
                 ORDER BY created_at DESC, id DESC
                 LIMIT $1",
                &[&(limit as i64)],
            )
            .await
            .map_err(infra("Failed to load recent trajectories"))?;

        Ok(rows
            .iter()
            .map(|row| TrajectoryRecord {
                id: row.get(0),
                plan_id: row.get(1),
                x: row.get(2),
                y: row.get(3),
                timestamp: row.get(4),
                created_at: row.get(5),
            })
            .collect())
    }
}
