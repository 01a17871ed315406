use crate::common::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Closed-rectangle test: points on an edge count as inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x <= x && x <= self.x + self.width && self.y <= y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub surface_width: f64,
    pub surface_height: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub step: f64,
}

impl PlanRequest {
    pub fn new(surface_width: f64, surface_height: f64, obstacles: Vec<Obstacle>, step: f64) -> Self {
        Self {
            surface_width,
            surface_height,
            obstacles,
            step,
        }
    }

    /// Boundary validation applied before a request reaches the generator.
    pub fn validate(&self) -> DomainResult<()> {
        require_positive("surface_width", self.surface_width)?;
        require_positive("surface_height", self.surface_height)?;
        require_positive("step", self.step)?;
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if !obstacle.x.is_finite() || !obstacle.y.is_finite() {
                return Err(DomainError::invalid(format!(
                    "obstacle {} has a non-finite position",
                    i
                )));
            }
            require_positive(&format!("obstacles[{}].width", i), obstacle.width)?;
            require_positive(&format!("obstacles[{}].height", i), obstacle.height)?;
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::invalid(format!(
            "{} must be a finite value greater than 0, got {}",
            field, value
        )))
    }
}

/// A single coverage point. `timestamp` is seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
}

/// One generated coverage path. Immutable after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub points: Vec<Point>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A persisted point row as returned by trajectory listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub id: i64,
    pub plan_id: String,
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
    pub created_at: DateTime<Utc>,
}

impl TrajectoryRecord {
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
            timestamp: self.timestamp,
        }
    }
}
