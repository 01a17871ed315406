use super::types::{Obstacle, PlanRequest};
use ordered_float::OrderedFloat;

type ObstacleKey = [OrderedFloat<f64>; 4];

/// Canonical cache key for a [`PlanRequest`].
///
/// Obstacles are reduced to a sorted, de-duplicated list so two requests
/// naming the same obstacle set in a different order share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanFingerprint {
    surface_width: OrderedFloat<f64>,
    surface_height: OrderedFloat<f64>,
    step: OrderedFloat<f64>,
    obstacles: Vec<ObstacleKey>,
}

impl PlanFingerprint {
    pub fn of(request: &PlanRequest) -> Self {
        let mut obstacles: Vec<ObstacleKey> = request.obstacles.iter().map(obstacle_key).collect();
        obstacles.sort_unstable();
        obstacles.dedup();

        Self {
            surface_width: OrderedFloat(request.surface_width),
            surface_height: OrderedFloat(request.surface_height),
            step: OrderedFloat(request.step),
            obstacles,
        }
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}

impl From<&PlanRequest> for PlanFingerprint {
    fn from(request: &PlanRequest) -> Self {
        Self::of(request)
    }
}

fn obstacle_key(obstacle: &Obstacle) -> ObstacleKey {
    [
        OrderedFloat(obstacle.x),
        OrderedFloat(obstacle.y),
        OrderedFloat(obstacle.width),
        OrderedFloat(obstacle.height),
    ]
}
