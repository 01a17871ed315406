//! Boustrophedon (zig-zag) coverage path generation.
//!
//! Rows are swept bottom-up from `y = 0` to the surface height in `step`
//! increments, alternating direction each row. Candidate points inside any
//! obstacle (edges included) are dropped. Rows are independent: a row split
//! by obstacles still emits all of its free segments in traversal order, and
//! a fully blocked row contributes nothing but still consumes its `y` step.

use super::types::{Obstacle, Plan, PlanRequest, Point};
use crate::common::{DomainError, DomainResult};
use chrono::Utc;
use uuid::Uuid;

/// Seconds added to the timestamp of each successive point.
pub const TIMESTAMP_DELTA: f64 = 0.01;

/// Upper bound on scanned grid cells for a single plan.
pub const MAX_GRID_POINTS: usize = 5_000_000;

const COORDINATE_SCALE: f64 = 1000.0;
const STEP_TOLERANCE: f64 = 1e-9;

/// Generate a coverage plan, stamping points from the current wall-clock time.
pub fn generate(request: &PlanRequest) -> DomainResult<Plan> {
    generate_at(request, now_seconds())
}

/// Generate a coverage plan whose first point carries `start_timestamp`.
pub fn generate_at(request: &PlanRequest, start_timestamp: f64) -> DomainResult<Plan> {
    let PlanRequest {
        surface_width: width,
        surface_height: height,
        ref obstacles,
        step,
    } = *request;

    check_extent("surface_width", width)?;
    check_extent("surface_height", height)?;
    if !step.is_finite() || step <= 0.0 {
        return Err(DomainError::invalid(format!(
            "step must be a finite value greater than 0, got {}",
            step
        )));
    }

    let (columns, rows) = grid_dimensions(width, height, step)?;

    let plan_id = Uuid::new_v4().to_string();
    let mut points = Vec::new();
    let mut left_to_right = true;

    for row in 0..=rows {
        let y = round_coordinate(row as f64 * step);
        for column in 0..=columns {
            let offset = column as f64 * step;
            let x = if left_to_right {
                round_coordinate(offset)
            } else {
                round_coordinate(width - offset)
            };
            if is_obstructed(obstacles, x, y) {
                continue;
            }
            let timestamp = start_timestamp + points.len() as f64 * TIMESTAMP_DELTA;
            points.push(Point { x, y, timestamp });
        }
        left_to_right = !left_to_right;
    }

    Ok(Plan { plan_id, points })
}

/// Number of whole steps that fit in `extent`; the scan visits `0..=n`.
pub fn steps_within(extent: f64, step: f64) -> usize {
    (extent / step + STEP_TOLERANCE).floor() as usize
}

// Sized in f64 first: a tiny step would saturate the usize cast.
fn grid_dimensions(width: f64, height: f64, step: f64) -> DomainResult<(usize, usize)> {
    let limit = MAX_GRID_POINTS as f64;
    let span = |extent: f64| (extent / step + STEP_TOLERANCE).floor() + 1.0;
    let (across, up) = (span(width), span(height));
    let too_large = || {
        DomainError::invalid(format!(
            "step {} yields more than {} grid points",
            step, MAX_GRID_POINTS
        ))
    };
    if !(across <= limit && up <= limit && across * up <= limit) {
        return Err(too_large());
    }

    let columns = steps_within(width, step);
    let rows = steps_within(height, step);
    (columns + 1)
        .checked_mul(rows + 1)
        .filter(|&cells| cells <= MAX_GRID_POINTS)
        .ok_or_else(too_large)?;
    Ok((columns, rows))
}

fn is_obstructed(obstacles: &[Obstacle], x: f64, y: f64) -> bool {
    obstacles.iter().any(|obstacle| obstacle.contains(x, y))
}

// Zero extents are degenerate but valid surfaces (a single row or column).
fn check_extent(field: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::invalid(format!(
            "{} must be a finite non-negative value, got {}",
            field, value
        )))
    }
}

fn round_coordinate(value: f64) -> f64 {
    // + 0.0 normalises -0.0
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE + 0.0
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
