// Coverage Service - request handling for planning requests
use crate::common::{ApplicationError, ApplicationResult, ResultCache};
use crate::domains::coverage::{generate, Plan, PlanFingerprint, PlanRequest, TrajectoryStore};
use crate::domains::logger::DynLogger;
use std::sync::Arc;
use std::time::Duration;

pub type PlanCache = ResultCache<PlanFingerprint, Plan>;

pub struct CoverageService {
    store: Arc<dyn TrajectoryStore>,
    cache: Arc<PlanCache>,
    cache_ttl: Duration,
    logger: DynLogger,
}

impl CoverageService {
    pub fn new(
        store: Arc<dyn TrajectoryStore>,
        cache: Arc<PlanCache>,
        cache_ttl: Duration,
        logger: DynLogger,
    ) -> Self {
        Self {
            store,
            cache,
            cache_ttl,
            logger,
        }
    }

    /// Plan a coverage path, reusing a cached result for an identical request.
    ///
    /// Points are persisted before they are cached, so a cache hit always
    /// refers to a plan that can be played back.
    pub async fn plan(&self, request: PlanRequest) -> ApplicationResult<Plan> {
        request.validate()?;

        let key = PlanFingerprint::of(&request);
        if let Some(plan) = self.cache.get(&key) {
            self.logger
                .info(&format!("Coverage result for plan {} returned from cache", plan.plan_id));
            return Ok(plan);
        }

        // CPU-bound; keep it off the workers that drive playback streams.
        let (request, generated) = tokio::task::spawn_blocking(move || {
            let generated = generate(&request);
            (request, generated)
        })
        .await
        .map_err(|e| ApplicationError::GenerationFault(e.to_string()))?;
        let plan = generated?;
        if plan.is_empty() {
            self.logger.warn(&format!(
                "No coverage points generated for {}x{} surface with {} obstacles",
                request.surface_width,
                request.surface_height,
                request.obstacles.len()
            ));
            return Err(ApplicationError::NoPathGenerated);
        }

        self.store
            .save(&plan.plan_id, &plan.points)
            .await
            .map_err(|e| {
                self.logger
                    .error(&format!("Failed to persist plan {}: {}", plan.plan_id, e));
                ApplicationError::PersistenceFailure(e.to_string())
            })?;

        self.cache.put(key, plan.clone(), self.cache_ttl);
        self.logger.info(&format!(
            "Created plan {} with {} points",
            plan.plan_id,
            plan.len()
        ));
        Ok(plan)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
