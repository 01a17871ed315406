use super::messages::PlaybackMessage;
use super::ports::{ConnectionError, PlaybackConnection};
use crate::common::{ApplicationError, ApplicationResult};
use crate::domains::coverage::TrajectoryStore;
use crate::domains::logger::DynLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Default delay between two emitted points.
pub const DEFAULT_PLAYBACK_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal state of one playback connection.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome {
    /// Every point was sent and the server closed the connection.
    Completed { emitted: usize },
    /// Unknown or empty plan; a single `plan_not_found` frame was sent.
    PlanNotFound,
    /// The client went away after `emitted` points.
    Disconnected { emitted: usize },
    /// Loading or sending failed after `emitted` points; an error frame was
    /// attempted before closing.
    Failed { reason: String, emitted: usize },
}

impl PlaybackOutcome {
    pub fn emitted(&self) -> usize {
        match self {
            PlaybackOutcome::Completed { emitted }
            | PlaybackOutcome::Disconnected { emitted }
            | PlaybackOutcome::Failed { emitted, .. } => *emitted,
            PlaybackOutcome::PlanNotFound => 0,
        }
    }

    /// Only a fault is an error from the server's point of view.
    pub fn into_result(self) -> ApplicationResult<usize> {
        match self {
            PlaybackOutcome::Failed { reason, .. } => Err(ApplicationError::StreamFault(reason)),
            other => Ok(other.emitted()),
        }
    }
}

/// Replays stored plans point by point at a fixed cadence.
///
/// The streamer holds no per-connection state; each call to [`play`](Self::play)
/// owns its own copy of the points and its own cursor, so any number of
/// connections can be served concurrently from one instance.
pub struct PlaybackStreamer {
    store: Arc<dyn TrajectoryStore>,
    interval: Duration,
    logger: DynLogger,
}

impl PlaybackStreamer {
    pub fn new(store: Arc<dyn TrajectoryStore>, interval: Duration, logger: DynLogger) -> Self {
        Self {
            store,
            interval,
            logger,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn play<C>(&self, plan_id: &str, connection: &mut C) -> PlaybackOutcome
    where
        C: PlaybackConnection + ?Sized,
    {
        let points = match self.store.load_by_plan(plan_id).await {
            Ok(points) => points,
            Err(e) => return self.fail(plan_id, connection, e.to_string(), 0).await,
        };

        if points.is_empty() {
            self.logger
                .warn(&format!("Playback: plan '{}' not found", plan_id));
            // The connection is closed next regardless of delivery.
            let _ = connection.send(&PlaybackMessage::plan_not_found()).await;
            connection.close().await;
            return PlaybackOutcome::PlanNotFound;
        }

        let total = points.len();
        self.logger.info(&format!(
            "Playback started for plan {} ({} points)",
            plan_id, total
        ));

        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                tokio::select! {
                    _ = sleep(self.interval) => {}
                    _ = connection.closed() => return self.disconnected(plan_id, index),
                }
            }

            match connection.send(&PlaybackMessage::point(point, index, total)).await {
                Ok(()) => {}
                Err(ConnectionError::Disconnected) => return self.disconnected(plan_id, index),
                Err(ConnectionError::Transport(reason)) => {
                    return self.fail(plan_id, connection, reason, index).await
                }
            }
        }

        connection.close().await;
        self.logger
            .info(&format!("Playback completed for plan {}", plan_id));
        PlaybackOutcome::Completed { emitted: total }
    }

    fn disconnected(&self, plan_id: &str, emitted: usize) -> PlaybackOutcome {
        self.logger.info(&format!(
            "Playback client disconnected from plan {} after {} points",
            plan_id, emitted
        ));
        PlaybackOutcome::Disconnected { emitted }
    }

    async fn fail<C>(
        &self,
        plan_id: &str,
        connection: &mut C,
        reason: String,
        emitted: usize,
    ) -> PlaybackOutcome
    where
        C: PlaybackConnection + ?Sized,
    {
        self.logger.error(&format!(
            "Playback error for plan {} after {} points: {}",
            plan_id, emitted, reason
        ));
        // Best effort: the close below must happen even if this fails.
        let _ = connection.send(&PlaybackMessage::error(reason.clone())).await;
        connection.close().await;
        PlaybackOutcome::Failed { reason, emitted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DomainError, DomainResult};
    use crate::domains::coverage::{Point, TrajectoryRecord};
    use crate::domains::logger::DomainLogger;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::time::Instant;

    struct Quiet;

    impl DomainLogger for Quiet {
        fn info(&self, _msg: &str) {}
        fn warn(&self, _msg: &str) {}
        fn error(&self, _msg: &str) {}
    }

    struct FixedStore {
        plans: HashMap<String, Vec<Point>>,
        broken: bool,
    }

    impl FixedStore {
        fn with_plan(plan_id: &str, points: Vec<Point>) -> Arc<Self> {
            let mut plans = HashMap::new();
            plans.insert(plan_id.to_string(), points);
            Arc::new(Self { plans, broken: false })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self { plans: HashMap::new(), broken: true })
        }
    }

    #[async_trait]
    impl TrajectoryStore for FixedStore {
        async fn save(&self, _plan_id: &str, _points: &[Point]) -> DomainResult<()> {
            Ok(())
        }

        async fn load_by_plan(&self, plan_id: &str) -> DomainResult<Vec<Point>> {
            if self.broken {
                return Err(DomainError::InfrastructureError("database unavailable".to_string()));
            }
            Ok(self.plans.get(plan_id).cloned().unwrap_or_default())
        }

        async fn recent(&self, _limit: usize) -> DomainResult<Vec<TrajectoryRecord>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingConnection {
        sent: Vec<(Instant, PlaybackMessage)>,
        disconnect_after: Option<usize>,
        fail_on: Option<usize>,
        closes: usize,
    }

    #[async_trait]
    impl PlaybackConnection for RecordingConnection {
        async fn send(&mut self, message: &PlaybackMessage) -> Result<(), ConnectionError> {
            if self.fail_on == Some(self.sent.len()) {
                self.fail_on = None;
                return Err(ConnectionError::Transport("socket reset".to_string()));
            }
            if matches!(self.disconnect_after, Some(n) if self.sent.len() >= n) {
                return Err(ConnectionError::Disconnected);
            }
            self.sent.push((Instant::now(), message.clone()));
            Ok(())
        }

        async fn closed(&mut self) {
            match self.disconnect_after {
                Some(n) if self.sent.len() >= n => {}
                _ => std::future::pending::<()>().await,
            }
        }

        async fn close(&mut self) {
            self.closes += 1;
        }
    }

    fn points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point { x: i as f64, y: 0.5, timestamp: 100.0 + i as f64 * 0.01 })
            .collect()
    }

    fn streamer(store: Arc<dyn TrajectoryStore>) -> PlaybackStreamer {
        PlaybackStreamer::new(store, DEFAULT_PLAYBACK_INTERVAL, Arc::new(Quiet))
    }

    #[tokio::test(start_paused = true)]
    async fn test_streams_in_order_with_pacing() {
        let streamer = streamer(FixedStore::with_plan("p", points(3)));
        let mut connection = RecordingConnection::default();

        let outcome = streamer.play("p", &mut connection).await;

        assert_eq!(outcome, PlaybackOutcome::Completed { emitted: 3 });
        assert_eq!(connection.closes, 1);
        assert_eq!(connection.sent.len(), 3);
        for (i, (_, message)) in connection.sent.iter().enumerate() {
            match message {
                PlaybackMessage::Point { x, index, total, .. } => {
                    assert_eq!(*index, i);
                    assert_eq!(*total, 3);
                    assert_eq!(*x, i as f64);
                }
                other => panic!("Expected point frame, got {:?}", other),
            }
        }
        for pair in connection.sent.windows(2) {
            let gap = pair[1].0 - pair[0].0;
            assert!(gap >= DEFAULT_PLAYBACK_INTERVAL);
            assert!(gap < DEFAULT_PLAYBACK_INTERVAL + Duration::from_millis(5));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_plan_sends_single_notification() {
        let streamer = streamer(FixedStore::with_plan("p", points(3)));
        let mut connection = RecordingConnection::default();

        let outcome = streamer.play("missing", &mut connection).await;

        assert_eq!(outcome, PlaybackOutcome::PlanNotFound);
        assert_eq!(connection.sent.len(), 1);
        assert_eq!(connection.sent[0].1, PlaybackMessage::plan_not_found());
        assert_eq!(connection.closes, 1);
        assert_eq!(outcome.into_result().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_plan_is_not_found() {
        let streamer = streamer(FixedStore::with_plan("empty", Vec::new()));
        let mut connection = RecordingConnection::default();
        assert_eq!(streamer.play("empty", &mut connection).await, PlaybackOutcome::PlanNotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_disconnect_stops_quietly() {
        let streamer = streamer(FixedStore::with_plan("p", points(10)));
        let mut connection = RecordingConnection {
            disconnect_after: Some(4),
            ..Default::default()
        };

        let outcome = streamer.play("p", &mut connection).await;

        assert_eq!(outcome, PlaybackOutcome::Disconnected { emitted: 4 });
        assert_eq!(connection.sent.len(), 4);
        assert!(connection.sent.iter().all(|(_, m)| !m.is_error()));
        assert_eq!(connection.closes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_sends_error_then_closes() {
        let streamer = streamer(FixedStore::broken());
        let mut connection = RecordingConnection::default();

        let outcome = streamer.play("p", &mut connection).await;

        match &outcome {
            PlaybackOutcome::Failed { reason, emitted } => {
                assert!(reason.contains("database unavailable"));
                assert_eq!(*emitted, 0);
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert_eq!(connection.sent.len(), 1);
        assert!(connection.sent[0].1.is_error());
        assert_eq!(connection.closes, 1);
        assert!(matches!(outcome.into_result(), Err(ApplicationError::StreamFault(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_fault_mid_stream_still_closes() {
        let streamer = streamer(FixedStore::with_plan("p", points(5)));
        let mut connection = RecordingConnection {
            fail_on: Some(2),
            ..Default::default()
        };

        let outcome = streamer.play("p", &mut connection).await;

        assert!(matches!(outcome, PlaybackOutcome::Failed { emitted: 2, .. }));
        assert_eq!(outcome.emitted(), 2);
        assert_eq!(connection.sent.len(), 3);
        assert!(connection.sent[2].1.is_error());
        assert_eq!(connection.closes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_is_identical() {
        let streamer = streamer(FixedStore::with_plan("p", points(4)));
        let mut first = RecordingConnection::default();
        let mut second = RecordingConnection::default();

        streamer.play("p", &mut first).await;
        streamer.play("p", &mut second).await;

        let frames = |c: &RecordingConnection| c.sent.iter().map(|(_, m)| m.clone()).collect::<Vec<_>>();
        assert_eq!(frames(&first), frames(&second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_streams_do_not_block_each_other() {
        let streamer = Arc::new(streamer(FixedStore::with_plan("p", points(5))));
        let started = Instant::now();

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let streamer = streamer.clone();
                tokio::spawn(async move {
                    let mut connection = RecordingConnection::default();
                    streamer.play("p", &mut connection).await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), PlaybackOutcome::Completed { emitted: 5 });
        }

        // Four streams of five points overlap: total time is one stream, not four.
        assert!(started.elapsed() < DEFAULT_PLAYBACK_INTERVAL * 5);
    }

    #[test]
    fn test_outcome_emitted() {
        assert_eq!(PlaybackOutcome::Disconnected { emitted: 2 }.emitted(), 2);
        assert_eq!(PlaybackOutcome::PlanNotFound.emitted(), 0);
        let failed = PlaybackOutcome::Failed { reason: "x".into(), emitted: 3 };
        assert_eq!(failed.emitted(), 3);
        assert!(failed.into_result().is_err());
    }
}
