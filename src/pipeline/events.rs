//! Structured events emitted by the composite pipeline.
//!
//! Stages log their own details through `tracing`. The composite additionally
//! reports one [`PipelineEvent`] per stage to an injected
//! [`PipelineObserver`], so callers can collect timings or surface degraded
//! runs without parsing logs.

use crate::core::errors::ProcessingStage;
use crate::core::traits::PipelineObserver;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, warn};

/// An event emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage finished successfully.
    StageCompleted {
        /// The stage that finished.
        stage: ProcessingStage,
        /// Number of items the stage produced.
        items: usize,
        /// Wall-clock time spent in the stage.
        elapsed: Duration,
    },
    /// The text detector failed; the pipeline continues with zero tokens.
    TextDetectionFailed {
        /// Message reported by the detector.
        message: String,
    },
    /// A stage failed and the pipeline stopped.
    PipelineFailed {
        /// The failing stage, when known.
        stage: Option<ProcessingStage>,
        /// Error message.
        message: String,
    },
}

/// Forwards events to `tracing`. This is the default observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageCompleted {
                stage,
                items,
                elapsed,
            } => debug!(%stage, items, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Stage completed"),
            PipelineEvent::TextDetectionFailed { message } => {
                warn!(%message, "Text detection failed, continuing without tokens")
            }
            PipelineEvent::PipelineFailed { stage, message } => match stage {
                Some(stage) => error!(%stage, %message, "Pipeline failed"),
                None => error!(%message, "Pipeline failed"),
            },
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Stages that reported completion, in order.
    pub fn completed_stages(&self) -> Vec<ProcessingStage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PipelineEvent::StageCompleted { stage, .. } => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let recorder = RecordingObserver::new();
        recorder.on_event(&PipelineEvent::StageCompleted {
            stage: ProcessingStage::Preprocess,
            items: 1,
            elapsed: Duration::from_millis(3),
        });
        recorder.on_event(&PipelineEvent::TextDetectionFailed {
            message: "timeout".to_string(),
        });
        recorder.on_event(&PipelineEvent::StageCompleted {
            stage: ProcessingStage::RegionExtraction,
            items: 4,
            elapsed: Duration::from_millis(1),
        });

        assert_eq!(recorder.events().len(), 3);
        assert_eq!(
            recorder.completed_stages(),
            vec![ProcessingStage::Preprocess, ProcessingStage::RegionExtraction]
        );
    }

    #[test]
    fn test_other_observers_accept_events() {
        let event = PipelineEvent::PipelineFailed {
            stage: Some(ProcessingStage::Preprocess),
            message: "zero-sized image".to_string(),
        };
        TracingObserver.on_event(&event);
        NoopObserver.on_event(&event);
    }
}
