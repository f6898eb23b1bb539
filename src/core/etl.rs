use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::{PhaseRecorder, RunStats};

/// A finished run: where the load phase wrote, and what each phase cost.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub output_path: String,
    pub stats: RunStats,
}

/// Runs a pipeline's extract, transform and load phases in order.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    sample_usage: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    /// With `monitor_enabled`, CPU and memory are sampled after each phase.
    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            sample_usage: monitor_enabled,
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunOutput> {
        let mut recorder = PhaseRecorder::new(self.sample_usage);
        tracing::info!("🚀 Starting pipeline");

        tracing::info!("📥 Extracting data...");
        let extracted = self.pipeline.extract().await?;
        recorder.record("extract");

        tracing::info!("🔄 Transforming data...");
        let transformed = self.pipeline.transform(extracted).await?;
        recorder.record("transform");

        tracing::info!("💾 Loading data...");
        let output_path = self.pipeline.load(transformed).await?;
        recorder.record("load");
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(RunOutput {
            output_path,
            stats: recorder.finish(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AgroError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        phases: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    impl RecordingPipeline {
        fn new(fail_transform: bool) -> Self {
            Self {
                phases: Mutex::new(Vec::new()),
                fail_transform,
            }
        }
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        type Extracted = u32;
        type Transformed = String;

        async fn extract(&self) -> Result<u32> {
            self.phases.lock().unwrap().push("extract");
            Ok(21)
        }

        async fn transform(&self, data: u32) -> Result<String> {
            self.phases.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(AgroError::processing("bad data"));
            }
            Ok(format!("value-{}", data * 2))
        }

        async fn load(&self, result: String) -> Result<String> {
            self.phases.lock().unwrap().push("load");
            Ok(format!("/tmp/{}.json", result))
        }
    }

    #[tokio::test]
    async fn test_runs_phases_in_order() {
        let engine = EtlEngine::new(RecordingPipeline::new(false));
        let run = engine.run().await.unwrap();

        assert_eq!(run.output_path, "/tmp/value-42.json");
        assert_eq!(
            *engine.pipeline().phases.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );

        let timed: Vec<_> = run.stats.phases.iter().map(|p| p.phase).collect();
        assert_eq!(timed, vec!["extract", "transform", "load"]);
        assert!(run.stats.peak_memory_mb.is_none());
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let engine = EtlEngine::new_with_monitoring(RecordingPipeline::new(true), false);
        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, AgroError::ProcessingError { .. }));
        assert_eq!(
            *engine.pipeline().phases.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
