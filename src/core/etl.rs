use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting launch analytics run");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("Fetching launch records...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} launch records", records.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Aggregating launch records...");
        let report = self.pipeline.transform(records).await?;
        tracing::info!(
            "Aggregated {} sites, {} scatter points, {} proximity distances",
            report.sites.len(),
            report.scatter.len(),
            report.proximities.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
