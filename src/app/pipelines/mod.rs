pub mod launch_pipeline;

pub use launch_pipeline::{parse_launch_records, LaunchPipeline};
