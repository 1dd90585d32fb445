pub mod export;
pub mod model;
pub mod stats;
pub mod synth;

// Re-export key types for convenience
pub use export::ExportFormat;
pub use model::{Dataset, Measurement};
pub use stats::StatsReport;
