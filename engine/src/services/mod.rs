pub mod analysis_service;
pub mod render;

pub use analysis_service::{AnalysisService, Evaluation};
pub use render::render_report;
