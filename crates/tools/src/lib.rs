pub mod generate;
pub mod popup;
pub mod postprocess;

pub use generate::{BannerSource, GenerateConfig, GenerateError, GenerateSummary};
