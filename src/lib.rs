pub mod adapters;
pub mod error;
pub mod models;
pub mod quality;

pub use crate::adapters::sqlite::{ReportStore, StoreConfig};
pub use crate::error::AppError;
pub use crate::models::{Measurement, Parameter, Report, Verdict};
pub use crate::quality::classifier::{Assessment, assess, classify};
pub use crate::adapters::submission::{Submission, now_timestamp, submit};
pub use crate::quality::thresholds::{SAFE_LIMITS, SafeRange, safe_range};
