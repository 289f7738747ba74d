pub mod engine;
pub mod lookup;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod roster;
pub mod stats;

pub use crate::domain::model::{Boss, Character, LookupSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
