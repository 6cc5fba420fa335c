//! Feeding calculation pipeline and diagnostic analyzer for shrimp ponds.

pub mod assembler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fallback;
pub mod logger;
pub mod normalize;
pub mod pipeline;
pub mod reference;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{PondfeedError, StepError};
pub use service::FeedingService;
