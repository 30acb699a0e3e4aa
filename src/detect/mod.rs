//! Detection module: interception, classification, and findings.

mod classifier;
mod interceptor;
mod types;

pub use classifier::Classifier;
pub use interceptor::InflateInterceptor;
pub use types::{
    Finding, FindingKind, FindingRegistry, ScanResult, SharedRegistry, ROOT_SEGMENT,
    UNRESOLVED_NAME,
};
