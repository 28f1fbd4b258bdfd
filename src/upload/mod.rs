pub mod progress;
pub mod workflow;

pub use workflow::{UploadOutcome, UploadSettings, UploadWorkflow};
