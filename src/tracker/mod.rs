//! Task-tracker integration: API trait, ClickUp client, submission pipeline.

pub mod api;
pub mod clickup;
pub mod pipeline;

pub use api::{CreatedTask, NewTask, TrackerApi};
pub use clickup::ClickUpClient;
pub use pipeline::{SubmissionOutcome, SubmissionPipeline, SubmissionRequest, UploadOutcome};
