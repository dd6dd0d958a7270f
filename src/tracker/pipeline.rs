//! Task submission pipeline — turns a completed conversation into a tracker
//! task, with bounded-concurrency attachment uploads.
//!
//! Failure model: anything up to and including task creation is fatal to the
//! submission; assignment and upload failures after that point are logged and
//! collected but never block success reporting.

use std::sync::Arc;

use crate::attachments::{AttachmentDescriptor, AttachmentKind};
use crate::channels::Reporter;
use crate::error::{PipelineError, TrackerError};
use crate::store::BindingStore;

use super::api::{NewTask, TrackerApi};

/// Everything the pipeline needs from a finished conversation.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub channel_id: String,
    pub channel_name: String,
    pub reporter: Reporter,
    pub details: String,
    pub title: String,
    pub attachments: Vec<AttachmentDescriptor>,
    pub permalink: Option<String>,
}

/// Outcome of one attachment.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub attachment: AttachmentDescriptor,
    pub success: bool,
    pub detail: Option<String>,
}

/// Result of a successful submission. Upload sub-failures are carried here,
/// not raised.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub task_id: String,
    pub uploads: Vec<UploadOutcome>,
}

/// The pipeline itself: binding lookup + tracker calls.
pub struct SubmissionPipeline {
    tracker: Arc<dyn TrackerApi>,
    bindings: Arc<dyn BindingStore>,
    batch_size: usize,
}

impl SubmissionPipeline {
    pub fn new(
        tracker: Arc<dyn TrackerApi>,
        bindings: Arc<dyn BindingStore>,
        batch_size: usize,
    ) -> Self {
        Self {
            tracker,
            bindings,
            batch_size: batch_size.max(1),
        }
    }

    /// Run the full submission.
    ///
    /// 1. Resolve the channel's list binding (abort if absent).
    /// 2. Create the task with the composed description.
    /// 3. Spawn the default-assignee update, if one is bound — its outcome is
    ///    logged, never awaited for the reply.
    /// 4. Upload file attachments in batches of `batch_size`, in order.
    /// 5. Amend the description with an evidence-links section iff any URL
    ///    references were collected.
    pub async fn submit(&self, req: SubmissionRequest) -> Result<SubmissionOutcome, PipelineError> {
        let binding = self.bindings.get(&req.channel_id).await;
        let list_id = binding
            .as_ref()
            .and_then(|b| b.list_id.clone())
            .ok_or_else(|| PipelineError::UnconfiguredChannel {
                channel: req.channel_name.clone(),
            })?;

        let description = compose_description(&req);
        let created = self
            .tracker
            .create_task(
                &list_id,
                &NewTask {
                    name: req.title.clone(),
                    description: description.clone(),
                },
            )
            .await?;
        if created.id.is_empty() {
            return Err(TrackerError::InvalidResponse(
                "create-task response had an empty id".into(),
            )
            .into());
        }
        tracing::info!(
            task_id = %created.id,
            list_id = %list_id,
            channel = %req.channel_name,
            "Task created"
        );

        if let Some(assignee) = binding.and_then(|b| b.assignee_id) {
            let tracker = Arc::clone(&self.tracker);
            let task_id = created.id.clone();
            tokio::spawn(async move {
                if let Err(e) = tracker.add_assignee(&task_id, &assignee).await {
                    tracing::warn!(task_id = %task_id, assignee = %assignee, "Default assignee update failed: {e}");
                }
            });
        }

        let (files, links): (Vec<_>, Vec<_>) = req
            .attachments
            .into_iter()
            .partition(|a| a.kind == AttachmentKind::File);

        let mut uploads = Vec::with_capacity(files.len() + links.len());
        for batch in files.chunks(self.batch_size) {
            let attempts = batch.iter().map(|att| {
                let tracker = Arc::clone(&self.tracker);
                let task_id = created.id.clone();
                let att = att.clone();
                async move {
                    let result = tracker
                        .upload_attachment(&task_id, &att.display_name, &att.source)
                        .await;
                    (att, result)
                }
            });
            for (att, result) in futures::future::join_all(attempts).await {
                match result {
                    Ok(()) => uploads.push(UploadOutcome {
                        attachment: att,
                        success: true,
                        detail: None,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            task_id = %created.id,
                            attachment = %att.display_name,
                            "Attachment upload failed: {e}"
                        );
                        uploads.push(UploadOutcome {
                            attachment: att,
                            success: false,
                            detail: Some(e.to_string()),
                        });
                    }
                }
            }
        }

        // URL references are recorded, not uploaded.
        for link in &links {
            uploads.push(UploadOutcome {
                attachment: link.clone(),
                success: true,
                detail: None,
            });
        }

        if !links.is_empty() {
            let amended = append_evidence_links(&description, &links);
            if let Err(e) = self.tracker.update_description(&created.id, &amended).await {
                tracing::warn!(task_id = %created.id, "Evidence-links description update failed: {e}");
            }
        }

        Ok(SubmissionOutcome {
            task_id: created.id,
            uploads,
        })
    }
}

/// Compose the structured task description from reporter identity, channel,
/// permalink, and the free-form details.
fn compose_description(req: &SubmissionRequest) -> String {
    let mut description = format!(
        "**Reporter:** {}#{}\n**User ID:** {}\n**Channel:** {}\n",
        req.reporter.username, req.reporter.discriminator, req.reporter.user_id, req.channel_name,
    );
    if let Some(ref permalink) = req.permalink {
        description.push_str(&format!("**Message:** {permalink}\n"));
    }
    description.push_str("\n---\n\n");
    description.push_str(&req.details);
    description
}

/// Second-phase description update: the original description plus a bulleted
/// evidence-links section. A separate call because attachment classification
/// happens after the task already exists.
fn append_evidence_links(description: &str, links: &[AttachmentDescriptor]) -> String {
    let mut amended = format!("{description}\n\n**Evidence links:**\n");
    for link in links {
        amended.push_str(&format!("• {}\n", link.source));
    }
    amended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BindingStore, InMemoryBindingStore};
    use crate::tracker::testing::{FailingUploads, RecordingTracker};

    fn descriptor(kind: AttachmentKind, n: usize) -> AttachmentDescriptor {
        AttachmentDescriptor {
            source: format!("https://cdn.test/file-{n}"),
            display_name: format!("file-{n}.png"),
            kind,
        }
    }

    fn request(attachments: Vec<AttachmentDescriptor>) -> SubmissionRequest {
        SubmissionRequest {
            channel_id: "chan-1".into(),
            channel_name: "support".into(),
            reporter: Reporter {
                user_id: "42".into(),
                username: "alice".into(),
                discriminator: "0420".into(),
            },
            details: "the site is down".into(),
            title: "Site down".into(),
            attachments,
            permalink: Some("https://discord.test/m/1".into()),
        }
    }

    async fn configured_bindings() -> Arc<InMemoryBindingStore> {
        let bindings = Arc::new(InMemoryBindingStore::new());
        bindings.set_list("chan-1", "123456789").await;
        bindings
    }

    #[tokio::test]
    async fn unconfigured_channel_aborts_without_creating() {
        let tracker = Arc::new(RecordingTracker::new());
        let bindings = Arc::new(InMemoryBindingStore::new());
        let pipeline = SubmissionPipeline::new(tracker.clone(), bindings, 3);

        let result = pipeline.submit(request(vec![])).await;
        assert!(matches!(
            result,
            Err(PipelineError::UnconfiguredChannel { ref channel }) if channel == "support"
        ));
        assert_eq!(tracker.created_count(), 0);
    }

    #[tokio::test]
    async fn success_carries_the_created_task_id() {
        let tracker = Arc::new(RecordingTracker::new());
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        let outcome = pipeline.submit(request(vec![])).await.unwrap();
        assert_eq!(outcome.task_id, "task-1");
        assert!(outcome.uploads.is_empty());
    }

    #[tokio::test]
    async fn every_file_is_attempted_and_urls_are_recorded() {
        let tracker = Arc::new(RecordingTracker::new());
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        let attachments = vec![
            descriptor(AttachmentKind::File, 0),
            descriptor(AttachmentKind::File, 1),
            descriptor(AttachmentKind::UrlReference, 2),
        ];
        let outcome = pipeline.submit(request(attachments)).await.unwrap();

        assert_eq!(tracker.upload_count(), 2);
        assert_eq!(outcome.uploads.len(), 3);
        assert!(outcome.uploads.iter().all(|u| u.success));
        // One extra description update for the evidence links.
        assert_eq!(tracker.description_update_count(), 1);
    }

    #[tokio::test]
    async fn no_description_update_without_url_references() {
        let tracker = Arc::new(RecordingTracker::new());
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        let attachments = vec![descriptor(AttachmentKind::File, 0)];
        pipeline.submit(request(attachments)).await.unwrap();
        assert_eq!(tracker.description_update_count(), 0);
    }

    #[tokio::test]
    async fn uploads_run_in_batches_of_at_most_three() {
        let tracker = Arc::new(RecordingTracker::with_upload_delay(10));
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        let attachments = (0..7).map(|n| descriptor(AttachmentKind::File, n)).collect();
        pipeline.submit(request(attachments)).await.unwrap();

        assert_eq!(tracker.upload_count(), 7);
        assert!(tracker.peak_concurrent_uploads() <= 3);
    }

    #[tokio::test]
    async fn upload_failures_do_not_fail_the_submission() {
        let tracker = Arc::new(RecordingTracker::new().failing_uploads(FailingUploads::All));
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        let attachments = vec![
            descriptor(AttachmentKind::File, 0),
            descriptor(AttachmentKind::File, 1),
        ];
        let outcome = pipeline.submit(request(attachments)).await.unwrap();

        assert_eq!(outcome.task_id, "task-1");
        assert_eq!(outcome.uploads.len(), 2);
        assert!(outcome.uploads.iter().all(|u| !u.success));
        assert!(outcome.uploads.iter().all(|u| u.detail.is_some()));
    }

    #[tokio::test]
    async fn create_failure_is_fatal() {
        let tracker = Arc::new(RecordingTracker::new().failing_create());
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        let result = pipeline.submit(request(vec![descriptor(AttachmentKind::File, 0)])).await;
        assert!(matches!(result, Err(PipelineError::Tracker(_))));
        assert_eq!(tracker.upload_count(), 0);
    }

    #[tokio::test]
    async fn bound_assignee_is_applied_without_blocking() {
        let tracker = Arc::new(RecordingTracker::new());
        let bindings = configured_bindings().await;
        bindings.set_assignee("chan-1", "9876").await;
        let pipeline = SubmissionPipeline::new(tracker.clone(), bindings, 3);

        pipeline.submit(request(vec![])).await.unwrap();

        // The assignment is a spawned side effect; wait for it to land.
        for _ in 0..100 {
            if tracker.assignee_count() == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(tracker.assignee_count(), 1);
        assert_eq!(tracker.last_assignee().as_deref(), Some("9876"));
    }

    #[tokio::test]
    async fn no_assignee_binding_means_no_assignment_call() {
        let tracker = Arc::new(RecordingTracker::new());
        let pipeline = SubmissionPipeline::new(tracker.clone(), configured_bindings().await, 3);

        pipeline.submit(request(vec![])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(tracker.assignee_count(), 0);
    }

    #[tokio::test]
    async fn assignment_failure_does_not_change_the_outcome() {
        let tracker = Arc::new(RecordingTracker::new().failing_assignee());
        let bindings = configured_bindings().await;
        bindings.set_assignee("chan-1", "9876").await;
        let pipeline = SubmissionPipeline::new(tracker.clone(), bindings, 3);

        let outcome = pipeline.submit(request(vec![])).await.unwrap();
        assert_eq!(outcome.task_id, "task-1");
    }

    #[test]
    fn description_contains_reporter_and_permalink() {
        let description = compose_description(&request(vec![]));
        assert!(description.contains("alice#0420"));
        assert!(description.contains("**User ID:** 42"));
        assert!(description.contains("**Channel:** support"));
        assert!(description.contains("https://discord.test/m/1"));
        assert!(description.contains("the site is down"));
    }

    #[test]
    fn description_omits_missing_permalink() {
        let mut req = request(vec![]);
        req.permalink = None;
        assert!(!compose_description(&req).contains("**Message:**"));
    }

    #[test]
    fn evidence_links_are_bulleted() {
        let links = vec![
            descriptor(AttachmentKind::UrlReference, 0),
            descriptor(AttachmentKind::UrlReference, 1),
        ];
        let amended = append_evidence_links("base", &links);
        assert!(amended.starts_with("base"));
        assert!(amended.contains("**Evidence links:**"));
        assert!(amended.contains("• https://cdn.test/file-0"));
        assert!(amended.contains("• https://cdn.test/file-1"));
    }
}
