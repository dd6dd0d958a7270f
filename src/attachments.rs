//! Attachment collection — classifies message attachments and embedded URLs
//! into a uniform descriptor list.

use std::sync::LazyLock;

use regex::Regex;

use crate::channels::IncomingMessage;

/// Display name used for URL evidence (there is no file name to show).
pub const URL_DISPLAY_NAME: &str = "External Link";

/// Permissive whitespace-delimited absolute-URL pattern.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

/// How an attachment reached the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// A platform file upload, to be fetched and re-uploaded to the task.
    File,
    /// An absolute URL found in the message text; referenced, not uploaded.
    UrlReference,
}

/// Uniform representation of one piece of evidence.
#[derive(Debug, Clone)]
pub struct AttachmentDescriptor {
    pub source: String,
    pub display_name: String,
    pub kind: AttachmentKind,
}

/// Collect all evidence from a message: file attachments first (in platform
/// order), then one `UrlReference` per URL embedded in the text. Empty when
/// the message carries neither — submission proceeds without evidence then.
pub fn collect(msg: &IncomingMessage) -> Vec<AttachmentDescriptor> {
    let mut descriptors: Vec<AttachmentDescriptor> = msg
        .attachments
        .iter()
        .map(|att| AttachmentDescriptor {
            source: att.url.clone(),
            display_name: att.file_name.clone(),
            kind: AttachmentKind::File,
        })
        .collect();

    descriptors.extend(URL_RE.find_iter(&msg.text).map(|m| AttachmentDescriptor {
        source: m.as_str().to_string(),
        display_name: URL_DISPLAY_NAME.to_string(),
        kind: AttachmentKind::UrlReference,
    }));

    descriptors
}
