/// An artifact produced alongside the final message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attachment {
    /// MIME type of the artifact.
    pub mime_type: String,
    /// Where the artifact can be fetched from.
    pub location: String,
}

/// The outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResponseEnvelope {
    message: String,
    attachments: Vec<Attachment>,
}

impl ResponseEnvelope {
    // The loop never produces attachments; tools report their artifacts
    // inline in the tool message.
    #[inline]
    pub(crate) fn new(message: String) -> Self {
        Self {
            message,
            attachments: vec![],
        }
    }

    /// Returns the final text of the model.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the attachments.
    #[inline]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Consumes the envelope and returns the final text.
    #[inline]
    pub fn into_message(self) -> String {
        self.message
    }
}
