//! Approval plumbing for interactive frontends.
//!
//! The tool sends an [`ApprovalRequest`] carrying the preview and waits on a
//! oneshot channel for the frontend's decision. A dropped request counts as
//! a cancellation.

use tokio::sync::oneshot;

/// Frontend response to an approval request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalResponse {
    /// Simple approve/deny response.
    Approved(bool),
    /// Explicit cancel/no-response action.
    Cancelled,
}

impl ApprovalResponse {
    /// Return whether this response represents approval.
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved(true))
    }
}

/// A request for the frontend to approve or deny a tool run.
#[derive(Debug)]
pub struct ApprovalRequest {
    pub id: u64,
    /// Tool name, e.g. `web_search`.
    pub tool: String,
    /// JSON preview of the action, e.g. `{"tool":"web_search","content":"Searching for: rust"}`.
    pub preview: String,
    respond_to: oneshot::Sender<ApprovalResponse>,
}

impl ApprovalRequest {
    pub fn new(
        id: u64,
        tool: impl Into<String>,
        preview: impl Into<String>,
        respond_to: oneshot::Sender<ApprovalResponse>,
    ) -> Self {
        Self {
            id,
            tool: tool.into(),
            preview: preview.into(),
            respond_to,
        }
    }

    /// Respond to the approval request.
    ///
    /// Returns `true` if the response was delivered to the waiting tool.
    pub fn respond(self, approved: bool) -> bool {
        self.respond_to
            .send(ApprovalResponse::Approved(approved))
            .is_ok()
    }

    /// Cancel the pending request.
    pub fn cancel(self) -> bool {
        self.respond_to.send(ApprovalResponse::Cancelled).is_ok()
    }
}
