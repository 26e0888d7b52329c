//! The collaborator a tool invocation talks to.
//!
//! A [`ToolHost`] is whatever drives the tool: a chat session, a TUI, the
//! CLI binary. It approves actions, shows partial progress, receives the
//! final report and hears about failures.

use std::future::Future;

use tokio::sync::{mpsc, oneshot};

use crate::approval::{ApprovalRequest, ApprovalResponse};
use crate::error::{Result, ToolError};

/// Guidance returned when a tool is called without a required parameter.
pub fn missing_parameter_message(tool: &str, param: &str) -> String {
    format!(
        "Missing value for required parameter '{param}' of tool '{tool}'. \
         Please retry with a complete request."
    )
}

/// Host-side callbacks used while a tool runs.
pub trait ToolHost {
    /// Ask the user whether the previewed action may proceed.
    ///
    /// `Ok(false)` declines. `Err` means no decision could be obtained.
    fn ask_approval(&mut self, preview: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Show a preview for an invocation that is still streaming in.
    fn say_partial(&mut self, preview: &str);

    /// Record a missing parameter and return the guidance for the caller.
    fn report_missing_parameter(&mut self, tool: &str, param: &str) -> String {
        missing_parameter_message(tool, param)
    }

    /// Report a failure of `stage` (e.g. "web searching").
    fn report_error(&mut self, stage: &str, error: &ToolError);

    /// Deliver the tool's output.
    fn push_result(&mut self, text: &str);
}

/// Non-approval traffic forwarded by [`ChannelHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Partial(String),
    MissingParameter { tool: String, param: String },
    Error { stage: String, message: String },
    Result(String),
}

/// A [`ToolHost`] that forwards everything over channels to a frontend task.
#[derive(Debug)]
pub struct ChannelHost {
    tool: String,
    next_id: u64,
    approvals: mpsc::Sender<ApprovalRequest>,
    events: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelHost {
    pub fn new(
        tool: impl Into<String>,
        approvals: mpsc::Sender<ApprovalRequest>,
        events: mpsc::UnboundedSender<HostEvent>,
    ) -> Self {
        Self {
            tool: tool.into(),
            next_id: 1,
            approvals,
            events,
        }
    }

    fn emit(&self, event: HostEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("host event receiver dropped");
        }
    }
}

impl ToolHost for ChannelHost {
    async fn ask_approval(&mut self, preview: &str) -> Result<bool> {
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = oneshot::channel();
        let request = ApprovalRequest::new(id, self.tool.as_str(), preview, tx);
        self.approvals
            .send(request)
            .await
            .map_err(|_| ToolError::Approval("approval handler is not running".into()))?;

        match rx.await {
            Ok(ApprovalResponse::Approved(approved)) => Ok(approved),
            Ok(ApprovalResponse::Cancelled) | Err(_) => {
                tracing::debug!(id, "approval cancelled");
                Ok(false)
            }
        }
    }

    fn say_partial(&mut self, preview: &str) {
        self.emit(HostEvent::Partial(preview.to_owned()));
    }

    fn report_missing_parameter(&mut self, tool: &str, param: &str) -> String {
        self.emit(HostEvent::MissingParameter {
            tool: tool.to_owned(),
            param: param.to_owned(),
        });
        missing_parameter_message(tool, param)
    }

    fn report_error(&mut self, stage: &str, error: &ToolError) {
        self.emit(HostEvent::Error {
            stage: stage.to_owned(),
            message: format!("error while {stage}: {}", error.message()),
        });
    }

    fn push_result(&mut self, text: &str) {
        self.emit(HostEvent::Result(text.to_owned()));
    }
}
