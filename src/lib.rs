//! websift: a `web_search` tool that searches, crawls and summarises the web.
//!
//! The heavy lifting lives in the [`websift_search`] crate. This crate adds
//! the host-facing surface: configuration files, the approval round-trip,
//! the [`ToolHost`] collaborator contract and the CLI binary.

pub mod approval;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod tool;

pub use approval::{ApprovalRequest, ApprovalResponse};
pub use config::{ToolConfig, WebSiftConfig};
pub use error::{Result, ToolError};
pub use host::{ChannelHost, HostEvent, ToolHost};
pub use tool::{ToolInvocation, ToolOutcome, WebSearchTool};

pub use websift_search;
