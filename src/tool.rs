//! The `web_search` tool: host-facing entry point to the search pipeline.
//!
//! # Invocation flow
//!
//! 1. A missing or blank `query` yields guidance and no browsing at all
//! 2. A partial (still streaming) invocation only shows a preview
//! 3. The full preview is offered for approval; a decline ends quietly
//! 4. The pipeline runs; the report or the error goes back to the host

use std::collections::HashMap;

use websift_search::{BrowsingEngine, HttpBrowser, PipelineConfig, SearchPipeline};

use crate::config::WebSiftConfig;
use crate::error::ToolError;
use crate::host::ToolHost;

/// Tool name used in previews and missing-parameter reports.
pub const TOOL_NAME: &str = "web_search";

/// Stage label attached to every error reported by this tool.
pub const ERROR_STAGE: &str = "web searching";

/// Default cap on the report handed back to the host.
pub const DEFAULT_MAX_BYTES: usize = 100 * 1024;

/// One call of the tool as parsed by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInvocation {
    pub params: HashMap<String, String>,
    /// True while the host is still streaming the call in.
    pub partial: bool,
}

impl ToolInvocation {
    /// A complete invocation with the given `query`.
    pub fn query(query: impl Into<String>) -> Self {
        Self::default().with_param("query", query)
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn into_partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// The parameter `name`, if present and not blank.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// No usable `query`; guidance was pushed instead of a report.
    MissingParameter,
    /// Partial invocation; only a preview was shown.
    Partial,
    /// The user declined; nothing was run or reported.
    Declined,
    /// The report was pushed.
    Completed {
        /// The report exceeded the output budget and was cut.
        truncated: bool,
    },
    /// The error was reported to the host.
    Failed,
}

impl ToolOutcome {
    /// Whether the host should bump its consecutive-mistake counter.
    pub fn counts_as_mistake(&self) -> bool {
        matches!(self, Self::MissingParameter)
    }

    /// Whether the host should reset its consecutive-mistake counter.
    pub fn resets_mistakes(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Preview JSON shown to the user, e.g. `{"tool":"web_search","content":"Searching for: rust"}`.
///
/// `content` is omitted for partial previews.
pub fn preview_json(query: Option<&str>) -> String {
    let preview = match query {
        Some(query) => serde_json::json!({
            "tool": TOOL_NAME,
            "content": format!("Searching for: {query}"),
        }),
        None => serde_json::json!({ "tool": TOOL_NAME }),
    };
    preview.to_string()
}

/// Cut a rendered report down to `max_bytes` on a UTF-8 boundary.
///
/// A cut report ends with a marker naming the kept and original sizes.
/// Returns the text to push and whether it was cut.
pub fn truncate_output(report: &str, max_bytes: usize) -> (String, bool) {
    if report.len() <= max_bytes {
        return (report.to_owned(), false);
    }

    let cut = report
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    let marker = format!("[report cut to {max_bytes} of {} bytes]", report.len());
    (format!("{}\n\n{marker}", &report[..cut]), true)
}

/// Searches the web, crawls the results and reports the best matches.
#[derive(Debug, Clone, Default)]
pub struct WebSearchTool {
    config: WebSiftConfig,
}

impl WebSearchTool {
    pub fn new(config: WebSiftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WebSiftConfig {
        &self.config
    }

    /// Handle `invocation` with a fresh [`HttpBrowser`] per approved run.
    pub async fn handle<H: ToolHost>(
        &self,
        invocation: &ToolInvocation,
        host: &mut H,
    ) -> ToolOutcome {
        self.handle_with(invocation, host, HttpBrowser::launch).await
    }

    /// Handle `invocation`, acquiring the browsing engine through `launch`.
    ///
    /// `launch` is only called once the run has been approved.
    pub async fn handle_with<H, B, F>(
        &self,
        invocation: &ToolInvocation,
        host: &mut H,
        launch: F,
    ) -> ToolOutcome
    where
        H: ToolHost,
        B: BrowsingEngine,
        F: FnOnce(&PipelineConfig) -> B,
    {
        let Some(query) = invocation.param("query") else {
            let guidance = host.report_missing_parameter(TOOL_NAME, "query");
            host.push_result(&guidance);
            return ToolOutcome::MissingParameter;
        };

        if invocation.partial {
            host.say_partial(&preview_json(None));
            return ToolOutcome::Partial;
        }

        match host.ask_approval(&preview_json(Some(query))).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("web search declined");
                return ToolOutcome::Declined;
            }
            Err(err) => {
                host.report_error(ERROR_STAGE, &err);
                return ToolOutcome::Failed;
            }
        }

        let browser = launch(&self.config.search);
        let pipeline = SearchPipeline::new(browser, self.config.search.clone());
        match pipeline.run(query).await {
            Ok(report) => {
                let (text, truncated) =
                    truncate_output(&report.render(), self.config.tool.max_output_bytes);
                tracing::debug!(results = report.results.len(), truncated, "web search completed");
                host.push_result(&text);
                ToolOutcome::Completed { truncated }
            }
            Err(err) => {
                let err = ToolError::from(err);
                tracing::warn!(code = err.code(), error = %err, "web search failed");
                host.report_error(ERROR_STAGE, &err);
                ToolOutcome::Failed
            }
        }
    }
}
