//! Request filtering: resource classification and the per-session block list.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::SearchError;

/// Resource class of a request, as a browser would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Other,
}

impl ResourceType {
    /// Returns the lowercase name used in config files and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Stylesheet => "stylesheet",
            Self::Image => "image",
            Self::Media => "media",
            Self::Font => "font",
            Self::Script => "script",
            Self::Xhr => "xhr",
            Self::Other => "other",
        }
    }

    /// Classify a response by its `Content-Type` header value.
    ///
    /// Parameters such as `; charset=utf-8` are ignored. Unknown types map to
    /// [`ResourceType::Other`].
    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "text/html" | "application/xhtml+xml" | "text/plain" => Self::Document,
            "text/css" => Self::Stylesheet,
            "text/javascript" | "application/javascript" | "application/ecmascript" => {
                Self::Script
            }
            "application/json" => Self::Xhr,
            "application/font-woff" | "application/font-woff2" | "application/vnd.ms-fontobject" => {
                Self::Font
            }
            m if m.starts_with("image/") => Self::Image,
            m if m.starts_with("font/") => Self::Font,
            m if m.starts_with("audio/") || m.starts_with("video/") => Self::Media,
            _ => Self::Other,
        }
    }
    /// Classify a request before it is sent, by the extension of its URL path.
    ///
    /// URLs without a recognised extension (or that fail to parse) are
    /// treated as documents.
    pub fn from_url(url: &str) -> Self {
        let Ok(parsed) = Url::parse(url) else {
            return Self::Document;
        };
        let file = parsed.path().rsplit('/').next().unwrap_or_default();
        let Some((_, ext)) = file.rsplit_once('.') else {
            return Self::Document;
        };

        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "ico" | "bmp" | "avif" => Self::Image,
            "css" => Self::Stylesheet,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => Self::Font,
            "mp3" | "mp4" | "webm" | "ogg" | "wav" | "m4a" | "mov" => Self::Media,
            _ => Self::Document,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request about to be issued (or whose headers just arrived) in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub url: String,
    pub resource_type: ResourceType,
}

impl ResourceRequest {
    pub fn new(url: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            url: url.into(),
            resource_type,
        }
    }
}

/// Aborts requests of blocked resource classes and lets everything else through.
///
/// Installed once when a session is created and applied to every request
/// the session makes until it is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    blocked: Vec<ResourceType>,
}

impl RequestFilter {
    /// A filter that aborts the given resource classes.
    pub fn blocking(blocked: &[ResourceType]) -> Self {
        let mut unique = Vec::with_capacity(blocked.len());
        for resource_type in blocked {
            if !unique.contains(resource_type) {
                unique.push(*resource_type);
            }
        }
        Self { blocked: unique }
    }

    /// A filter that allows every request.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Whether `request` may proceed unmodified.
    pub fn allows(&self, request: &ResourceRequest) -> bool {
        !self.blocked.contains(&request.resource_type)
    }

    /// Like [`allows`](Self::allows), but returns [`SearchError::Blocked`] for aborted requests.
    pub fn check(&self, request: &ResourceRequest) -> Result<(), SearchError> {
        if self.allows(request) {
            Ok(())
        } else {
            tracing::trace!(url = %request.url, resource = %request.resource_type, "request aborted");
            Err(SearchError::Blocked(format!(
                "{} {}",
                request.resource_type, request.url
            )))
        }
    }

    /// The blocked resource classes.
    pub fn blocked(&self) -> &[ResourceType] {
        &self.blocked
    }
}
