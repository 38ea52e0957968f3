//! The display surface: one status line and a result region that is
//! either hidden or shows a fully rendered detail record.

use crate::render::RenderedDetail;

/// Tone of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Warning,
    Error,
}

impl StatusKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusKind::Info => "status-msg",
            StatusKind::Warning => "status-msg status-warning",
            StatusKind::Error => "status-msg status-error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    status: String,
    status_kind: StatusKind,
    results: Option<RenderedDetail>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_kind(&self) -> StatusKind {
        self.status_kind
    }

    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_kind = kind;
        self.status = message.into();
    }

    pub fn clear_status(&mut self) {
        self.set_status(StatusKind::Info, String::new());
    }

    /// Visible results, `None` while the region is hidden
    pub fn results(&self) -> Option<&RenderedDetail> {
        self.results.as_ref()
    }

    pub fn is_results_visible(&self) -> bool {
        self.results.is_some()
    }

    pub fn hide_results(&mut self) {
        self.results = None;
    }

    /// Replace whatever was shown before and reveal the region
    pub fn show_results(&mut self, rendered: RenderedDetail) {
        self.results = Some(rendered);
    }
}
