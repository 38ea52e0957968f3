//! Standalone HTML page output.
//!
//! The page is a minijinja template registered under an `.html` name, so
//! every value from the context is auto-escaped; record text never becomes
//! markup.

use crate::constants::CLIENT_COLUMNS;
use crate::error::{LookupError, Result};
use crate::page::Page;
use chrono::{DateTime, Local};
use minijinja::{Environment, context};

const TEMPLATE_NAME: &str = "page.html";

const HTML_TEMPLATE: &str = include_str!("page.html.jinja");

const CSS_STYLES: &str = "body{font-family:sans-serif;margin:2rem}\
.status-msg{margin:1rem 0}.status-warning{color:#8a6d3b}.status-error{color:#a94442}\
.badge{padding:.2rem .6rem;border-radius:.3rem;color:#fff}\
.badge-danger{background:#d9534f}.badge-success{background:#5cb85c}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:.3rem .6rem}\
dl{display:grid;grid-template-columns:max-content auto;gap:.3rem 1rem}";

/// Render the whole page as an HTML document
pub fn render_page(page: &Page, generated_at: DateTime<Local>) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, HTML_TEMPLATE)
        .map_err(LookupError::template)?;
    let template = env
        .get_template(TEMPLATE_NAME)
        .map_err(LookupError::template)?;

    template
        .render(context! {
            css_styles => CSS_STYLES,
            status => page.status(),
            status_class => page.status_kind().css_class(),
            results => page.results(),
            columns => CLIENT_COLUMNS,
            generated => generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .map_err(LookupError::template)
}
