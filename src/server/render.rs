// html rendering for listings, upload results

use std::ops::Range;

use serde::Deserialize;

use super::assets::stylesheet;
use super::cache::{DirectoryEntry, DirectoryListingState};
use super::uploads::UploadOutcome;
use crate::config::{AppConfig, ViewMode};
use crate::utils::{
    files::escape_html,
    media::{media_kind, MediaKind},
    paths::decode_uri_path,
};

/// the trailing navigation row is repeated once a page has this many entries
const TRAILING_NAV_THRESHOLD: usize = 10;

/// raw listing query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub page_id: Option<String>,
    pub view_mode: Option<String>,
}

/// page and view mode a listing is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSelection {
    pub page_id: usize,
    pub view_mode: ViewMode,
    /// whether the request named a page, so mode switches keep it
    pub explicit_page: bool,
}

impl PageSelection {
    pub fn resolve(query: &ListingQuery, max_page_id: usize, default_mode: ViewMode) -> Self {
        let view_mode = query
            .view_mode
            .as_deref()
            .and_then(|mode| mode.parse().ok())
            .unwrap_or(default_mode);

        Self {
            page_id: clamp_page_id(query.page_id.as_deref(), max_page_id),
            view_mode,
            explicit_page: query.page_id.is_some(),
        }
    }
}

/// parse a requested page; unparsable, below 1 or past the last page all mean page 1
pub fn clamp_page_id(raw: Option<&str>, max_page_id: usize) -> usize {
    match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
        Some(page) if page >= 1 && (page as u64) <= max_page_id as u64 => page as usize,
        _ => 1,
    }
}

/// index range of the entries shown on `page_id`
pub fn page_bounds(page_id: usize, items_per_page: usize, total: usize) -> Range<usize> {
    let start = items_per_page.saturating_mul(page_id.saturating_sub(1)).min(total);
    let end = items_per_page.saturating_mul(page_id).min(total);
    start..end
}

fn page_link(uri_path: &str, page_id: usize, view_mode: ViewMode) -> String {
    format!("{uri_path}?page_id={page_id}&view_mode={}", view_mode.as_str())
}

/// link to the other view mode, keeping the page when one was requested
pub fn view_switch_link(uri_path: &str, selection: &PageSelection) -> String {
    let target = selection.view_mode.toggled();
    if selection.explicit_page {
        format!(
            "{uri_path}?view_mode={}&page_id={}",
            target.as_str(),
            selection.page_id
        )
    } else {
        format!("{uri_path}?view_mode={}", target.as_str())
    }
}

/// render one listing page
pub fn render_listing(
    state: &DirectoryListingState,
    selection: &PageSelection,
    config: &AppConfig,
) -> String {
    let display_path = decode_uri_path(&state.uri_path, false)
        .unwrap_or_else(|_| state.uri_path.clone());

    let mut html = page_head(&display_path);

    html.push_str(&format!(
        "<header><h1>Directory: {}</h1></header>",
        escape_html(&display_path)
    ));
    html.push_str(&format!(
        "<nav><h4><a href=\"{}\">Go to Parent Dir</a></h4></nav>",
        escape_html(&state.parent_uri_path)
    ));

    if config.server.enable_upload {
        html.push_str(UPLOAD_FORM);
    }

    if let Some(err) = &state.scan_error {
        html.push_str(&format!(
            "<p class=\"error\">Could not read this directory: {}</p>",
            escape_html(err)
        ));
    }

    let nav = navigation(state, selection);

    if state.entries.is_empty() {
        html.push_str(&nav);
        html.push_str("<h4>Nothing under this directory</h4>");
    } else {
        html.push_str(&format!(
            "<h4>{} items in total, {} files, {} folders</h4>",
            state.total_count,
            state.file_count(),
            state.folder_count
        ));
        html.push_str(&format!(
            "<h4>show {} items per page, {} pages</h4>",
            state.items_per_page, state.max_page_id
        ));
        html.push_str(&nav);

        let bounds = page_bounds(selection.page_id, state.items_per_page, state.total_count);
        let page = &state.entries[bounds];

        match selection.view_mode {
            ViewMode::List => html.push_str(&list_table(page)),
            ViewMode::Preview => html.push_str(&preview_grid(page, config)),
        }

        if page.len() >= TRAILING_NAV_THRESHOLD {
            html.push_str(&nav);
        }
    }

    html.push_str(&page_footer());
    html
}

fn page_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head>\
<meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<meta name=\"generator\" content=\"dirserve v{}\">\
<title>dirserve | {}</title>\
<style>{}</style>\
</head><body>",
        env!("CARGO_PKG_VERSION"),
        escape_html(title),
        stylesheet()
    )
}

fn page_footer() -> String {
    format!(
        "<footer><p>Generated by <code>dirserve v{}</code></p></footer></body></html>",
        env!("CARGO_PKG_VERSION")
    )
}

const UPLOAD_FORM: &str = "<form method=\"post\" enctype=\"multipart/form-data\"><div>\
<label for=\"files\">Choose and upload files: </label><br>\
<input type=\"file\" id=\"files\" name=\"files\" multiple><br>\
<button>Upload</button></div></form>";

fn navigation(state: &DirectoryListingState, selection: &PageSelection) -> String {
    let uri = &state.uri_path;
    let mut nav = String::from("<nav class=\"pages\">");

    if selection.page_id > 1 {
        nav.push_str(&format!(
            "<a href=\"{}\">&lt;Prev</a>",
            escape_html(&page_link(uri, selection.page_id - 1, selection.view_mode))
        ));
    } else {
        nav.push_str("<span>&lt;Prev</span>");
    }

    nav.push_str(&format!(
        "<a href=\"{}\">Up</a>",
        escape_html(&state.parent_uri_path)
    ));

    if selection.page_id < state.max_page_id {
        nav.push_str(&format!(
            "<a href=\"{}\">Next&gt;</a>",
            escape_html(&page_link(uri, selection.page_id + 1, selection.view_mode))
        ));
    } else {
        nav.push_str("<span>Next&gt;</span>");
    }

    nav.push_str(&format!(
        "<a href=\"{}\">{} view</a>",
        escape_html(&view_switch_link(uri, selection)),
        selection.view_mode.toggled().as_str()
    ));

    nav.push_str("</nav>");
    nav
}

fn list_table(entries: &[DirectoryEntry]) -> String {
    let mut table = String::from(
        "<table class=\"list\"><tr><th>Name</th><th>Type</th>\
<th>Modified Time</th><th>File Size</th></tr>",
    );

    for entry in entries {
        table.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.uri_path),
            escape_html(&entry.name),
            escape_html(&entry.kind.to_string()),
            entry.modified_at,
            entry.size_display
        ));
    }

    table.push_str("</table>");
    table
}

fn preview_grid(entries: &[DirectoryEntry], config: &AppConfig) -> String {
    let per_row = config.listing.items_per_row.max(1);
    let width = config.listing.image_width;

    let mut grid = String::from("<table class=\"grid\">");
    for row in entries.chunks(per_row) {
        grid.push_str("<tr>");
        for entry in row {
            grid.push_str("<td>");
            grid.push_str(&preview_cell(entry, width));
            grid.push_str("</td>");
        }
        grid.push_str("</tr>");
    }
    grid.push_str("</table>");
    grid
}

fn preview_cell(entry: &DirectoryEntry, width: u32) -> String {
    let href = escape_html(&entry.uri_path);
    let name = escape_html(&entry.name);

    let media = if entry.kind.is_file() {
        media_kind(&entry.name)
    } else {
        MediaKind::Other
    };

    let body = match media {
        MediaKind::Image => format!(
            "<a href=\"{href}\"><img src=\"{href}\" width=\"{width}\" alt=\"{name}\" loading=\"lazy\"></a>"
        ),
        MediaKind::Audio => format!("<audio controls preload=\"none\" src=\"{href}\"></audio>"),
        MediaKind::Video => format!(
            "<video controls preload=\"metadata\" width=\"{width}\" src=\"{href}\"></video>"
        ),
        MediaKind::Other => format!("<a href=\"{href}\">{name}</a>"),
    };

    format!(
        "{body}<div class=\"caption\">{name}<br>{} | {} | {}</div>",
        escape_html(&entry.kind.to_string()),
        entry.modified_at,
        entry.size_display
    )
}

/// response page for a finished upload request
pub fn render_upload_result(back_uri: &str, outcomes: &[UploadOutcome]) -> String {
    let mut html = page_head("upload");

    html.push_str(&format!(
        "<p><a href=\"{}\">Back</a></p>",
        escape_html(back_uri)
    ));

    let saved = outcomes.iter().filter(|o| o.result.is_ok()).count();
    if saved == outcomes.len() {
        html.push_str("<h4>OK</h4>");
    } else {
        html.push_str(&format!(
            "<h4>{} of {} files saved</h4>",
            saved,
            outcomes.len()
        ));
    }

    for outcome in outcomes {
        let line = match &outcome.result {
            Ok(path) => format!(
                "<p><em>{}</em> saved into: <em>{}</em></p>",
                escape_html(&outcome.original_name),
                escape_html(&path.display().to_string())
            ),
            Err(err) => format!(
                "<p class=\"error\"><em>{}</em> failed: {}</p>",
                escape_html(&outcome.original_name),
                escape_html(&err.to_string())
            ),
        };
        html.push_str(&line);
    }

    html.push_str(&page_footer());
    html
}
