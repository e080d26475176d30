//! Output formatting for CLI display.

use uuid::Uuid;

use crate::model::{Page, ResearchReport};

/// First eight hex digits of an id, enough to pass back as a prefix.
pub(super) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// One search result per line: id, date, beach, researcher, length, segments.
pub(super) fn format_report_line(report: &ResearchReport) -> String {
    let segments = match report.segments.len() {
        1 => "1 segment".to_string(),
        n => format!("{n} segments"),
    };
    format!(
        "{}  {}  {}  [{}]  {:.1} m, {segments}",
        short_id(report.id),
        report.reported_at.strftime("%Y-%m-%d %H:%M"),
        report.beach.name,
        report.researcher.username,
        report.total_length,
    )
}

pub(super) fn format_page_footer<T>(page: &Page<T>) -> String {
    let noun = if page.total_elements == 1 {
        "report"
    } else {
        "reports"
    };
    let mut footer = format!(
        "page {}/{} ({} {noun})",
        page.page,
        page.total_pages.max(1),
        page.total_elements
    );
    if page.has_next() {
        footer.push_str(&format!("; next: --page {}", page.page + 1));
    }
    footer
}
