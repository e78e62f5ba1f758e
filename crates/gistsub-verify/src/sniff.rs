const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const HTML_MARKERS: &[&[u8]] = &[b"<!doctype html", b"<html"];

/// Returns `true` when `data` opens like an HTML document.
///
/// Login walls, rate-limit pages and proxy error pages arrive as `200 OK`
/// HTML; this catches them before any format-specific parsing. A leading BOM
/// and ASCII whitespace are skipped and the marker match ignores case.
pub fn is_html(data: &[u8]) -> bool {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let head = &data[start..];

    HTML_MARKERS
        .iter()
        .any(|marker| head.len() >= marker.len() && head[..marker.len()].eq_ignore_ascii_case(marker))
}
