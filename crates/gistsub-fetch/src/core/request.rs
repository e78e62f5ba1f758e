pub const USER_AGENT: &str = "gist-sub-fetcher/1.0";

pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// `<api_base>/gists/<id>`, tolerant of a trailing slash on `api_base`.
///
/// ```
/// use gistsub_fetch::core::metadata_url;
///
/// assert_eq!(
///     metadata_url("https://api.github.com/", "abc"),
///     "https://api.github.com/gists/abc"
/// );
/// ```
pub fn metadata_url(api_base: &str, gist_id: &str) -> String {
    format!("{}/gists/{}", api_base.trim_end_matches('/'), gist_id)
}

/// Headers for the metadata request. `cache_token` becomes `If-None-Match`.
pub fn metadata_headers(token: Option<&str>, cache_token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Accept".to_string(), GITHUB_ACCEPT.to_string()),
    ];
    push_auth(&mut headers, token);
    if let Some(etag) = cache_token.filter(|t| !t.is_empty()) {
        headers.push(("If-None-Match".to_string(), etag.to_string()));
    }
    headers
}

/// Headers for the raw-content request. Never conditional.
pub fn raw_headers(token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
    push_auth(&mut headers, token);
    headers
}

fn push_auth(headers: &mut Vec<(String, String)>, token: Option<&str>) {
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
}
