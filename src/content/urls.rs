pub const LOCAL_CONTENT_PREFIX: &str = "./content/";
const UPLOADS_PATH: &str = "wp-content/uploads/";

/// Rewrites `<site_url>/wp-content/uploads/` (slash after the site URL optional)
/// into `./content/`.
pub fn localize_asset_urls(content: &str, site_url: &str) -> String {
    if site_url.is_empty() {
        return content.to_string();
    }

    let with_slash = format!("{}/{}", site_url, UPLOADS_PATH);
    let without_slash = format!("{}{}", site_url, UPLOADS_PATH);

    content
        .replace(&with_slash, LOCAL_CONTENT_PREFIX)
        .replace(&without_slash, LOCAL_CONTENT_PREFIX)
}

/// Every remaining absolute reference to the site, extended over the path
/// characters `[A-Za-z0-9/-]` that follow it.
pub fn find_site_references<'a>(content: &'a str, site_url: &str) -> Vec<&'a str> {
    if site_url.is_empty() {
        return vec![];
    }

    content.match_indices(site_url)
        .map(|(start, _)| {
            let tail = &content[start + site_url.len()..];
            let path_len = tail
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '/' || c == '-'))
                .unwrap_or(tail.len());
            &content[start..start + site_url.len() + path_len]
        })
        .collect()
}
