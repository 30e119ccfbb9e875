/// Domain extraction for Site Mute
use url::Url;

/// Schemes whose tabs take part in mute reconciliation.
const SITE_SCHEMES: [&str; 2] = ["http", "https"];

/// Extract the domain (hostname) a tab's mute preference is keyed on
///
/// Only `http` and `https` URLs have a domain. Everything else is exempt
/// from reconciliation and yields `None`:
/// - internal pages: `about:blank`, `about:newtab`, `chrome://settings`
/// - extension pages: `moz-extension://...`, `chrome-extension://...`
/// - local and inline content: `file:///...`, `data:...`, `blob:...`
/// - anything `Url::parse` rejects
///
/// Examples:
/// - https://www.google.com/search → www.google.com
/// - http://localhost:3000/ → localhost
/// - https://NEWS.bbc.co.uk/article → news.bbc.co.uk
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    if !SITE_SCHEMES.contains(&parsed.scheme()) {
        return None;
    }

    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

/// Domain typed by the user: either a full URL or a bare host name
pub fn parse_domain_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    domain_of(input).or_else(|| domain_of(&format!("https://{}/", input)))
}

/// Host match pattern selecting every http(s) tab on exactly `domain`
pub fn match_pattern(domain: &str) -> String {
    format!("*://{}/*", domain)
}
