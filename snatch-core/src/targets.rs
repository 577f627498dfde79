//! Target locator normalization.

/// Normalize a mixed list of target locators into fully-qualified URLs.
///
/// Each entry is trimmed; empty lines are skipped. Entries starting with
/// `id_prefix` have the remainder (re-trimmed) appended to `url_prefix`;
/// everything else passes through verbatim. Order is preserved and
/// duplicates are kept — a malformed entry is simply treated as a literal
/// URL and will fail at navigation time like any other bad target.
pub fn normalize_targets<'a, I>(lines: I, id_prefix: &str, url_prefix: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for line in lines {
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        if let Some(rest) = s.strip_prefix(id_prefix) {
            out.push(format!("{url_prefix}{}", rest.trim()));
        } else {
            out.push(s.to_string());
        }
    }
    out
}
