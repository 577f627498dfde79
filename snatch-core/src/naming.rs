//! Output-file naming: URL-derived safe names and collision resolution.

use std::path::{Path, PathBuf};
use url::Url;

/// Longest stem we will derive from a URL.
const MAX_STEM_LEN: usize = 120;
/// Used when nothing usable can be derived.
const FALLBACK_STEM: &str = "download";

/// Derive a short, filesystem-safe name stem from a URL.
///
/// Prefers the query string, then the path, then the host; every character
/// outside `[A-Za-z0-9]` is replaced with `_`. Deterministic and pure.
pub fn safe_filename_from_url(url: &str) -> String {
    let source = Url::parse(url).ok().and_then(|u| {
        if let Some(q) = u.query().filter(|q| !q.is_empty()) {
            return Some(q.to_string());
        }
        let path = u.path();
        if !path.is_empty() && path != "/" {
            return Some(path.to_string());
        }
        u.host_str().map(str::to_string)
    });

    let safe: String = source
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_STEM_LEN)
        .collect();

    if safe.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        safe
    }
}

/// Resolve a collision-free path in `dir` for `file_name`.
///
/// If the name is taken, `_1`, `_2`, ... are appended before the extension
/// until an unused name is found. Never overwrites an existing file.
pub fn dedup_path(dir: &Path, file_name: &str) -> PathBuf {
    let target = dir.join(file_name);
    if !target.exists() {
        return target;
    }

    let (stem, ext) = split_name(file_name);
    let mut i = 1u32;
    loop {
        let candidate = if ext.is_empty() {
            dir.join(format!("{stem}_{i}"))
        } else {
            dir.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prefers_query_then_path_then_host() {
        assert_eq!(
            safe_filename_from_url("https://t.example.org/details.php?torrentid=ab12"),
            "torrentid_ab12"
        );
        assert_eq!(
            safe_filename_from_url("https://t.example.org/some/page.php"),
            "_some_page_php"
        );
        assert_eq!(
            safe_filename_from_url("https://t.example.org/"),
            "t_example_org"
        );
    }

    #[test]
    fn deterministic_and_bounded() {
        let url = format!("https://t.example.org/x?id={}", "a".repeat(500));
        let a = safe_filename_from_url(&url);
        let b = safe_filename_from_url(&url);
        assert_eq!(a, b);
        assert_eq!(a.len(), 120);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn unparseable_url_falls_back() {
        assert_eq!(safe_filename_from_url("not a url"), "download");
    }

    #[test]
    fn dedup_appends_suffix_before_extension() {
        let tmp = TempDir::new().unwrap();
        let first = dedup_path(tmp.path(), "name.torrent");
        assert_eq!(first, tmp.path().join("name.torrent"));
        std::fs::write(&first, b"x").unwrap();

        let second = dedup_path(tmp.path(), "name.torrent");
        assert_eq!(second, tmp.path().join("name_1.torrent"));
        std::fs::write(&second, b"y").unwrap();

        let third = dedup_path(tmp.path(), "name.torrent");
        assert_eq!(third, tmp.path().join("name_2.torrent"));
    }

    #[test]
    fn dedup_handles_extensionless_names() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("blob"), b"x").unwrap();
        assert_eq!(dedup_path(tmp.path(), "blob"), tmp.path().join("blob_1"));
    }

    #[test]
    fn dedup_keeps_dotfiles_whole() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(".hidden"), b"x").unwrap();
        assert_eq!(
            dedup_path(tmp.path(), ".hidden"),
            tmp.path().join(".hidden_1")
        );
    }
}
