use serial_test::serial;
use snatch_common::Matcher;
use snatch_config::SnatchConfigLoader;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const SITE_YAML: &str = r#"
version: "1"
output_dir: "grabbed"
headless: false
retry_count: 3
request_delay_secs: 0.5
site:
  base_url: "https://tracker.example.org/"
  id_prefix: "torrentid="
  url_prefix: "https://tracker.example.org/torrentdetails.php?torrentid="
  container_selector: ".vbfour-box .body_wrapper .postdetails .userinfo"
  control_matchers:
    - css: ".postdetails .userinfo input[type='submit'][name='download']"
    - xpath: '//input[@type="submit" and @name="download" and contains(@value, "Torrent")]'
session:
  - name: sessionhash
    value: "${SNATCH_TEST_SESSIONHASH}"
    domain: tracker.example.org
  - name: userid
    value: "1151205"
    domain: tracker.example.org
    secure: true
    expires: 1793992133
  - name: userid
    value: "9999999"
    domain: tracker.example.org
targets:
  - "https://tracker.example.org/torrentdetails.php?torrentid=abc"
  - "torrentid=def"
"#;

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "snatch.yaml", SITE_YAML);

    let config = temp_env::with_var("SNATCH_TEST_SESSIONHASH", Some("b4d66ce1"), || {
        SnatchConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load run config")
    });

    assert_eq!(config.version.as_deref(), Some("1"));
    assert_eq!(config.output_dir, PathBuf::from("grabbed"));
    assert!(!config.headless);
    assert_eq!(config.retry_count, 3);
    // Unset fields fall back to built-in defaults.
    assert_eq!(config.nav_timeout_ms, 20_000);
    assert_eq!(config.download_timeout_ms, 30_000);
    assert_eq!(config.webdriver_url, "http://localhost:9515");
    assert_eq!(config.default_extension, ".torrent");

    assert_eq!(config.site.id_prefix, "torrentid=");
    assert_eq!(config.site.control_matchers.len(), 2);
    assert!(matches!(config.site.control_matchers[0], Matcher::Css(_)));
    assert!(matches!(config.site.control_matchers[1], Matcher::XPath(_)));

    // Credential came from the environment, not the file.
    assert_eq!(config.session[0].value, "b4d66ce1");
    assert_eq!(config.session[0].path, "/");

    // Duplicate cookie names are kept in order; the browser's jar applies
    // last-write-wins when they are injected.
    let userids: Vec<&str> = config
        .session
        .iter()
        .filter(|c| c.name == "userid")
        .map(|c| c.value.as_str())
        .collect();
    assert_eq!(userids, vec!["1151205", "9999999"]);

    assert_eq!(config.targets.len(), 2);
}

#[test]
#[serial]
fn missing_site_section_is_an_error() {
    let err = SnatchConfigLoader::new()
        .with_yaml_str("version: '1'\ntargets: []")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("site"));
}
