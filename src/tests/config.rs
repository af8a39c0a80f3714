use super::Config;
use crate::error::GuideError;
use crate::paginate::PageLimits;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_missing_file_uses_defaults() {
    let config = Config::load_from(Path::new("/nonexistent/placeguide.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.page_limits(), PageLimits::default());
    assert_eq!(config.request_timeout(), None);
}

#[test]
fn test_file_overrides_selected_values() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api_base_url = \"https://guides.example\"\nmax_sections_per_page = 5\nrequest_timeout_secs = 20"
    )
    .unwrap();

    let config = Config::load_from(file.path()).unwrap();

    assert_eq!(config.api_base_url, "https://guides.example");
    assert_eq!(config.page_limits().max_sections_per_page, 5);
    assert_eq!(config.page_limits().max_chars_per_page, 6000);
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
    assert_eq!(config.speech_command, "espeak");
}

#[test]
fn test_malformed_file_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_sections_per_page = \"many\"").unwrap();

    let err = Config::load_from(file.path()).unwrap_err();

    match &err {
        GuideError::Config { path } => assert_eq!(path, file.path()),
        other => panic!("expected config error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Ignoring malformed config file"));
}
