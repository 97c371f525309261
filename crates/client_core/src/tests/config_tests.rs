use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("finder_settings_{tag}_{suffix}.toml"))
}

#[test]
fn normalizes_trailing_slashes() {
    assert_eq!(
        normalize_service_url(" http://localhost:3001/// ").expect("normalize"),
        "http://localhost:3001"
    );
}

#[test]
fn empty_service_url_falls_back_to_default() {
    assert_eq!(
        normalize_service_url("   ").expect("normalize"),
        Settings::default().service_url
    );
}

#[test]
fn rejects_non_http_scheme() {
    let err = normalize_service_url("ftp://example.com").expect_err("should fail");
    assert!(err.to_string().contains("http://"));
}

#[test]
fn rejects_unparseable_url() {
    assert!(normalize_service_url("not a url").is_err());
}

#[test]
fn missing_file_yields_defaults() {
    let path = temp_settings_path("missing");
    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.user_id, UserId::guest());
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn reads_values_from_settings_file() {
    let path = temp_settings_path("file");
    fs::write(
        &path,
        "service_url = \"https://finder.example.com/\"\nuser_id = \"alice\"\nrequest_timeout_secs = 15\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path).expect("load");
    fs::remove_file(&path).expect("cleanup");

    // Keys overridden by the environment are skipped.
    if env::var("APP__SERVICE_URL").is_err() && env::var("FINDER_SERVICE_URL").is_err() {
        assert_eq!(settings.service_url, "https://finder.example.com");
    }
    if env::var("APP__USER_ID").is_err() && env::var("FINDER_USER_ID").is_err() {
        assert_eq!(settings.user_id, UserId::new("alice"));
    }
    if env::var("APP__REQUEST_TIMEOUT_SECS").is_err()
        && env::var("FINDER_REQUEST_TIMEOUT_SECS").is_err()
    {
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
    }
}

#[test]
fn malformed_settings_file_is_an_error() {
    let path = temp_settings_path("malformed");
    fs::write(&path, "service_url = [1, 2").expect("write settings");

    let result = load_settings_from(&path);
    fs::remove_file(&path).expect("cleanup");

    assert!(result.is_err());
}

#[test]
fn zero_timeout_means_no_timeout() {
    let settings = Settings {
        request_timeout_secs: Some(0),
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), None);
}
