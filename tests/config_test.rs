use s3lite::config;
use s3lite::AddressingStyle;
use std::env;
use std::fs;
use tempfile::TempDir;

/// Load configuration from a YAML file
#[test]
fn test_load_yaml_config() {
    let yaml = r#"
profiles:
  minio:
    access_key: minio_access
    secret_key: minio_secret
    endpoint: 127.0.0.1:9000
    addressing_style: path_style
  aws:
    access_key: AKIATEST
    secret_key: secrettest
    region: us-west-2

default_profile: minio
"#;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).unwrap();

    let config = config::load_from_yaml(&config_path).unwrap();

    assert_eq!(config.profiles.len(), 2);
    assert_eq!(config.default_profile.as_deref(), Some("minio"));

    let minio = config.get_profile(None).unwrap();
    assert_eq!(minio.access_key, "minio_access");
    assert_eq!(minio.secret_key, "minio_secret");
    assert_eq!(minio.endpoint.as_deref(), Some("127.0.0.1:9000"));
    assert_eq!(minio.addressing_style, AddressingStyle::PathStyle);
    assert_eq!(minio.region, "us-east-1");

    let aws = config.get_profile(Some("aws")).unwrap();
    assert_eq!(aws.region, "us-west-2");
    assert_eq!(aws.endpoint, None);
    assert_eq!(aws.addressing_style, AddressingStyle::VirtualHosted);
}

/// Selecting a profile on load makes it the default
#[test]
fn test_load_config_selects_profile() {
    let yaml = r#"
profiles:
  prod:
    access_key: prod_key
    secret_key: prod_secret
  dev:
    access_key: dev_key
    secret_key: dev_secret
"#;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).unwrap();

    let config =
        config::load_config(Some(config_path.to_str().unwrap()), Some("dev")).unwrap();
    assert_eq!(config.get_profile(None).unwrap().access_key, "dev_key");

    // Unknown profile name is an error
    assert!(config::load_config(Some(config_path.to_str().unwrap()), Some("staging")).is_err());
}

/// Load configuration from environment variables
#[test]
fn test_load_env_config() {
    let orig_key = env::var("AWS_ACCESS_KEY_ID").ok();
    let orig_secret = env::var("AWS_SECRET_ACCESS_KEY").ok();
    let orig_region = env::var("AWS_REGION").ok();
    let orig_endpoint = env::var("S3_ENDPOINT").ok();
    let orig_style = env::var("S3_ADDRESSING_STYLE").ok();

    env::set_var("AWS_ACCESS_KEY_ID", "env_key");
    env::set_var("AWS_SECRET_ACCESS_KEY", "env_secret");
    env::set_var("AWS_REGION", "eu-west-1");
    env::set_var("S3_ENDPOINT", "127.0.0.1:9000");
    env::remove_var("S3_ADDRESSING_STYLE");

    let config = config::load_from_env().unwrap();
    let profile = config.get_profile(None).unwrap();

    assert_eq!(profile.access_key, "env_key");
    assert_eq!(profile.secret_key, "env_secret");
    assert_eq!(profile.region, "eu-west-1");
    assert_eq!(profile.endpoint.as_deref(), Some("127.0.0.1:9000"));
    // A custom endpoint defaults to path-style addressing
    assert_eq!(profile.addressing_style, AddressingStyle::PathStyle);

    cleanup_env("AWS_ACCESS_KEY_ID", orig_key);
    cleanup_env("AWS_SECRET_ACCESS_KEY", orig_secret);
    cleanup_env("AWS_REGION", orig_region);
    cleanup_env("S3_ENDPOINT", orig_endpoint);
    cleanup_env("S3_ADDRESSING_STYLE", orig_style);
}

fn cleanup_env(key: &str, orig_val: Option<String>) {
    match orig_val {
        Some(val) => env::set_var(key, val),
        None => env::remove_var(key),
    }
}
