use curriculum_core::{AjaxBackend, BackendConfig, ConfigError};
use std::io::Write;

#[test]
fn config_file_loads_with_defaults_for_missing_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "ajax_url": "https://lms.test/wp-admin/admin-ajax.php",
            "nonce": "n0nce",
            "course_id": "77"
        }}"#
    )
    .unwrap();

    let config = BackendConfig::from_file(file.path()).unwrap();
    assert_eq!(config.course_id, "77");
    assert_eq!(config.nonce_key, "_tutor_nonce");
    assert_eq!(config.fetch_action, "tutor_course_contents");
    assert_eq!(config.timeout().as_millis(), 15_000);

    let backend = AjaxBackend::new(config.clone()).unwrap();
    assert_eq!(backend.config(), &config);
}

#[test]
fn config_file_without_course_is_invalid() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "ajax_url": "https://lms.test/ajax" }}"#).unwrap();

    let err = BackendConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "course_id",
            ..
        }
    ));
}

#[test]
fn missing_or_malformed_file_reports_cause() {
    let dir = tempfile::tempdir().unwrap();
    let err = BackendConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));

    let err = BackendConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
