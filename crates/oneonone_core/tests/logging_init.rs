use oneonone_core::{init_logging, logging_status, LoggingError};

#[test]
fn init_logging_is_idempotent_and_rejects_reconfiguration() {
    let first = tempfile::tempdir().unwrap();
    let first_dir = first.path().to_str().unwrap().to_string();
    let second = tempfile::tempdir().unwrap();
    let second_dir = second.path().to_str().unwrap().to_string();

    init_logging("info", &first_dir).unwrap();
    init_logging("INFO", &first_dir).unwrap();

    let level_err = init_logging("debug", &first_dir).unwrap_err();
    assert!(matches!(level_err, LoggingError::AlreadyInitialized { .. }));

    let dir_err = init_logging("info", &second_dir).unwrap_err();
    assert!(matches!(dir_err, LoggingError::AlreadyInitialized { .. }));

    let (level, dir) = logging_status().unwrap();
    assert_eq!(level, "info");
    assert_eq!(dir, first.path());
}

#[test]
fn init_logging_rejects_bad_input_before_starting() {
    assert!(matches!(
        init_logging("loud", "/tmp").unwrap_err(),
        LoggingError::UnsupportedLevel(_)
    ));
    assert!(matches!(
        init_logging("info", "relative/logs").unwrap_err(),
        LoggingError::RelativeDirectory(_)
    ));
}
