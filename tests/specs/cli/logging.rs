//! Logging specs

use crate::prelude::*;

#[test]
fn log_file_receives_logs() {
    let temp = Project::configured();

    temp.ds()
        .args(&["--log-file", "logs/ds.log", "submission", "sub-1"])
        .passes();

    let log = std::fs::read_to_string(temp.path().join("logs/ds.log")).unwrap();
    assert!(log.contains("wake-up"));
    assert!(log.contains("deposit submitted"));
}

#[test]
fn logs_stay_off_stdout() {
    let temp = Project::configured();

    temp.ds()
        .args(&["submission", "sub-1"])
        .passes()
        .stdout_lacks("INFO")
        .stderr_has("deposit submitted");
}
