mod file_sink;

use crate::{Level, LoggerConfig};

use std::path::Path;

/// Logger config pointed at a temp directory, quiet defaults for tests.
pub(crate) fn test_config(dir: &Path) -> LoggerConfig {
    LoggerConfig {
        dir: dir.to_path_buf(),
        compress: false,
        colored: false,
        min_level: Level::Debug,
        ..LoggerConfig::default()
    }
}

/// Concatenated contents of every plain `.log` file in the directory.
pub(crate) fn read_all_logs(dir: &Path) -> String {
    let mut contents = String::new();
    for entry in std::fs::read_dir(dir).unwrap().flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".log") {
            contents.push_str(&std::fs::read_to_string(entry.path()).unwrap());
        }
    }
    contents
}
