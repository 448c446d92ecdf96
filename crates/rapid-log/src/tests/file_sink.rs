use crate::tests::{read_all_logs, test_config};
use crate::{FileSinkManager, WriterPool};

use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::{anything, eq, ok};
use tempfile::TempDir;

#[test]
fn given_config_when_open_then_todays_file_created() {
    let temp = TempDir::new().unwrap();
    let manager = FileSinkManager::open(&test_config(temp.path())).unwrap();

    let path = manager.current_path().unwrap();

    assert_that!(path.exists(), eq(true));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    assert_that!(name, eq(&format!("{date}.log")));
}

#[test]
fn given_open_sink_when_write_then_line_lands_in_file() {
    let temp = TempDir::new().unwrap();
    let manager = FileSinkManager::open(&test_config(temp.path())).unwrap();

    manager.write(b"hello log\n").unwrap();
    manager.flush().unwrap();

    let contents = std::fs::read_to_string(manager.current_path().unwrap()).unwrap();
    assert_that!(contents.as_str(), eq("hello log\n"));
}

#[test]
fn given_closed_sink_when_write_then_err_without_panic() {
    let temp = TempDir::new().unwrap();
    let manager = FileSinkManager::open(&test_config(temp.path())).unwrap();

    manager.close().unwrap();

    assert_that!(manager.write(b"late\n").is_err(), eq(true));
    assert_that!(manager.current_path().is_none(), eq(true));
    // closing again is safe
    assert_that!(manager.close(), ok(anything()));
}

#[test]
fn given_new_date_when_rotate_to_date_then_active_filename_switches() {
    let temp = TempDir::new().unwrap();
    let manager = FileSinkManager::open(&test_config(temp.path())).unwrap();

    manager.write(b"before rotation\n").unwrap();
    manager.rotate_to_date("2099-01-02").unwrap();
    manager.write(b"after rotation\n").unwrap();
    manager.flush().unwrap();

    let active = manager.current_path().unwrap();
    assert_that!(
        active.file_name().unwrap().to_string_lossy().into_owned(),
        eq(&String::from("2099-01-02.log"))
    );
    let contents = std::fs::read_to_string(&active).unwrap();
    assert_that!(contents.as_str(), eq("after rotation\n"));
    // the previous date file keeps its lines
    assert_that!(read_all_logs(temp.path()).contains("before rotation"), eq(true));
}

#[test]
fn given_same_date_when_rotate_if_date_changed_then_noop() {
    let temp = TempDir::new().unwrap();
    let manager = FileSinkManager::open(&test_config(temp.path())).unwrap();

    let rotated = manager.rotate_if_date_changed().unwrap();

    assert_that!(rotated, eq(false));
}

#[test]
fn given_size_limit_when_writes_exceed_it_then_file_rolls_over_to_backup() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.max_size = 64;
    let manager = FileSinkManager::open(&config).unwrap();

    for i in 0..10 {
        manager.write(format!("line number {i} with some padding\n").as_bytes()).unwrap();
    }
    manager.flush().unwrap();

    let log_files = std::fs::read_dir(temp.path())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
        .count();
    assert_that!(log_files > 1, eq(true));

    // no line was split by the rollover
    for line in read_all_logs(temp.path()).lines() {
        assert_that!(line.starts_with("line number "), eq(true));
        assert_that!(line.ends_with("padding"), eq(true));
    }
}

#[test]
fn given_compression_enabled_when_roll_over_then_backup_is_gzipped() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.max_size = 64;
    config.compress = true;
    let manager = FileSinkManager::open(&config).unwrap();

    for i in 0..10 {
        manager.write(format!("line number {i} with some padding\n").as_bytes()).unwrap();
    }

    let gz_files = std::fs::read_dir(temp.path())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".log.gz"))
        .count();
    assert_that!(gz_files > 0, eq(true));
}

#[test]
fn given_backup_limit_when_many_roll_overs_then_old_backups_pruned() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path());
    config.max_size = 32;
    config.max_backups = 2;
    let manager = FileSinkManager::open(&config).unwrap();

    for i in 0..40 {
        manager.write(format!("padded line number {i:04}\n").as_bytes()).unwrap();
    }

    let backups = std::fs::read_dir(temp.path())
        .unwrap()
        .flatten()
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.ends_with(".log") && e.path() != manager.current_path().unwrap()
        })
        .count();
    assert_that!(backups <= 2, eq(true));
}

// Serialization invariant: concurrent writers racing rotations never lose,
// duplicate, or split a line.
#[test]
fn given_concurrent_writers_and_rotations_when_done_then_every_line_intact() {
    let temp = TempDir::new().unwrap();
    let manager = Arc::new(FileSinkManager::open(&test_config(temp.path())).unwrap());
    let pool = Arc::new(WriterPool::new(8 * 1024));

    const WRITERS: usize = 8;
    const LINES: usize = 50;

    let mut handles = Vec::new();
    for writer in 0..WRITERS {
        let manager = manager.clone();
        let pool = pool.clone();
        handles.push(std::thread::spawn(move || {
            for i in 0..LINES {
                let line = format!("writer-{writer:02}-line-{i:04}-end\n");
                pool.write(&manager, &line).unwrap();
            }
        }));
    }

    let rotator = {
        let manager = manager.clone();
        std::thread::spawn(move || {
            for _ in 0..20 {
                manager.rotate().unwrap();
                std::thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    rotator.join().unwrap();
    manager.flush().unwrap();

    let contents = read_all_logs(temp.path());
    let lines: Vec<&str> = contents.lines().collect();
    assert_that!(lines.len(), eq(WRITERS * LINES));

    for writer in 0..WRITERS {
        for i in 0..LINES {
            let expected = format!("writer-{writer:02}-line-{i:04}-end");
            let occurrences = lines.iter().filter(|l| **l == expected).count();
            assert_that!(occurrences, eq(1));
        }
    }
}
