use std::{collections::HashSet, fs, sync::Arc, thread};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use daylog::{Fault, LogError, LogSettings, ManualClock, Severity, logger_config};

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn test_async_writes_from_many_threads() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(
        logger_config()
            .with_base_dir(dir.path())
            .with_workers(4)
            .with_clock(Arc::new(ManualClock::new(at(10, 0, 0))))
            .with_settings(LogSettings::new("app-logs"))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..6)
        .map(|t| {
            let log = log.clone();
            thread::spawn(move || {
                (0..40)
                    .map(|i| log.info(format!("worker {t} line {i}")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for h in handles {
        for write in h.join().unwrap() {
            write.wait().unwrap();
        }
    }

    let content =
        fs::read_to_string(dir.path().join("app-logs/Info/20240101.txt")).unwrap();
    let lines: HashSet<&str> = content.split_terminator("\r\n").collect();
    assert_eq!(content.split_terminator("\r\n").count(), 6 * 40);
    for t in 0..6 {
        for i in 0..40 {
            assert!(lines.contains(format!("10:00:00 INFO worker {t} line {i}").as_str()));
        }
    }
}

#[test]
fn test_error_and_fault_share_the_error_file() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(at(23, 59, 59)));
    let log = logger_config()
        .with_base_dir(dir.path())
        .with_workers(1)
        .with_clock(clock.clone())
        .build()
        .unwrap();

    log.error("quota exceeded").wait().unwrap();
    log.fault(Fault::new("handler crashed").with_stack_trace("at handler::run"))
        .wait()
        .unwrap();
    clock.advance(TimeDelta::seconds(2));
    log.fault("no trace").wait().unwrap();

    let logger = log.logger();
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let second = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert_eq!(
        fs::read_to_string(logger.file_path(Severity::Error, first)).unwrap(),
        "23:59:59 ERROR quota exceeded\r\n23:59:59 ERROR handler crashed at handler::run\r\n"
    );
    assert_eq!(
        fs::read_to_string(logger.file_path(Severity::Error, second)).unwrap(),
        "00:00:01 ERROR no trace \r\n"
    );
    assert!(dir.path().join("logs/Error").is_dir());
}

#[test]
fn test_blocking_writes() {
    let dir = tempfile::tempdir().unwrap();
    let log = logger_config()
        .with_base_dir(dir.path())
        .with_clock(Arc::new(ManualClock::new(at(6, 7, 8))))
        .build()
        .unwrap();
    log.info_blocking("sync info").unwrap();
    log.error_blocking("sync error").unwrap();
    log.fault_blocking(&Fault::new("sync fault")).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("logs/Info/20240101.txt")).unwrap(),
        "06:07:08 INFO sync info\r\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("logs/Error/20240101.txt")).unwrap(),
        "06:07:08 ERROR sync error\r\n06:07:08 ERROR sync fault \r\n"
    );
}

#[test]
fn test_io_failure_reaches_the_handle() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "").unwrap();
    let log = logger_config().with_base_dir(&blocker).build().unwrap();
    assert!(matches!(
        log.info("nowhere to go").wait(),
        Err(LogError::Io { .. })
    ));
}

#[test]
fn test_shutdown_flushes_detached_writes() {
    let dir = tempfile::tempdir().unwrap();
    let log = logger_config()
        .with_base_dir(dir.path())
        .with_clock(Arc::new(ManualClock::new(at(12, 0, 0))))
        .build()
        .unwrap();
    for i in 0..25 {
        drop(log.info(format!("detached {i}")));
    }
    log.shutdown();
    let content = fs::read_to_string(dir.path().join("logs/Info/20240101.txt")).unwrap();
    assert_eq!(content.lines().count(), 25);
    assert!(matches!(
        log.info("too late").wait(),
        Err(LogError::Dispatch(_))
    ));
}
