use std::path::PathBuf;

use daylog::{Environment, Fault, logger_config};

fn main() {
    let dir = PathBuf::from("/tmp/daylog_example_threads");
    let _ = std::fs::remove_dir_all(&dir);

    let log = std::sync::Arc::new(
        logger_config()
            .with_base_dir(&dir)
            .with_workers(4)
            .build()
            .expect("Unable to start log writers"),
    );
    // DAYLOG_LOG_PATH picks the sub-path, "logs" otherwise
    if let Err(e) = log.initialize(&Environment) {
        eprintln!("using default log path: {e}");
    }

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let log = log.clone();
            std::thread::spawn(move || {
                for j in 0..10 {
                    drop(log.info(format!("thread {i} says hello #{j}")));
                }
                let err = std::io::Error::other(format!("thread {i} gave up"));
                log.fault(Fault::from_error(&err)).wait()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().expect("Unable to write error log");
    }
    log.shutdown();

    let logger = log.logger();
    for folder in [logger.folder(daylog::Severity::Info), logger.folder(daylog::Severity::Error)] {
        for entry in std::fs::read_dir(&folder).unwrap().flatten() {
            let content = std::fs::read_to_string(entry.path()).unwrap();
            println!("{}: {} lines", entry.path().display(), content.lines().count());
        }
    }
}
