use std::path::PathBuf;

use daylog_tokio::{AsyncDailyLog, LogSettings};

#[tokio::main]
async fn main() {
    let dir = PathBuf::from("/tmp/daylog_example_async");
    let _ = std::fs::remove_dir_all(&dir);

    let log = AsyncDailyLog::new(&dir);
    log.initialize(&LogSettings::new("async-logs")).unwrap();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let log = log.clone();
            tokio::spawn(async move {
                log.info(format!("task {i} started")).await?;
                log.error(format!("task {i} hit a snag")).await?;
                Ok::<(), daylog_tokio::LogError>(())
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap().expect("Unable to write log file");
    }

    let today = chrono::Local::now().date_naive();
    let info = log.logger().file_path(daylog_tokio::Severity::Info, today);
    println!("{}:\n{}", info.display(), std::fs::read_to_string(&info).unwrap());
}
