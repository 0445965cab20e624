#![cfg(feature = "tracing")]

use {
    rollog::{prev_path, Level, LoggerBuilder},
    std::{fs, io},
};

#[test]
fn tracing_events_rotate_with_the_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracing.log");
    let logger = LoggerBuilder::new()
        .level(Level::Critical)
        .max_size(2_000)
        .fallback(io::sink())
        .output(&path)
        .build()
        .unwrap();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(logger)
        .with_ansi(false)
        .with_target(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        for i in 0..100 {
            tracing::info!("tracing event number {i}");
        }
    });

    let current = fs::read_to_string(&path).unwrap();
    let rotated = fs::read_to_string(prev_path(&path)).unwrap();
    assert!(current.len() <= 2_000);
    assert!(rotated.contains("tracing event number"));
    assert!(format!("{rotated}{current}").ends_with("tracing event number 99\n"));
}
