use {
    rollog::{info, prev_path, Level, Logger, LoggerBuilder, TimeZone},
    std::{
        collections::HashSet,
        fs,
        io,
        path::Path,
        sync::Arc,
        thread,
    },
};

const TEST_LOG_SIZE: u64 = 10_000;

fn file_logger(path: &Path) -> Logger {
    LoggerBuilder::new()
        .level(Level::Info)
        .time_zone(TimeZone::UTC)
        .fallback(io::sink())
        .output(path)
        .build()
        .expect("log file should open")
}

fn size(path: &Path) -> u64 {
    fs::metadata(path).map_or(0, |m| m.len())
}

#[test]
fn rotation_keeps_file_under_max_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nonexistentfile.txt");
    let logger = file_logger(&path);
    logger.set_max_size(TEST_LOG_SIZE).unwrap();

    let mut longest = 0;
    for i in 0..250 {
        let before = logger.written_size();
        info!(logger, "{}-01234567890123456789012345678901234567890123456789", format!("{i:03}"));
        longest = longest.max(logger.written_size().saturating_sub(before));
    }
    logger.close_output().unwrap();

    assert!(size(&path) <= TEST_LOG_SIZE, "current file is {} bytes", size(&path));
    let prev = prev_path(&path);
    assert!(prev.exists());
    assert!(size(&prev) > 0);
    assert!(
        size(&prev) <= TEST_LOG_SIZE + longest,
        "rotated file is {} bytes",
        size(&prev)
    );
}

#[test]
fn crossing_max_size_rotates_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("once.log");
    let logger = file_logger(&path);
    logger.set_max_size(1_000).unwrap();

    let mut line_size = 0;
    while !prev_path(&path).exists() {
        let before = logger.written_size();
        logger.info("padding padding padding padding", &[]);
        if logger.written_size() > before {
            line_size = logger.written_size() - before;
        }
    }
    let rotated = size(&prev_path(&path));
    assert!(rotated > 1_000);
    assert!(size(&path) < line_size.max(1));

    logger.info("one more", &[]);
    assert_eq!(size(&prev_path(&path)), rotated);
    assert!(fs::read_to_string(&path).unwrap().ends_with("INFO one more\n"));
}

#[test]
fn deleted_file_is_recreated_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deleted.log");
    let logger = file_logger(&path);

    logger.info("first", &[]);
    fs::remove_file(&path).unwrap();
    logger.info("second", &[]);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("first"));
    assert!(contents.ends_with("INFO second\n"));
    assert_eq!(logger.written_size(), contents.len() as u64);
}

#[test]
fn existing_file_is_appended_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("existing.log");
    fs::write(&path, "x".repeat(500)).unwrap();

    let logger = file_logger(&path);
    assert_eq!(logger.written_size(), 500);
    logger.set_max_size(520).unwrap();
    logger.info("pushes it over", &[]);

    assert!(size(&prev_path(&path)) > 520);
    assert_eq!(size(&path), 0);
}

#[test]
fn concurrent_writers_lose_no_lines_across_rotation() {
    const WRITERS: usize = 8;
    const LINES: usize = 250;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.log");

    // Lines are fixed width, so one probe gives the size of every line.
    let probe = file_logger(&dir.path().join("probe.log"));
    probe.info("w00-l0000", &[]);
    let line_size = probe.written_size();

    // One rotation, roughly two thirds of the way through.
    let total = (WRITERS * LINES) as u64 * line_size;
    let logger = Arc::new(file_logger(&path));
    logger.set_max_size(total * 2 / 3).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for l in 0..LINES {
                    logger.info(&format!("w{w:02}-l{l:04}"), &[]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close_output().unwrap();

    let mut seen = HashSet::new();
    let mut count = 0;
    for file in [prev_path(&path), path.clone()] {
        for line in fs::read_to_string(&file).unwrap().lines() {
            let tag = line.rsplit(' ').next().unwrap().to_string();
            assert!(seen.insert(tag), "duplicate line {line}");
            count += 1;
        }
    }
    assert_eq!(count, WRITERS * LINES);
    assert!(size(&prev_path(&path)) > 0);
}

#[test]
fn filtered_messages_never_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filtered.log");
    let logger = file_logger(&path);
    logger.set_level(Level::Error);

    logger.info("quiet", &[]);
    logger.warn("quiet", &[]);
    assert_eq!(logger.written_size(), 0);

    logger.error("loud", &[]);
    assert!(fs::read_to_string(&path).unwrap().ends_with("ERROR loud\n"));
}
