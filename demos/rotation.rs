use {
    rollog::{info, prev_path, Level, LoggerBuilder, RotationSize},
    std::time::Instant,
};

const LOG_PATH: &str = "./logs/rotation.log";

/// Writes enough to rotate a few times and reports what is left on disk.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let logger = LoggerBuilder::new()
        .level(Level::Info)
        .max_size(RotationSize::KB(64))
        .file_mode(0o640) // Set file permissions to: owner rw, group r, others none
        .output(LOG_PATH)
        .build()?;

    for i in 1..=5_000 {
        info!(
            logger,
            "Log entry #{}: This is a sample log message that will contribute to file size",
            i
        );
    }
    logger.close_output()?;
    println!("Done logging: {:?}", start.elapsed());

    for path in [std::path::PathBuf::from(LOG_PATH), prev_path(LOG_PATH.as_ref())] {
        let size = std::fs::metadata(&path).map_or(0, |m| m.len());
        println!("{} : {} Bytes", path.display(), size);
    }
    Ok(())
}
