use {
    rollog::{LoggerBuilder, RotationSize, TimeZone},
    tracing_subscriber::util::SubscriberInitExt,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new()
        .max_size(RotationSize::MB(1))
        .time_zone(TimeZone::UTC)
        .output("./logs/tracing.log")
        .build()?;
    tracing_subscriber::fmt()
        .with_writer(logger)
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish()
        .try_init()?;

    tracing::info!("This is an info message");
    tracing::warn!("This is a warning message");
    tracing::error!("This is an error message");

    Ok(())
}
