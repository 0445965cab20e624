use rollog::{debug, default_logger, error, fatal, init_default, shutdown_default, Level, Logger, LoggerBuilder};

fn handle_request(logger: &Logger, id: u32) -> Result<(), rollog::Fatal> {
    debug!(logger, "handling request {}", id);
    if id == 3 {
        return Err(fatal!(logger, "request {} corrupted shared state", id));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = init_default(LoggerBuilder::new().level(Level::Debug).output("./logs/default.log").build()?)?;

    for id in 1..=5 {
        if let Err(fatal) = handle_request(default_logger(), id) {
            error!(logger, "stopping: {}", fatal.message());
            break;
        }
    }

    shutdown_default()?;
    Ok(())
}
