//! Minimal fanlog usage: a console sink plus the leveled macros.

use fanlog::prelude::*;
use fanlog::{info, notice, warning};

fn main() -> fanlog::Result<()> {
    let mut logger = Logger::builder()
        .sink(Sink::console(LevelMask::ALL))
        .build();
    logger.start()?;

    info!(logger, "service starting on port {}", 8080);
    notice!(logger, "cache warmed with {} entries", 1200);
    warning!(logger, "disk usage at {}%", 91);

    // Context tags ride along on every line the decorator logs.
    let request = logger.context().with("LogId", "req-42").with("model", "billing");
    request.info("charge accepted");
    request.debug("amount=12.99 currency=EUR");

    logger.stop();
    Ok(())
}
