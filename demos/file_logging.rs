//! The reference wiring: console + normal file + warning/fatal file, with
//! hourly rotation on both files.

use fanlog::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> fanlog::Result<()> {
    let mut logger = Logger::standard("./logs", "demo.log")?;
    logger.start()?;

    logger.info("this lands in demo.log and on the console");
    logger.warning("this lands in demo.log.wf and on the console");

    // Archive the current files to demo.log.{YYYYMMDDHH}; a scheduler would
    // normally signal this at the top of each hour.
    logger.rotate();
    thread::sleep(Duration::from_millis(100));

    logger.info("fresh live file after rotation");

    logger.stop();

    for sink in logger.sinks() {
        let metrics = sink.metrics();
        println!(
            "sink wrote {} lines, {} rotations",
            metrics.lines_written(),
            metrics.rotations()
        );
    }
    Ok(())
}
