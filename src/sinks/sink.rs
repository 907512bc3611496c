//! The per-destination sink
//!
//! A `Sink` owns one bounded queue of formatted lines, one destination
//! (file, stdout, or stderr), a level mask, and a dedicated consumer thread
//! that selects between the line queue and a one-slot control channel
//! carrying ROTATE/STOP. Producers enqueue concurrently; when the queue is
//! full they block until the consumer frees space (bounded back-pressure,
//! lines are never dropped). A destination that stops accepting writes
//! therefore backs the queue up and eventually blocks producers; that is
//! the intended no-loss policy, not a fault.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::Mutex;

use super::rotation::{self, RotationTarget};
use crate::core::error::{LoggerError, Result};
use crate::core::level::{LevelMask, LogLevel};
use crate::core::metrics::SinkMetrics;

/// Capacity of each sink's line queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Out-of-band instruction for a sink's consumer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Rotate,
    Stop,
}

/// Writable destination owned by a sink.
pub enum SinkOutput {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    File(File),
}

impl SinkOutput {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            SinkOutput::Stdout(stream) => stream.write_all(line.as_bytes()),
            SinkOutput::Stderr(stream) => stream.write_all(line.as_bytes()),
            SinkOutput::File(file) => file.write_all(line.as_bytes()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkOutput::Stdout(stream) => stream.flush(),
            SinkOutput::Stderr(stream) => stream.flush(),
            SinkOutput::File(file) => file.flush(),
        }
    }
}

/// The destination slot is `None` once the sink has been stopped; taking it
/// out of the slot is what closes the destination, so it closes exactly
/// once.
type SharedOutput = Arc<Mutex<Option<SinkOutput>>>;

pub struct Sink {
    line_tx: Sender<String>,
    line_rx: Receiver<String>,
    control_tx: Sender<Control>,
    control_rx: Receiver<Control>,
    output: SharedOutput,
    mask: LevelMask,
    rotation: Option<RotationTarget>,
    running: Arc<AtomicBool>,
    metrics: Arc<SinkMetrics>,
    consumer: Option<JoinHandle<()>>,
}

impl Sink {
    fn new(output: SinkOutput, mask: LevelMask, rotation: Option<RotationTarget>) -> Self {
        let (line_tx, line_rx) = bounded(DEFAULT_QUEUE_CAPACITY);
        let (control_tx, control_rx) = bounded(1);

        Self {
            line_tx,
            line_rx,
            control_tx,
            control_rx,
            output: Arc::new(Mutex::new(Some(output))),
            mask,
            rotation,
            running: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(SinkMetrics::new()),
            consumer: None,
        }
    }

    /// Sink writing to the process stdout. Never rotates.
    #[must_use]
    pub fn console(mask: LevelMask) -> Self {
        Self::new(SinkOutput::Stdout(io::stdout()), mask, None)
    }

    /// Sink writing to the process stderr. Never rotates.
    #[must_use]
    pub fn stderr(mask: LevelMask) -> Self {
        Self::new(SinkOutput::Stderr(io::stderr()), mask, None)
    }

    /// Sink appending to `{dir}/{file_name}`, created if absent.
    ///
    /// With `rotate` set, ROTATE signals archive the live file to
    /// `{file_name}.{YYYYMMDDHH}`; without it they are no-ops.
    ///
    /// # Errors
    ///
    /// An unopenable destination is a startup precondition failure and is
    /// the one error that halts construction.
    pub fn file(
        dir: impl AsRef<Path>,
        file_name: &str,
        mask: LevelMask,
        rotate: bool,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", dir.display()),
                e,
            )
        })?;

        let target = RotationTarget::new(dir, file_name);
        let file = rotation::open_live_file(&target.live_path())?;
        let rotation = rotate.then_some(target);

        Ok(Self::new(SinkOutput::File(file), mask, rotation))
    }

    /// Sink over a caller-supplied destination. Never rotates.
    #[must_use]
    pub fn with_output(output: SinkOutput, mask: LevelMask) -> Self {
        Self::new(output, mask, None)
    }

    #[must_use]
    pub fn level_mask(&self) -> LevelMask {
        self.mask
    }

    /// Whether this sink's mask selects `level`.
    #[must_use]
    pub fn accepts(&self, level: LogLevel) -> bool {
        self.mask.contains(level)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn rotation_enabled(&self) -> bool {
        self.rotation.is_some()
    }

    #[must_use]
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Spawn the consumer loop.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SinkAlreadyRunning`] when called again without
    /// an intervening [`stop`](Self::stop); the first consumer keeps
    /// running and sink state is unchanged.
    pub fn start(&mut self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(LoggerError::SinkAlreadyRunning);
        }

        let lines = self.line_rx.clone();
        let control = self.control_rx.clone();
        let output = Arc::clone(&self.output);
        let rotation = self.rotation.clone();
        let running = Arc::clone(&self.running);
        let metrics = Arc::clone(&self.metrics);

        self.consumer = Some(thread::spawn(move || {
            consumer_loop(&lines, &control, &output, rotation.as_ref(), &running, &metrics);
        }));

        Ok(())
    }

    /// Queue one formatted line for the consumer.
    ///
    /// Blocks the caller while the queue is full; lines are never dropped.
    pub fn enqueue(&self, line: String) {
        let _ = self.line_tx.send(line);
    }

    /// Post a ROTATE signal to the consumer; fire-and-forget.
    ///
    /// A no-op when rotation is disabled for this sink or a signal is
    /// already pending.
    pub fn signal_rotate(&self) {
        let _ = self.control_tx.try_send(Control::Rotate);
    }

    /// Stop the consumer and drain the queue.
    ///
    /// Blocks until the consumer loop has exited, then writes any still
    /// queued lines inline, flushes, and closes the destination. No line
    /// enqueued before this call is lost. Also runs on drop; safe to call
    /// on a sink that was never started.
    pub fn stop(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            let _ = self.control_tx.send(Control::Stop);
            if consumer.join().is_err() {
                eprintln!("[LOGGER ERROR] sink consumer panicked during stop");
            }
        }
        self.running.store(false, Ordering::SeqCst);

        let mut output = self.output.lock();
        if let Some(destination) = output.as_mut() {
            while let Ok(line) = self.line_rx.try_recv() {
                if let Err(e) = destination.write_line(&line) {
                    self.metrics.record_write_failure();
                    eprintln!("[LOGGER ERROR] write during drain failed: {}", e);
                } else {
                    self.metrics.record_line_written();
                }
            }
            if let Err(e) = destination.flush() {
                eprintln!("[LOGGER ERROR] flush on close failed: {}", e);
            }
        }
        *output = None;
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        self.stop();
    }
}

fn consumer_loop(
    lines: &Receiver<String>,
    control: &Receiver<Control>,
    output: &SharedOutput,
    rotation: Option<&RotationTarget>,
    running: &AtomicBool,
    metrics: &SinkMetrics,
) {
    loop {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => write_line(output, &line, metrics),
                Err(_) => break,
            },
            recv(control) -> signal => match signal {
                Ok(Control::Rotate) => {
                    if let Some(target) = rotation {
                        // A failed rotation leaves the previous handle in
                        // service; ingestion continues either way.
                        if let Some(fresh) = rotation::rotate(target, metrics) {
                            *output.lock() = Some(SinkOutput::File(fresh));
                        }
                    }
                }
                Ok(Control::Stop) | Err(_) => {
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            },
        }
    }
}

fn write_line(output: &SharedOutput, line: &str, metrics: &SinkMetrics) {
    let mut output = output.lock();
    if let Some(destination) = output.as_mut() {
        if let Err(e) = destination.write_line(line) {
            metrics.record_write_failure();
            eprintln!("[LOGGER ERROR] write to sink failed: {}", e);
        } else {
            metrics.record_line_written();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_console_sink_lifecycle() {
        let mut sink = Sink::console(LevelMask::ALL);
        assert!(!sink.is_running());
        sink.start().unwrap();
        assert!(sink.is_running());
        sink.enqueue("INFO test line\n".to_string());
        sink.stop();
        assert!(!sink.is_running());
    }

    #[test]
    fn test_file_sink_writes_and_drains_on_stop() {
        let dir = tempdir().unwrap();
        let mut sink = Sink::file(dir.path(), "test.log", LevelMask::ALL, false).unwrap();
        sink.start().unwrap();

        for i in 0..100 {
            sink.enqueue(format!("line {}\n", i));
        }
        sink.stop();

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 100);
        assert_eq!(lines[0], "line 0");
        assert_eq!(lines[99], "line 99");
        assert_eq!(sink.metrics().lines_written(), 100);
    }

    #[test]
    fn test_double_start_is_usage_error() {
        let mut sink = Sink::console(LevelMask::ALL);
        sink.start().unwrap();
        assert!(matches!(
            sink.start(),
            Err(LoggerError::SinkAlreadyRunning)
        ));
        // Sink still works after the rejected second start.
        sink.enqueue("INFO still alive\n".to_string());
        sink.stop();
    }

    #[test]
    fn test_stop_without_start_flushes_queued_lines() {
        let dir = tempdir().unwrap();
        let mut sink = Sink::file(dir.path(), "test.log", LevelMask::ALL, false).unwrap();

        sink.enqueue("queued before start\n".to_string());
        sink.stop();

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(content, "queued before start\n");
    }

    #[test]
    fn test_mask_accessors() {
        let sink = Sink::console(LevelMask::WARN_FATAL);
        assert!(sink.accepts(LogLevel::Fatal));
        assert!(!sink.accepts(LogLevel::Debug));
        assert_eq!(sink.level_mask(), LevelMask::WARN_FATAL);
        assert!(!sink.rotation_enabled());
    }

    #[test]
    fn test_rotate_signal_archives_live_file() {
        let dir = tempdir().unwrap();
        let mut sink = Sink::file(dir.path(), "rot.log", LevelMask::ALL, true).unwrap();
        assert!(sink.rotation_enabled());
        sink.start().unwrap();

        sink.enqueue("before rotation\n".to_string());
        thread::sleep(Duration::from_millis(50));
        sink.signal_rotate();
        thread::sleep(Duration::from_millis(50));
        sink.enqueue("after rotation\n".to_string());
        sink.stop();

        let live = fs::read_to_string(dir.path().join("rot.log")).unwrap();
        assert_eq!(live, "after rotation\n");
        assert_eq!(sink.metrics().rotations(), 1);

        let archived: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("rot.log."))
            .collect();
        assert_eq!(archived.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join(&archived[0])).unwrap(),
            "before rotation\n"
        );
    }

    #[test]
    fn test_rotate_signal_is_noop_without_rotation() {
        let dir = tempdir().unwrap();
        let mut sink = Sink::file(dir.path(), "plain.log", LevelMask::ALL, false).unwrap();
        sink.start().unwrap();

        sink.signal_rotate();
        sink.enqueue("still here\n".to_string());
        sink.stop();

        assert_eq!(
            fs::read_to_string(dir.path().join("plain.log")).unwrap(),
            "still here\n"
        );
        assert_eq!(sink.metrics().rotations(), 0);
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
