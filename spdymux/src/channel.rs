//! Buffered frame queue between two concurrent tasks.
use crate::error::{Result, StreamError};
use crate::relay::{FrameReader, FrameWriter};
use async_trait::async_trait;
use spdymux_frame::frame::Frame;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Number of frames a channel buffers before writers are suspended.
pub const DEFAULT_CAPACITY: usize = 4096;

/// A fixed capacity FIFO queue which lets two tasks send frames to each
/// other.
///
/// The channel can be closed exactly once, either gracefully with [`close`]
/// or with an error via [`set_error`]. The first call records the terminal
/// condition and wakes up every suspended reader and writer. Reads drain the
/// frames buffered before the close and return the recorded condition after
/// that, forever. Writes on a closed channel return the recorded condition
/// without enqueuing anything.
///
/// [`close`]: FrameChannel::close
/// [`set_error`]: FrameChannel::set_error
#[derive(Debug)]
pub struct FrameChannel {
    tx: mpsc::Sender<Frame>,
    rx: tokio::sync::Mutex<mpsc::Receiver<Frame>>,
    terminal: Mutex<Option<StreamError>>,
    closed: CancellationToken,
}

impl FrameChannel {
    pub fn new() -> FrameChannel {
        FrameChannel::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> FrameChannel {
        let (tx, rx) = mpsc::channel(capacity);

        FrameChannel {
            tx,
            rx: tokio::sync::Mutex::new(rx),
            terminal: Mutex::new(None),
            closed: CancellationToken::new(),
        }
    }

    /// Enqueue a frame, suspending the caller while the queue is full. If a
    /// terminal condition is set, or becomes set while suspended, it is
    /// returned and the frame is dropped.
    pub async fn write(&self, frame: Frame) -> Result<()> {
        tokio::select! {
            biased;

            _ = self.closed.cancelled() => Err(self.terminal_error()),
            result = self.tx.send(frame) => result.map_err(|_| self.terminal_error()),
        }
    }

    /// Take the next frame, suspending the caller while the queue is empty.
    /// Frames buffered before a close are still handed out, after the last
    /// one every read returns the terminal condition.
    pub async fn read(&self) -> Result<Frame> {
        let mut rx = self.rx.lock().await;

        tokio::select! {
            biased;

            Some(frame) = rx.recv() => Ok(frame),
            _ = self.closed.cancelled() => Err(self.terminal_error()),
        }
    }

    /// Record `err` as the terminal condition and wake up all suspended
    /// parties. Only the first call has an effect.
    pub fn set_error(&self, err: StreamError) {
        let mut terminal = self.terminal.lock().unwrap();

        if terminal.is_some() {
            return;
        }

        *terminal = Some(err);
        self.closed.cancel();
    }

    /// Close the channel gracefully. Readers see [`StreamError::EndOfStream`]
    /// once the queue is drained.
    pub fn close(&self) {
        self.set_error(StreamError::EndOfStream);
    }

    /// Whether a terminal condition has been recorded. Buffered frames may
    /// still be readable.
    pub fn is_closed(&self) -> bool {
        self.terminal.lock().unwrap().is_some()
    }

    fn terminal_error(&self) -> StreamError {
        self.terminal
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(StreamError::EndOfStream)
    }
}

impl Default for FrameChannel {
    fn default() -> Self {
        FrameChannel::new()
    }
}

#[async_trait]
impl FrameReader for FrameChannel {
    async fn read_frame(&self) -> Result<Frame> {
        self.read().await
    }
}

#[async_trait]
impl FrameWriter for FrameChannel {
    async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.write(frame).await
    }
}
