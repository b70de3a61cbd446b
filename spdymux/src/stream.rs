//! Streams and the per direction state machines guarding them.
//!
//! Each stream owns two half streams, one per direction. A frame enters the
//! receiving half only after the receive rules let it pass, and leaves
//! through the sending half only after the send rules do. The two sides
//! answer violations differently: the receiver tells the peer off with a
//! RST_STREAM and drops the frame, the sender reports a local error to the
//! caller.
use crate::channel::FrameChannel;
use crate::error::{Result, StreamError};
use crate::relay::{FrameReader, FrameWriter};
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use spdymux_frame::frame::{self, Frame, StatusCode, StreamId, PROTOCOL_ERROR, STREAM_ALREADY_CLOSED};
use spdymux_frame::header::{self, Headers};
use std::sync::{Arc, Mutex};


/// Bookkeeping of one direction.
#[derive(Debug, Default)]
struct HalfState {
    /// Number of admitted frames. Frozen once the half is closed.
    n_frames: u32,
    /// Union of the header mappings of the admitted frames.
    headers: Headers,
}

/// One direction of a stream: a buffered frame channel plus admission
/// bookkeeping. The routine admitting a frame is the same for both
/// directions, only the legality check in front of it differs.
#[derive(Debug)]
struct HalfStream {
    channel: FrameChannel,
    state: Mutex<HalfState>,
}

impl HalfStream {
    fn new() -> HalfStream {
        HalfStream {
            channel: FrameChannel::new(),
            state: Mutex::new(HalfState::default()),
        }
    }

    /// Enqueue a frame which passed the legality check: bump the frame
    /// counter, merge the carried headers and close this half if the frame
    /// carries fin. On an already terminated channel the stored condition
    /// comes back and nothing is admitted.
    async fn admit(&self, frame: Frame) -> Result<()> {
        let fin = frame.fin();
        let headers = frame.headers().cloned();

        self.channel.write(frame).await?;

        {
            let mut state = self.state.lock().unwrap();

            state.n_frames += 1;

            if let Some(hs) = headers {
                header::merge(&mut state.headers, &hs);
            }
        }

        if fin {
            self.channel.close();
        }

        Ok(())
    }

    async fn read(&self) -> Result<Frame> {
        self.channel.read().await
    }

    fn frame_count(&self) -> u32 {
        self.state.lock().unwrap().n_frames
    }

    fn headers(&self) -> Headers {
        self.state.lock().unwrap().headers.clone()
    }

    fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    fn close(&self) {
        self.channel.close();
    }
}

#[derive(Debug)]
struct StreamState {
    id: StreamId,
    local: bool,
    input: HalfStream,
    output: HalfStream,
}

impl StreamState {
    /// Receive side admission. An illegal frame is not an error for the
    /// caller: it is dropped and the peer is answered with a RST_STREAM.
    async fn receive_frame(&self, frame: Frame) -> Result<()> {
        if self.input.is_closed() {
            // "An endpoint MUST NOT send a RST_STREAM in response to a
            // RST_STREAM, as doing so would lead to RST_STREAM loops."
            // (draft-mbelshe-httpbis-spdy-00, section 2.4.2)
            if !matches!(frame, Frame::RstStream(_)) {
                debug!("Stream {} input is closed, dropping {:?}", self.id, frame);

                self.send_rst(STREAM_ALREADY_CLOSED).await;
            }

            return Ok(());
        }

        let first = self.input.frame_count() == 0;
        let legal = match &frame {
            Frame::SynStream(_) => first && !self.local,
            Frame::SynReply(_) => first && self.local,
            Frame::Headers(_) | Frame::Data(_) => !first,
            Frame::RstStream(_) => true,
            _ => false,
        };

        if !legal {
            debug!("Stream {} received {:?} at the wrong time", self.id, frame);

            self.send_rst(PROTOCOL_ERROR).await;

            return Ok(());
        }

        let is_rst = matches!(frame, Frame::RstStream(_));

        self.input.admit(frame).await?;

        // A reset ends the whole stream, not only the receiving direction.
        if is_rst {
            self.close();
        }

        Ok(())
    }

    /// Send side admission. Violations stay local: the caller gets the error
    /// and nothing goes out to the peer.
    async fn send_frame(&self, frame: Frame) -> Result<()> {
        if self.output.is_closed() {
            return Err(StreamError::OutputClosed);
        }

        let first = self.output.frame_count() == 0;

        match &frame {
            Frame::SynStream(_) => {
                if !first || !self.local {
                    return Err(StreamError::InvalidFrame(
                        "SYN_STREAM can only open a locally initiated stream",
                    ));
                }
            }
            Frame::SynReply(_) => {
                if !first || self.local {
                    return Err(StreamError::InvalidFrame(
                        "SYN_REPLY can only answer a remotely initiated stream",
                    ));
                }
            }
            Frame::Headers(_) | Frame::Data(_) => {
                if first {
                    return Err(StreamError::InvalidFrame(
                        "first frame must be SYN_STREAM or SYN_REPLY",
                    ));
                }
            }
            // Always legal, otherwise a stream in trouble before its opening
            // frame could never be reset.
            Frame::RstStream(_) => (),
            _ => return Err(StreamError::InvalidFrame("not a stream frame")),
        }

        let is_rst = matches!(frame, Frame::RstStream(_));

        self.output.admit(frame).await?;

        if is_rst {
            self.close();
        }

        Ok(())
    }

    /// Answer the peer with a RST_STREAM. The sending half may be closed
    /// already, in that case there is nothing to be done and the failure is
    /// swallowed.
    async fn send_rst(&self, status: StatusCode) {
        if let Err(e) = self.send_frame(frame::rst_stream(self.id, status)).await {
            debug!("Stream {} cannot send RST_STREAM {:?}", self.id, e);
        }
    }

    fn close(&self) {
        self.input.close();
        self.output.close();
    }
}

/// A bidirectional SPDY stream, a receiving and a sending half under a
/// common id.
///
/// The stream knows nothing about the wire. The session demultiplexer feeds
/// frames arriving from the peer into the [`StreamInput`] view, the
/// multiplexer drains frames to be encoded from the [`StreamOutput`] view
/// and the application talks to the stream itself. All of them are cheap
/// clones over the same shared state.
#[derive(Clone, Debug)]
pub struct Stream {
    state: Arc<StreamState>,
}

impl Stream {
    /// Create a stream. `local` tells which endpoint opened it: true if this
    /// endpoint did, false if the peer. The flag never changes and decides
    /// which opening frame each direction accepts.
    pub fn new(id: StreamId, local: bool) -> Stream {
        Stream {
            state: Arc::new(StreamState {
                id,
                local,
                input: HalfStream::new(),
                output: HalfStream::new(),
            }),
        }
    }

    pub fn id(&self) -> StreamId {
        self.state.id
    }

    pub fn is_local(&self) -> bool {
        self.state.local
    }

    /// The view the session demultiplexer writes received frames into.
    pub fn input(&self) -> StreamInput {
        StreamInput {
            state: self.state.clone(),
        }
    }

    /// The view the session multiplexer drains outgoing frames from.
    pub fn output(&self) -> StreamOutput {
        StreamOutput {
            state: self.state.clone(),
        }
    }

    /// Open the stream with a SYN_STREAM frame.
    pub async fn open(&self, headers: Headers, fin: bool) -> Result<()> {
        self.state
            .send_frame(frame::syn_stream(self.state.id, headers, fin))
            .await
    }

    /// Answer a remotely opened stream with a SYN_REPLY frame.
    pub async fn reply(&self, headers: Headers, fin: bool) -> Result<()> {
        self.state
            .send_frame(frame::syn_reply(self.state.id, headers, fin))
            .await
    }

    pub async fn write_data(&self, data: Bytes, fin: bool) -> Result<()> {
        self.state
            .send_frame(frame::data(self.state.id, data, fin))
            .await
    }

    /// Tear the stream down on both endpoints with a RST_STREAM.
    pub async fn reset(&self, status: StatusCode) -> Result<()> {
        self.state
            .send_frame(frame::rst_stream(self.state.id, status))
            .await
    }

    pub async fn protocol_error(&self) -> Result<()> {
        self.reset(PROTOCOL_ERROR).await
    }

    /// Close both halves locally. No frame is sent, the peer learns nothing.
    pub fn close(&self) {
        self.state.close();
    }

    /// The next admitted incoming frame.
    pub async fn read_frame(&self) -> Result<Frame> {
        self.state.input.read().await
    }

    /// Validate and enqueue an outgoing frame.
    pub async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.state.send_frame(frame).await
    }
}

/// Receiving half of a stream as the session demultiplexer sees it.
#[derive(Clone, Debug)]
pub struct StreamInput {
    state: Arc<StreamState>,
}

impl StreamInput {
    /// Run a frame received from the peer through the receive state machine.
    /// Illegal and late frames are dropped, never a local error.
    pub async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.state.receive_frame(frame).await
    }

    /// The next admitted incoming frame.
    pub async fn read_frame(&self) -> Result<Frame> {
        self.state.input.read().await
    }

    /// Union of the headers received on the stream so far.
    pub fn headers(&self) -> Headers {
        self.state.input.headers()
    }

    pub fn is_closed(&self) -> bool {
        self.state.input.is_closed()
    }

    pub fn close(&self) {
        self.state.input.close();
    }
}

/// Sending half of a stream as the session multiplexer sees it.
#[derive(Clone, Debug)]
pub struct StreamOutput {
    state: Arc<StreamState>,
}

impl StreamOutput {
    /// Validate and enqueue an outgoing frame.
    pub async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.state.send_frame(frame).await
    }

    /// The next frame waiting to be sent to the peer.
    pub async fn read_frame(&self) -> Result<Frame> {
        self.state.output.read().await
    }

    /// Union of the headers sent on the stream so far.
    pub fn headers(&self) -> Headers {
        self.state.output.headers()
    }

    pub fn is_closed(&self) -> bool {
        self.state.output.is_closed()
    }

    pub fn close(&self) {
        self.state.output.close();
    }
}

#[async_trait]
impl FrameReader for Stream {
    async fn read_frame(&self) -> Result<Frame> {
        self.state.input.read().await
    }
}

#[async_trait]
impl FrameWriter for Stream {
    async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.state.send_frame(frame).await
    }
}

#[async_trait]
impl FrameReader for StreamInput {
    async fn read_frame(&self) -> Result<Frame> {
        self.state.input.read().await
    }
}

#[async_trait]
impl FrameWriter for StreamInput {
    async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.state.receive_frame(frame).await
    }
}

#[async_trait]
impl FrameReader for StreamOutput {
    async fn read_frame(&self) -> Result<Frame> {
        self.state.output.read().await
    }
}

#[async_trait]
impl FrameWriter for StreamOutput {
    async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.state.send_frame(frame).await
    }
}
