//! Per-stream session core of the SPDY protocol
//! (draft-mbelshe-httpbis-spdy-00).
//!
//! The crate keeps the per direction state of one logical stream: which
//! frames may still arrive, which may still be sent, which headers have
//! accumulated and when a direction is finished. Frames admitted by the
//! state machines wait in bounded channels until somebody reads them. On
//! top of that sit small relay primitives which pump frames between
//! endpoints without interpreting them.
//!
//! Wire encoding, the session stream table and the transport are jobs of
//! the embedding session layer, not of this crate.
//!
//! # Usage
//!
//! ```no_run
//! use spdymux::{Result, Stream};
//!
//! async fn request() -> Result<()> {
//!     let stream = Stream::new(1, true);
//!
//!     stream.open(Default::default(), false).await?;
//!     stream.write_data("GET /".into(), true).await?;
//!
//!     while let Ok(frame) = stream.read_frame().await {
//!         println!("Incoming {:?}", frame);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The stream above queues its outgoing frames in [`StreamOutput`], a real
//! session would drain that view into the wire codec and feed decoded
//! frames into [`StreamInput`].
mod channel;
mod dev;
mod error;
mod handler;
mod relay;
mod stream;

pub use channel::{FrameChannel, DEFAULT_CAPACITY};
pub use dev::setup_logger;
pub use error::{Result, StreamError};
pub use handler::{Handler, SinkHandler};
pub use relay::{copy, splice, FrameReadWriter, FrameReader, FrameWriter};
pub use stream::{Stream, StreamInput, StreamOutput};
