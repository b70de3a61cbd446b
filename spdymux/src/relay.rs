//! Moving frames between endpoints without looking into them.
//!
//! The relay treats its endpoints as opaque frame sources and sinks. Whether
//! the frames passing through are legal for their stream is decided by the
//! endpoints themselves, a [`Stream`] validates on admission, a raw
//! [`FrameChannel`] accepts everything.
//!
//! [`Stream`]: crate::stream::Stream
//! [`FrameChannel`]: crate::channel::FrameChannel
use crate::error::{Result, StreamError};
use async_trait::async_trait;
use log::debug;
use spdymux_frame::frame::Frame;
use std::sync::Arc;

/// A source of frames.
#[async_trait]
pub trait FrameReader: Send + Sync {
    /// The next frame, or [`StreamError::EndOfStream`] once the source is
    /// gracefully exhausted.
    async fn read_frame(&self) -> Result<Frame>;
}

/// A sink of frames.
#[async_trait]
pub trait FrameWriter: Send + Sync {
    async fn write_frame(&self, frame: Frame) -> Result<()>;
}

/// An endpoint which is usable on both sides of a relay.
pub trait FrameReadWriter: FrameReader + FrameWriter {}

impl<T: FrameReader + FrameWriter> FrameReadWriter for T {}

#[async_trait]
impl<T: FrameReader + ?Sized> FrameReader for Arc<T> {
    async fn read_frame(&self) -> Result<Frame> {
        (**self).read_frame().await
    }
}

#[async_trait]
impl<T: FrameWriter + ?Sized> FrameWriter for Arc<T> {
    async fn write_frame(&self, frame: Frame) -> Result<()> {
        (**self).write_frame(frame).await
    }
}

/// Forward every frame of `reader` to `writer`.
///
/// A graceful end of the source is a success. Without a writer the frames
/// are read and discarded. A write failure ends the copy immediately with
/// that error, so a gracefully closed destination surfaces as
/// `Err(EndOfStream)` here.
pub async fn copy(writer: Option<&dyn FrameWriter>, reader: &dyn FrameReader) -> Result<()> {
    loop {
        let frame = match reader.read_frame().await {
            Ok(frame) => frame,
            Err(StreamError::EndOfStream) => return Ok(()),
            Err(e) => return Err(e),
        };

        if let Some(writer) = writer {
            writer.write_frame(frame).await?;
        }
    }
}

async fn copy_direction(writer: &dyn FrameWriter, reader: &dyn FrameReader, label: &str) -> Result<()> {
    debug!("Start copying {}", label);

    let result = copy(Some(writer), reader).await;

    debug!("Finished copying {} {:?}", label, result);

    result
}

/// Relay frames between `a` and `b` in both directions concurrently.
///
/// With `wait` the call returns once both directions are finished, the a to b
/// direction's error wins over the other result. Without `wait` it returns
/// the result of whichever direction finishes first, taking a graceful end of
/// stream as success; the other direction keeps copying as a detached task
/// until a terminal condition on one of its endpoints stops it.
pub async fn splice<A, B>(a: A, b: B, wait: bool) -> Result<()>
where
    A: FrameReadWriter + Clone + 'static,
    B: FrameReadWriter + Clone + 'static,
{
    let ab = {
        let (a, b) = (a.clone(), b.clone());

        tokio::spawn(async move { copy_direction(&b, &a, "a->b").await })
    };
    let ba = tokio::spawn(async move { copy_direction(&a, &b, "b->a").await });

    if wait {
        let ab_result = ab.await?;
        let ba_result = ba.await?;

        if let Err(e) = ab_result {
            return Err(e);
        }

        return ba_result;
    }

    let first = tokio::select! {
        result = ab => result?,
        result = ba => result?,
    };

    match first {
        Err(StreamError::EndOfStream) => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests;
