//! Serving accepted streams.
use crate::relay::copy;
use crate::stream::Stream;
use async_trait::async_trait;
use log::debug;
use std::future::Future;

/// Called by the session layer for every stream the peer opens.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve(&self, stream: Stream);
}

/// Any async closure taking the stream is a handler.
#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Stream) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn serve(&self, stream: Stream) {
        self(stream).await
    }
}

/// Handler draining a stream without looking at it, for streams nobody
/// wants to touch.
pub struct SinkHandler;

#[async_trait]
impl Handler for SinkHandler {
    async fn serve(&self, stream: Stream) {
        let input = stream.input();

        if let Err(e) = copy(None, &input).await {
            debug!("Stream {} sink failed {:?}", stream.id(), e);
        }
    }
}
