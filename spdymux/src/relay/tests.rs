use super::*;
use crate::channel::FrameChannel;
use spdymux_frame::frame;

/// Endpoint of a relay. It reads what the test pushed into `source` and
/// writes into `sink`, the shape a stream has from the relay's point of
/// view.
#[derive(Clone)]
struct TestEndpoint {
    source: Arc<FrameChannel>,
    sink: Arc<FrameChannel>,
}

fn test_endpoint() -> TestEndpoint {
    TestEndpoint {
        source: Arc::new(FrameChannel::new()),
        sink: Arc::new(FrameChannel::new()),
    }
}

#[async_trait]
impl FrameReader for TestEndpoint {
    async fn read_frame(&self) -> Result<Frame> {
        self.source.read().await
    }
}

#[async_trait]
impl FrameWriter for TestEndpoint {
    async fn write_frame(&self, frame: Frame) -> Result<()> {
        self.sink.write(frame).await
    }
}

#[tokio::test]
async fn copy_forwards_frames_in_order() {
    let src = FrameChannel::new();
    let dst = FrameChannel::new();

    src.write(frame::ping(1)).await.unwrap();
    src.write(frame::ping(3)).await.unwrap();
    src.close();

    copy(Some(&dst), &src).await.unwrap();

    assert_eq!(dst.read().await.unwrap(), frame::ping(1));
    assert_eq!(dst.read().await.unwrap(), frame::ping(3));
}

/// Without a destination the copy is a sink draining the source.
#[tokio::test]
async fn copy_without_writer_discards_the_frames() {
    let src = FrameChannel::new();

    src.write(frame::ping(1)).await.unwrap();
    src.write(frame::goaway(0)).await.unwrap();
    src.close();

    copy(None, &src).await.unwrap();

    assert_eq!(src.read().await, Err(StreamError::EndOfStream));
}

#[tokio::test]
async fn copy_returns_the_error_of_the_source() {
    let src = Arc::new(FrameChannel::new());
    let dst = Arc::new(FrameChannel::new());

    src.write(frame::ping(1)).await.unwrap();
    src.set_error(StreamError::Transport("connection lost".to_string()));

    let result = copy(Some(&dst), &src).await;

    assert_eq!(
        result,
        Err(StreamError::Transport("connection lost".to_string()))
    );

    // Frames buffered before the failure were still forwarded.
    assert_eq!(dst.read().await.unwrap(), frame::ping(1));
}

/// A closed destination stops the copy with an end of stream error, the
/// remaining frames stay in the source.
#[tokio::test]
async fn copy_stops_when_the_destination_is_closed() {
    let src = FrameChannel::new();
    let dst = FrameChannel::new();

    src.write(frame::ping(1)).await.unwrap();
    src.write(frame::ping(3)).await.unwrap();
    dst.close();

    assert_eq!(copy(Some(&dst), &src).await, Err(StreamError::EndOfStream));

    assert_eq!(src.read().await.unwrap(), frame::ping(3));
}

#[tokio::test]
async fn splice_relays_both_directions() {
    let a = test_endpoint();
    let b = test_endpoint();

    a.source.write(frame::ping(1)).await.unwrap();
    a.source.write(frame::ping(3)).await.unwrap();
    a.source.close();

    b.source.write(frame::ping(2)).await.unwrap();
    b.source.close();

    splice(a.clone(), b.clone(), true).await.unwrap();

    assert_eq!(b.sink.read().await.unwrap(), frame::ping(1));
    assert_eq!(b.sink.read().await.unwrap(), frame::ping(3));
    assert_eq!(a.sink.read().await.unwrap(), frame::ping(2));
}

/// When both directions fail the a to b direction reports its error.
#[tokio::test]
async fn splice_prefers_the_a_to_b_error() {
    let a = test_endpoint();
    let b = test_endpoint();

    a.source
        .set_error(StreamError::Transport("a is gone".to_string()));
    b.source
        .set_error(StreamError::Transport("b is gone".to_string()));

    assert_eq!(
        splice(a, b, true).await,
        Err(StreamError::Transport("a is gone".to_string()))
    );
}

#[tokio::test]
async fn splice_reports_the_b_to_a_error_as_well() {
    let a = test_endpoint();
    let b = test_endpoint();

    a.source.close();
    b.source
        .set_error(StreamError::Transport("b is gone".to_string()));

    assert_eq!(
        splice(a, b, true).await,
        Err(StreamError::Transport("b is gone".to_string()))
    );
}

/// Without `wait` the first finished direction decides the result and the
/// other one keeps running detached.
#[tokio::test]
async fn splice_without_wait_returns_the_first_result() {
    let a = test_endpoint();
    let b = test_endpoint();

    a.source
        .set_error(StreamError::Transport("a is gone".to_string()));

    assert_eq!(
        splice(a, b.clone(), false).await,
        Err(StreamError::Transport("a is gone".to_string()))
    );

    // Let the leftover direction finish too.
    b.source.close();
}

/// A direction ending because its destination was gracefully closed counts
/// as success when not waiting for both.
#[tokio::test]
async fn splice_without_wait_takes_end_of_stream_as_success() {
    let a = test_endpoint();
    let b = test_endpoint();

    a.source.write(frame::ping(1)).await.unwrap();
    b.sink.close();

    assert_eq!(splice(a, b.clone(), false).await, Ok(()));

    b.source.close();
}
