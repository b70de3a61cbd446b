//! End to end scenarios wiring streams together the way a session layer
//! would, with frame pumps standing in for the wire.
use anyhow::Result;
use spdymux::{copy, splice, FrameReader, FrameWriter, Stream, StreamError};
use spdymux_frame::frame::{self, REFUSED_STREAM};
use spdymux_frame::header::{self, Headers};
use tokio::task::JoinHandle;

/// Forward frames from one endpoint to another in the background, the job
/// the session multiplexer and demultiplexer do around the wire.
fn pump<R, W>(reader: R, writer: W) -> JoinHandle<spdymux::Result<()>>
where
    R: FrameReader + 'static,
    W: FrameWriter + 'static,
{
    tokio::spawn(async move { copy(Some(&writer), &reader).await })
}

fn single_header(name: &str, value: &str) -> Headers {
    let mut headers = Headers::new();

    header::add(&mut headers, name, value);

    headers
}

#[tokio::test]
async fn request_response_between_two_endpoints() -> Result<()> {
    let client = Stream::new(1, true);
    let server = Stream::new(1, false);

    let upstream = pump(client.output(), server.input());
    let downstream = pump(server.output(), client.input());

    client.open(single_header("path", "/echo"), false).await?;
    client.write_data("ping".into(), true).await?;

    assert_eq!(
        server.read_frame().await?,
        frame::syn_stream(1, single_header("path", "/echo"), false)
    );
    assert_eq!(
        server.read_frame().await?,
        frame::data(1, "ping".into(), true)
    );

    upstream.await??;

    assert!(server.input().is_closed());
    assert_eq!(server.input().headers(), single_header("path", "/echo"));

    server.reply(single_header("status", "200"), false).await?;
    server.write_data("pong".into(), true).await?;

    assert_eq!(
        client.read_frame().await?,
        frame::syn_reply(1, single_header("status", "200"), false)
    );
    assert_eq!(
        client.read_frame().await?,
        frame::data(1, "pong".into(), true)
    );
    assert_eq!(client.read_frame().await, Err(StreamError::EndOfStream));

    downstream.await??;

    Ok(())
}

#[tokio::test]
async fn server_refuses_the_stream_with_a_reset() -> Result<()> {
    let client = Stream::new(3, true);
    let server = Stream::new(3, false);

    let upstream = pump(client.output(), server.input());
    let downstream = pump(server.output(), client.input());

    client.open(single_header("path", "/private"), false).await?;

    assert_eq!(
        server.read_frame().await?,
        frame::syn_stream(3, single_header("path", "/private"), false)
    );

    server.reset(REFUSED_STREAM).await?;

    assert_eq!(
        client.read_frame().await?,
        frame::rst_stream(3, REFUSED_STREAM)
    );
    assert_eq!(client.read_frame().await, Err(StreamError::EndOfStream));

    upstream.await??;
    downstream.await??;

    // The reset closed the client stream in both directions.
    assert_eq!(
        client.write_data("more".into(), false).await,
        Err(StreamError::OutputClosed)
    );

    Ok(())
}

/// Client and origin live on different sessions, the proxy splices its two
/// sides of the stream together without looking at the frames.
#[tokio::test]
async fn splice_proxies_a_stream_end_to_end() -> Result<()> {
    let client = Stream::new(1, true);
    let proxy_client_side = Stream::new(1, false);
    let proxy_origin_side = Stream::new(1, true);
    let origin = Stream::new(1, false);

    let pumps = vec![
        pump(client.output(), proxy_client_side.input()),
        pump(proxy_client_side.output(), client.input()),
        pump(proxy_origin_side.output(), origin.input()),
        pump(origin.output(), proxy_origin_side.input()),
    ];

    let relay = tokio::spawn(splice(
        proxy_client_side.clone(),
        proxy_origin_side.clone(),
        true,
    ));

    client.open(single_header("path", "/echo"), false).await?;
    client.write_data("ping".into(), true).await?;

    assert_eq!(
        origin.read_frame().await?,
        frame::syn_stream(1, single_header("path", "/echo"), false)
    );
    assert_eq!(
        origin.read_frame().await?,
        frame::data(1, "ping".into(), true)
    );

    origin.reply(single_header("status", "200"), false).await?;
    origin.write_data("pong".into(), true).await?;

    assert_eq!(
        client.read_frame().await?,
        frame::syn_reply(1, single_header("status", "200"), false)
    );
    assert_eq!(
        client.read_frame().await?,
        frame::data(1, "pong".into(), true)
    );
    assert_eq!(client.read_frame().await, Err(StreamError::EndOfStream));

    relay.await??;

    for worker in pumps {
        worker.await??;
    }

    assert!(origin.input().is_closed());
    assert_eq!(origin.input().headers(), single_header("path", "/echo"));

    Ok(())
}
