use anyhow::Result;
use log::info;
use spdymux::{copy, splice, Stream, StreamInput, StreamOutput};
use spdymux_frame::header::{self, Headers};

fn wire(from: StreamOutput, to: StreamInput) {
    tokio::spawn(async move { copy(Some(&to), &from).await });
}

#[tokio::main]
async fn main() -> Result<()> {
    spdymux::setup_logger();

    let client = Stream::new(1, true);
    let proxy_front = Stream::new(1, false);
    let proxy_back = Stream::new(1, true);
    let origin = Stream::new(1, false);

    wire(client.output(), proxy_front.input());
    wire(proxy_front.output(), client.input());
    wire(proxy_back.output(), origin.input());
    wire(origin.output(), proxy_back.input());

    // The proxy ties its two sides together without looking at the frames.
    tokio::spawn(splice(proxy_front.clone(), proxy_back.clone(), true));

    let mut headers = Headers::new();
    header::add(&mut headers, "path", "/echo");

    client.open(headers, false).await?;
    client.write_data("ping".into(), true).await?;

    while let Ok(frame) = origin.read_frame().await {
        info!("Origin got {:?}", frame);
    }

    origin.reply(Default::default(), false).await?;
    origin.write_data("pong".into(), true).await?;

    while let Ok(frame) = client.read_frame().await {
        info!("Client got {:?}", frame);
    }

    Ok(())
}
