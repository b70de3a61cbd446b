use anyhow::Result;
use log::info;
use spdymux::{copy, Stream};
use spdymux_frame::header::{self, Headers};

#[tokio::main]
async fn main() -> Result<()> {
    spdymux::setup_logger();

    let client = Stream::new(1, true);
    let server = Stream::new(1, false);

    // Stand-in for the session layer, one pump per direction of the wire.
    {
        let (output, input) = (client.output(), server.input());

        tokio::spawn(async move { copy(Some(&input), &output).await });
    }
    {
        let (output, input) = (server.output(), client.input());

        tokio::spawn(async move { copy(Some(&input), &output).await });
    }

    let mut headers = Headers::new();
    header::add(&mut headers, "method", "GET");
    header::add(&mut headers, "path", "/hello");

    client.open(headers, false).await?;
    client.write_data("say hi".into(), true).await?;

    while let Ok(frame) = server.read_frame().await {
        info!("Server got {:?}", frame);
    }

    server.reply(Default::default(), false).await?;
    server.write_data("hi".into(), true).await?;

    while let Ok(frame) = client.read_frame().await {
        info!("Client got {:?}", frame);
    }

    Ok(())
}
