use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_tungstenite::connect_async;
use tracing::{debug, info};
use tungstenite::protocol::Message as WsMessage;

use crate::utils::error::Result;

/// Relay stdin to `url` and the connection's frames to stdout.
pub async fn run(url: &str) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    relay(url, stdin, tokio::io::stdout()).await
}

/// Connect to `url`, send each line of `input` as a text frame and write
/// each received frame to `output`.
///
/// When `input` hits EOF a close frame is sent and the remaining frames are
/// drained until the server closes its side. Returns early if the server
/// closes first.
pub async fn relay<R, W>(url: &str, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (ws_stream, _response) = connect_async(url).await?;
    info!(%url, "connected");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => ws_sender.send(WsMessage::text(line)).await?,
                None => {
                    debug!("input closed, closing connection");
                    input_open = false;
                    ws_sender.close().await?;
                }
            },
            frame = ws_receiver.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => write_line(&mut output, text.as_str()).await?,
                Some(Ok(WsMessage::Binary(bytes))) => {
                    write_line(&mut output, &format!("<{} bytes>", bytes.len())).await?
                }
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(tungstenite::Error::ConnectionClosed)) => break,
                Some(Err(e)) => return Err(e.into()),
            },
        }
    }

    info!(%url, "disconnected");
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
