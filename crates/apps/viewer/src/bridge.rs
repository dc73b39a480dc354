//! Newline-delimited JSON between the session and a map host.
//!
//! The host writes one [`SessionEvent`] per line; the bridge answers each with
//! one [`SessionOutput`] line. On start it sends the initial style and a panel
//! snapshot.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::session::{MapSession, SessionEvent, SessionOutput};

pub async fn serve<R, W>(session: &mut MapSession, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let style = SessionOutput::Commands(session.initial_style());
    write_line(&mut writer, &style).await?;
    write_line(&mut writer, &SessionOutput::Panel(session.panel())).await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let output = match serde_json::from_str::<SessionEvent>(line) {
            Ok(event) => {
                debug!(?event, "event");
                session.handle(event)
            }
            Err(err) => {
                warn!("ignoring malformed event: {err}");
                SessionOutput::Error {
                    message: err.to_string(),
                }
            }
        };
        write_line(&mut writer, &output).await?;
    }
    writer.flush().await
}

async fn write_line<W, T>(writer: &mut W, value: &T) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = serde_json::to_vec(value)?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    writer.flush().await
}
