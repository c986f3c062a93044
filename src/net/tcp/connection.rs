use crate::Registry;
use crate::banner::WELCOME;
use crate::commands::{CmdCtx, Flow, dispatch_line};
use crate::error::AppResult;
use crate::net::output::init_session_output;
use crate::net::sink::line::LineSink;
use crate::state::registry::SessionHandle;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;

/// Longest accepted line in bytes, terminator included.
pub const MAX_LINE_BYTES: u64 = 8 * 1024;

pub async fn handle_connection(stream: TcpStream, registry: Arc<Registry>, sess: SessionHandle) -> AppResult<()> {
    let (read_half, write_half) = stream.into_split();
    let (output, writer_jh) = init_session_output(LineSink::new(write_half));

    let ctx = Arc::new(CmdCtx {
        output,
        registry,
        sess,
    });

    let result = read_loop(read_half, ctx.clone()).await;
    cleanup(&ctx).await;

    // last output handle goes away here, the writer drains and exits
    drop(ctx);
    let _ = writer_jh.await;

    result
}

async fn read_loop(read_half: OwnedReadHalf, ctx: Arc<CmdCtx>) -> AppResult<()> {
    ctx.output.line(WELCOME).await?;

    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    let session_id = ctx.session_id();

    loop {
        buf.clear();
        let n = (&mut reader).take(MAX_LINE_BYTES).read_until(b'\n', &mut buf).await?;
        if n == 0 {
            break; // disconnect
        }
        if n as u64 == MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
            tracing::warn!(session = %session_id, limit = MAX_LINE_BYTES, "line too long, closing session");
            break;
        }

        // invalid UTF-8 is replaced, the line is still dispatched
        let line = String::from_utf8_lossy(&buf);
        let raw = strip_line_ending(&line);

        if dispatch_line(raw, ctx.clone()).await? == Flow::Close {
            break;
        }
    }

    Ok(())
}

/// Runs exactly once per session, whichever way it ended.
async fn cleanup(ctx: &CmdCtx) {
    ctx.registry.sessions.remove(ctx.session_id());
    ctx.output.close().await;
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_line_ending() {
        assert_eq!(strip_line_ending("who\n"), "who");
        assert_eq!(strip_line_ending("who\r\n"), "who");
        assert_eq!(strip_line_ending("who"), "who");
        assert_eq!(strip_line_ending("who \n"), "who ");
        assert_eq!(strip_line_ending("\n"), "");
        assert_eq!(strip_line_ending("a\n\n"), "a\n");
    }
}
