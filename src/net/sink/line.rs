use crate::net::output::OutFrame;
use crate::net::sink::ClientSink;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Plain newline-terminated text, flushed after every frame.
pub struct LineSink<W> {
    writer: W,
}

impl<W> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> ClientSink for LineSink<W>
where
    W: AsyncWriteExt + Unpin + Send,
{
    async fn send_frame(&mut self, frame: OutFrame) -> anyhow::Result<()> {
        match frame {
            OutFrame::Line(s) => {
                self.writer.write_all(s.as_bytes()).await?;
                self.writer.write_all(b"\n").await?;
                self.writer.flush().await?;
            }
            OutFrame::Close => {
                self.writer.shutdown().await?;
            }
        }
        Ok(())
    }
}
