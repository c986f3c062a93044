use crate::commands::CommandError;
use crate::net::sink::ClientSink;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutFrame {
    /// One response, written followed by a newline and flushed
    Line(String),
    /// Shut the connection down after everything queued before it was written
    Close,
}

/// Cheap, cloneable handle used to queue output for one session.
#[derive(Debug, Clone)]
pub struct OutputHandle {
    tx: mpsc::Sender<OutFrame>,
}

impl OutputHandle {
    pub fn new(tx: mpsc::Sender<OutFrame>) -> Self {
        Self { tx }
    }

    pub async fn line(&self, s: impl Into<String>) -> Result<(), CommandError> {
        self.tx
            .send(OutFrame::Line(s.into()))
            .await
            .map_err(|_| CommandError::OutputClosed)
    }

    /// Ask the writer to close the connection. A writer that is already gone is fine.
    pub async fn close(&self) {
        let _ = self.tx.send(OutFrame::Close).await;
    }
}

pub struct SessionOut {
    rx: mpsc::Receiver<OutFrame>,
}

impl SessionOut {
    pub fn new(rx: mpsc::Receiver<OutFrame>) -> Self {
        Self { rx }
    }

    pub async fn run<C>(mut self, mut client: C) -> anyhow::Result<()>
    where
        C: ClientSink,
    {
        while let Some(frame) = self.rx.recv().await {
            let closing = frame == OutFrame::Close;
            client.send_frame(frame).await?;
            if closing {
                break;
            }
        }

        Ok(())
    }
}

/// Spawns the writer task for one connection and returns the handle used to feed it.
pub fn init_session_output<C>(sink: C) -> (OutputHandle, JoinHandle<()>)
where
    C: ClientSink + 'static,
{
    let (tx, rx) = mpsc::channel::<OutFrame>(64);
    let session_out = SessionOut::new(rx);

    let jh = tokio::spawn(async move {
        if let Err(e) = session_out.run(sink).await {
            tracing::debug!(error = %e, "session output stopped");
        }
    });

    (OutputHandle::new(tx), jh)
}
