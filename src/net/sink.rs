pub mod line;

use crate::net::output::OutFrame;
use async_trait::async_trait;

#[async_trait]
pub trait ClientSink: Send {
    async fn send_frame(&mut self, frame: OutFrame) -> anyhow::Result<()>;
}
