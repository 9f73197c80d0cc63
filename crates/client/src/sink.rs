use std::io::Write;

use async_trait::async_trait;
use jumpjump_core::NetMessage;
use jumpjump_runtime::{OutboundSink, SinkError};

/// Writes every outbound message to stdout as one JSON line.
#[derive(Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutboundSink for StdoutSink {
    async fn send(&self, message: NetMessage) -> Result<(), SinkError> {
        let line = serde_json::to_string(&message).map_err(SinkError::Encode)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").map_err(|e| SinkError::Transport(e.to_string()))
    }
}
