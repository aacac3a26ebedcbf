//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Console session
//!
//! One [`Session`] drives one connection: it writes the prompt, feeds client
//! bytes through the [`LineEditor`], resolves history recalls against the
//! shared ring, and hands each completed line to the dispatcher.

pub mod editor;
pub mod manager;

use crate::context::ConsoleContext;
use crate::dispatcher::Dispatch;
use crate::error::{ConsoleError, ConsoleResult};
use crate::tokenizer::tokenize;
use editor::{LineEditor, Step};
use std::io::ErrorKind;
use tokio::io::{
    AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use uuid::Uuid;

/// Prompt written before every line
pub const PROMPT: &[u8] = b"->";

/// Notice written before closing a session whose line hit the scratch cap
const LINE_TOO_LONG: &[u8] = b"\r\nLine too long\r\n";

/// A single operator connection
pub struct Session<S> {
    id: Uuid,
    peer_addr: String,
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    editor: LineEditor,
    context: ConsoleContext,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    /// Wrap an already handshaken stream
    pub fn new(id: Uuid, peer_addr: String, stream: S, context: ConsoleContext) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            id,
            peer_addr,
            reader: BufReader::new(reader),
            writer,
            editor: LineEditor::new(),
            context,
        }
    }

    /// Serve the connection until the client leaves, asks to close, or an
    /// I/O error occurs.
    #[tracing::instrument(name = "session", skip(self), fields(session_id = %self.id, peer = %self.peer_addr))]
    pub async fn run(mut self) -> ConsoleResult<()> {
        tracing::info!("Console session started");

        let result = match self.serve().await {
            Err(ConsoleError::Io(e)) if is_disconnect(&e) => {
                tracing::debug!("Client went away: {}", e);
                Ok(())
            }
            other => other,
        };
        match &result {
            Ok(()) => tracing::info!("Console session closed"),
            Err(ConsoleError::LineTooLong { limit }) => {
                tracing::warn!("Closing console session: line exceeded {} bytes", limit)
            }
            Err(e) => tracing::error!("Console session failed: {}", e),
        }

        if let Err(e) = self.writer.shutdown().await {
            tracing::debug!("Error shutting down console stream: {}", e);
        }
        result
    }

    async fn serve(&mut self) -> ConsoleResult<()> {
        loop {
            self.writer.write_all(PROMPT).await?;
            self.writer.flush().await?;

            let line = match self.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("Client disconnected");
                    return Ok(());
                }
                Err(e @ ConsoleError::LineTooLong { .. }) => {
                    self.writer.write_all(LINE_TOO_LONG).await?;
                    self.writer.flush().await?;
                    return Err(e);
                }
                Err(e) => return Err(e),
            };

            let tokens = tokenize(&line);
            match self.context.dispatcher().dispatch(&tokens).await {
                Dispatch::Reply { text, failure } => {
                    if let Some(failure) = failure {
                        tracing::warn!(
                            "Console command {:?} reported failure: {:#}",
                            tokens.first(),
                            failure
                        );
                    }
                    self.writer.write_all(text.as_bytes()).await?;
                }
                Dispatch::Silent => {}
                Dispatch::Close => {
                    tracing::debug!("Client requested close");
                    return Ok(());
                }
            }
        }
    }

    /// Read bytes until a line completes. `None` means end of stream.
    async fn read_line(&mut self) -> ConsoleResult<Option<String>> {
        loop {
            let byte = match self.reader.read_u8().await {
                Ok(byte) => byte,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            match self.editor.feed(byte)? {
                Step::Pending => {}
                Step::Recall(direction) => {
                    let text = self.context.history().lock().await.recall(direction);
                    self.editor.apply_recall(&text);
                }
                Step::Line(completed) => {
                    {
                        let mut history = self.context.history().lock().await;
                        if completed.recalled {
                            history.reset_cursor();
                        } else {
                            history.push(&completed.text);
                        }
                    }
                    self.flush_echo().await?;
                    return Ok(Some(completed.text));
                }
            }
            self.flush_echo().await?;
        }
    }

    async fn flush_echo(&mut self) -> ConsoleResult<()> {
        let output = self.editor.take_output();
        if !output.is_empty() {
            self.writer.write_all(&output).await?;
            self.writer.flush().await?;
        }
        Ok(())
    }
}

/// Errors that only mean the peer is gone
fn is_disconnect(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}
