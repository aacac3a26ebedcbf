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

//! Telnet console listener
//!
//! Accepts raw TCP connections on the loopback interface, announces
//! server-side echo and suppressed go-ahead, and runs one [`Session`] task
//! per connection. The listener speaks just enough telnet to put a client
//! into character-at-a-time mode; it never parses the client's replies.

pub mod protocol;

use crate::context::ConsoleContext;
use crate::error::{ConsoleError, ConsoleResult};
use crate::session::Session;
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Telnet console server
pub struct ConsoleServer {
    listener: TcpListener,
    context: ConsoleContext,
}

impl ConsoleServer {
    /// Bind the console listener
    pub async fn bind(addr: SocketAddr, context: ConsoleContext) -> ConsoleResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            "Console server listening on {}",
            listener.local_addr().unwrap_or(addr)
        );
        Ok(Self { listener, context })
    }

    /// Address actually bound, useful when binding port 0
    pub fn local_addr(&self) -> ConsoleResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Sessions already running are left alone; they end when their client
    /// does.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Console server accepting connections...");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Console server shutting down");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        tracing::info!("New console connection from {}", addr);
                        let context = self.context.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, addr, context).await {
                                tracing::error!(
                                    "Error handling console connection from {}: {}",
                                    addr,
                                    e
                                );
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!("Error accepting console connection: {}", e);
                    }
                }
            }
        }
    }

    /// Run the accept loop on its own task
    pub fn start(self) -> ConsoleResult<ConsoleHandle> {
        let local_addr = self.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.run(async move {
            // A dropped sender also stops the loop
            let _ = shutdown_rx.await;
        }));
        Ok(ConsoleHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Control handle for a running [`ConsoleServer`]
pub struct ConsoleHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ConsoleHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and wait for the accept loop to finish.
    pub async fn shutdown(self) -> ConsoleResult<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| ConsoleError::Io(std::io::Error::other(e)))?;
        tracing::info!("Console server stopped");
        Ok(())
    }
}

/// Handshake and serve a single console connection
async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    context: ConsoleContext,
) -> ConsoleResult<()> {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("Unable to set TCP_NODELAY for {}: {}", addr, e);
    }
    stream.write_all(&protocol::handshake()).await?;

    let session_manager = context.session_manager().clone();
    let session_id = session_manager.open(addr.to_string()).await;
    tracing::debug!(
        "Created console session {} for {} ({} open)",
        session_id,
        addr,
        session_manager.count().await
    );

    let result = Session::new(session_id, addr.to_string(), stream, context)
        .run()
        .await;

    session_manager.close(session_id).await;
    tracing::debug!(
        "Console session {} ended ({} open)",
        session_id,
        session_manager.count().await
    );
    result
}
