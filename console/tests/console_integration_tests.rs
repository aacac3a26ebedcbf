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

//! End-to-end tests against a real loopback listener

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use termdesk_console::telnet::protocol::handshake;
use termdesk_console::{CommandOutput, CommandRegistry, ConsoleContext, ConsoleHandle, ConsoleServer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const PROMPT: &[u8] = b"->";
const READ_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_console() -> ConsoleHandle {
    let mut registry = CommandRegistry::new();
    registry
        .register("status", 1, 1, true, |_: &[String]| CommandOutput::ok("green"))
        .unwrap();
    registry
        .register("set", 3, 3, false, |args: &[String]| {
            CommandOutput::ok(format!("{} = {}", args[1], args[2]))
        })
        .unwrap();
    let context = ConsoleContext::with_builtins(registry).unwrap();

    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0));
    ConsoleServer::bind(addr, context)
        .await
        .unwrap()
        .start()
        .unwrap()
}

/// Read until the next prompt and return everything before it
async fn until_prompt(client: &mut TcpStream) -> Vec<u8> {
    tokio::time::timeout(READ_TIMEOUT, async {
        let mut received = Vec::new();
        loop {
            let byte = client.read_u8().await.expect("console closed early");
            received.push(byte);
            if received.ends_with(PROMPT) {
                received.truncate(received.len() - PROMPT.len());
                return received;
            }
        }
    })
    .await
    .expect("timed out waiting for prompt")
}

async fn connect(handle: &ConsoleHandle) -> TcpStream {
    let mut client = TcpStream::connect(handle.local_addr()).await.unwrap();
    assert_eq!(until_prompt(&mut client).await, handshake().to_vec());
    client
}

async fn send(client: &mut TcpStream, line: &[u8]) -> Vec<u8> {
    client.write_all(line).await.unwrap();
    until_prompt(client).await
}

#[tokio::test]
async fn test_command_round_trip() {
    let handle = start_console().await;
    let mut client = connect(&handle).await;

    assert_eq!(send(&mut client, b"status\r").await, b"status\r\ngreen\r\n");
    assert_eq!(
        send(&mut client, b"set \"log level\" debug\r").await,
        b"set \"log level\" debug\r\nlog level = debug\r\n"
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_arity_and_unknown_messages() {
    let handle = start_console().await;
    let mut client = connect(&handle).await;

    assert_eq!(
        send(&mut client, b"set only\r").await,
        b"set only\r\nParams of command set should be 3 - 3\r\n"
    );
    assert_eq!(
        send(&mut client, b"Status\r").await,
        b"Status\r\nNot found term command Status\r\n"
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_history_is_shared_between_sessions() {
    let handle = start_console().await;
    let mut first = connect(&handle).await;
    let mut second = connect(&handle).await;

    send(&mut first, b"set a 1\r").await;

    assert_eq!(
        send(&mut second, b"\x1b[A\r").await,
        b"set a 1\r\na = 1\r\n"
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_replay_is_shared_between_sessions() {
    let handle = start_console().await;
    let mut first = connect(&handle).await;
    let mut second = connect(&handle).await;

    send(&mut first, b"status\r").await;
    assert_eq!(send(&mut second, b"\r").await, b"\r\ngreen\r\n");

    // Non-repeatable commands clear the slot
    send(&mut first, b"set a 1\r").await;
    assert_eq!(send(&mut second, b"\r").await, b"\r\n");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sessions_builtin_counts_connections() {
    let handle = start_console().await;
    let mut first = connect(&handle).await;
    let _second = connect(&handle).await;

    let reply = send(&mut first, b"sessions\r").await;
    assert!(reply.ends_with(b"Total: 2 session(s)\r\n"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_quit_closes_only_that_session() {
    let handle = start_console().await;
    let mut first = connect(&handle).await;
    let mut second = connect(&handle).await;

    first.write_all(b"quit\r").await.unwrap();
    let mut rest = Vec::new();
    tokio::time::timeout(READ_TIMEOUT, first.read_to_end(&mut rest))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rest, b"quit\r\n");

    assert_eq!(send(&mut second, b"status\r").await, b"status\r\ngreen\r\n");

    handle.shutdown().await.unwrap();
}
