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

use chrono::Utc;
use clap::Parser;
use termdesk_console::config::{Arguments, BasePort, Configuration};
use termdesk_console::{CommandOutput, CommandRegistry, ConsoleContext, ConsoleServer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution
    let config = Configuration::load(&arguments.config_file)
        .inspect_err(|err| eprintln!("Configuration load error: {}", err))?;
    debug!("Configuration loaded: {:?}", config);

    let base_port = match arguments.port {
        Some(port) => BasePort::new(port),
        None => *config.console.port,
    };
    let listen_addr = base_port.console_addr()?;

    info!("Starting Termdesk console...");
    let context = ConsoleContext::with_builtins(host_commands()?)?;
    let handle = ConsoleServer::bind(listen_addr, context).await?.start()?;
    info!("Console ready on {}", handle.local_addr());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.shutdown().await?;

    Ok(())
}

/// Commands contributed by the host process
fn host_commands() -> anyhow::Result<CommandRegistry> {
    let started = Utc::now();
    let mut registry = CommandRegistry::new();

    registry.register("uptime", 1, 1, true, move |_: &[String]| {
        let elapsed = Utc::now() - started;
        CommandOutput::ok(format!(
            "up {}d {:02}:{:02}:{:02} since {}",
            elapsed.num_days(),
            elapsed.num_hours() % 24,
            elapsed.num_minutes() % 60,
            elapsed.num_seconds() % 60,
            started.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    })?;

    registry.register("version", 1, 1, false, |_: &[String]| {
        CommandOutput::from(format!(
            "{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
    })?;

    Ok(registry)
}
