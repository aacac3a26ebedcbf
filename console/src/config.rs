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

use crate::error::{ConsoleError, ConsoleResult};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::num::ParseIntError;
use std::str::FromStr;

/// The console listens this many ports above the service base port.
pub const CONSOLE_PORT_OFFSET: u16 = 2;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "console/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file, `.env` in the working directory if omitted"
    )]
    pub env_file: Option<String>,

    #[arg(
        short = 'p',
        long = "port",
        help = "Service base port, overrides the configuration file"
    )]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Configuration {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &str) -> ConsoleResult<Self> {
        if !std::path::Path::new(path).exists() {
            tracing::debug!("No configuration file at {}, using defaults", path);
            return Ok(Self::default());
        }

        tracing::debug!("Loading configuration from file: {}", path);
        let file = std::fs::File::open(path)
            .map_err(|e| ConsoleError::Config(format!("Failed to open config file: {}", e)))?;

        serde_yaml::from_reader(file)
            .map_err(|e| ConsoleError::Config(format!("Failed to parse config file: {}", e)))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Service base port; the console binds two above it
    #[serde(default)]
    pub port: EnvField<BasePort>,
}

impl ConsoleConfig {
    /// Loopback address the console listens on
    pub fn listen_addr(&self) -> ConsoleResult<SocketAddr> {
        self.port.console_addr()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePort(u16);

impl BasePort {
    pub fn new(port: u16) -> Self {
        Self(port)
    }

    pub fn to_port(&self) -> u16 {
        self.0
    }

    /// `127.0.0.1:<base + 2>`
    pub fn console_addr(&self) -> ConsoleResult<SocketAddr> {
        let port = self.0.checked_add(CONSOLE_PORT_OFFSET).ok_or_else(|| {
            ConsoleError::Config(format!("Base port {} leaves no room for the console", self.0))
        })?;
        Ok(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)))
    }
}

impl FromStr for BasePort {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(u16::from_str(s.trim())?))
    }
}

impl Default for BasePort {
    fn default() -> Self {
        Self(8000)
    }
}

impl std::fmt::Display for BasePort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
