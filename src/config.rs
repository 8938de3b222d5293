// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the startup loader. Configuration
//! is read once at process start; nothing is re-read at request time.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GATEWAY_HOST` | Server bind address | `0.0.0.0` |
//! | `GATEWAY_PORT` | Server bind port | `8080` |
//! | `LEDGER_NODE_URL` | Base URL of the ledger node RPC endpoint | `http://127.0.0.1:10050` |
//! | `LEDGER_RPC_USERNAME` | RPC username | `user1` |
//! | `LEDGER_RPC_PASSWORD` | RPC password | empty |
//! | `LEDGER_EXTRA_SCHEMAS` | Extra schema declarations, `name=family[+family]` comma-separated | empty |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "GATEWAY_HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "GATEWAY_PORT";

/// Environment variable name for the ledger node base URL.
pub const NODE_URL_ENV: &str = "LEDGER_NODE_URL";

/// Environment variable name for the RPC username.
pub const RPC_USERNAME_ENV: &str = "LEDGER_RPC_USERNAME";

/// Environment variable name for the RPC password.
pub const RPC_PASSWORD_ENV: &str = "LEDGER_RPC_PASSWORD";

/// Environment variable name for extension schema declarations, handed to
/// the registry next to the built-in REC schemas.
pub const EXTRA_SCHEMAS_ENV: &str = "LEDGER_EXTRA_SCHEMAS";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Gateway configuration resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub node_url: String,
    pub rpc_username: String,
    pub rpc_password: String,
    pub extra_schemas: String,
}

impl GatewayConfig {
    /// Load configuration, falling back to defaults for anything unset or
    /// unparseable.
    pub fn from_env() -> Self {
        Self {
            host: env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var(PORT_ENV)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(8080),
            node_url: env::var(NODE_URL_ENV)
                .unwrap_or_else(|_| "http://127.0.0.1:10050".to_string()),
            rpc_username: env::var(RPC_USERNAME_ENV).unwrap_or_else(|_| "user1".to_string()),
            rpc_password: env::var(RPC_PASSWORD_ENV).unwrap_or_default(),
            extra_schemas: env::var(EXTRA_SCHEMAS_ENV).unwrap_or_default(),
        }
    }
}
