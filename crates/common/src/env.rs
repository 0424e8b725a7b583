// InfraForge - Multi-chain Smart Contract Deployment & Auditing
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Environment variable name constants for InfraForge configuration.
//!
//! This module provides constant string names for the environment variables
//! read by InfraForge, a single source of truth shared by the CLI, the
//! server, and the engine crates.
//!
//! # Environment Variables
//!
//! ## Server Configuration
//! - [`INFRAFORGE_HOST`] - Bind address for the HTTP facade
//! - [`INFRAFORGE_PORT`] - Bind port for the HTTP facade
//!
//! ## Analyzer Configuration
//! - [`SLITHER_BIN`] - Override for the slither executable
//! - [`MYTH_BIN`] - Override for the mythril executable
//!
//! ## Chain RPC Endpoints
//!
//! Every registry chain additionally honors a `<ID>_RPC` variable, where
//! `<ID>` is the upper-cased registry key: `ETHEREUM_RPC`,
//! `ETHEREUM_SEPOLIA_RPC`, `BSC_RPC`, `BSC_TESTNET_RPC`, `POLYGON_RPC`,
//! `POLYGON_MUMBAI_RPC`, `ARBITRUM_RPC`, `AVALANCHE_RPC`, `FANTOM_RPC`.
//! See [`crate::chains::ChainDescriptor::rpc_env_var`].

/// Environment variable for the HTTP facade's bind address.
///
/// # Default
///
/// When not set, the server binds `127.0.0.1`.
///
/// # Examples
///
/// ```bash
/// INFRAFORGE_HOST=0.0.0.0 infraforge serve
/// ```
///
/// # Related
///
/// Also available as the `--host` CLI argument, which takes precedence.
pub const INFRAFORGE_HOST: &str = "INFRAFORGE_HOST";

/// Environment variable for the HTTP facade's bind port.
///
/// # Value Format
///
/// Must be a valid `u16`. Invalid values fail CLI argument parsing.
///
/// # Default
///
/// When not set, the server binds port `8000`.
///
/// # Examples
///
/// ```bash
/// INFRAFORGE_PORT=9090 infraforge serve
/// ```
pub const INFRAFORGE_PORT: &str = "INFRAFORGE_PORT";

/// Environment variable overriding the slither executable invoked by the
/// static-analysis adapter.
///
/// # Default
///
/// When not set, `slither` is resolved through `PATH`.
///
/// # Examples
///
/// ```bash
/// SLITHER_BIN=/opt/venvs/slither/bin/slither infraforge serve
/// ```
pub const SLITHER_BIN: &str = "SLITHER_BIN";

/// Environment variable overriding the mythril executable invoked by the
/// symbolic-execution adapter.
///
/// # Default
///
/// When not set, `myth` is resolved through `PATH`.
///
/// # Examples
///
/// ```bash
/// MYTH_BIN=/opt/venvs/mythril/bin/myth infraforge serve
/// ```
pub const MYTH_BIN: &str = "MYTH_BIN";
