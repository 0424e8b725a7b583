// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0

//! InfraForge common - shared functionality for InfraForge components
//!
//! This crate provides the chain registry plus the request and response
//! types shared by the deployment engine, the audit engine, the HTTP
//! facade, and the CLI.

/// Wire types for deployment, gas estimation, and security audits
pub mod types;

/// Static chain registry with per-chain RPC endpoint resolution
pub mod chains;
/// Environment variable name constants for InfraForge configuration
pub mod env;
/// Logging setup and utilities for consistent logging across InfraForge components
pub mod logging;

pub use chains::*;
pub use logging::*;
