// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! InfraForge engine - contract compilation, deployment, and gas estimation.
//!
//! The engine drives the full deployment lifecycle (connect, compile, build,
//! sign, broadcast, confirm) against any chain in the registry, and exposes
//! the read-only slice of that lifecycle as a gas estimator.

/// Solidity compilation with a pinned toolchain version
pub mod compiler;
/// Constructor argument coercion and deploy code assembly
pub mod constructor;
/// The deployment pipeline
pub mod deploy;
/// Engine error taxonomy
pub mod error;
/// Deployment cost estimation
pub mod estimate;

pub use compiler::*;
pub use constructor::*;
pub use deploy::*;
pub use error::*;
pub use estimate::*;
