// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! InfraForge security audit engine.
//!
//! Fans contract source out to external security analyzers, each running in
//! its own scratch directory under its own deadline, then folds the
//! normalized findings into a single scored [`AuditReport`]. One analyzer
//! failing, timing out, or simply not being installed never suppresses the
//! results of the others.
//!
//! [`AuditReport`]: infraforge_common::types::AuditReport

/// Analyzer trait and the shared subprocess driver
pub mod adapter;
/// Fan-out, scoring, and report assembly
pub mod aggregator;
/// Mythril symbolic-execution adapter
pub mod mythril;
/// Slither static-analysis adapter
pub mod slither;

pub use adapter::*;
pub use aggregator::*;
pub use mythril::*;
pub use slither::*;
