// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0

//! Shared helpers for InfraForge integration tests.
//!
//! The tests in `tests/` exercise whole components against each other: the
//! deployment pipeline against an in-process JSON-RPC node, the HTTP facade
//! over a real socket, and the audit toolchain against scripted analyzer
//! stand-ins.

pub mod mock_node;
