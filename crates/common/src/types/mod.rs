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

//! Request and response types shared across InfraForge components.
//!
//! These are the wire contract of the HTTP facade and the value types the
//! engine and audit crates hand back to callers.

/// Security audit types: normalized issues, severities, and reports
pub mod audit;
/// Deployment types: requests, results, and gas estimates
pub mod deploy;

pub use audit::*;
pub use deploy::*;
