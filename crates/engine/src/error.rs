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

//! Error taxonomy for the deployment engine.
//!
//! Every failure a deployment or estimate request can hit maps onto one of
//! these variants, so callers can tell "the chain is unknown" apart from
//! "the chain is down" and react before any network work is attempted.

/// Errors produced by compilation, deployment, and estimation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested chain is not in the registry. Signaled before any
    /// connection is attempted.
    #[error("Unsupported chain: {0}")]
    UnknownChain(String),

    /// The toolchain rejected the source text, or could not be provisioned.
    #[error("Compilation failed: {0}")]
    CompileError(String),

    /// Compilation succeeded but no compiled unit matches the requested
    /// contract name.
    #[error("Contract {0} not found in compilation output")]
    ContractNotFound(String),

    /// The chain's RPC endpoint could not be reached or failed the liveness
    /// check. Terminal for the request; the engine never retries.
    #[error("Failed to connect to {chain}: {reason}")]
    ConnectionError {
        /// Display name of the chain that was unreachable.
        chain: String,
        /// Underlying transport failure.
        reason: String,
    },

    /// The signed transaction was rejected at submission, or its
    /// confirmation could not be observed. Not retried automatically since
    /// resubmission risks a double deployment.
    #[error("Broadcast failed: {0}")]
    BroadcastError(String),

    /// The request itself is malformed: bad or missing credential, argument
    /// arity mismatch, or values that cannot be coerced to the constructor
    /// signature.
    #[error("Invalid request: {0}")]
    ValidationError(String),
}

impl EngineError {
    /// Whether the failure was detected before any state-changing network
    /// interaction, meaning a retry is safe.
    pub fn is_pre_broadcast(&self) -> bool {
        !matches!(self, Self::BroadcastError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = EngineError::UnknownChain("dogecoin".to_string());
        assert_eq!(err.to_string(), "Unsupported chain: dogecoin");

        let err = EngineError::ContractNotFound("Bar".to_string());
        assert!(err.to_string().contains("Bar"));
    }

    #[test]
    fn broadcast_is_not_safe_to_retry() {
        assert!(!EngineError::BroadcastError("nonce too low".to_string()).is_pre_broadcast());
        assert!(EngineError::UnknownChain("x".to_string()).is_pre_broadcast());
    }
}
