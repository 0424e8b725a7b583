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

//! Solidity compilation with a pinned toolchain.
//!
//! ABI and bytecode shape depend on the compiler version, so the engine pins
//! solc rather than floating to whatever is installed. The pinned binary is
//! provisioned through svm on first use and cached afterwards.
//!
//! Compilation is stateless: each call is a pure function of the source
//! text, the requested contract name, and the pinned version.

use std::path::PathBuf;

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use foundry_compilers::{
    artifacts::{
        output_selection::OutputSelection, CompilerOutput, Contract, Settings, SolcInput, Source,
        Sources,
    },
    solc::{Solc, SolcLanguage},
};
use once_cell::sync::Lazy;
use semver::Version;
use tracing::{debug, trace};

use crate::error::EngineError;

/// The solc version every compilation uses.
pub static SOLC_VERSION: Lazy<Version> = Lazy::new(|| Version::new(0, 8, 20));

/// Filename given to the in-memory source unit handed to solc.
const SOURCE_NAME: &str = "Contract.sol";

/// The ABI and creation bytecode produced for one contract.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// Structured interface description of the compiled contract.
    pub abi: JsonAbi,
    /// Creation bytecode, without constructor arguments appended.
    pub bytecode: Bytes,
}

/// Compile `source_code` and extract the artifact for `contract_name`.
///
/// A source text may define several contracts; the requested name is matched
/// exactly first, then by substring containment. Compilation errors surface
/// as [`EngineError::CompileError`] carrying the solc diagnostics; a clean
/// compile with no matching unit is [`EngineError::ContractNotFound`].
pub fn compile(source_code: &str, contract_name: &str) -> Result<CompiledArtifact, EngineError> {
    let compiler = Solc::find_or_install(&SOLC_VERSION).map_err(|e| {
        EngineError::CompileError(format!("failed to provision solc {}: {e}", *SOLC_VERSION))
    })?;
    trace!(compiler = ?compiler, "using pinned compiler");

    let sources: Sources =
        std::iter::once((PathBuf::from(SOURCE_NAME), Source::new(source_code))).collect();
    let settings = Settings {
        output_selection: OutputSelection::default_output_selection(),
        ..Default::default()
    };
    let input = SolcInput::new(SolcLanguage::Solidity, sources, settings);

    let output =
        compiler.compile_exact(&input).map_err(|e| EngineError::CompileError(e.to_string()))?;

    let diagnostics = output
        .errors
        .iter()
        .filter(|e| e.severity.is_error())
        .map(|e| e.formatted_message.clone().unwrap_or_else(|| e.message.clone()))
        .collect::<Vec<_>>();
    if !diagnostics.is_empty() {
        debug!(count = diagnostics.len(), "solc reported errors");
        return Err(EngineError::CompileError(diagnostics.join("\n")));
    }

    let contract = find_contract(&output, contract_name)
        .ok_or_else(|| EngineError::ContractNotFound(contract_name.to_string()))?;

    let abi = contract
        .abi
        .clone()
        .ok_or_else(|| EngineError::CompileError(format!("no ABI emitted for {contract_name}")))?;
    let bytecode = contract
        .evm
        .as_ref()
        .and_then(|evm| evm.bytecode.as_ref())
        .map(|bytecode| bytecode.object.clone())
        .and_then(|object| object.into_bytes())
        .ok_or_else(|| {
            EngineError::CompileError(format!("no bytecode emitted for {contract_name}"))
        })?;

    Ok(CompiledArtifact { abi, bytecode })
}

/// Run [`compile`] on the blocking pool.
///
/// Compilation shells out to solc (and may install it first), which would
/// otherwise stall the async executor for seconds.
pub async fn compile_blocking(
    source_code: &str,
    contract_name: &str,
) -> Result<CompiledArtifact, EngineError> {
    let source_code = source_code.to_string();
    let contract_name = contract_name.to_string();
    tokio::task::spawn_blocking(move || compile(&source_code, &contract_name))
        .await
        .map_err(|e| EngineError::CompileError(format!("compilation task failed: {e}")))?
}

/// Locate the compiled unit for `contract_name` across all source files.
fn find_contract<'a>(output: &'a CompilerOutput, contract_name: &str) -> Option<&'a Contract> {
    if let Some(contract) =
        output.contracts.values().find_map(|contracts| contracts.get(contract_name))
    {
        return Some(contract);
    }

    // Substring tolerance mirrors how callers often pass qualified names;
    // BTreeMap order keeps the fallback deterministic.
    output
        .contracts
        .values()
        .flat_map(|contracts| contracts.iter())
        .find(|(name, _)| name.contains(contract_name))
        .map(|(_, contract)| contract)
}
