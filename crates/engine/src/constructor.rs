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

//! Constructor argument handling.
//!
//! Callers pass constructor arguments as plain strings; each one is resolved
//! against the compiled constructor's parameter types and coerced into an
//! ABI value. The encoded arguments are appended to the creation bytecode to
//! form the transaction's deploy code.

use alloy_dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Constructor, JsonAbi};
use alloy_primitives::Bytes;

use crate::error::EngineError;

/// Build the complete deploy code for a contract: creation bytecode with the
/// ABI-encoded constructor arguments appended.
///
/// Arguments are validated against the compiled ABI, so an arity mismatch or
/// a value that does not fit its parameter type fails with
/// [`EngineError::ValidationError`] before any transaction is built.
pub fn encode_deploy_code(
    abi: &JsonAbi,
    bytecode: &Bytes,
    args: &[String],
) -> Result<Bytes, EngineError> {
    match (abi.constructor(), args.is_empty()) {
        (None, true) => Ok(bytecode.clone()),
        (None, false) => Err(EngineError::ValidationError(
            "constructor arguments were provided but the contract has no constructor".to_string(),
        )),
        (Some(constructor), _) => {
            let values = coerce_args(constructor, args)?;
            let input = constructor.abi_encode_input(&values).map_err(|e| {
                EngineError::ValidationError(format!("failed to encode constructor arguments: {e}"))
            })?;
            Ok(bytecode.iter().copied().chain(input).collect())
        }
    }
}

/// Coerce human-readable argument strings into ABI values for `constructor`.
pub fn coerce_args(
    constructor: &Constructor,
    args: &[String],
) -> Result<Vec<DynSolValue>, EngineError> {
    if constructor.inputs.len() != args.len() {
        return Err(EngineError::ValidationError(format!(
            "constructor expects {} argument(s), got {}",
            constructor.inputs.len(),
            args.len()
        )));
    }

    constructor
        .inputs
        .iter()
        .zip(args)
        .map(|(input, arg)| {
            let ty = input.resolve().map_err(|e| {
                EngineError::ValidationError(format!(
                    "could not resolve constructor input {input}: {e}"
                ))
            })?;
            ty.coerce_str(arg).map_err(|e| {
                EngineError::ValidationError(format!(
                    "invalid value {arg:?} for constructor parameter {}: {e}",
                    input.name
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abi_with_constructor(inputs_json: &str) -> JsonAbi {
        serde_json::from_str(&format!(
            r#"[{{"type": "constructor", "inputs": {inputs_json}, "stateMutability": "nonpayable"}}]"#
        ))
        .unwrap()
    }

    fn bytecode() -> Bytes {
        Bytes::from_static(&[0x60, 0x80, 0x60, 0x40])
    }

    #[test]
    fn no_constructor_passes_bytecode_through() {
        let abi: JsonAbi = serde_json::from_str("[]").unwrap();
        let code = encode_deploy_code(&abi, &bytecode(), &[]).unwrap();
        assert_eq!(code, bytecode());
    }

    #[test]
    fn args_without_constructor_are_rejected() {
        let abi: JsonAbi = serde_json::from_str("[]").unwrap();
        let err = encode_deploy_code(&abi, &bytecode(), &["1".to_string()]).unwrap_err();
        assert!(matches!(err, EngineError::ValidationError(_)));
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let abi = abi_with_constructor(
            r#"[{"name": "start", "type": "uint256", "internalType": "uint256"}]"#,
        );
        let err = encode_deploy_code(&abi, &bytecode(), &[]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expects 1 argument(s), got 0"), "{message}");
    }

    #[test]
    fn uint_argument_is_appended_as_abi_word() {
        let abi = abi_with_constructor(
            r#"[{"name": "start", "type": "uint256", "internalType": "uint256"}]"#,
        );
        let code = encode_deploy_code(&abi, &bytecode(), &["42".to_string()]).unwrap();
        assert_eq!(code.len(), bytecode().len() + 32);
        assert_eq!(code[..4], bytecode()[..]);
        assert_eq!(code[code.len() - 1], 42);
    }

    #[test]
    fn string_argument_coerces() {
        let constructor: Constructor = serde_json::from_str(
            r#"{"type": "constructor", "inputs": [{"name": "_name", "type": "string", "internalType": "string"}], "stateMutability": "nonpayable"}"#,
        )
        .unwrap();
        let values = coerce_args(&constructor, &["Hello".to_string()]).unwrap();
        assert_eq!(values, vec![DynSolValue::String("Hello".to_string())]);
    }

    #[test]
    fn address_argument_coerces() {
        let constructor: Constructor = serde_json::from_str(
            r#"{"type": "constructor", "inputs": [{"name": "owner", "type": "address", "internalType": "address"}], "stateMutability": "nonpayable"}"#,
        )
        .unwrap();
        let values = coerce_args(
            &constructor,
            &["0x00000000000000000000000000000000000000ff".to_string()],
        )
        .unwrap();
        assert!(matches!(values[0], DynSolValue::Address(_)));
    }

    #[test]
    fn unparseable_argument_is_rejected() {
        let constructor: Constructor = serde_json::from_str(
            r#"{"type": "constructor", "inputs": [{"name": "start", "type": "uint256", "internalType": "uint256"}], "stateMutability": "nonpayable"}"#,
        )
        .unwrap();
        let err = coerce_args(&constructor, &["not-a-number".to_string()]).unwrap_err();
        assert!(matches!(err, EngineError::ValidationError(_)));
    }
}
