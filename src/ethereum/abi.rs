//! Conversions between JSON call arguments and ABI values.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier},
    hex,
    json_abi::{Constructor, Function, Param},
    primitives::Bytes,
};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Encode a call to `function` with JSON arguments, selector included.
pub fn encode_function_call(function: &Function, args: &[Value]) -> Result<Bytes> {
    let values = coerce_args(&function.name, &function.inputs, args)?;
    let encoded = function
        .abi_encode_input(&values)
        .map_err(|e| AppError::Abi(format!("Failed to encode '{}': {}", function.name, e)))?;
    Ok(encoded.into())
}

/// Encode constructor arguments, to be appended to the creation bytecode.
pub fn encode_constructor_args(constructor: &Constructor, args: &[Value]) -> Result<Bytes> {
    let values = coerce_args("constructor", &constructor.inputs, args)?;
    let encoded = constructor
        .abi_encode_input(&values)
        .map_err(|e| AppError::Abi(format!("Failed to encode constructor: {}", e)))?;
    Ok(encoded.into())
}

/// Decode the output of `function` and return its first value as JSON.
///
/// Functions without outputs yield `Value::Null`. Empty return data for a function
/// that declares outputs (e.g. a call to an address without code) is an error.
pub fn decode_first_output(function: &Function, data: &Bytes) -> Result<Value> {
    if function.outputs.is_empty() {
        return Ok(Value::Null);
    }
    if data.is_empty() {
        return Err(AppError::Abi(format!(
            "'{}' returned no data, expected {} output(s)",
            function.name,
            function.outputs.len()
        )));
    }

    let decoded = function
        .abi_decode_output(data)
        .map_err(|e| AppError::Abi(format!("Failed to decode '{}' output: {}", function.name, e)))?;

    decoded.first().map(dyn_sol_value_to_json).unwrap_or(Ok(Value::Null))
}

fn coerce_args(name: &str, inputs: &[Param], args: &[Value]) -> Result<Vec<DynSolValue>> {
    if inputs.len() != args.len() {
        let expected: Vec<String> =
            inputs.iter().map(|input| format!("{} {}", input.ty, input.name)).collect();
        return Err(AppError::Abi(format!(
            "Parameter count mismatch for '{}': expected {}, got {}. Expected parameters: [{}]",
            name,
            inputs.len(),
            args.len(),
            expected.join(", ")
        )));
    }

    inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (input, arg))| {
            let ty: DynSolType = input.resolve()?;
            json_to_dyn_sol_value(&ty, arg).map_err(|e| {
                AppError::Abi(format!(
                    "Invalid parameter #{} ('{}' of type '{}'): {}",
                    i + 1,
                    input.name,
                    input.ty,
                    e
                ))
            })
        })
        .collect()
}

/// Coerce a JSON value into `ty`. Strings are parsed as-is, other values through
/// their JSON text, so `42`, `"42"`, `true` and `[1, 2]` all work.
fn json_to_dyn_sol_value(ty: &DynSolType, value: &Value) -> Result<DynSolValue> {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(ty.coerce_str(&text)?)
}

fn dyn_sol_value_to_json(value: &DynSolValue) -> Result<Value> {
    match value {
        DynSolValue::Address(addr) => Ok(Value::String(addr.to_checksum(None))),
        DynSolValue::Uint(num, _) => Ok(Value::String(num.to_string())),
        DynSolValue::Int(num, _) => Ok(Value::String(num.to_string())),
        DynSolValue::Bool(b) => Ok(Value::Bool(*b)),
        DynSolValue::String(s) => Ok(Value::String(s.clone())),
        DynSolValue::Bytes(bytes) => Ok(Value::String(hex::encode_prefixed(bytes))),
        DynSolValue::FixedBytes(word, size) => {
            Ok(Value::String(hex::encode_prefixed(&word[..*size])))
        }
        DynSolValue::Array(items)
        | DynSolValue::FixedArray(items)
        | DynSolValue::Tuple(items) => {
            items.iter().map(dyn_sol_value_to_json).collect::<Result<Vec<_>>>().map(Value::Array)
        }
        other => Err(AppError::Abi(format!("Unsupported ABI value: {:?}", other))),
    }
}
