//! `hostcall call`: Call a native function with JSON literal arguments.

use anyhow::bail;
use hostcall_engine::{to_guest_exception, Session};
use hostcall_sdk::{DynamicValue, StackFrame};
use serde_json::Value;

/// Returns whether the call succeeded; a thrown exception goes to stderr.
pub fn execute(session: &Session, name: &str, args: &[String]) -> anyhow::Result<bool> {
    let values = args
        .iter()
        .map(|arg| parse_argument(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut frame = StackFrame::new(values);
    match session.call(name, &mut frame).into_result() {
        Ok(value) => {
            println!("{}", format_value(&value));
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", to_guest_exception(err));
            Ok(false)
        }
    }
}

/// Parse one command-line argument.
///
/// JSON scalars map to the matching guest value, `undefined` to undefined;
/// anything that is not JSON is taken as a bare string, unless it looks like
/// a number JSON could not read (e.g. `1e400`, `1.2.3`).
pub fn parse_argument(arg: &str) -> anyhow::Result<DynamicValue> {
    if arg == "undefined" {
        return Ok(DynamicValue::Undefined);
    }
    let value = match serde_json::from_str::<Value>(arg) {
        Ok(value) => value,
        Err(err) if looks_numeric(arg) => bail!("Invalid number {}: {}", arg, err),
        Err(_) => return Ok(DynamicValue::string(arg)),
    };
    Ok(match value {
        Value::Null => DynamicValue::Null,
        Value::Bool(b) => DynamicValue::Boolean(b),
        // as_f64 only fails with serde_json's arbitrary_precision feature
        Value::Number(n) => DynamicValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => DynamicValue::string(s),
        Value::Array(_) | Value::Object(_) => {
            bail!("Unsupported argument {}: only scalars cross the boundary", arg)
        }
    })
}

fn looks_numeric(arg: &str) -> bool {
    let body = arg.strip_prefix('-').unwrap_or(arg);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}

/// Render a result the way the guest would print it
pub fn format_value(value: &DynamicValue) -> String {
    match value {
        DynamicValue::String(s) => {
            serde_json::to_string(&**s).unwrap_or_else(|_| format!("\"{}\"", s))
        }
        other => other.to_string(),
    }
}
