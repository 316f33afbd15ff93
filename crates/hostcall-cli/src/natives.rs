//! Demo native functions exposed by the CLI

use hostcall_engine::Session;
use hostcall_sdk::{Arity, BridgeResult, CallFrame, ErrorInfo, GuestErrorType, NativeFn};

/// Expose the demo set on `session`
pub fn install(session: &Session) -> BridgeResult<()> {
    session.expose_typed("add", |a: f64, b: f64| a + b)?;
    session.expose_typed("subtract", |a: f64, b: f64| a - b)?;
    session.expose_typed("multiply", |a: f64, b: f64| a * b)?;
    session.expose_typed("divide", |a: f64, b: f64| a / b)?;
    session.expose_typed("math.sqrt", sqrt)?;
    session.expose("concat", Arity::Variadic, NativeFn::new(concat))?;
    session.expose("typeOf", 1, NativeFn::new(type_of))?;
    Ok(())
}

fn sqrt(x: f64) -> Result<f64, ErrorInfo> {
    if x < 0.0 {
        return Err(ErrorInfo::throw(
            GuestErrorType::RangeError,
            format!("math.sqrt: negative input {}", x),
        ));
    }
    Ok(x.sqrt())
}

fn concat(frame: &CallFrame<'_>) -> Result<String, ErrorInfo> {
    let mut out = String::new();
    for index in 0..frame.argument_count() {
        out.push_str(&frame.decode::<String>(index)?);
    }
    Ok(out)
}

fn type_of(frame: &CallFrame<'_>) -> &'static str {
    frame.value_type(0).name()
}
