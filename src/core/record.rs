//! Structured record sent to the remote collector

use super::error::{LoggerError, Result};
use super::event::LogEvent;
use super::message::{join_args, Arg, Message};
use super::timestamp::iso8601;
use serde::Serialize;
use serde_json::{json, Value};

/// Wire representation of one event. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteRecord {
    /// ISO 8601 UTC timestamp with milliseconds
    pub timestamp: String,
    pub env: String,
    pub app: String,
    /// `file:line:function` of the logging call
    pub caller: String,
    pub host: String,
    pub pid: u32,
    /// Severity character
    pub level: String,
    pub msg: Value,
}

impl RemoteRecord {
    /// Populate every fixed field from the event and classify its message.
    ///
    /// Fails only when the message cannot be represented in JSON; no field is
    /// ever omitted or replaced by `null`.
    pub fn build(event: &LogEvent) -> Result<Self> {
        Ok(Self {
            timestamp: iso8601(&event.timestamp),
            env: event.env.clone(),
            app: event.app.clone(),
            caller: event.call_site.to_string(),
            host: event.host.clone(),
            pid: event.pid,
            level: event.severity.as_char().to_string(),
            msg: classify_message(&event.message)?,
        })
    }

    /// Compact JSON body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Map a message onto the `msg` field.
///
/// | message                     | `msg`                          |
/// |-----------------------------|--------------------------------|
/// | formatted string            | `{"str": s}`                   |
/// | one text argument           | `{"str": s}`                   |
/// | one integer argument        | `{"int": n}`                   |
/// | one float argument          | `{"float": x}`                 |
/// | one mapping argument        | the mapping itself             |
/// | one other scalar            | `{"interface": v}`             |
/// | zero or several arguments   | `{"str": "<space-joined>"}`    |
pub fn classify_message(message: &Message) -> Result<Value> {
    let args = match message {
        Message::Formatted(s) => return Ok(json!({ "str": s })),
        Message::Args(args) => args,
    };

    let [single] = args.as_slice() else {
        return Ok(json!({ "str": join_args(args) }));
    };

    let msg = match single {
        Arg::Text(s) => json!({ "str": s }),
        Arg::Integer(n) => json!({ "int": n }),
        Arg::Float(f) if f.is_finite() => json!({ "float": f }),
        Arg::Float(f) => {
            return Err(LoggerError::serialization(
                "msg.float",
                format!("{} is not representable in JSON", f),
            ))
        }
        Arg::Mapping(m) => Value::Object(m.clone()),
        Arg::Other(v) => json!({ "interface": v }),
    };
    Ok(msg)
}
