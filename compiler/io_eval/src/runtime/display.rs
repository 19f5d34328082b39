//! Text form of runtime values, as written by `print` and `asString`.

use super::Runtime;
use crate::{Block, ObjectKind, Value};

impl Runtime {
    /// Display text for `value`.
    pub fn display(&self, value: &Value) -> String {
        match value.kind() {
            ObjectKind::Nil => "nil".to_string(),
            ObjectKind::Boolean(b) => b.to_string(),
            // `3` not `3.0`; `inf` for saturated literals.
            ObjectKind::Number(n) => n.to_string(),
            ObjectKind::Str(s) => s.to_string(),
            ObjectKind::Block(block) => self.block_source(block),
            ObjectKind::Message(msg) => msg.message().to_source(self.interner()),
            ObjectKind::Native(native) => format!("Native({})", native.name),
            ObjectKind::Call(_) => "Call".to_string(),
            ObjectKind::Plain if value.ptr_eq(self.lobby()) => "Lobby".to_string(),
            ObjectKind::Plain if value.ptr_eq(self.object()) => "Object".to_string(),
            ObjectKind::Plain => format!("{value:?}"),
        }
    }

    /// `block(a, b,\n<body>\n)` or `method(...)`.
    pub fn block_source(&self, block: &Block) -> String {
        let mut out = String::from(if block.is_method() { "method(" } else { "block(" });
        for (i, name) in block.arg_names.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(self.interner().lookup(*name));
        }
        if !block.arg_names.is_empty() {
            out.push(',');
        }
        out.push('\n');
        if let Some(body) = &block.body {
            body.write_source(self.interner(), &mut out);
        }
        out.push_str("\n)");
        out
    }
}
