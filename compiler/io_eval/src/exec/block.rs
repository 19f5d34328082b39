//! Block activation.

use io_ir::MessageRef;
use io_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{Block, CallRecord, ControlAction, EvalResult, ObjectKind, Runtime, Value};

impl Runtime {
    /// Run `block` (held by `block_value`) for the message `at`.
    ///
    /// The body runs in fresh locals whose only proto is the base object.
    /// Parameters are bound to the call-site arguments, evaluated left to
    /// right in the sender's `locals` (`nil` past the supplied count).
    /// `self` is the captured scope for a closure and `target` for a
    /// method. A `return` from the body ends here.
    pub(crate) fn activate_block(
        &self,
        block_value: &Value,
        block: &Block,
        target: &Value,
        locals: &Value,
        at: &MessageRef,
    ) -> EvalResult {
        let _depth = self.enter_activation()?;
        trace!(args = block.arg_names.len(), method = block.is_method(), "activate block");

        let scope = self.clone_of(&self.protos.object);
        for (index, name) in block.arg_names.iter().enumerate() {
            let value = self.eval_arg(at, index, locals)?;
            scope.set_slot(*name, value);
        }

        let self_value = block.captured_self.clone().unwrap_or_else(|| target.clone());
        let call = self.alloc(
            ObjectKind::Call(CallRecord {
                sender: locals.clone(),
                target: target.clone(),
                activated: block_value.clone(),
                message: at.clone(),
            }),
            vec![self.protos.call.clone()],
        );
        scope.set_slot(self.names.self_, self_value);
        scope.set_slot(self.names.call, call);

        let Some(body) = &block.body else {
            return Ok(self.nil());
        };
        let result = match ensure_sufficient_stack(|| self.eval_chain(body, &scope)) {
            Err(ControlAction::Return(value)) => Ok(value),
            other => other,
        };
        // The scope may now only be reachable through a cycle.
        drop(scope);
        self.collect_if_due();
        result
    }
}
