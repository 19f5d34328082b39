//! Stack growth for deep recursion.
//!
//! The parser recurses once per bracket group and once per argument; the
//! evaluator recurses once per argument chain and once per block
//! activation. Both wrap their recursive step in [`ensure_sufficient_stack`]
//! so that deeply nested source or deep method recursion grows the stack
//! instead of overflowing it.
//!
//! On wasm32 the call is a plain passthrough.

/// Run `f`, first switching to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Grow when less than this much stack remains.
    const RED_ZONE: usize = 128 * 1024;

    /// Size of each new stack segment.
    const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(depth: u32) -> u32 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
    }

    #[test]
    fn passes_result_through() {
        let result: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        assert_eq!(nest(200_000), 200_000);
    }
}
