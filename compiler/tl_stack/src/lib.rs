//! Stack growth for deeply nested source.
//!
//! Parsing `((((...))))` or a long `NOT NOT NOT ...` chain recurses once per
//! nesting level, and so does lowering the resulting tree. Those entry points
//! wrap themselves in [`ensure_sufficient_stack`] so pathological inputs grow
//! the stack instead of overflowing it.
//!
//! On wasm32 the guard is a plain call.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Run `f` directly; wasm32 manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
