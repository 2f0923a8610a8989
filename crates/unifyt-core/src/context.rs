//! Unit-system context: a per-thread stack of system names ("SI", "imperial", …).
//!
//! The name is only a tag that callers can read back; no conversion looks at it.
//! [UnitContext::enter] pushes a name and returns a guard that restores the
//! previous state when dropped, including on early returns and panics.

use crate::error::ContextError;
use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    /// Active unit systems for this thread, innermost last.
    static SYSTEMS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Entry point for scoped unit-system selection.
pub struct UnitContext;

impl UnitContext {
    /// Make `system` current until the returned guard is dropped.
    pub fn enter(system: &str) -> Result<UnitSystemGuard, ContextError> {
        let system = system.trim();
        if system.is_empty() {
            return Err(ContextError::InvalidUnitSystem(system.to_string()));
        }
        let depth = SYSTEMS.with(|s| {
            let mut stack = s.borrow_mut();
            let depth = stack.len();
            stack.push(system.to_string());
            depth
        });
        tracing::debug!(system, depth, "entered unit system");
        Ok(UnitSystemGuard {
            depth,
            _not_send: PhantomData,
        })
    }

    /// Innermost active system on this thread, if any.
    pub fn current() -> Option<String> {
        current_system()
    }
}

/// Restores the previous unit system on drop. Tied to the thread that created it.
#[must_use = "the unit system is reset as soon as the guard is dropped"]
pub struct UnitSystemGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl UnitSystemGuard {
    /// The system this guard made current.
    pub fn system(&self) -> Option<String> {
        SYSTEMS.with(|s| s.borrow().get(self.depth).cloned())
    }
}

impl Drop for UnitSystemGuard {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread teardown.
        let _ = SYSTEMS.try_with(|s| s.borrow_mut().truncate(self.depth));
        tracing::debug!(depth = self.depth, "left unit system");
    }
}

/// Innermost active system on this thread, if any.
pub fn current_system() -> Option<String> {
    SYSTEMS.with(|s| s.borrow().last().cloned())
}

/// Run `f` with `system` current, restoring the previous system afterwards.
pub fn with_unit_system<R>(system: &str, f: impl FnOnce() -> R) -> Result<R, ContextError> {
    let _guard = UnitContext::enter(system)?;
    Ok(f())
}
