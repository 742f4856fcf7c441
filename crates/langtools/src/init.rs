//! Process-wide, one-shot native-target initialization.
//!
//! Mirrors the original's startup sequence (ICU data load, then LLVM target
//! init) collapsed to the one step `inkwell` still requires: registering the
//! host's native target so a [`crate::codegen::CodegenContext`] can build a
//! `TargetMachine` for JIT execution or object emission. Safe to call many
//! times; only the first call does any work.

use std::sync::Once;

static INIT: Once = Once::new();

/// Registers the native LLVM target for the running process, if it has not
/// been registered already. Must be called before building a
/// [`crate::codegen::CodegenContext`]'s target machine.
pub fn ensure_native_target_initialized() {
    INIT.call_once(|| {
        inkwell::targets::Target::initialize_native(&inkwell::targets::InitializationConfig::default())
            .expect("failed to initialize native LLVM target");
    });
}
