//! End-to-end scenarios: lex a source string, run it through the semantic
//! pipeline, lower it to LLVM IR, JIT it, and call into the result.

use inkwell::context::Context;
use inkwell::OptimizationLevel;

use langtools::diagnostics::{MessageContext, Severity};
use langtools::source::Source;
use langtools::tree::Tree;

/// Runs the full pipeline over `source` and hands back the diagnostics
/// alongside a closure-friendly JIT context. Panics (via `assert`) if
/// parsing or analysis produced errors, since every scenario here is
/// expected to compile cleanly.
macro_rules! jit_module {
    ($source:expr) => {{
        let source = Source::new("--", $source);
        let mut tree = Tree::new();
        let mut messages = MessageContext::new();

        let root = forgec::parse_source(source, &mut tree, &mut messages);
        assert!(!messages.has_errors(), "parse errors: {:?}", messages.messages());
        forgec::analyze(&mut tree, root, &mut messages);
        assert!(!messages.has_errors(), "analysis errors: {:?}", messages.messages());

        langtools::init::ensure_native_target_initialized();
        let context = Context::create();
        let codegen_ctx = forgec::codegen::compile_module(&context, "test", &tree, root);
        codegen_ctx.into_jit_context(OptimizationLevel::None).expect("jit engine creation")
    }};
}

/// Parses and analyzes `source`, returning the diagnostics without
/// requiring them to be error-free, for negative-case assertions.
fn analyze_only(source: &str) -> MessageContext {
    let source = Source::new("--", source);
    let mut tree = Tree::new();
    let mut messages = MessageContext::new();
    let root = forgec::parse_source(source, &mut tree, &mut messages);
    if !messages.has_errors() {
        forgec::analyze(&mut tree, root, &mut messages);
    }
    messages
}

fn has_code(messages: &MessageContext, code: &str) -> bool {
    messages.messages().iter().any(|m| m.code == Some(code))
}

fn has_warning(messages: &MessageContext, code: &str) -> bool {
    messages
        .messages()
        .iter()
        .any(|m| m.code == Some(code) && m.severity == Severity::Warning)
}

#[test]
fn arithmetic_with_implicit_widening() {
    let jit = jit_module!("func f(a: i8, b: i32) -> i32 { return a + b; }");
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(i8, i32) -> i32>("f").unwrap() };
    assert_eq!(unsafe { f.call(0, 0) }, 0);
    assert_eq!(unsafe { f.call(1, 2) }, 3);
}

#[test]
fn control_flow_with_locals() {
    let jit = jit_module!(
        "func f() -> i32 { let x: i32 = 0; let y: i32 = 5; if x < y { return 1; } else { return 2; } }"
    );
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn() -> i32>("f").unwrap() };
    assert_eq!(unsafe { f.call() }, 1);
}

#[test]
fn parameter_driven_branch() {
    let jit = jit_module!(
        "func f(y: i32) -> i32 { let x: i32 = 0; if x < y { return 1; } else { return 2; } }"
    );
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(i32) -> i32>("f").unwrap() };
    assert_eq!(unsafe { f.call(5) }, 1);
    assert_eq!(unsafe { f.call(1) }, 1);
    assert_eq!(unsafe { f.call(0) }, 2);
    assert_eq!(unsafe { f.call(-5) }, 2);
}

#[test]
fn even_detection_readable_form() {
    let jit = jit_module!("func f(a: i32) -> bool { return a % 2 == 0; }");
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(i32) -> bool>("f").unwrap() };
    assert!(unsafe { f.call(0) });
    assert!(!unsafe { f.call(1) });
    assert!(unsafe { f.call(2) });
    assert!(!unsafe { f.call(3) });
}

/// Bitwise operators bind tighter than comparisons (`a & 1 == 0` parses as
/// `(a & 1) == 0`), so this form is equivalent to the readable one above
/// rather than degenerating to `a & (1 == 0)`.
#[test]
fn even_detection_bitwise_form() {
    let jit = jit_module!("func f(a: i32) -> bool { return a & 1 == 0; }");
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(i32) -> bool>("f").unwrap() };
    assert!(unsafe { f.call(0) });
    assert!(!unsafe { f.call(1) });
    assert!(unsafe { f.call(2) });
    assert!(!unsafe { f.call(3) });
}

#[test]
fn multiplication_over_f32() {
    let jit = jit_module!("func f(a: f32, b: f32) -> f32 { return a * b; }");
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(f32, f32) -> f32>("f").unwrap() };
    assert_eq!(unsafe { f.call(2.5, 4.0) }, 2.5f32 * 4.0f32);
    assert_eq!(unsafe { f.call(0.1, 3.0) }, 0.1f32 * 3.0f32);
}

#[test]
fn undeclared_symbol_reports_expected_code() {
    let messages = analyze_only("func f() -> i32 { return unknown_name; }");
    assert!(messages.has_errors());
    assert!(has_code(&messages, "undeclared-symbol"));
}

#[test]
fn bare_return_in_non_void_function_reports_type_mismatch() {
    let messages = analyze_only("func f() -> i32 { return; }");
    assert!(messages.has_errors());
    assert!(has_code(&messages, "type-mismatch"));
}

#[test]
fn break_at_file_scope_reports_expected_code() {
    let messages = analyze_only("func f() -> i32 { break; return 0; }");
    assert!(messages.has_errors());
    assert!(has_code(&messages, "break-outside-loop"));
}

#[test]
fn struct_field_read_and_write() {
    let jit = jit_module!(
        "struct Point { x: i32; y: i32; } \
         func f() -> i32 { let p: Point; p.x = 3; p.y = 4; return p.x + p.y; }"
    );
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn() -> i32>("f").unwrap() };
    assert_eq!(unsafe { f.call() }, 7);
}

#[test]
fn member_access_on_non_struct_reports_type_mismatch() {
    let messages = analyze_only("func f() -> i32 { let x: i32 = 0; return x.y; }");
    assert!(messages.has_errors());
    assert!(has_code(&messages, "type-mismatch"));
}

#[test]
fn exponentiation_of_integers() {
    let jit = jit_module!("func f(a: i32, b: i32) -> i32 { return a ** b; }");
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(i32, i32) -> i32>("f").unwrap() };
    assert_eq!(unsafe { f.call(2, 10) }, 1024);
    assert_eq!(unsafe { f.call(3, 0) }, 1);
}

#[test]
fn exponentiation_of_floats() {
    let jit = jit_module!("func f(a: f64, b: f64) -> f64 { return a ** b; }");
    let f = unsafe { jit.try_lookup_function::<unsafe extern "C" fn(f64, f64) -> f64>("f").unwrap() };
    assert_eq!(unsafe { f.call(2.0, 10.0) }, 1024.0);
}

#[test]
fn dead_code_after_return_reports_warning() {
    let messages = analyze_only("func f() -> i32 { return 1; let x: i32 = 2; }");
    assert!(!messages.has_errors());
    assert!(has_warning(&messages, "dead-code-after-terminator"));
}
