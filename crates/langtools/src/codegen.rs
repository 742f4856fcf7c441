//! Thin, language-agnostic wrapper around `inkwell`'s LLVM context/module/
//! builder trio, plus the two ways a finished module leaves the compiler:
//! JIT execution or an object file for the linker.

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::execution_engine::{ExecutionEngine, JitFunction};
use inkwell::module::Module;
use inkwell::targets::{CodeModel, FileType, RelocMode, Target, TargetMachine};
use inkwell::OptimizationLevel;
use std::path::Path;

use crate::init::ensure_native_target_initialized;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("unable to determine a target triple for this host")]
    UnableToFindTargetTriple,
    #[error("unable to create a target machine for triple `{0}`")]
    UnableToCreateTargetMachine(String),
    #[error("target does not support emitting object files")]
    TargetDoesNotSupportObjectFiles,
    #[error("unable to open object file at `{0}`")]
    UnableToOpenObjectFile(std::path::PathBuf),
    #[error("LLVM JIT engine creation failed: {0}")]
    UnableToCreateJitEngine(String),
    #[error("no function named `{0}` found in the compiled module")]
    FunctionNotFound(String),
}

/// Owns the LLVM context, module, and instruction builder for one
/// compilation unit. Generic language code builds up the module through
/// `module()`/`builder()`/`context()`, then converts the finished context
/// into either a [`JitContext`] or an on-disk object file.
pub struct CodegenContext<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
}

impl<'ctx> CodegenContext<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        Self {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
        }
    }

    pub fn context(&self) -> &'ctx Context {
        self.context
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    pub fn builder(&self) -> &Builder<'ctx> {
        &self.builder
    }

    /// A textual dump of the built module, for golden-output tests and
    /// `--emit=llvm-ir` style diagnostics.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    fn target_machine(opt: OptimizationLevel) -> Result<TargetMachine, CodegenError> {
        ensure_native_target_initialized();
        let triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&triple)
            .map_err(|_| CodegenError::UnableToFindTargetTriple)?;
        target
            .create_target_machine(
                &triple,
                &TargetMachine::get_host_cpu_name().to_string(),
                &TargetMachine::get_host_cpu_features().to_string(),
                opt,
                RelocMode::Default,
                CodeModel::Default,
            )
            .ok_or_else(|| CodegenError::UnableToCreateTargetMachine(triple.as_str().to_string_lossy().to_string()))
    }

    /// Consumes this context, building a JIT execution engine over the
    /// finished module.
    pub fn into_jit_context(self, opt: OptimizationLevel) -> Result<JitContext<'ctx>, CodegenError> {
        ensure_native_target_initialized();
        let engine = self
            .module
            .create_jit_execution_engine(opt)
            .map_err(|e| CodegenError::UnableToCreateJitEngine(e.to_string()))?;
        Ok(JitContext {
            module: self.module,
            engine,
        })
    }

    /// Consumes this context, writing the finished module as a native
    /// object file at `path`.
    pub fn into_object_file(self, path: &Path, opt: OptimizationLevel) -> Result<(), CodegenError> {
        let machine = Self::target_machine(opt)?;
        machine
            .write_to_file(&self.module, FileType::Object, path)
            .map_err(|_| CodegenError::UnableToOpenObjectFile(path.to_path_buf()))
    }
}

/// A module that has been handed to an LLVM execution engine for in-process
/// execution, used by `forgec run` and by integration tests that assert on
/// return values rather than on emitted IR text.
pub struct JitContext<'ctx> {
    module: Module<'ctx>,
    engine: ExecutionEngine<'ctx>,
}

impl<'ctx> JitContext<'ctx> {
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Looks up a compiled function by name and its exact LLVM-calling
    /// signature `F`. Fails if no function with that name was defined in
    /// the module (a signature mismatch is instead an `unsafe` contract the
    /// caller must uphold, per `inkwell`'s own API).
    ///
    /// # Safety
    /// The caller must ensure `F` exactly matches the declared LLVM
    /// function signature of `name`; a mismatch is undefined behavior.
    pub unsafe fn try_lookup_function<F: inkwell::execution_engine::UnsafeFunctionPointer>(
        &self,
        name: &str,
    ) -> Result<JitFunction<'ctx, F>, CodegenError> {
        self.engine
            .get_function(name)
            .map_err(|_| CodegenError::FunctionNotFound(name.to_string()))
    }
}
