//! The `forgec` command-line entry point: wires the CLI subcommands to the
//! lex → parse → semantic-pass → codegen pipeline.

mod cli;

use std::fs;
use std::process::ExitCode;

use inkwell::context::Context;
use inkwell::OptimizationLevel;
use log::error;

use cli::{BuildArgs, CheckArgs, Cli, Command, RunArgs};
use langtools::diagnostics::{self, MessageContext};
use langtools::source::Source;
use langtools::tree::Tree;

fn read_source(path: &std::path::Path) -> anyhow::Result<std::sync::Arc<Source>> {
    let content = fs::read_to_string(path)?;
    Ok(Source::new(path.display().to_string(), content))
}

fn report_and_exit_code(messages: &MessageContext) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = diagnostics::report(messages, &mut stderr);
    if messages.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let source = read_source(&args.file)?;
    let mut tree = Tree::new();
    let mut messages = MessageContext::new();

    let root = forgec::parse_source(source, &mut tree, &mut messages);
    if !messages.has_errors() {
        forgec::analyze(&mut tree, root, &mut messages);
    }

    Ok(report_and_exit_code(&messages))
}

fn run_build(args: BuildArgs) -> anyhow::Result<ExitCode> {
    let source = read_source(&args.file)?;
    let mut tree = Tree::new();
    let mut messages = MessageContext::new();

    let root = forgec::parse_source(source, &mut tree, &mut messages);
    if !messages.has_errors() {
        forgec::analyze(&mut tree, root, &mut messages);
    }
    if messages.has_errors() {
        return Ok(report_and_exit_code(&messages));
    }

    langtools::init::ensure_native_target_initialized();
    let context = Context::create();
    let module_name = args.file.file_stem().and_then(|s| s.to_str()).unwrap_or("module");
    let codegen_ctx = forgec::codegen::compile_module(&context, module_name, &tree, root);
    codegen_ctx.into_object_file(&args.output, OptimizationLevel::Default)?;

    Ok(ExitCode::SUCCESS)
}

fn run_run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let source = read_source(&args.file)?;
    let mut tree = Tree::new();
    let mut messages = MessageContext::new();

    let root = forgec::parse_source(source, &mut tree, &mut messages);
    if !messages.has_errors() {
        forgec::analyze(&mut tree, root, &mut messages);
    }
    if messages.has_errors() {
        return Ok(report_and_exit_code(&messages));
    }

    langtools::init::ensure_native_target_initialized();
    let context = Context::create();
    let module_name = args.file.file_stem().and_then(|s| s.to_str()).unwrap_or("module");
    let codegen_ctx = forgec::codegen::compile_module(&context, module_name, &tree, root);
    let jit = codegen_ctx.into_jit_context(OptimizationLevel::Default)?;

    let entry = unsafe { jit.try_lookup_function::<unsafe extern "C" fn() -> i32>("main")? };
    let code = unsafe { entry.call() };
    Ok(ExitCode::from(code as u8))
}

fn main() -> ExitCode {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let result = match args.command {
        Command::Build(build_args) => run_build(build_args),
        Command::Run(run_args) => run_run(run_args),
        Command::Check(check_args) => run_check(check_args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
