// ============================================================================
// vidmark-cli/src/commands/mod.rs
// ============================================================================
//
// COMMAND HANDLERS: Implementation of CLI Subcommands
//
// One submodule per subcommand; `main.rs` dispatches here.
//
// AI-ASSISTANT-INFO: CLI subcommand implementations

pub mod annotate;

pub use annotate::run_annotate;
