//! CLI command handlers, one per subcommand.

mod fetch;
mod local;
mod plan;

pub use fetch::run_fetch;
pub use local::run_local;
pub use plan::run_plan;
