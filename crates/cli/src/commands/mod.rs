//! Command implementations.

mod handle;
mod info;
mod input;
mod run;
mod validate;

pub use handle::run_handle;
pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;
