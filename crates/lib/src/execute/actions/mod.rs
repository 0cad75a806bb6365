//! Per-kind task executors.

pub mod clean;
pub mod cmd;
pub mod concat;
pub mod copy;
pub mod version;

pub use clean::execute_clean;
pub use cmd::{execute_cmd, execute_tool};
pub use concat::{ConcatOptions, execute_concat};
pub use copy::execute_copy;
pub use version::execute_write_version;
