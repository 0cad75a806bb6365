mod init;
mod list;
mod run;
mod version;

pub use init::cmd_init;
pub use list::cmd_list;
pub use run::cmd_run;
pub use version::cmd_version;
