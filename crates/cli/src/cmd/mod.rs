mod build;
mod clean;
mod deploy;
mod kickstart;
mod stages;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use deploy::cmd_deploy;
pub use kickstart::cmd_kickstart;
pub use stages::cmd_stages;
