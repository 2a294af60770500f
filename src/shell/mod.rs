//! External process execution.

pub mod command;
pub mod mock;
pub mod user;

pub use command::{
    display_command, execute, CommandOptions, CommandResult, ProcessRunner, SystemRunner,
};
pub use mock::{MockRunner, RecordedCall};
pub use user::UserAccount;
