//! Starting external processes: daemons and the optional client shell.

pub mod command;
pub mod shell;
pub mod spawner;

pub use command::DaemonCommand;
pub use shell::spawn_client_shell;
pub use spawner::*;
