//! Argument lists for the daemons. Arguments are passed to the program
//! directly, never through a shell.

use crate::config::Binaries;
use crate::model::{ProcessDescriptor, Role};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaemonCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl DaemonCommand {
    pub fn for_process(process: &ProcessDescriptor, binaries: &Binaries) -> Self {
        let mut args: Vec<OsString> = Vec::new();
        let program = match &process.role {
            Role::Router { config_db } => {
                args.push("--logpath".into());
                args.push(process.paths.log_path.clone().into());
                args.push("--port".into());
                args.push(process.endpoint.port.to_string().into());
                args.push("--configdb".into());
                args.push(config_db.into());
                binaries.mongos.clone()
            }
            role => {
                if let Some(set) = &process.replica_set {
                    args.push("--replSet".into());
                    args.push(set.into());
                }
                if let Some(db_path) = &process.paths.db_path {
                    args.push("--dbpath".into());
                    args.push(db_path.clone().into());
                }
                args.push("--logpath".into());
                args.push(process.paths.log_path.clone().into());
                args.push("--port".into());
                args.push(process.endpoint.port.to_string().into());
                if *role == Role::ConfigServer {
                    args.push("--configsvr".into());
                }
                binaries.mongod.clone()
            }
        };
        args.push("--logappend".into());
        args.push("--fork".into());
        Self { program, args }
    }
}

impl fmt::Display for DaemonCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, ProcessPaths};
    use crate::topology::layout::Layout;

    fn render(process: &ProcessDescriptor) -> String {
        DaemonCommand::for_process(process, &Binaries::default()).to_string()
    }

    #[test]
    fn test_replica_set_member() {
        let process = ProcessDescriptor::new(
            "rs0/rs1",
            Role::DataNode,
            Layout::new("/tmp/x").paths(Some("rs0/rs1")),
            Endpoint::local(20000),
            Some("rs0".into()),
        );
        assert_eq!(
            render(&process),
            "mongod --replSet rs0 --dbpath /tmp/x/data/rs0/rs1/db \
             --logpath /tmp/x/data/rs0/rs1/mongod.log --port 20000 --logappend --fork"
        );
    }

    #[test]
    fn test_config_server_gets_role_flag_not_set_name() {
        let process = ProcessDescriptor::new(
            "config",
            Role::ConfigServer,
            Layout::new("/tmp/x").paths(Some("config")),
            Endpoint::local(27019),
            None,
        );
        let command = DaemonCommand::for_process(&process, &Binaries::default());
        assert!(command.args.contains(&OsString::from("--configsvr")));
        assert!(!command.args.contains(&OsString::from("--replSet")));
    }

    #[test]
    fn test_router() {
        let process = ProcessDescriptor::new(
            "mongos",
            Role::Router {
                config_db: "127.0.0.1:27019".into(),
            },
            Layout::new("/tmp/x").router_paths(),
            Endpoint::local(27020),
            None,
        );
        assert_eq!(
            render(&process),
            "mongos --logpath /tmp/x/data/mongos.log --port 27020 \
             --configdb 127.0.0.1:27019 --logappend --fork"
        );
    }

    #[test]
    fn test_paths_with_spaces_stay_one_argument() {
        let process = ProcessDescriptor::new(
            "mongod",
            Role::DataNode,
            ProcessPaths {
                data_dir: PathBuf::from("/tmp/my dir/data"),
                db_path: Some(PathBuf::from("/tmp/my dir/data/db")),
                log_path: PathBuf::from("/tmp/my dir/data/mongod.log"),
            },
            Endpoint::local(30000),
            None,
        );
        let command = DaemonCommand::for_process(&process, &Binaries::default());
        assert_eq!(command.args[1], OsString::from("/tmp/my dir/data/db"));
    }
}
