//! Command-line surface. Parsing produces an immutable [`TopologyRequest`]
//! and [`LaunchSettings`]; nothing else reads the arguments.

use crate::config::{Binaries, LaunchSettings};
use crate::error::LaunchError;
use crate::model::{
    shard_names, ConfigServers, MemberCounts, Mode, ReplicaSetSpec, ShardMode, ShardedSpec,
    TopologyRequest, DEFAULT_NODES, DEFAULT_PORT, DEFAULT_SET_NAME,
};
use crate::readiness::PollSettings;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "mlaunch")]
#[command(about = "Launch MongoDB stand-alone servers, replica sets, and shards on localhost")]
#[command(group(ArgGroup::new("mode").required(true).args(["single", "replicaset"])))]
pub struct Cli {
    /// Base directory for db and log paths
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Create a single stand-alone mongod instance
    #[arg(long)]
    pub single: bool,

    /// Create a replica set with several mongod instances
    #[arg(long)]
    pub replicaset: bool,

    /// Number of data nodes per replica set
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_NODES, conflicts_with = "single")]
    pub nodes: usize,

    /// Add an arbiter to each replica set
    #[arg(long, conflicts_with = "single")]
    pub arbiter: bool,

    /// Name of the replica set (ignored when sharded; shards are named instead)
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SET_NAME, conflicts_with = "single")]
    pub name: String,

    /// Shard count, or the names of the shards
    #[arg(long, value_name = "NUM|NAME", num_args = 1..)]
    pub sharded: Option<Vec<String>>,

    /// Number of config servers (1 or 3)
    #[arg(long = "config", value_name = "NUM", default_value_t = 1,
          value_parser = PossibleValuesParser::new(["1", "3"]).map(|s| s.parse::<u8>().unwrap_or(1)),
          requires = "sharded")]
    pub config_servers: u8,

    /// Port of the first process; further processes use the following ports
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Start a client shell connected to the node, primary seed, or router
    #[arg(long)]
    pub mongo: bool,

    /// Print every derived command and wait event
    #[arg(long)]
    pub verbose: bool,

    /// mongod executable
    #[arg(long, env = "MLAUNCH_MONGOD", default_value = "mongod")]
    pub mongod_bin: PathBuf,

    /// mongos executable
    #[arg(long, env = "MLAUNCH_MONGOS", default_value = "mongos")]
    pub mongos_bin: PathBuf,

    /// Client shell executable, also used for admin commands
    #[arg(long, env = "MLAUNCH_SHELL", default_value = "mongosh")]
    pub shell_bin: PathBuf,

    /// Seconds between connection attempts while waiting for a process
    #[arg(long, value_name = "SECS", default_value_t = 1)]
    pub poll_interval_secs: u64,

    /// Seconds to wait for a process to accept connections
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub ready_timeout_secs: u64,
}

impl Cli {
    pub fn topology_request(&self) -> Result<TopologyRequest, LaunchError> {
        let mode = match (&self.sharded, self.replicaset) {
            (None, false) => Mode::Single,
            (None, true) => Mode::ReplicaSet(ReplicaSetSpec::new(
                self.name.clone(),
                MemberCounts::new(self.nodes, self.arbiter)?,
            )?),
            (Some(values), replicaset) => {
                let shard_mode = if replicaset {
                    ShardMode::ReplicaSet(MemberCounts::new(self.nodes, self.arbiter)?)
                } else {
                    ShardMode::Single
                };
                Mode::Sharded(ShardedSpec::new(
                    shard_names(values)?,
                    ConfigServers::from_count(self.config_servers)?,
                    shard_mode,
                )?)
            }
        };
        Ok(TopologyRequest {
            base_dir: self.dir.clone(),
            start_port: self.port,
            mode,
        })
    }

    pub fn settings(&self) -> Result<LaunchSettings, LaunchError> {
        if self.poll_interval_secs == 0 {
            return Err(LaunchError::Configuration(
                "poll interval must be at least one second".into(),
            ));
        }
        Ok(LaunchSettings {
            binaries: Binaries {
                mongod: self.mongod_bin.clone(),
                mongos: self.mongos_bin.clone(),
                shell: self.shell_bin.clone(),
            },
            poll: PollSettings {
                interval: Duration::from_secs(self.poll_interval_secs),
                timeout: Duration::from_secs(self.ready_timeout_secs),
            },
            verbose: self.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mlaunch").chain(args.iter().copied()))
    }

    #[test]
    fn test_single_defaults() {
        let cli = parse(&["--single"]).unwrap();
        let request = cli.topology_request().unwrap();
        assert_eq!(request.mode, Mode::Single);
        assert_eq!(request.start_port, 27017);
        assert_eq!(request.base_dir, PathBuf::from("."));
        let settings = cli.settings().unwrap();
        assert_eq!(settings.poll, PollSettings::default());
    }

    #[test]
    fn test_replica_set() {
        let cli = parse(&["--replicaset", "--nodes", "3", "--arbiter", "--name", "rs0", "--port", "20000", "/tmp/x"]).unwrap();
        let request = cli.topology_request().unwrap();
        assert_eq!(request.base_dir, PathBuf::from("/tmp/x"));
        assert_eq!(request.start_port, 20000);
        let Mode::ReplicaSet(spec) = request.mode else {
            panic!("expected replica set");
        };
        assert_eq!(spec.name, "rs0");
        assert_eq!(spec.members.width(), 4);
    }

    #[test]
    fn test_mode_is_required_and_exclusive() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--single", "--replicaset"]).is_err());
    }

    #[test]
    fn test_replica_set_options_require_replicaset() {
        assert!(parse(&["--single", "--arbiter"]).is_err());
        assert!(parse(&["--single", "--nodes", "5"]).is_err());
        assert!(parse(&["--single", "--name", "x"]).is_err());
        assert!(parse(&["--single", "--sharded", "2", "--arbiter"]).is_err());
        let err = parse(&["--single", "--arbiter"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_config_count_validated() {
        assert!(parse(&["--single", "--sharded", "2", "--config", "2"]).is_err());
        assert!(parse(&["--single", "--config", "3"]).is_err());
        let cli = parse(&["--single", "--sharded", "2", "--config", "3"]).unwrap();
        let Mode::Sharded(spec) = cli.topology_request().unwrap().mode else {
            panic!("expected sharded");
        };
        assert_eq!(spec.config_servers, ConfigServers::Three);
        assert_eq!(spec.shards, vec!["shard01", "shard02"]);
        assert_eq!(spec.shard_mode, ShardMode::Single);
    }

    #[test]
    fn test_sharded_replica_sets_with_names() {
        let cli = parse(&["--replicaset", "--nodes", "2", "--sharded", "east", "west"]).unwrap();
        let Mode::Sharded(spec) = cli.topology_request().unwrap().mode else {
            panic!("expected sharded");
        };
        assert_eq!(spec.shards, vec!["east", "west"]);
        assert_eq!(
            spec.shard_mode,
            ShardMode::ReplicaSet(MemberCounts::new(2, false).unwrap())
        );
    }

    #[test]
    fn test_zero_nodes_is_configuration_error() {
        let cli = parse(&["--replicaset", "--nodes", "0"]).unwrap();
        assert!(matches!(cli.topology_request(), Err(LaunchError::Configuration(_))));
    }

    #[test]
    fn test_sharded_values_checked_before_planning() {
        let cli = parse(&["--single", "--sharded", "config"]).unwrap();
        assert!(matches!(cli.topology_request(), Err(LaunchError::Configuration(_))));
        let cli = parse(&["--single", "--sharded", "4000000000"]).unwrap();
        assert!(matches!(cli.topology_request(), Err(LaunchError::Configuration(_))));
    }
}
