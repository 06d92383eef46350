use crate::model::Endpoint;
use serde::{Deserialize, Serialize};

/// The document sent with `replSetInitiate`.
///
/// Member ids follow the order members were added and are never renumbered;
/// the server stores them as part of the set's durable configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSetConfig {
    #[serde(rename = "_id")]
    pub name: String,
    pub members: Vec<ReplicaSetMember>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSetMember {
    #[serde(rename = "_id")]
    pub id: u32,
    pub host: String,
    #[serde(rename = "arbiterOnly", default, skip_serializing_if = "std::ops::Not::not")]
    pub arbiter_only: bool,
}

impl ReplicaSetConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Appends a member and returns the id it was given.
    pub fn add_member(&mut self, endpoint: &Endpoint, arbiter_only: bool) -> u32 {
        let id = self.members.len() as u32;
        self.members.push(ReplicaSetMember {
            id,
            host: endpoint.to_string(),
            arbiter_only,
        });
        id
    }
}
