//! Plain data: requests, process descriptors and the replica-set document.

pub mod endpoint;
pub mod process;
pub mod replset;
pub mod request;

pub use endpoint::*;
pub use process::*;
pub use replset::*;
pub use request::*;
