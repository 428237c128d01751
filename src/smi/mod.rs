// ABOUTME: nvidia-smi report access: XML tree, field resolution and typed views
// ABOUTME: Also hosts the query runner that produces reports

pub mod device;
pub mod error;
mod parser;
pub mod resolve;
pub mod runner;
pub mod snapshot;
pub mod tree;
pub mod units;

pub use device::SmiDevice;
pub use error::{Result, SmiError};
pub use resolve::{resolve, resolve_as, resolve_with};
pub use runner::{CommandExecutor, CommandOutput, ProcessExecutor, SmiQuery, build_args};
pub use snapshot::SmiSnapshot;
pub use tree::{NodeId, NodeIterator, NodeRef, XmlDocument};
pub use units::UnitError;
