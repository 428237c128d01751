// ABOUTME: nvidia-smi query library with typed, unit-aware report accessors
// ABOUTME: Runs nvidia-smi, parses its XML output and exposes per-GPU views

//! # nvsmi_query
//!
//! Run `nvidia-smi`, parse its XML report and read GPU telemetry through
//! typed accessors with units normalized (bytes, percent, degrees).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use nvsmi_query::{SmiQuery, SmiError};
//! # fn main() -> Result<(), SmiError> {
//! // Runs `nvidia-smi -q -x`
//! let snapshot = SmiQuery::new().query(None)?;
//!
//! println!("Driver {} / CUDA {}", snapshot.driver_version()?, snapshot.cuda_version()?);
//!
//! for gpu in snapshot.devices()? {
//!     println!(
//!         "{}: {} / {} bytes used, {}% busy",
//!         gpu.product_name()?,
//!         gpu.vram_used()?,
//!         gpu.vram_total()?,
//!         gpu.util_gpu_percent()?,
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Reports captured elsewhere can be read the same way:
//!
//! ```rust
//! # use nvsmi_query::SmiSnapshot;
//! let raw = "<nvidia_smi_log><attached_gpus>1</attached_gpus>\
//!            <gpu><temperature><gpu_temp>N/A</gpu_temp></temperature></gpu>\
//!            </nvidia_smi_log>";
//! let snapshot = SmiSnapshot::parse(raw).unwrap();
//! assert_eq!(snapshot.at(0).unwrap().temp_gpu_celsius().unwrap(), None);
//! ```
//!
//! ## Main Types
//!
//! - [`SmiQuery`] - Builds and runs one `nvidia-smi` invocation
//! - [`SmiSnapshot`] - One report: raw text, parsed tree, document metadata
//! - [`SmiDevice`] - One GPU with named accessors
//! - [`XmlDocument`] / [`NodeRef`] - The parsed element tree
//! - [`SmiError`] - Every failure, from spawning to field lookup
//!
//! Every accessor re-reads the tree on each call and returns an error rather
//! than a default when a field is missing or malformed. The only sentinel is
//! `"N/A"` for temperatures, which reads as `None`.

pub mod smi;

#[cfg(test)]
mod integration_tests;

// Re-export main types
pub use smi::{
    CommandExecutor, CommandOutput, NodeId, NodeIterator, NodeRef, ProcessExecutor, Result,
    SmiDevice, SmiError, SmiQuery, SmiSnapshot, UnitError, XmlDocument,
};

// Re-export field resolution and unit helpers
pub use smi::resolve::{resolve, resolve_as, resolve_with};
pub use smi::runner::build_args;
pub use smi::units::{parse_enabled, parse_mem_bytes, parse_percent, parse_temp};
