// ABOUTME: Whole-report view over one nvidia-smi invocation result
// ABOUTME: Owns the raw text and parsed tree, hands out per-GPU views

use super::device::SmiDevice;
use super::error::{Result, SmiError};
use super::resolve::{resolve, resolve_as, resolve_with};
use super::tree::{NodeRef, XmlDocument};
use chrono::{NaiveDateTime, Weekday};
use core::str::FromStr;

/// Layout of `<timestamp>` after the leading weekday, e.g. `Jan 02 15:04:05 2024`
pub const TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Parse `"<weekday> <month> <day> <hh:mm:ss> <year>"`
///
/// The weekday must be a three-letter abbreviation but is not checked
/// against the date.
fn parse_timestamp(text: &str) -> core::result::Result<NaiveDateTime, String> {
    let (weekday, rest) = text
        .trim()
        .split_once(' ')
        .ok_or("expected '<weekday> <month> <day> <time> <year>'")?;
    let is_abbrev = weekday.len() == 3 && weekday.chars().all(|c| c.is_ascii_alphabetic());
    if !is_abbrev || weekday.parse::<Weekday>().is_err() {
        return Err(format!("invalid weekday '{weekday}'"));
    }
    NaiveDateTime::parse_from_str(rest, TIMESTAMP_FORMAT).map_err(|e| e.to_string())
}

/// Result of one nvidia-smi query
///
/// The raw text is always kept; the parsed tree is only present when the
/// snapshot was built with [`SmiSnapshot::parse`].
#[derive(Debug, Clone)]
pub struct SmiSnapshot {
    raw: String,
    document: Option<XmlDocument>,
}

impl SmiSnapshot {
    const CONTEXT: &'static str = "SmiSnapshot";

    /// Parse raw XML output, keeping the text alongside the tree
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let document = XmlDocument::parse(&raw)?;
        Ok(Self {
            raw,
            document: Some(document),
        })
    }

    /// Keep raw output without parsing; tree accessors return [`SmiError::NotParsed`]
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            document: None,
        }
    }

    /// Output exactly as the tool produced it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_parsed(&self) -> bool {
        self.document.is_some()
    }

    /// Parsed tree, if any
    pub fn document(&self) -> Option<&XmlDocument> {
        self.document.as_ref()
    }

    /// Root `<nvidia_smi_log>` element
    pub fn root(&self) -> Result<NodeRef<'_>> {
        self.document
            .as_ref()
            .map(XmlDocument::root)
            .ok_or(SmiError::NotParsed)
    }

    /// Report time, as printed by the tool (local time, no zone)
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        resolve_with(self.root()?, Self::CONTEXT, "./timestamp", parse_timestamp)
    }

    pub fn driver_version(&self) -> Result<&str> {
        resolve(self.root()?, Self::CONTEXT, "./driver_version")
    }

    pub fn cuda_version(&self) -> Result<&str> {
        resolve(self.root()?, Self::CONTEXT, "./cuda_version")
    }

    /// Number of GPUs the report claims to describe
    pub fn attached_gpus(&self) -> Result<usize> {
        resolve_as(self.root()?, Self::CONTEXT, "./attached_gpus")
    }

    /// Alias for [`attached_gpus`](Self::attached_gpus)
    pub fn num_gpus(&self) -> Result<usize> {
        self.attached_gpus()
    }

    /// GPU at `index` in document order
    ///
    /// `index` must be below [`attached_gpus`](Self::attached_gpus). If the
    /// report holds fewer `<gpu>` elements than it claims, the error carries
    /// the number actually present.
    pub fn at(&self, index: usize) -> Result<SmiDevice<'_>> {
        let count = self.attached_gpus()?;
        if index >= count {
            return Err(SmiError::IndexOutOfRange { index, count });
        }

        let mut gpus = self.gpu_nodes()?;
        match gpus.nth(index) {
            Some(node) => Ok(SmiDevice::new(node, index)),
            None => Err(SmiError::IndexOutOfRange {
                index,
                count: self.gpu_nodes()?.count(),
            }),
        }
    }

    /// All GPUs in document order
    pub fn devices(&self) -> Result<impl Iterator<Item = SmiDevice<'_>>> {
        Ok(self
            .gpu_nodes()?
            .enumerate()
            .map(|(index, node)| SmiDevice::new(node, index)))
    }

    fn gpu_nodes(&self) -> Result<impl Iterator<Item = NodeRef<'_>>> {
        Ok(self.root()?.children().filter(|node| node.name() == "gpu"))
    }
}

impl FromStr for SmiSnapshot {
    type Err = SmiError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}
