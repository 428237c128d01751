// ABOUTME: Per-GPU view over one <gpu> element of an nvidia-smi report
// ABOUTME: Named accessors for identity, modes, memory, utilization and temperature

use super::error::Result;
use super::resolve::{resolve, resolve_with};
use super::tree::NodeRef;
use super::units::{parse_enabled, parse_mem_bytes, parse_percent, parse_temp};

/// One GPU of a [`SmiSnapshot`](super::SmiSnapshot)
///
/// Borrows the snapshot's tree, so it cannot outlive it. Every accessor walks
/// the tree again; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct SmiDevice<'a> {
    node: NodeRef<'a>,
    index: usize,
}

impl<'a> SmiDevice<'a> {
    const CONTEXT: &'static str = "SmiDevice";

    pub(crate) fn new(node: NodeRef<'a>, index: usize) -> Self {
        Self { node, index }
    }

    /// Ordinal of this GPU among the report's `<gpu>` elements
    pub fn index(&self) -> usize {
        self.index
    }

    /// The underlying `<gpu>` element, for fields without an accessor
    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    fn text(&self, path: &str) -> Result<&'a str> {
        resolve(self.node, Self::CONTEXT, path)
    }

    fn enabled(&self, path: &str) -> Result<bool> {
        self.text(path).map(parse_enabled)
    }

    fn mem(&self, path: &str) -> Result<u64> {
        resolve_with(self.node, Self::CONTEXT, path, parse_mem_bytes)
    }

    fn percent(&self, path: &str) -> Result<u32> {
        resolve_with(self.node, Self::CONTEXT, path, parse_percent)
    }

    fn temp(&self, path: &str) -> Result<Option<i32>> {
        resolve_with(self.node, Self::CONTEXT, path, parse_temp)
    }

    pub fn product_name(&self) -> Result<&'a str> {
        self.text("./product_name")
    }

    pub fn product_brand(&self) -> Result<&'a str> {
        self.text("./product_brand")
    }

    pub fn product_architecture(&self) -> Result<&'a str> {
        self.text("./product_architecture")
    }

    pub fn display_mode(&self) -> Result<bool> {
        self.enabled("./display_mode")
    }

    pub fn display_active(&self) -> Result<bool> {
        self.enabled("./display_active")
    }

    pub fn persistence_mode(&self) -> Result<bool> {
        self.enabled("./persistence_mode")
    }

    /// Raw addressing mode text (drivers report `"None"` on most boards)
    pub fn addressing_mode(&self) -> Result<&'a str> {
        self.text("./addressing_mode")
    }

    pub fn serial(&self) -> Result<&'a str> {
        self.text("./serial")
    }

    pub fn uuid(&self) -> Result<&'a str> {
        self.text("./uuid")
    }

    // Frame buffer memory, in bytes

    pub fn fb_mem_total(&self) -> Result<u64> {
        self.mem("./fb_memory_usage/total")
    }

    pub fn fb_mem_reserved(&self) -> Result<u64> {
        self.mem("./fb_memory_usage/reserved")
    }

    pub fn fb_mem_used(&self) -> Result<u64> {
        self.mem("./fb_memory_usage/used")
    }

    pub fn fb_mem_free(&self) -> Result<u64> {
        self.mem("./fb_memory_usage/free")
    }

    /// Alias for [`fb_mem_total`](Self::fb_mem_total)
    pub fn vram_total(&self) -> Result<u64> {
        self.fb_mem_total()
    }

    /// Alias for [`fb_mem_reserved`](Self::fb_mem_reserved)
    pub fn vram_reserved(&self) -> Result<u64> {
        self.fb_mem_reserved()
    }

    /// Alias for [`fb_mem_used`](Self::fb_mem_used)
    pub fn vram_used(&self) -> Result<u64> {
        self.fb_mem_used()
    }

    /// Alias for [`fb_mem_free`](Self::fb_mem_free)
    pub fn vram_free(&self) -> Result<u64> {
        self.fb_mem_free()
    }

    // Utilization, in percent

    pub fn util_gpu_percent(&self) -> Result<u32> {
        self.percent("./utilization/gpu_util")
    }

    pub fn util_mem_percent(&self) -> Result<u32> {
        self.percent("./utilization/memory_util")
    }

    pub fn util_encoder_percent(&self) -> Result<u32> {
        self.percent("./utilization/encoder_util")
    }

    pub fn util_decoder_percent(&self) -> Result<u32> {
        self.percent("./utilization/decoder_util")
    }

    pub fn util_jpeg_percent(&self) -> Result<u32> {
        self.percent("./utilization/jpeg_util")
    }

    pub fn util_ofa_percent(&self) -> Result<u32> {
        self.percent("./utilization/ofa_util")
    }

    // Temperatures, `None` where the driver reports N/A

    pub fn temp_gpu_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_temp")
    }

    /// Distance to the slowdown limit (T.Limit)
    pub fn temp_tlimit_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_temp_tlimit")
    }

    pub fn temp_max_threshold_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_temp_max_threshold")
    }

    pub fn temp_slow_threshold_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_temp_slow_threshold")
    }

    pub fn temp_max_gpu_threshold_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_temp_max_gpu_threshold")
    }

    pub fn temp_target_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_target_temperature")
    }

    pub fn temp_memory_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/memory_temp")
    }

    pub fn temp_max_mem_threshold_celsius(&self) -> Result<Option<i32>> {
        self.temp("./temperature/gpu_temp_max_mem_threshold")
    }
}
