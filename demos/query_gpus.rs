// ABOUTME: Example demonstrating nvidia-smi report access
// ABOUTME: Shows document metadata, per-GPU memory, utilization and temperatures

use nvsmi_query::{SmiDevice, SmiError, SmiQuery, SmiSnapshot};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // With an argument, read a captured `nvidia-smi -q -x` report instead of running the tool
    let args: Vec<String> = env::args().collect();

    println!("🖥️  nvidia-smi Report Example");
    println!("============================");

    let snapshot = match args.get(1) {
        Some(path) => {
            println!("Reading report: {}", path);
            load_report(path)
        }
        None => {
            println!("Running: nvidia-smi -q -x");
            SmiQuery::new().query(None).map_err(Into::into)
        }
    };
    println!();

    match snapshot.and_then(|s| show_snapshot(&s).map_err(Into::into)) {
        Ok(_) => println!("✅ Report read successfully!"),
        Err(e) => {
            eprintln!("❌ Error reading report: {}", e);
            process::exit(1);
        }
    }
}

fn load_report(path: &str) -> Result<SmiSnapshot, Box<dyn std::error::Error>> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read report '{}': {}", path, e))?;
    Ok(SmiSnapshot::parse(raw)?)
}

fn show_snapshot(snapshot: &SmiSnapshot) -> Result<(), SmiError> {
    println!("📋 Report Information");
    println!("─────────────────────");
    println!("Timestamp:       {}", snapshot.timestamp()?);
    println!("Driver version:  {}", snapshot.driver_version()?);
    println!("CUDA version:    {}", snapshot.cuda_version()?);
    println!("Attached GPUs:   {}", snapshot.attached_gpus()?);
    println!("Raw size:        {} bytes", snapshot.raw().len());
    println!();

    for idx in 0..snapshot.attached_gpus()? {
        show_device(&snapshot.at(idx)?)?;
    }

    Ok(())
}

fn show_device(gpu: &SmiDevice<'_>) -> Result<(), SmiError> {
    println!("🎮 GPU {}: {}", gpu.index(), gpu.product_name()?);
    println!("─────────────────────────");
    println!("  Brand:          {}", gpu.product_brand()?);
    println!("  Architecture:   {}", gpu.product_architecture()?);
    println!("  UUID:           {}", gpu.uuid()?);

    // Serial is missing on consumer boards
    match gpu.serial() {
        Ok(serial) => println!("  Serial:         {}", serial),
        Err(SmiError::FieldNotFound { .. }) => println!("  Serial:         (not reported)"),
        Err(e) => return Err(e),
    }

    println!("  Display mode:   {}", enabled(gpu.display_mode()?));
    println!("  Display active: {}", enabled(gpu.display_active()?));
    println!("  Persistence:    {}", enabled(gpu.persistence_mode()?));

    println!("  💾 Memory");
    println!("    Total:    {}", mib(gpu.vram_total()?));
    println!("    Reserved: {}", mib(gpu.vram_reserved()?));
    println!("    Used:     {}", mib(gpu.vram_used()?));
    println!("    Free:     {}", mib(gpu.vram_free()?));

    println!("  📊 Utilization");
    println!("    GPU:     {:>3}%", gpu.util_gpu_percent()?);
    println!("    Memory:  {:>3}%", gpu.util_mem_percent()?);
    println!("    Encoder: {:>3}%", gpu.util_encoder_percent()?);
    println!("    Decoder: {:>3}%", gpu.util_decoder_percent()?);
    println!("    JPEG:    {:>3}%", gpu.util_jpeg_percent()?);
    println!("    OFA:     {:>3}%", gpu.util_ofa_percent()?);

    println!("  🌡️  Temperature");
    println!("    GPU:            {}", celsius(gpu.temp_gpu_celsius()?));
    println!("    Memory:         {}", celsius(gpu.temp_memory_celsius()?));
    println!("    T.Limit:        {}", celsius(gpu.temp_tlimit_celsius()?));
    println!("    Target:         {}", celsius(gpu.temp_target_celsius()?));
    println!("    Slowdown:       {}", celsius(gpu.temp_slow_threshold_celsius()?));
    println!("    Shutdown:       {}", celsius(gpu.temp_max_threshold_celsius()?));
    println!("    Max GPU:        {}", celsius(gpu.temp_max_gpu_threshold_celsius()?));
    println!("    Max memory:     {}", celsius(gpu.temp_max_mem_threshold_celsius()?));
    println!();

    Ok(())
}

fn enabled(on: bool) -> &'static str {
    if on { "Enabled" } else { "Disabled" }
}

fn mib(bytes: u64) -> String {
    format!("{} MiB ({} bytes)", bytes / (1024 * 1024), bytes)
}

fn celsius(temp: Option<i32>) -> String {
    match temp {
        Some(t) => format!("{} °C", t),
        None => "N/A".to_string(),
    }
}
