// ABOUTME: Integration tests using captured nvidia-smi XML reports
// ABOUTME: Validates snapshot and device accessors against realistic output

use crate::smi::{CommandExecutor, CommandOutput, Result, SmiError, SmiQuery, SmiSnapshot};

fn load_single_gpu() -> &'static str {
    include_str!("../test-data/single_gpu.xml")
}

fn load_dual_gpu() -> &'static str {
    include_str!("../test-data/dual_gpu.xml")
}

/// Executor that replays a captured report
struct ReplayExecutor(&'static str);

impl CommandExecutor for ReplayExecutor {
    fn execute(&self, _program: &str, _args: &[String]) -> Result<CommandOutput> {
        Ok(CommandOutput {
            code: Some(0),
            success: true,
            stdout: self.0.to_string(),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod captured_report_tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_single_gpu_end_to_end() {
        let snapshot = SmiQuery::new()
            .with_executor(ReplayExecutor(load_single_gpu()))
            .query(None)
            .expect("Failed to query replayed report");

        assert_eq!(snapshot.attached_gpus().unwrap(), 1);

        let gpu = snapshot.at(0).unwrap();
        assert_eq!(gpu.vram_total().unwrap(), 25_769_803_776);
        assert_eq!(gpu.util_gpu_percent().unwrap(), 13);
        assert_eq!(gpu.temp_gpu_celsius().unwrap(), Some(45));
        assert!(gpu.display_mode().unwrap());
    }

    #[test]
    fn test_single_gpu_metadata() {
        let snapshot = SmiSnapshot::parse(load_single_gpu()).unwrap();

        let ts = snapshot.timestamp().unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 13));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (9, 41, 27));

        assert_eq!(snapshot.driver_version().unwrap(), "550.54.14");
        assert_eq!(snapshot.cuda_version().unwrap(), "12.4");
        assert_eq!(snapshot.num_gpus().unwrap(), 1);
    }

    #[test]
    fn test_single_gpu_every_accessor() {
        let snapshot = SmiSnapshot::parse(load_single_gpu()).unwrap();
        let gpu = snapshot.at(0).unwrap();

        assert_eq!(gpu.product_name().unwrap(), "NVIDIA RTX A5000");
        assert_eq!(gpu.product_brand().unwrap(), "NVIDIA RTX");
        assert_eq!(gpu.product_architecture().unwrap(), "Ampere");
        assert!(!gpu.display_active().unwrap());
        assert!(gpu.persistence_mode().unwrap());
        assert_eq!(gpu.addressing_mode().unwrap(), "None");
        assert_eq!(gpu.serial().unwrap(), "1322021012345");
        assert_eq!(
            gpu.uuid().unwrap(),
            "GPU-8e1b2c3d-4f5a-6b7c-8d9e-0f1a2b3c4d5e"
        );

        let mib = 1024 * 1024;
        assert_eq!(gpu.fb_mem_total().unwrap(), 24576 * mib);
        assert_eq!(gpu.fb_mem_reserved().unwrap(), 423 * mib);
        assert_eq!(gpu.fb_mem_used().unwrap(), 1024 * mib);
        assert_eq!(gpu.fb_mem_free().unwrap(), 23129 * mib);
        assert_eq!(
            gpu.vram_reserved().unwrap() + gpu.vram_used().unwrap() + gpu.vram_free().unwrap(),
            gpu.vram_total().unwrap()
        );

        assert_eq!(gpu.util_mem_percent().unwrap(), 5);
        assert_eq!(gpu.util_encoder_percent().unwrap(), 0);
        assert_eq!(gpu.util_decoder_percent().unwrap(), 0);
        assert_eq!(gpu.util_jpeg_percent().unwrap(), 0);
        assert_eq!(gpu.util_ofa_percent().unwrap(), 0);

        assert_eq!(gpu.temp_tlimit_celsius().unwrap(), None);
        assert_eq!(gpu.temp_max_threshold_celsius().unwrap(), Some(98));
        assert_eq!(gpu.temp_slow_threshold_celsius().unwrap(), Some(95));
        assert_eq!(gpu.temp_max_gpu_threshold_celsius().unwrap(), Some(93));
        assert_eq!(gpu.temp_target_celsius().unwrap(), None);
        assert_eq!(gpu.temp_memory_celsius().unwrap(), None);
        assert_eq!(gpu.temp_max_mem_threshold_celsius().unwrap(), None);
    }

    #[test]
    fn test_single_gpu_raw_node_access() {
        let snapshot = SmiSnapshot::parse(load_single_gpu()).unwrap();
        let gpu = snapshot.at(0).unwrap();

        let bus_id = gpu.node().find("./pci/pci_bus_id").and_then(|n| n.text());
        assert_eq!(bus_id, Some("00000000:01:00.0"));

        // <processes> holds only whitespace
        assert_eq!(gpu.node().find("./processes").unwrap().text(), None);
    }

    #[test]
    fn test_raw_round_trip() {
        let raw = load_single_gpu();
        let snapshot = SmiSnapshot::parse(raw).unwrap();
        assert_eq!(snapshot.raw(), raw);
        assert_eq!(snapshot.raw().as_bytes(), raw.as_bytes());
    }

    #[test]
    fn test_dual_gpu_indexing() {
        let snapshot = SmiSnapshot::parse(load_dual_gpu()).unwrap();
        assert_eq!(snapshot.attached_gpus().unwrap(), 2);

        let uuids: Vec<_> = (0..2)
            .map(|i| snapshot.at(i).unwrap().uuid().unwrap())
            .collect();
        assert_eq!(
            uuids,
            [
                "GPU-0a1b2c3d-0000-1111-2222-333344445555",
                "GPU-6f7e8d9c-6666-7777-8888-9999aaaabbbb"
            ]
        );

        assert!(matches!(
            snapshot.at(2),
            Err(SmiError::IndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_dual_gpu_padded_timestamp() {
        // ctime pads single-digit days with a space: "Fri Jun  7"
        let snapshot = SmiSnapshot::parse(load_dual_gpu()).unwrap();
        let ts = snapshot.timestamp().unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 6, 7));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (22, 15, 3));
    }

    #[test]
    fn test_dual_gpu_spaced_units() {
        let snapshot = SmiSnapshot::parse(load_dual_gpu()).unwrap();
        let busy = snapshot.at(0).unwrap();

        assert_eq!(busy.util_gpu_percent().unwrap(), 97);
        assert_eq!(busy.util_mem_percent().unwrap(), 61);
        assert_eq!(busy.temp_gpu_celsius().unwrap(), Some(71));
        assert_eq!(busy.temp_memory_celsius().unwrap(), Some(78));
        assert_eq!(busy.fb_mem_used().unwrap(), 40962 * 1024 * 1024);
        assert!(!busy.display_mode().unwrap());
    }

    #[test]
    fn test_dual_gpu_missing_serial() {
        let snapshot = SmiSnapshot::parse(load_dual_gpu()).unwrap();
        assert_eq!(snapshot.at(0).unwrap().serial().unwrap(), "1654123456789");

        match snapshot.at(1).unwrap().serial() {
            Err(SmiError::FieldNotFound { path, .. }) => assert_eq!(path, "./serial"),
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_dual_gpu_devices_iterator() {
        let snapshot = SmiSnapshot::parse(load_dual_gpu()).unwrap();
        let idle: Vec<_> = snapshot
            .devices()
            .unwrap()
            .filter(|gpu| gpu.util_gpu_percent().unwrap() == 0)
            .map(|gpu| gpu.index())
            .collect();
        assert_eq!(idle, [1]);
    }
}
