// ── Interface counter reader ──
//
// Reads cumulative byte counters from `<root>/<iface>/statistics/`.
// No retry: the caller decides how to degrade.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::model::CounterSample;

/// Reads tx/rx byte counters for a named interface.
#[derive(Debug, Clone)]
pub struct CounterReader {
    root: PathBuf,
}

impl CounterReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The statistics directory for `interface`.
    pub fn statistics_dir(&self, interface: &str) -> PathBuf {
        self.root.join(interface).join("statistics")
    }

    /// Read both counters for `interface`.
    pub fn read(&self, interface: &str) -> Result<CounterSample, CoreError> {
        let stats = self.statistics_dir(interface);
        if interface.is_empty() || interface.contains('/') || interface.contains("..") {
            return Err(CoreError::InterfaceNotFound {
                interface: interface.into(),
                path: stats,
            });
        }

        let tx = read_counter(&stats.join("tx_bytes"), interface)?;
        let rx = read_counter(&stats.join("rx_bytes"), interface)?;
        Ok(CounterSample::new(tx, rx))
    }
}

fn read_counter(path: &Path, interface: &str) -> Result<u64, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CoreError::InterfaceNotFound {
            interface: interface.into(),
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => CoreError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CoreError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    raw.trim().parse().map_err(|_| CoreError::CounterParse {
        path: path.to_path_buf(),
        value: raw.trim().to_owned(),
    })
}
