// Fallback device details from /sys/block

use std::fs;
use std::path::{Path, PathBuf};

/// Reader for `/sys/block/<dev>/...` attributes, rooted so tests can point it at a temp dir.
#[derive(Clone, Debug)]
pub struct Sysfs {
    root: PathBuf,
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new("/sys")
    }
}

const MODEL_FILES: &[&str] = &["device/vendor", "device/model", "device/name"];
const SERIAL_FILES: &[&str] = &["device/serial"];
const FIRMWARE_FILES: &[&str] = &["device/rev", "device/fwrev"];

impl Sysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one entry per block device.
    pub fn block_dir(&self) -> PathBuf {
        self.root.join("block")
    }

    fn device_dir(&self, dev: &str) -> PathBuf {
        self.block_dir().join(dev)
    }

    fn read_attr(&self, dev: &str, rel: &str) -> Option<String> {
        let text = fs::read_to_string(self.device_dir(dev).join(rel)).ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Every readable file among `rels`, joined by a space.
    fn joined(&self, dev: &str, rels: &[&str]) -> Option<String> {
        let parts: Vec<String> = rels
            .iter()
            .filter_map(|rel| self.read_attr(dev, rel))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Vendor and model, e.g. "ATA Samsung SSD 860".
    pub fn model(&self, dev: &str) -> Option<String> {
        self.joined(dev, MODEL_FILES)
    }

    pub fn serial(&self, dev: &str) -> Option<String> {
        self.joined(dev, SERIAL_FILES)
    }

    pub fn firmware(&self, dev: &str) -> Option<String> {
        self.joined(dev, FIRMWARE_FILES)
    }

    /// Size in bytes; the kernel reports 512-byte sectors.
    pub fn size_bytes(&self, dev: &str) -> Option<u64> {
        self.read_attr(dev, "size")?
            .parse::<u64>()
            .ok()
            .map(|sectors| sectors.saturating_mul(512))
    }

    /// True when the device hangs off a USB bus.
    pub fn is_usb_attached(&self, dev: &str) -> bool {
        fs::canonicalize(self.device_dir(dev))
            .map(|path| path_has_usb_component(&path))
            .unwrap_or(false)
    }
}

fn path_has_usb_component(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with("usb"))
}
