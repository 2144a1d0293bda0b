// Device enumeration and diagnostic invocation

pub mod sysfs;

use std::fs;
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rayon::prelude::*;
use wait_timeout::ChildExt;

use crate::config::ScanOptions;
use crate::error::{Result, ScanError};
use crate::models::{DeviceClass, DeviceReport};
use crate::report::build_report;
pub use sysfs::Sysfs;

/// Kernel name prefixes included in a full scan.
pub const SUPPORTED_PREFIXES: &[&str] = &["sd", "mmcblk", "sr", "vd", "nvme"];

/// Captured output of one diagnostic run.
/// On timeout `output` holds whatever was written before the process was killed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub output: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Supported block devices, shortest name first (sda before sdaa).
pub fn list_devices(sysfs: &Sysfs) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(sysfs.block_dir())?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| SUPPORTED_PREFIXES.iter().any(|p| name.starts_with(p)))
        .collect();

    names.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    Ok(names)
}

/// How long to keep reading after the utility exited or was killed.
/// A grandchild holding the pipes open must not stall the scan.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Runs `<program> -a <dev_path>`, giving up after `timeout`.
/// The exit code is recorded but never interpreted.
///
/// Returns within `timeout` plus a short grace period even when the child
/// cannot be reaped (a process stuck in uninterruptible disk I/O ignores
/// SIGKILL). Such a child is left to a detached reaper thread.
pub fn run_diagnostic(program: &str, dev_path: &str, timeout: Duration) -> Result<Diagnostic> {
    let mut child = Command::new(program)
        .args(["-a", dev_path])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            ScanError::CommandFailed(format!("failed to run {} on {}: {}", program, dev_path, e))
        })?;

    // Both pipes feed one channel, so stdout and stderr interleave in arrival order.
    let (tx, rx) = mpsc::channel();
    drain(child.stdout.take(), tx.clone());
    drain(child.stderr.take(), tx);

    let status = match child.wait_timeout(timeout) {
        Ok(status) => status,
        Err(e) => {
            abandon(child);
            return Err(e.into());
        }
    };

    let (exit_code, timed_out) = match status {
        Some(status) => (status.code(), false),
        None => {
            warn!("{} on {} timed out after {:?}", program, dev_path, timeout);
            abandon(child);
            (None, true)
        }
    };

    let output = collect(&rx, Instant::now() + DRAIN_GRACE);

    Ok(Diagnostic {
        output,
        exit_code,
        timed_out,
    })
}

/// Kills the child and reaps it off the calling thread.
fn abandon(mut child: Child) {
    if let Err(e) = child.kill() {
        debug!("failed to kill diagnostic process: {}", e);
    }
    thread::spawn(move || {
        let _ = child.wait();
    });
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>, tx: Sender<Vec<u8>>) {
    let Some(mut pipe) = pipe else {
        return;
    };
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("failed to read diagnostic output: {}", e);
                    break;
                }
            }
        }
    });
}

/// Gathers chunks until both pipes close or `deadline` passes.
fn collect(rx: &Receiver<Vec<u8>>, deadline: Instant) -> String {
    let mut buf = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(chunk) => buf.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => {
                debug!("diagnostic pipes still open after exit, returning partial output");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Classifies, diagnoses and reports one device.
/// Devices without a class skip the diagnostic and rely on sysfs alone.
pub fn probe_device(name: &str, options: &ScanOptions, sysfs: &Sysfs) -> DeviceReport {
    let class = match DeviceClass::from_device_name(name) {
        Ok(class) if class.uses_ata_rules() && sysfs.is_usb_attached(name) => {
            Some(DeviceClass::UsbBridge)
        }
        Ok(class) => Some(class),
        Err(e) => {
            debug!("{}, using sysfs only", e);
            None
        }
    };

    let diagnostic = class.map(|_| {
        let dev_path = format!("/dev/{}", name);
        run_diagnostic(&options.smartctl, &dev_path, options.timeout).unwrap_or_else(|e| {
            warn!("{}", e);
            Diagnostic::default()
        })
    });

    build_report(name, class, diagnostic.as_ref(), options, sysfs)
}

/// Probes the requested device, or every supported one, one worker per device.
pub fn scan_devices(options: &ScanOptions, sysfs: &Sysfs) -> Result<Vec<DeviceReport>> {
    let names = match &options.device {
        Some(device) => {
            if !sysfs.block_dir().join(device).exists() {
                return Err(ScanError::DeviceNotFound(device.clone()));
            }
            vec![device.clone()]
        }
        None => list_devices(sysfs)?,
    };

    debug!("probing {} devices: {:?}", names.len(), names);

    Ok(names
        .par_iter()
        .map(|name| probe_device(name, options, sysfs))
        .collect())
}

/// Runs [`scan_devices`] on its own thread; the result arrives on the returned channel.
pub fn scan_in_background(options: ScanOptions, sysfs: Sysfs) -> Receiver<Result<Vec<DeviceReport>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver may be gone if the window closed mid-scan.
        let _ = tx.send(scan_devices(&options, &sysfs));
    });
    rx
}
