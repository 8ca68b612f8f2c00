//! Device discovery and non-blocking joystick access
//!
//! Scans the fixed `/dev/input/js0..js15` range and opens the first node
//! that exists. The device name is probed with the `JSIOCGNAME` ioctl purely
//! for logging; any openable device is accepted.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::event::{RawEvent, EVENT_SIZE};

/// Highest joystick index probed during the linear scan.
const MAX_DEVICE_INDEX: u32 = 16;

/// JSIOCGNAME(64): read up to 64 bytes of device name.
const JSIOCGNAME_64: libc::c_ulong = 0x8040_6a13;
const NAME_BUF_SIZE: usize = 64;

/// Errors from device discovery, open and read paths.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// No `/dev/input/jsN` node exists.
    #[error("no joystick device found")]
    NotFound,

    /// The device node exists but could not be opened (permissions, busy).
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Setting the non-blocking flag failed.
    #[error("failed to set {path} non-blocking: {source}")]
    Nonblocking {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The device stream is permanently unreadable (unplugged, ENODEV, EOF).
    #[error("joystick device disconnected")]
    Disconnected,
}

/// Returns the first existing joystick device node, if any.
///
/// Absence is a normal outcome and reported as `None`, never as an error.
pub fn find_device() -> Option<PathBuf> {
    for i in 0..MAX_DEVICE_INDEX {
        let path = PathBuf::from(format!("/dev/input/js{}", i));
        if path.exists() {
            debug!("Found joystick node at {}", path.display());
            return Some(path);
        }
    }
    None
}

/// An open joystick device in non-blocking mode.
#[derive(Debug)]
pub struct JoystickDevice {
    file: File,
    path: PathBuf,
}

impl JoystickDevice {
    /// Opens `path` read-only and switches the descriptor to non-blocking.
    ///
    /// Performs a best-effort name probe for diagnostics; probe failure does
    /// not reject the device.
    pub fn open(path: &Path) -> Result<Self, DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|source| DeviceError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        set_nonblocking(&file).map_err(|source| DeviceError::Nonblocking {
            path: path.to_path_buf(),
            source,
        })?;

        let device = Self {
            file,
            path: path.to_path_buf(),
        };

        match device.probe_name() {
            Some(name) => info!("Found joystick: {} ({})", name, path.display()),
            None => debug!("Could not read device name for {}", path.display()),
        }

        Ok(device)
    }

    /// Reads the human-readable device name via ioctl. Best effort only.
    fn probe_name(&self) -> Option<String> {
        let mut buf = [0u8; NAME_BUF_SIZE];
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                JSIOCGNAME_64 as _,
                buf.as_mut_ptr(),
            )
        };
        if rc < 0 {
            return None;
        }
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let name = String::from_utf8_lossy(&buf[..end]).into_owned();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Reads the next event record, if one is immediately available.
    ///
    /// * `Ok(Some(_))` - one full record was read
    /// * `Ok(None)` - nothing available this tick (would-block or a partial
    ///   read shorter than one record)
    /// * `Err(Disconnected)` - the stream is gone for good (EOF, ENODEV or
    ///   any other read error)
    pub fn read_event(&mut self) -> Result<Option<RawEvent>, DeviceError> {
        let mut buf = [0u8; EVENT_SIZE];
        match self.file.read(&mut buf) {
            Ok(EVENT_SIZE) => Ok(Some(RawEvent::decode(&buf))),
            Ok(0) => {
                warn!("Joystick stream at {} reached EOF", self.path.display());
                Err(DeviceError::Disconnected)
            }
            Ok(n) => {
                debug!("Partial read of {} bytes, ending tick", n);
                Ok(None)
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
            Err(e) => {
                warn!("Read error on {}: {}", self.path.display(), e);
                Err(DeviceError::Disconnected)
            }
        }
    }
}

fn set_nonblocking(file: &File) -> Result<(), std::io::Error> {
    let fd = file.as_raw_fd();
    // Preserve existing flags, only OR in O_NONBLOCK.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::event::EVENT_BUTTON;

    fn temp_device_file(tag: &str, bytes: &[u8]) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "joykey-device-test-{}-{}",
            tag,
            std::process::id()
        ));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn full_record_then_short_tail_then_eof() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1234u32.to_ne_bytes());
        bytes.extend_from_slice(&1i16.to_ne_bytes());
        bytes.push(EVENT_BUTTON);
        bytes.push(3);
        bytes.extend_from_slice(&[0u8; 4]); // trailing fragment of a record
        let path = temp_device_file("tail", &bytes);

        let mut device = JoystickDevice::open(&path).unwrap();
        let event = device.read_event().unwrap().unwrap();
        assert_eq!(event.timestamp, 1234);
        assert_eq!(event.number, 3);
        assert!(event.is_button());
        assert!(event.pressed());

        // A read shorter than one record ends the tick without raising.
        assert!(matches!(device.read_event(), Ok(None)));
        // The drained stream then reads as a disconnect.
        assert!(matches!(
            device.read_event(),
            Err(DeviceError::Disconnected)
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_stream_reads_as_disconnected() {
        let path = temp_device_file("empty", &[]);
        let mut device = JoystickDevice::open(&path).unwrap();
        assert!(matches!(
            device.read_event(),
            Err(DeviceError::Disconnected)
        ));
        let _ = std::fs::remove_file(&path);
    }
}
