use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::interface::{Encapsulation, InterfaceInfo, device_name};
use crate::sys::{DvbNetIf, net_add_if, net_get_if, net_remove_if};

pub const DEFAULT_DEVICE_ROOT: &str = "/dev/dvb";

/// Identifies the net device node of a DVB adapter.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct AdapterRef {
    pub adapter: u8,
    pub net: u8,
}

impl AdapterRef {
    pub fn new(adapter: u8, net: u8) -> Self {
        Self { adapter, net }
    }

    pub fn path(&self, root: impl AsRef<Path>) -> PathBuf {
        root.as_ref()
            .join(format!("adapter{}", self.adapter))
            .join(format!("net{}", self.net))
    }

    pub fn device_name(&self, if_num: u16) -> String {
        device_name(self.adapter, if_num)
    }
}

impl Display for AdapterRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "adapter{}/net{}", self.adapter, self.net)
    }
}

/// An open adapter net device accepting interface control requests.
pub trait Adapter {
    /// Defines a new interface and returns the slot number assigned by the driver.
    fn add_interface(&self, pid: u16, encapsulation: Encapsulation) -> Result<u16>;

    fn remove_interface(&self, if_num: u16) -> Result<()>;

    /// Returns `None` if no interface occupies the slot.
    fn query_interface(&self, if_num: u16) -> Option<InterfaceInfo>;
}

/// Opens adapter net devices.
pub trait Devices {
    type Adapter: Adapter;

    fn open_adapter(&self, adapter: AdapterRef) -> Result<Self::Adapter>;
}

#[derive(Clone, Debug)]
pub struct DvbDevices {
    root: PathBuf,
}

impl DvbDevices {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for DvbDevices {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_ROOT)
    }
}

impl Devices for DvbDevices {
    type Adapter = DvbAdapter;

    fn open_adapter(&self, adapter: AdapterRef) -> Result<DvbAdapter> {
        DvbAdapter::open(&self.root, adapter)
    }
}

/// Opens `/dev/dvb/adapter{adapter}/net{net}`.
pub fn open_adapter(adapter: u8, net: u8) -> Result<DvbAdapter> {
    DvbDevices::default().open_adapter(AdapterRef::new(adapter, net))
}

/// The device node is closed when this is dropped.
#[derive(Debug)]
pub struct DvbAdapter {
    file: File,
    adapter: AdapterRef,
}

impl DvbAdapter {
    pub fn open(root: impl AsRef<Path>, adapter: AdapterRef) -> Result<Self> {
        let path = adapter.path(root);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| Error::device(format!("open {}", path.display()), e))?;

        debug!(path = %path.display(), "Opened the adapter net device");

        Ok(Self { file, adapter })
    }
}

impl Adapter for DvbAdapter {
    fn add_interface(&self, pid: u16, encapsulation: Encapsulation) -> Result<u16> {
        let mut params = DvbNetIf {
            pid,
            feedtype: encapsulation.feedtype(),
            ..Default::default()
        };

        debug!(adapter = %self.adapter, pid, %encapsulation, "NET_ADD_IF");

        unsafe { net_add_if(self.file.as_raw_fd(), &mut params) }
            .map_err(|e| Error::device("NET_ADD_IF", e))?;

        Ok(params.if_num)
    }

    fn remove_interface(&self, if_num: u16) -> Result<()> {
        debug!(adapter = %self.adapter, if_num, "NET_REMOVE_IF");

        unsafe { net_remove_if(self.file.as_raw_fd(), if_num.into()) }
            .map_err(|e| Error::device("NET_REMOVE_IF", e))?;

        Ok(())
    }

    fn query_interface(&self, if_num: u16) -> Option<InterfaceInfo> {
        let mut info = DvbNetIf {
            if_num,
            ..Default::default()
        };

        match unsafe { net_get_if(self.file.as_raw_fd(), &mut info) } {
            Ok(_) => Some(InterfaceInfo {
                if_num,
                pid: info.pid,
                encapsulation: Encapsulation::from_feedtype(info.feedtype),
            }),
            Err(errno) => {
                trace!(adapter = %self.adapter, if_num, %errno, "No interface in the slot");
                None
            }
        }
    }
}
