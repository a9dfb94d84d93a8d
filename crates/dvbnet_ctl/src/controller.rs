use std::net::Ipv4Addr;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::adapter::{Adapter, AdapterRef, Devices, DvbDevices};
use crate::address::{MacAddr, parse_ipv4};
use crate::error::Result;
use crate::interface::{Encapsulation, InterfaceDescriptor, InterfaceInfo, MAX_INTERFACES};
use crate::link::{Links, SocketLinks};

/// Pause between bringing a link down and removing its interface.
pub const DEFAULT_REMOVAL_GRACE: Duration = Duration::from_secs(1);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AddRequest {
    pub adapter: AdapterRef,
    pub pid: u16,
    pub encapsulation: Encapsulation,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RemoveRequest {
    pub adapter: AdapterRef,
    pub if_num: u16,
}

/// Sequences interface control requests. Every call opens the adapter afresh and closes it before
/// returning; nothing is remembered between calls.
pub struct Controller<D = DvbDevices, L = SocketLinks> {
    devices: D,
    links: L,
    removal_grace: Duration,
    max_interfaces: u16,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DvbDevices::default(), SocketLinks)
    }
}

impl<D: Devices, L: Links> Controller<D, L> {
    pub fn new(devices: D, links: L) -> Self {
        Self {
            devices,
            links,
            removal_grace: DEFAULT_REMOVAL_GRACE,
            max_interfaces: MAX_INTERFACES,
        }
    }

    pub fn with_removal_grace(mut self, removal_grace: Duration) -> Self {
        self.removal_grace = removal_grace;
        self
    }

    pub fn with_max_interfaces(mut self, max_interfaces: u16) -> Self {
        self.max_interfaces = max_interfaces;
        self
    }

    pub fn add(&self, request: &AddRequest) -> Result<u16> {
        let adapter = self.devices.open_adapter(request.adapter)?;
        let if_num = adapter.add_interface(request.pid, request.encapsulation)?;

        info!(
            device = %request.adapter.device_name(if_num),
            pid = request.pid,
            encapsulation = %request.encapsulation,
            "Added an interface",
        );

        Ok(if_num)
    }

    /// Brings the interface's link down, waits for the removal grace period, then removes the
    /// interface. Nothing is removed if the link cannot be brought down.
    pub fn remove(&self, request: &RemoveRequest) -> Result<()> {
        let device = request.adapter.device_name(request.if_num);
        let adapter = self.devices.open_adapter(request.adapter)?;

        self.links
            .set_up(&device, false)
            .inspect_err(|e| warn!(%device, %e, "Couldn't bring the link down, not removing"))?;

        if !self.removal_grace.is_zero() {
            debug!(%device, grace = ?self.removal_grace, "Waiting before the removal");
            thread::sleep(self.removal_grace);
        }

        adapter.remove_interface(request.if_num)?;

        info!(%device, "Removed an interface");

        Ok(())
    }

    /// Returns `None` if the slot is empty.
    pub fn query(&self, adapter: AdapterRef, if_num: u16) -> Result<Option<InterfaceInfo>> {
        let handle = self.devices.open_adapter(adapter)?;
        Ok(handle.query_interface(if_num))
    }

    /// Probes every slot of the adapter and describes the occupied ones, in slot order.
    pub fn enumerate(&self, adapter: AdapterRef) -> Result<Vec<InterfaceDescriptor>> {
        let handle = self.devices.open_adapter(adapter)?;

        let descriptors = (0..self.max_interfaces)
            .filter_map(|if_num| handle.query_interface(if_num))
            .map(|info| self.describe(adapter, info))
            .collect::<Vec<_>>();

        debug!(%adapter, count = descriptors.len(), "Enumerated interfaces");

        Ok(descriptors)
    }

    fn describe(&self, adapter: AdapterRef, info: InterfaceInfo) -> InterfaceDescriptor {
        let name = adapter.device_name(info.if_num);

        InterfaceDescriptor {
            if_num: info.if_num,
            pid: info.pid,
            encapsulation: info.encapsulation,
            ip: self.links.ip(&name),
            mac: self.links.mac(&name),
            name,
        }
    }

    pub fn ip(&self, name: &str) -> Option<Ipv4Addr> {
        self.links.ip(name)
    }

    pub fn mac(&self, name: &str) -> Option<MacAddr> {
        self.links.mac(name)
    }

    /// Fails with [`Error::InvalidAddress`](crate::Error::InvalidAddress) without touching the
    /// device if `ip` is not a dotted quad.
    pub fn set_ip(&self, name: &str, ip: &str) -> Result<()> {
        let ip = parse_ipv4(ip)?;
        self.links.set_ip(name, ip)?;

        info!(device = name, %ip, "Set the IPv4 address");

        Ok(())
    }

    /// Fails with [`Error::InvalidAddress`](crate::Error::InvalidAddress) without touching the
    /// device if `mac` is not six colon-separated hex bytes.
    pub fn set_mac(&self, name: &str, mac: &str) -> Result<()> {
        let mac = mac.parse::<MacAddr>()?;
        self.links.set_mac(name, mac)?;

        info!(device = name, %mac, "Set the hardware address");

        Ok(())
    }

    pub fn set_link(&self, name: &str, up: bool) -> Result<()> {
        self.links.set_up(name, up)?;

        info!(device = name, up, "Set the link state");

        Ok(())
    }
}

/// Lists the interfaces of `/dev/dvb/adapter{adapter}/net{net}`.
pub fn enumerate_interfaces(adapter: u8, net: u8) -> Result<Vec<InterfaceDescriptor>> {
    let controller: Controller = Controller::default();
    controller.enumerate(AdapterRef::new(adapter, net))
}
