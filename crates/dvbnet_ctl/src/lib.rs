//! Control of Linux DVB network interfaces: defining and removing the `dvbX_Y` network devices
//! that carry MPE/ULE encapsulated IP traffic of an adapter, and configuring their addresses.

mod adapter;
mod address;
mod controller;
mod error;
mod interface;
pub mod link;
mod sys;

pub use adapter::{
    Adapter, AdapterRef, DEFAULT_DEVICE_ROOT, Devices, DvbAdapter, DvbDevices, open_adapter,
};
pub use address::{MacAddr, parse_ipv4};
pub use controller::{
    AddRequest, Controller, DEFAULT_REMOVAL_GRACE, RemoveRequest, enumerate_interfaces,
};
pub use error::{AddressKind, Error, Result};
pub use interface::{
    Encapsulation, InterfaceDescriptor, InterfaceInfo, MAX_INTERFACES, device_name,
};
pub use link::{Links, SocketLinks};
