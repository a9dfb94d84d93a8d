//! Address and link state of network devices, through socket ioctls.

use std::io;
use std::net::Ipv4Addr;
use std::os::fd::{AsRawFd, OwnedFd};

use libc::{AF_INET, ARPHRD_ETHER, IFF_UP, IFNAMSIZ, ifreq, sockaddr_in};
use nix::sys::socket::{AddressFamily, SockFlag, SockType, socket};
use tracing::{debug, trace};

use crate::address::MacAddr;
use crate::error::{Error, Result};
use crate::sys::{
    siocgifaddr, siocgifflags, siocgifhwaddr, siocsifaddr, siocsifflags, siocsifhwaddr,
};

/// Addresses and link state of network devices, looked up by name.
pub trait Links {
    fn ip(&self, name: &str) -> Option<Ipv4Addr>;

    fn mac(&self, name: &str) -> Option<MacAddr>;

    fn set_ip(&self, name: &str, ip: Ipv4Addr) -> Result<()>;

    fn set_mac(&self, name: &str, mac: MacAddr) -> Result<()>;

    /// Sets or clears the administrative "up" flag.
    fn set_up(&self, name: &str, up: bool) -> Result<()>;
}

/// Links of the host, driven over a throwaway `AF_INET` datagram socket per call.
#[derive(Copy, Clone, Debug, Default)]
pub struct SocketLinks;

impl Links for SocketLinks {
    fn ip(&self, name: &str) -> Option<Ipv4Addr> {
        get_ip(name)
    }

    fn mac(&self, name: &str) -> Option<MacAddr> {
        get_mac(name)
    }

    fn set_ip(&self, name: &str, ip: Ipv4Addr) -> Result<()> {
        set_ip(name, ip)
    }

    fn set_mac(&self, name: &str, mac: MacAddr) -> Result<()> {
        set_mac(name, mac)
    }

    fn set_up(&self, name: &str, up: bool) -> Result<()> {
        set_up(name, up)
    }
}

fn control_socket() -> io::Result<OwnedFd> {
    let socket = socket(
        AddressFamily::Inet,
        SockType::Datagram,
        SockFlag::SOCK_CLOEXEC,
        None,
    )?;

    Ok(socket)
}

fn new_ifreq(name: &str) -> io::Result<ifreq> {
    if name.len() >= IFNAMSIZ {
        return Err(io::Error::from_raw_os_error(libc::ENAMETOOLONG));
    }

    if name.is_empty() || name.contains('\0') {
        return Err(io::Error::from_raw_os_error(libc::EINVAL));
    }

    let mut req: ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in req.ifr_name.iter_mut().zip(name.bytes()) {
        *dst = src as libc::c_char;
    }

    Ok(req)
}

fn read_ip(name: &str) -> io::Result<Ipv4Addr> {
    let mut req = new_ifreq(name)?;
    let socket = control_socket()?;
    unsafe { siocgifaddr(socket.as_raw_fd(), &mut req) }?;

    let addr = unsafe { *(&req.ifr_ifru.ifru_addr as *const _ as *const sockaddr_in) };
    Ok(Ipv4Addr::from(u32::from_be(addr.sin_addr.s_addr)))
}

fn read_mac(name: &str) -> io::Result<MacAddr> {
    let mut req = new_ifreq(name)?;
    let socket = control_socket()?;
    unsafe { siocgifhwaddr(socket.as_raw_fd(), &mut req) }?;

    let data = unsafe { req.ifr_ifru.ifru_hwaddr.sa_data };
    let mut mac = [0u8; 6];
    for (dst, src) in mac.iter_mut().zip(data) {
        *dst = src as u8;
    }

    Ok(MacAddr(mac))
}

/// Returns the IPv4 address of the device, or `None` if it has none or cannot be queried.
pub fn get_ip(name: &str) -> Option<Ipv4Addr> {
    read_ip(name)
        .inspect_err(|e| trace!(device = name, %e, "No IPv4 address"))
        .ok()
}

/// Returns the hardware address of the device, or `None` if it cannot be queried.
pub fn get_mac(name: &str) -> Option<MacAddr> {
    read_mac(name)
        .inspect_err(|e| trace!(device = name, %e, "No hardware address"))
        .ok()
}

pub fn set_ip(name: &str, ip: Ipv4Addr) -> Result<()> {
    let operation = || format!("SIOCSIFADDR {name}");

    let mut req = new_ifreq(name).map_err(|e| Error::device(operation(), e))?;
    let mut addr: sockaddr_in = unsafe { std::mem::zeroed() };
    addr.sin_family = AF_INET as libc::sa_family_t;
    addr.sin_addr.s_addr = u32::from(ip).to_be();

    unsafe {
        std::ptr::write(&mut req.ifr_ifru.ifru_addr as *mut _ as *mut sockaddr_in, addr);
    }

    let socket = control_socket().map_err(|e| Error::device("socket", e))?;
    unsafe { siocsifaddr(socket.as_raw_fd(), &req) }
        .map_err(|e| Error::device(operation(), e))?;

    debug!(device = name, %ip, "Set the IPv4 address");

    Ok(())
}

pub fn set_mac(name: &str, mac: MacAddr) -> Result<()> {
    let operation = || format!("SIOCSIFHWADDR {name}");

    let mut req = new_ifreq(name).map_err(|e| Error::device(operation(), e))?;
    unsafe {
        req.ifr_ifru.ifru_hwaddr.sa_family = ARPHRD_ETHER;
        for (dst, src) in req.ifr_ifru.ifru_hwaddr.sa_data.iter_mut().zip(mac.0) {
            *dst = src as libc::c_char;
        }
    }

    let socket = control_socket().map_err(|e| Error::device("socket", e))?;
    unsafe { siocsifhwaddr(socket.as_raw_fd(), &req) }
        .map_err(|e| Error::device(operation(), e))?;

    debug!(device = name, %mac, "Set the hardware address");

    Ok(())
}

pub fn set_up(name: &str, up: bool) -> Result<()> {
    let get_operation = || format!("SIOCGIFFLAGS {name}");

    let mut req = new_ifreq(name).map_err(|e| Error::device(get_operation(), e))?;
    let socket = control_socket().map_err(|e| Error::device("socket", e))?;

    unsafe { siocgifflags(socket.as_raw_fd(), &mut req) }
        .map_err(|e| Error::device(get_operation(), e))?;

    let flags = unsafe { req.ifr_ifru.ifru_flags };
    let updated = match up {
        true => flags | IFF_UP as libc::c_short,
        false => flags & !(IFF_UP as libc::c_short),
    };

    if updated == flags {
        debug!(device = name, up, "The link is already in the requested state");
        return Ok(());
    }

    req.ifr_ifru.ifru_flags = updated;
    unsafe { siocsifflags(socket.as_raw_fd(), &req) }
        .map_err(|e| Error::device(format!("SIOCSIFFLAGS {name}"), e))?;

    debug!(device = name, up, "Changed the link state");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "dvb250_253";

    #[test]
    fn test_new_ifreq() {
        let req = new_ifreq("dvb0_1").unwrap();
        let name: Vec<u8> = req.ifr_name.iter().map(|&c| c as u8).collect();

        assert_eq!(&name[..7], b"dvb0_1\0");

        assert_eq!(
            new_ifreq("a-very-long-interface-name").unwrap_err().raw_os_error(),
            Some(libc::ENAMETOOLONG),
        );
        assert!(new_ifreq("").is_err());
    }

    #[test]
    fn test_missing_device_has_no_addresses() {
        assert_eq!(get_ip(MISSING), None);
        assert_eq!(get_mac(MISSING), None);
        assert_eq!(SocketLinks.ip("a-very-long-interface-name"), None);
    }

    #[test]
    fn test_missing_device_cannot_be_configured() {
        let error = set_ip(MISSING, Ipv4Addr::new(10, 1, 1, 1)).unwrap_err();
        assert!(error.to_string().starts_with("SIOCSIFADDR dvb250_253: "));

        let error = set_mac(MISSING, MacAddr([0, 1, 2, 3, 4, 5])).unwrap_err();
        assert!(error.to_string().starts_with("SIOCSIFHWADDR dvb250_253: "));

        let error = set_up(MISSING, false).unwrap_err();
        assert!(error.to_string().starts_with("SIOCGIFFLAGS dvb250_253: "));
    }

    #[test]
    fn test_loopback_addresses() {
        assert_eq!(get_ip("lo"), Some(Ipv4Addr::LOCALHOST));
        assert_eq!(get_mac("lo"), Some(MacAddr([0; 6])));
        assert_eq!(SocketLinks.ip("lo").map(|ip| ip.to_string()), Some("127.0.0.1".into()));
    }

    #[test]
    fn test_link_already_in_requested_state() {
        // The loopback link is up; asking for that again must not need SIOCSIFFLAGS.
        assert!(set_up("lo", true).is_ok());
    }
}
