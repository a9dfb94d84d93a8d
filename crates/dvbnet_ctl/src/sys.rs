//! Bindings to the Linux DVB net and socket interface ioctls.

use libc::ifreq;
use nix::{
    ioctl_read_bad, ioctl_readwrite, ioctl_write_int_bad, ioctl_write_ptr_bad, request_code_none,
};

pub const DVB_NET_FEEDTYPE_MPE: u8 = 0;
pub const DVB_NET_FEEDTYPE_ULE: u8 = 1;

/// `struct dvb_net_if` from `linux/dvb/net.h`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct DvbNetIf {
    pub pid: u16,
    pub if_num: u16,
    pub feedtype: u8,
}

ioctl_readwrite!(net_add_if, b'o', 52, DvbNetIf);
ioctl_write_int_bad!(net_remove_if, request_code_none!(b'o', 53));
ioctl_readwrite!(net_get_if, b'o', 54, DvbNetIf);

ioctl_read_bad!(siocgifflags, libc::SIOCGIFFLAGS, ifreq);
ioctl_write_ptr_bad!(siocsifflags, libc::SIOCSIFFLAGS, ifreq);
ioctl_read_bad!(siocgifaddr, libc::SIOCGIFADDR, ifreq);
ioctl_write_ptr_bad!(siocsifaddr, libc::SIOCSIFADDR, ifreq);
ioctl_read_bad!(siocgifhwaddr, libc::SIOCGIFHWADDR, ifreq);
ioctl_write_ptr_bad!(siocsifhwaddr, libc::SIOCSIFHWADDR, ifreq);
