use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;

use strum::EnumString;

use crate::address::MacAddr;
use crate::sys::{DVB_NET_FEEDTYPE_MPE, DVB_NET_FEEDTYPE_ULE};

/// Number of interface slots probed on an adapter net device.
pub const MAX_INTERFACES: u16 = 254;

/// Name of the network device the kernel creates for an interface slot.
pub fn device_name(adapter: u8, if_num: u16) -> String {
    format!("dvb{adapter}_{if_num}")
}

#[derive(Copy, Clone, Debug, Default, EnumString, Eq, Hash, PartialEq, strum::Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[repr(u8)]
pub enum Encapsulation {
    /// Multiprotocol Encapsulation.
    #[default]
    Mpe = 0,
    /// Unidirectional Lightweight Encapsulation.
    Ule = 1,
}

impl Encapsulation {
    /// Reads a feed type reported by the driver. Anything nonzero is ULE.
    pub fn from_feedtype(feedtype: u8) -> Self {
        match feedtype {
            DVB_NET_FEEDTYPE_MPE => Self::Mpe,
            _ => Self::Ule,
        }
    }

    pub fn feedtype(self) -> u8 {
        match self {
            Self::Mpe => DVB_NET_FEEDTYPE_MPE,
            Self::Ule => DVB_NET_FEEDTYPE_ULE,
        }
    }
}

/// An occupied slot as reported by `NET_GET_IF`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InterfaceInfo {
    pub if_num: u16,
    pub pid: u16,
    pub encapsulation: Encapsulation,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceDescriptor {
    pub if_num: u16,
    pub pid: u16,
    pub encapsulation: Encapsulation,
    pub name: String,
    pub ip: Option<Ipv4Addr>,
    pub mac: Option<MacAddr>,
}

struct OrNone<'a, T>(&'a Option<T>);

impl<T: Display> Display for OrNone<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

impl Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IF: {}; Pid: {}; Encapsulation: {}; IP: {}; MAC: {}",
            self.name,
            self.pid,
            self.encapsulation,
            OrNone(&self.ip),
            OrNone(&self.mac),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name() {
        assert_eq!(device_name(0, 0), "dvb0_0");
        assert_eq!(device_name(3, 253), "dvb3_253");
    }

    #[test]
    fn test_encapsulation_from_feedtype() {
        assert_eq!(Encapsulation::from_feedtype(0), Encapsulation::Mpe);
        assert_eq!(Encapsulation::from_feedtype(1), Encapsulation::Ule);
        assert_eq!(Encapsulation::from_feedtype(7), Encapsulation::Ule);

        assert_eq!(Encapsulation::Mpe.feedtype(), 0);
        assert_eq!(Encapsulation::Ule.feedtype(), 1);
    }

    #[test]
    fn test_encapsulation_names() {
        assert_eq!("mpe".parse::<Encapsulation>().unwrap(), Encapsulation::Mpe);
        assert_eq!("ULE".parse::<Encapsulation>().unwrap(), Encapsulation::Ule);
        assert_eq!("Ule".parse::<Encapsulation>().unwrap(), Encapsulation::Ule);
        assert!("gse".parse::<Encapsulation>().is_err());

        assert_eq!(Encapsulation::Mpe.to_string(), "MPE");
        assert_eq!(Encapsulation::Ule.to_string(), "ULE");
    }

    #[test]
    fn test_display_descriptor() {
        let mut descriptor = InterfaceDescriptor {
            if_num: 1,
            pid: 0x1FF,
            encapsulation: Encapsulation::Ule,
            name: device_name(0, 1),
            ip: None,
            mac: None,
        };

        assert_eq!(
            descriptor.to_string(),
            "IF: dvb0_1; Pid: 511; Encapsulation: ULE; IP: None; MAC: None",
        );

        descriptor.ip = Some(Ipv4Addr::new(10, 1, 1, 1));
        descriptor.mac = Some(MacAddr([0, 1, 2, 3, 4, 5]));

        assert_eq!(
            descriptor.to_string(),
            "IF: dvb0_1; Pid: 511; Encapsulation: ULE; IP: 10.1.1.1; MAC: 00:01:02:03:04:05",
        );
    }
}
