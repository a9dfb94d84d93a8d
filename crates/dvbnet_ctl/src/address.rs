use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{AddressKind, Error, Result};

/// An Ethernet hardware address.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct MacAddr(pub [u8; 6]);

impl FromStr for MacAddr {
    type Err = Error;

    /// Parses six colon-separated hexadecimal bytes of one or two digits each.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_address(AddressKind::Mac, s);

        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');

        for byte in &mut bytes {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }

            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(bytes))
    }
}

impl Display for MacAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    s.parse()
        .map_err(|_| Error::invalid_address(AddressKind::Ipv4, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mac() {
        let mac: MacAddr = "00:01:02:03:04:05".parse().unwrap();
        assert_eq!(mac, MacAddr([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]));

        let mac: MacAddr = "AA:bb:Cc:0:f:10".parse().unwrap();
        assert_eq!(mac, MacAddr([0xAA, 0xBB, 0xCC, 0x00, 0x0F, 0x10]));
    }

    #[test]
    fn test_parse_mac_rejects_malformed() {
        for input in [
            "",
            "00:01:02:03:04",
            "00:01:02:03:04:05:06",
            "00:01:02:03:04:",
            "00:01:02:03:04:100",
            "00:01:02:03:04:zz",
            "00-01-02-03-04-05",
            "+0:01:02:03:04:05",
        ] {
            assert!(
                matches!(
                    input.parse::<MacAddr>(),
                    Err(Error::InvalidAddress {
                        kind: AddressKind::Mac,
                        ..
                    })
                ),
                "{input:?} should be rejected",
            );
        }
    }

    #[test]
    fn test_format_mac() {
        let mac = MacAddr([0x00, 0x1A, 0x2B, 0xFF, 0x04, 0x05]);
        assert_eq!(mac.to_string(), "00:1a:2b:ff:04:05");
        assert_eq!(mac.to_string().parse::<MacAddr>().unwrap(), mac);
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("10.1.1.1").unwrap(), Ipv4Addr::new(10, 1, 1, 1));

        for input in ["not-an-ip", "", "10.1.1", "10.1.1.256", " 10.1.1.1"] {
            assert!(matches!(
                parse_ipv4(input),
                Err(Error::InvalidAddress {
                    kind: AddressKind::Ipv4,
                    ..
                })
            ));
        }
    }
}
