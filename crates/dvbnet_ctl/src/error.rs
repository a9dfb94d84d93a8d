use std::io;

use strum::Display;

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum AddressKind {
    #[strum(to_string = "IPv4")]
    Ipv4,
    #[strum(to_string = "MAC")]
    Mac,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A device node or socket operation was refused by the system. The system's message is part
    /// of the message, not a separate cause.
    #[error("{operation}: {system}")]
    Device { operation: String, system: io::Error },

    #[error("invalid {kind} address: {input:?}")]
    InvalidAddress { kind: AddressKind, input: String },
}

impl Error {
    pub(crate) fn device(operation: impl Into<String>, system: impl Into<io::Error>) -> Self {
        Self::Device {
            operation: operation.into(),
            system: system.into(),
        }
    }

    pub(crate) fn invalid_address(kind: AddressKind, input: &str) -> Self {
        Self::InvalidAddress {
            kind,
            input: input.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
