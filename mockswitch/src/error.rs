//! Error types for mockswitch.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Main error type for mockswitch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Switch configuration model errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Switch factory errors
    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),

    /// RPC adapter errors (NETCONF, eAPI)
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// External TFTP collaborator errors
    #[error("TFTP error: {0}")]
    Tftp(#[from] TftpError),
}

/// Errors raised by mutations of the switch configuration model.
///
/// Vendor processors translate these into vendor-shaped banner text; the
/// `Display` messages here are for logs and non-CLI callers (preload, RPC).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// VLAN number outside [1, 4094]
    #[error("VLAN {0} is out of range")]
    VlanOutOfRange(i64),

    /// Referenced VLAN does not exist
    #[error("VLAN {0} not found")]
    VlanNotFound(u16),

    /// VLAN 1 cannot be removed or renamed
    #[error("the default VLAN may not be removed or renamed")]
    DefaultVlanImmutable,

    /// VLAN name exceeds the vendor's length limit
    #[error("VLAN name '{name}' exceeds {limit} characters")]
    VlanNameTooLong { name: String, limit: usize },

    /// Referenced port does not exist
    #[error("port '{0}' not found")]
    PortNotFound(String),

    /// Referenced VRF does not exist
    #[error("VRF '{0}' not found")]
    VrfNotFound(String),

    /// New address overlaps a subnet owned by another interface
    #[error("{network} overlaps an address on {owner}")]
    AddressOverlap {
        /// Network address of the rejected subnet.
        network: Ipv4Addr,
        /// Name of the interface that already owns the subnet.
        owner: String,
        /// Whether the owning address is a secondary.
        secondary: bool,
    },

    /// Primary address removal attempted while secondaries remain
    #[error("secondary addresses must be deleted before the primary")]
    SecondariesPresent,

    /// Referenced interface address does not exist
    #[error("address {0} is not configured")]
    AddressNotFound(Ipv4Addr),

    /// A secondary address cannot equal the primary
    #[error("{0} is already the primary address")]
    SecondaryIsPrimary(Ipv4Addr),

    /// Static route not present
    #[error("route to {0} not found")]
    RouteNotFound(Ipv4Addr),

    /// Unparseable address, mask, or interface token
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Switch factory errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Model string is not registered
    #[error("unknown switch model '{model}'")]
    UnknownModel { model: String },

    /// A core is already registered under this model name
    #[error("switch model '{model}' is already registered")]
    AlreadyRegistered { model: String },
}

/// RPC adapter errors (JunOS NETCONF, Arista eAPI).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Request could not be decoded
    #[error("malformed RPC request: {0}")]
    Malformed(String),

    /// Commit rejected because another session committed first
    #[error("configuration database modified")]
    ConfigConflict,

    /// A command in the batch failed
    #[error("command {index} of {total} '{command}' failed: {message}")]
    CommandFailed {
        index: usize,
        total: usize,
        command: String,
        message: String,
    },
}

/// External TFTP collaborator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TftpError {
    /// File could not be fetched
    #[error("error opening tftp://{host}/{path} ({reason})")]
    Unreachable {
        host: String,
        path: String,
        reason: String,
    },

    /// No TFTP reader was wired into this session
    #[error("no TFTP reader configured")]
    NotConfigured,
}

/// Result type alias using mockswitch's Error.
pub type Result<T> = std::result::Result<T, Error>;
