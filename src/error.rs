use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for the firmware paths of this crate.
///
/// The pure controller core is infallible by design; errors arise only from
/// task spawning, flash access, and the network/publish pipeline.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that the wrapped type
    // does not implement Rust's `core::error::Error` trait.
    #[cfg(feature = "pico")]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("Format error")]
    FormatError,

    #[display("Network not connected")]
    NotConnected,

    #[cfg(feature = "pico")]
    #[display("Flash operation failed: {_0:?}")]
    Flash(#[error(not(source))] embassy_rp::flash::Error),

    #[cfg(feature = "wifi")]
    #[display("WiFi join failed")]
    JoinFailed,

    #[cfg(feature = "wifi")]
    #[display("DNS lookup returned no address")]
    DnsLookup,

    #[cfg(feature = "wifi")]
    #[display("TCP connect failed: {_0:?}")]
    TcpConnect(#[error(not(source))] embassy_net::tcp::ConnectError),

    #[cfg(feature = "wifi")]
    #[display("Broker refused: {_0:?}")]
    Broker(#[error(not(source))] rust_mqtt::packet::v5::reason_codes::ReasonCode),

    #[cfg(feature = "wifi")]
    #[display("Timed out")]
    Timeout(#[error(not(source))] embassy_time::TimeoutError),
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::FormatError
    }
}

#[cfg(feature = "pico")]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}

#[cfg(feature = "pico")]
impl From<embassy_rp::flash::Error> for Error {
    fn from(err: embassy_rp::flash::Error) -> Self {
        Self::Flash(err)
    }
}

#[cfg(feature = "wifi")]
impl From<embassy_net::tcp::ConnectError> for Error {
    fn from(err: embassy_net::tcp::ConnectError) -> Self {
        Self::TcpConnect(err)
    }
}

#[cfg(feature = "wifi")]
impl From<rust_mqtt::packet::v5::reason_codes::ReasonCode> for Error {
    fn from(code: rust_mqtt::packet::v5::reason_codes::ReasonCode) -> Self {
        Self::Broker(code)
    }
}

#[cfg(feature = "wifi")]
impl From<embassy_time::TimeoutError> for Error {
    fn from(err: embassy_time::TimeoutError) -> Self {
        Self::Timeout(err)
    }
}
