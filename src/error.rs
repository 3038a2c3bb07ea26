/// Errors raised by the protocol core and the inverter session.
///
/// Codec-level failures (`FrameInvalid`, `DecodeOutOfRange`) are local validation
/// failures and always reach the immediate caller. `Timeout` and `Unreachable` come
/// from the transport unchanged; retrying them is up to whoever owns the transport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Checksum mismatch, undersized frame or wrong header.
    #[error("invalid frame: {0}")]
    FrameInvalid(String),

    /// The command's validator rejected the response (corruption, wrong device or NAK).
    #[error("request {request} failed: response rejected")]
    RequestFailed { request: String },

    /// The payload is shorter than the schema needs, usually a wrong family setting.
    #[error("schema {schema} needs {required} bytes of payload, got {actual}")]
    DecodeOutOfRange {
        schema: &'static str,
        required: usize,
        actual: usize,
    },

    /// Request parameters outside what the protocol can represent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("timeout waiting for response after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("inverter unreachable: {0}")]
    Unreachable(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
