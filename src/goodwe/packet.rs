use crate::prelude::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Modbus slave address the DT family answers on.
pub const DEFAULT_COMM_ADDR: u8 = 0x7f;

/// Every response datagram starts with these two bytes.
pub const RESPONSE_PREFIX: [u8; 2] = [0xaa, 0x55];

/// Payload starts after prefix, address, function and byte count.
pub const PAYLOAD_OFFSET: usize = 5;

// prefix(2) + comm_addr + function + byte_count + crc(2)
const RESPONSE_OVERHEAD: usize = 7;
const REQUEST_LEN: usize = 8;
const MAX_READ_COUNT: u16 = 125;
const EXCEPTION_BIT: u8 = 0x80;

// DeviceFunction {{{
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum DeviceFunction {
    ReadHold = 3,
    // WriteSingle = 6
    // WriteMulti = 16
    // ReadHoldError = 131
}
// }}}

// ReadRequest {{{
/// A Modbus RTU "read holding registers" request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ReadRequest {
    pub comm_addr: u8,
    pub device_function: DeviceFunction,
    pub register: u16,
    pub count: u16,
}

impl ReadRequest {
    pub fn new(comm_addr: u8, register: u16, count: u16) -> Result<Self> {
        if count == 0 || count > MAX_READ_COUNT {
            return Err(Error::InvalidRequest(format!(
                "register count {} outside 1..={}",
                count, MAX_READ_COUNT
            )));
        }

        if u32::from(register) + u32::from(count) > 0x1_0000 {
            return Err(Error::InvalidRequest(format!(
                "register range {:#06x}+{} runs past 0xffff",
                register, count
            )));
        }

        Ok(Self {
            comm_addr,
            device_function: DeviceFunction::ReadHold,
            register,
            count,
        })
    }

    /// Bytes of payload a well-formed reply carries.
    pub fn payload_len(&self) -> usize {
        usize::from(self.count) * 2
    }

    pub fn bytes(&self) -> Vec<u8> {
        RtuFrameFactory::build(self)
    }
}
// }}}

pub struct RtuFrameFactory;
impl RtuFrameFactory {
    pub fn build(request: &ReadRequest) -> Vec<u8> {
        let mut r = Vec::with_capacity(REQUEST_LEN);

        r.push(request.comm_addr);
        r.push(request.device_function.into());
        r.extend_from_slice(&request.register.to_be_bytes());
        r.extend_from_slice(&request.count.to_be_bytes());

        let crc = checksum(&r);
        r.extend_from_slice(&crc);

        r
    }

    /// Builds the datagram an inverter would send back for `payload`.
    pub fn response(comm_addr: u8, device_function: DeviceFunction, payload: &[u8]) -> Result<Vec<u8>> {
        let byte_count = u8::try_from(payload.len()).map_err(|_| {
            Error::InvalidRequest(format!("payload of {} bytes does not fit a frame", payload.len()))
        })?;

        let mut r = Vec::with_capacity(payload.len() + RESPONSE_OVERHEAD);
        r.extend_from_slice(&RESPONSE_PREFIX);
        r.push(comm_addr);
        r.push(device_function.into());
        r.push(byte_count);
        r.extend_from_slice(payload);

        // checksum does not include the prefix
        let crc = checksum(&r[2..]);
        r.extend_from_slice(&crc);

        Ok(r)
    }
}

/// A structurally valid response, borrowed from the received datagram.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Response<'a> {
    pub comm_addr: u8,
    pub function: u8,
    pub payload: &'a [u8],
}

impl Response<'_> {
    /// The inverter answered with a Modbus exception instead of data.
    pub fn is_exception(&self) -> bool {
        self.function & EXCEPTION_BIT != 0
    }
}

pub struct Parser;
impl Parser {
    pub fn parse(input: &[u8]) -> Result<Response<'_>> {
        let len = input.len();
        if len < RESPONSE_OVERHEAD {
            return Err(Error::FrameInvalid(format!(
                "frame of {} bytes is shorter than the {} byte minimum",
                len, RESPONSE_OVERHEAD
            )));
        }

        if input[0..2] != RESPONSE_PREFIX {
            return Err(Error::FrameInvalid(format!(
                "invalid prefix {:02x?}",
                &input[0..2]
            )));
        }

        let byte_count = usize::from(input[4]);
        if len != byte_count + RESPONSE_OVERHEAD {
            return Err(Error::FrameInvalid(format!(
                "length mismatch: frame is {} bytes, byte_count={}",
                len, byte_count
            )));
        }

        let data = &input[2..len - 2];
        let crc = &input[len - 2..];
        if checksum(data) != crc {
            return Err(Error::FrameInvalid(format!(
                "checksum mismatch - got {:02x?}, expected {:02x?}",
                crc,
                checksum(data)
            )));
        }

        Ok(Response {
            comm_addr: input[2],
            function: input[3],
            payload: &input[PAYLOAD_OFFSET..len - 2],
        })
    }

    /// Total, never panics: malformed input is simply `false`.
    pub fn is_valid_response(input: &[u8]) -> bool {
        Self::parse(input).is_ok()
    }
}

/// CRC-16/MODBUS, low byte first.
pub fn checksum(data: &[u8]) -> [u8; 2] {
    crc16::State::<crc16::MODBUS>::calculate(data).to_le_bytes()
}
