use crate::prelude::*;

use crate::goodwe::packet::{Parser, ReadRequest};
use std::hash::{Hash, Hasher};

/// A request frame paired with the check its reply must pass.
///
/// Equality and hashing look only at the request bytes, so two commands built
/// independently for the same registers are interchangeable as map keys.
#[derive(Clone, Debug)]
pub struct ProtocolCommand {
    request: Vec<u8>,
    read: ReadRequest,
}

impl ProtocolCommand {
    pub fn read(comm_addr: u8, register: u16, count: u16) -> Result<Self> {
        let read = ReadRequest::new(comm_addr, register, count)?;

        Ok(Self {
            request: read.bytes(),
            read,
        })
    }

    pub fn request(&self) -> &[u8] {
        &self.request
    }

    pub fn register(&self) -> u16 {
        self.read.register
    }

    /// Checks `response` against this command, explaining any rejection.
    pub fn check(&self, response: &[u8]) -> Result<()> {
        let r = Parser::parse(response)?;

        if r.is_exception() {
            return Err(Error::FrameInvalid(format!(
                "exception response {:#04x} to register {:#06x}",
                r.function, self.read.register
            )));
        }

        if r.function != u8::from(self.read.device_function) {
            return Err(Error::FrameInvalid(format!(
                "function {:#04x} does not echo request function {:#04x}",
                r.function,
                u8::from(self.read.device_function)
            )));
        }

        if r.payload.len() != self.read.payload_len() {
            return Err(Error::FrameInvalid(format!(
                "payload is {} bytes, expected {}",
                r.payload.len(),
                self.read.payload_len()
            )));
        }

        Ok(())
    }

    /// Pure predicate form of [`check`](Self::check).
    pub fn validator(&self, response: &[u8]) -> bool {
        match self.check(response) {
            Ok(()) => true,
            Err(e) => {
                trace!("{}: {}", self, e);
                false
            }
        }
    }
}

impl PartialEq for ProtocolCommand {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request
    }
}

impl Eq for ProtocolCommand {}

impl Hash for ProtocolCommand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.request.hash(state);
    }
}

impl std::fmt::Display for ProtocolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Utils::hex(&self.request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goodwe::packet::{checksum, DeviceFunction, RtuFrameFactory};
    use std::collections::HashMap;

    #[test]
    fn equal_by_request_bytes() {
        let a = ProtocolCommand::read(0x7f, 0x7594, 0x49).unwrap();
        let b = ProtocolCommand::read(0x7f, 0x7594, 0x49).unwrap();
        let c = ProtocolCommand::read(0x7f, 0x7531, 0x28).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut responses = HashMap::new();
        responses.insert(a, "runtime");
        assert_eq!(responses.get(&b), Some(&"runtime"));
        assert_eq!(responses.get(&c), None);
    }

    #[test]
    fn validator_checks_payload_length() {
        let command = ProtocolCommand::read(0x7f, 0x0100, 2).unwrap();

        let ok = RtuFrameFactory::response(0x7f, DeviceFunction::ReadHold, &[0, 1, 0, 2]).unwrap();
        assert!(command.validator(&ok));

        let short = RtuFrameFactory::response(0x7f, DeviceFunction::ReadHold, &[0, 1]).unwrap();
        assert!(!command.validator(&short));
    }

    fn signed(mut frame: Vec<u8>) -> Vec<u8> {
        let crc = checksum(&frame[2..]);
        frame.extend_from_slice(&crc);
        frame
    }

    #[test]
    fn validator_rejects_exception_and_wrong_function() {
        let command = ProtocolCommand::read(0x7f, 0x0100, 1).unwrap();

        // function 0x83: exception reply to a holding register read
        let nak = signed(vec![0xaa, 0x55, 0x7f, 0x83, 0x02, 0x00, 0x02]);
        assert!(Parser::is_valid_response(&nak));
        assert!(!command.validator(&nak));
        assert!(matches!(command.check(&nak), Err(Error::FrameInvalid(_))));

        let wrong = signed(vec![0xaa, 0x55, 0x7f, 0x04, 0x02, 0x00, 0x02]);
        assert!(Parser::is_valid_response(&wrong));
        assert!(!command.validator(&wrong));
    }
}
