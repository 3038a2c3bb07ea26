use crate::prelude::*;

use nom_derive::{Nom, Parse};
use serde::Serialize;

/// Payload bytes the device-info layout reads.
pub const DEVICE_INFO_LEN: usize = 76;

/// Serial number tags of single-phase models sharing the DT protocol.
const SINGLE_PHASE_TAGS: [&str; 9] = ["DSN", "DST", "NSU", "SSN", "SST", "SSX", "SSY", "PSB", "PSC"];

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Nom)]
#[nom(BigEndian)]
pub struct DeviceInfo {
    pub modbus_version: u16,
    pub rated_power: u16,
    pub ac_output_type: u16,
    #[nom(Parse = "Utils::ascii16")]
    pub serial_number: String,
    #[nom(Parse = "Utils::ascii10")]
    pub model_name: String,
    #[nom(SkipBefore(34))] // registers 0x7541-0x7551
    pub dsp1_version: u16,
    pub dsp2_version: u16,
    pub arm_version: u16,
    pub dsp_svn_version: u16,
    pub arm_svn_version: u16,
}

impl DeviceInfo {
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        if payload.len() < DEVICE_INFO_LEN {
            return Err(Error::DecodeOutOfRange {
                schema: "device_info",
                required: DEVICE_INFO_LEN,
                actual: payload.len(),
            });
        }

        match Self::parse(payload) {
            Ok((_, info)) => Ok(info),
            Err(e) => Err(Error::FrameInvalid(format!("device info: {}", e))),
        }
    }

    pub fn firmware(&self) -> String {
        format!("{}.{}.{}", self.dsp1_version, self.dsp2_version, self.arm_version)
    }

    pub fn is_single_phase(&self) -> bool {
        SINGLE_PHASE_TAGS
            .iter()
            .any(|tag| self.serial_number.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(serial: &[u8; 16], model: &[u8; 10]) -> Vec<u8> {
        let mut p = Vec::with_capacity(80);
        p.extend_from_slice(&[0x00, 0x01, 0x1f, 0x40, 0x00, 0x01]);
        p.extend_from_slice(serial);
        p.extend_from_slice(model);
        p.extend_from_slice(&[0u8; 34]);
        for v in [4u16, 4, 9, 114, 71] {
            p.extend_from_slice(&v.to_be_bytes());
        }
        p.extend_from_slice(&[0u8; 4]);
        p
    }

    #[test]
    fn parses_layout() {
        let info = DeviceInfo::from_payload(&payload(b"58000DTU21AW0123", b"GW8K-DT\0\0\0")).unwrap();

        assert_eq!(info.modbus_version, 1);
        assert_eq!(info.rated_power, 8000);
        assert_eq!(info.ac_output_type, 1);
        assert_eq!(info.serial_number, "58000DTU21AW0123");
        assert_eq!(info.model_name, "GW8K-DT");
        assert_eq!(info.firmware(), "4.4.9");
        assert_eq!(info.dsp_svn_version, 114);
        assert_eq!(info.arm_svn_version, 71);
        assert!(!info.is_single_phase());
    }

    #[test]
    fn single_phase_serials() {
        let info = DeviceInfo::from_payload(&payload(b"53600DSN20BW0001", b"GW3600D-NS")).unwrap();
        assert!(info.is_single_phase());
    }

    #[test]
    fn short_payload() {
        let p = payload(b"58000DTU21AW0123", b"GW8K-DT   ");
        assert!(matches!(
            DeviceInfo::from_payload(&p[..60]),
            Err(Error::DecodeOutOfRange { required: 76, actual: 60, .. })
        ));
    }
}
