use crate::prelude::*;

use crate::goodwe::command::ProtocolCommand;
use crate::goodwe::sensor::{Schema, Sensor};
use crate::goodwe::tables::{SAFETY_COUNTRIES, WORK_MODES};
use serde::Deserialize;

pub const RUNTIME_DATA_REGISTER: u16 = 0x7594;
pub const RUNTIME_DATA_COUNT: u16 = 0x49;
pub const DEVICE_INFO_REGISTER: u16 = 0x7531;
pub const DEVICE_INFO_COUNT: u16 = 0x28;

// Family {{{
/// Hardware family an inverter is configured as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
pub enum Family {
    /// DT, D-NS and MS inverters; phase count comes from the device info.
    #[serde(rename = "dt")]
    Dt,
    /// Three-phase DT hardware, no device-info exchange.
    #[serde(rename = "dt-three-phase")]
    DtThreePhase,
}

impl Family {
    pub fn schema(&self) -> &'static Schema {
        &DT_SCHEMA
    }

    /// Whether the schema variant depends on a device-info exchange.
    pub fn needs_device_info(&self) -> bool {
        matches!(self, Family::Dt)
    }

    pub fn runtime_data(&self, comm_addr: u8) -> Result<ProtocolCommand> {
        ProtocolCommand::read(comm_addr, RUNTIME_DATA_REGISTER, RUNTIME_DATA_COUNT)
    }

    pub fn device_info(&self, comm_addr: u8) -> Result<ProtocolCommand> {
        ProtocolCommand::read(comm_addr, DEVICE_INFO_REGISTER, DEVICE_INFO_COUNT)
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Dt => write!(f, "dt"),
            Family::DtThreePhase => write!(f, "dt-three-phase"),
        }
    }
}
// }}}

// Schema {{{
pub static DT_SCHEMA: Schema = Schema {
    name: "DT",
    sensors: &DT_SENSORS,
};

static DT_SENSORS: [Sensor; 74] = [
    Sensor::timestamp("timestamp", 0, "Timestamp"),
    Sensor::voltage("vpv1", 6, "PV1 Voltage"),
    Sensor::current("ipv1", 8, "PV1 Current"),
    Sensor::calculated_power("ppv1", 6, 8, "PV1 Power"),
    Sensor::voltage("vpv2", 10, "PV2 Voltage"),
    Sensor::current("ipv2", 12, "PV2 Current"),
    Sensor::calculated_power("ppv2", 10, 12, "PV2 Power"),
    Sensor::reserved("xx14", 14),
    Sensor::reserved("xx16", 16),
    Sensor::reserved("xx18", 18),
    Sensor::reserved("xx20", 20),
    Sensor::reserved("xx22", 22),
    Sensor::reserved("xx24", 24),
    Sensor::reserved("xx26", 26),
    Sensor::reserved("xx28", 28),
    Sensor::voltage("vline1", 30, "On-grid L1-L2 Voltage"),
    Sensor::voltage("vline2", 32, "On-grid L2-L3 Voltage").three_phase(),
    Sensor::voltage("vline3", 34, "On-grid L3-L1 Voltage").three_phase(),
    Sensor::voltage("vgrid1", 36, "On-grid L1 Voltage"),
    Sensor::voltage("vgrid2", 38, "On-grid L2 Voltage").three_phase(),
    Sensor::voltage("vgrid3", 40, "On-grid L3 Voltage").three_phase(),
    Sensor::current("igrid1", 42, "On-grid L1 Current"),
    Sensor::current("igrid2", 44, "On-grid L2 Current").three_phase(),
    Sensor::current("igrid3", 46, "On-grid L3 Current").three_phase(),
    Sensor::frequency("fgrid1", 48, "On-grid L1 Frequency"),
    Sensor::frequency("fgrid2", 50, "On-grid L2 Frequency").three_phase(),
    Sensor::frequency("fgrid3", 52, "On-grid L3 Frequency").three_phase(),
    Sensor::calculated_power("pgrid1", 36, 42, "On-grid L1 Power"),
    Sensor::calculated_power("pgrid2", 38, 44, "On-grid L2 Power").three_phase(),
    Sensor::calculated_power("pgrid3", 40, 46, "On-grid L3 Power").three_phase(),
    Sensor::reserved("xx54", 54),
    Sensor::power("ppv", 56, "PV Power"),
    Sensor::enumeration("work_mode", "work_mode_label", 58, &WORK_MODES, "Work Mode"),
    Sensor::reserved("xx60", 60),
    Sensor::reserved("xx62", 62),
    Sensor::reserved("xx64", 64),
    Sensor::reserved("xx66", 66),
    Sensor::reserved("xx68", 68),
    Sensor::reserved("xx70", 70),
    Sensor::reserved("xx72", 72),
    Sensor::reserved("xx74", 74),
    Sensor::reserved("xx76", 76),
    Sensor::reserved("xx78", 78),
    Sensor::reserved("xx80", 80),
    Sensor::temperature("temperature", 82, "Inverter Temperature"),
    Sensor::reserved("xx84", 84),
    Sensor::reserved("xx86", 86),
    Sensor::energy("e_day", 88, "Today's PV Generation"),
    Sensor::energy4("e_total", 90, "Total PV Generation"),
    Sensor::long("h_total", 94, "Hours Total", "h"),
    Sensor::enumeration("safety_country", "safety_country_label", 98, &SAFETY_COUNTRIES, "Safety Country"),
    Sensor::reserved("xx100", 100),
    Sensor::reserved("xx102", 102),
    Sensor::reserved("xx104", 104),
    Sensor::reserved("xx106", 106),
    Sensor::reserved("xx108", 108),
    Sensor::reserved("xx110", 110),
    Sensor::reserved("xx112", 112),
    Sensor::reserved("xx114", 114),
    Sensor::reserved("xx116", 116),
    Sensor::reserved("xx118", 118),
    Sensor::reserved("xx120", 120),
    Sensor::reserved("xx122", 122),
    Sensor::integer("funbit", 124, "FunBit", ""),
    Sensor::voltage("vbus", 126, "Bus Voltage"),
    Sensor::voltage("vnbus", 128, "NBus Voltage"),
    Sensor::reserved("xx130", 130),
    Sensor::reserved("xx132", 132),
    Sensor::reserved("xx134", 134),
    Sensor::reserved("xx136", 136),
    Sensor::reserved("xx138", 138),
    Sensor::reserved("xx140", 140),
    Sensor::reserved("xx142", 142),
    Sensor::reserved("xx144", 144),
];
// }}}
