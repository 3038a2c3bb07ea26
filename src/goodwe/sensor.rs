use crate::goodwe::tables::EnumTable;

// Width {{{
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Width {
    W16,
    W32,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::W16 => 2,
            Width::W32 => 4,
        }
    }
}
// }}}

// SensorKind {{{
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorKind {
    /// Two's complement, big endian.
    Integer(Width),
    Unsigned(Width),
    /// Signed raw value divided by `divisor`. When `unreported` is set, the
    /// all-ones raw pattern decodes to that value instead.
    FixedPoint {
        width: Width,
        divisor: u32,
        unreported: Option<f64>,
    },
    /// 16-bit code emitted under the sensor id, its label under `label`.
    Enumeration {
        table: &'static EnumTable,
        label: &'static str,
    },
    /// Six bytes: year since 2000, month, day, hour, minute, second.
    Timestamp,
    /// `n` bytes passed through as hex.
    Raw(usize),
    /// Rounded product of the deci-volt field at `voltage` and the deci-amp
    /// field at `current`. Reads no bytes of its own.
    Power { voltage: usize, current: usize },
}

pub const TIMESTAMP_LEN: usize = 6;
// }}}

// Sensor {{{
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensor {
    pub id: &'static str,
    /// Where the raw bytes start. Offsets never decrease in declaration order,
    /// except for derived sensors: those sit after their source fields and
    /// carry the offset of the later source.
    pub offset: usize,
    pub kind: SensorKind,
    pub name: &'static str,
    pub unit: &'static str,
    /// Only present on three-phase hardware (L2/L3 quantities).
    pub three_phase_only: bool,
    /// Undocumented offset, emitted only when unknown fields are requested.
    pub reserved: bool,
}

impl Sensor {
    pub const fn new(id: &'static str, offset: usize, kind: SensorKind, name: &'static str, unit: &'static str) -> Self {
        Self {
            id,
            offset,
            kind,
            name,
            unit,
            three_phase_only: false,
            reserved: false,
        }
    }

    pub const fn three_phase(self) -> Self {
        Self {
            three_phase_only: true,
            ..self
        }
    }

    pub const fn timestamp(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::new(id, offset, SensorKind::Timestamp, name, "")
    }

    pub const fn integer(id: &'static str, offset: usize, name: &'static str, unit: &'static str) -> Self {
        Self::new(id, offset, SensorKind::Integer(Width::W16), name, unit)
    }

    pub const fn long(id: &'static str, offset: usize, name: &'static str, unit: &'static str) -> Self {
        Self::new(id, offset, SensorKind::Integer(Width::W32), name, unit)
    }

    pub const fn scaled(
        id: &'static str,
        offset: usize,
        width: Width,
        divisor: u32,
        unreported: f64,
        name: &'static str,
        unit: &'static str,
    ) -> Self {
        let kind = SensorKind::FixedPoint {
            width,
            divisor,
            unreported: Some(unreported),
        };
        Self::new(id, offset, kind, name, unit)
    }

    pub const fn voltage(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::scaled(id, offset, Width::W16, 10, -0.1, name, "V")
    }

    pub const fn current(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::scaled(id, offset, Width::W16, 10, -0.1, name, "A")
    }

    pub const fn frequency(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::scaled(id, offset, Width::W16, 100, -0.01, name, "Hz")
    }

    pub const fn temperature(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::scaled(id, offset, Width::W16, 10, -0.1, name, "C")
    }

    pub const fn energy(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::scaled(id, offset, Width::W16, 10, -0.1, name, "kWh")
    }

    pub const fn energy4(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::scaled(id, offset, Width::W32, 10, -0.1, name, "kWh")
    }

    pub const fn power(id: &'static str, offset: usize, name: &'static str) -> Self {
        Self::integer(id, offset, name, "W")
    }

    pub const fn calculated_power(id: &'static str, voltage: usize, current: usize, name: &'static str) -> Self {
        let offset = if voltage > current { voltage } else { current };
        Self::new(id, offset, SensorKind::Power { voltage, current }, name, "W")
    }

    pub const fn enumeration(
        id: &'static str,
        label: &'static str,
        offset: usize,
        table: &'static EnumTable,
        name: &'static str,
    ) -> Self {
        Self::new(id, offset, SensorKind::Enumeration { table, label }, name, "")
    }

    pub const fn reserved(id: &'static str, offset: usize) -> Self {
        Self {
            reserved: true,
            ..Self::integer(id, offset, "Unknown sensor", "")
        }
    }

    /// First byte past everything this sensor reads.
    pub fn end(&self) -> usize {
        match self.kind {
            SensorKind::Integer(w) | SensorKind::Unsigned(w) => self.offset + w.bytes(),
            SensorKind::FixedPoint { width, .. } => self.offset + width.bytes(),
            SensorKind::Enumeration { .. } => self.offset + 2,
            SensorKind::Timestamp => self.offset + TIMESTAMP_LEN,
            SensorKind::Raw(n) => self.offset + n,
            SensorKind::Power { voltage, current } => voltage.max(current) + 2,
        }
    }

    /// Computed from other fields rather than read from its own bytes.
    pub fn is_derived(&self) -> bool {
        matches!(self.kind, SensorKind::Power { .. })
    }

    /// The label id, for enumeration sensors.
    pub fn label_id(&self) -> Option<&'static str> {
        match self.kind {
            SensorKind::Enumeration { label, .. } => Some(label),
            _ => None,
        }
    }
}
// }}}

// Schema {{{
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phases {
    Single,
    Three,
}

/// Field layout of one family's runtime-data payload.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub sensors: &'static [Sensor],
}

impl Schema {
    /// Shortest payload every declared sensor can be read from.
    pub fn required_len(&self) -> usize {
        self.sensors.iter().map(Sensor::end).max().unwrap_or(0)
    }

    pub fn sensors_for(&self, phases: Phases, include_unknown: bool) -> impl Iterator<Item = &'static Sensor> {
        self.sensors.iter().filter(move |s| {
            (include_unknown || !s.reserved) && (phases == Phases::Three || !s.three_phase_only)
        })
    }

    /// Looks up a sensor by id, or by the label id of an enumeration sensor.
    pub fn sensor(&self, id: &str) -> Option<&'static Sensor> {
        self.sensors
            .iter()
            .find(|s| s.id == id || s.label_id() == Some(id))
    }

    /// Display unit of an emitted reading id. Labels carry no unit.
    pub fn unit(&self, id: &str) -> Option<&'static str> {
        self.sensor(id)
            .map(|s| if s.id == id { s.unit } else { "" })
    }
}
// }}}
