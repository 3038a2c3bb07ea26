/// Label used for any code a table does not list.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Maps a raw code to a label. Lookup is total: unlisted codes get [`UNKNOWN_LABEL`].
#[derive(Debug, PartialEq, Eq)]
pub struct EnumTable {
    pub name: &'static str,
    entries: &'static [(u16, &'static str)],
}

impl EnumTable {
    pub const fn new(name: &'static str, entries: &'static [(u16, &'static str)]) -> Self {
        Self { name, entries }
    }

    pub fn get(&self, code: u16) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    pub fn label(&self, code: u16) -> &'static str {
        self.get(code).unwrap_or(UNKNOWN_LABEL)
    }
}

pub static WORK_MODES: EnumTable = EnumTable::new(
    "work_modes",
    &[
        (0, "Wait Mode"),
        (1, "Normal"),
        (2, "Error"),
        (4, "Check Mode"),
    ],
);

pub static SAFETY_COUNTRIES: EnumTable = EnumTable::new(
    "safety_countries",
    &[
        (0, "Italy"),
        (1, "Czech"),
        (2, "Germany"),
        (3, "Spain"),
        (4, "Greece"),
        (5, "Denmark"),
        (6, "Belgium"),
        (7, "Romania"),
        (8, "G83/G59"),
        (9, "Australia"),
        (10, "France"),
        (11, "China"),
        (13, "Poland"),
        (14, "South Africa"),
        (15, "AustraliaL"),
        (16, "Brazil"),
        (17, "Thailand MEA"),
        (18, "Thailand PEA"),
        (19, "Mauritius"),
        (20, "Holland"),
        (21, "Northern Ireland"),
        (22, "China Higher"),
        (23, "French 50Hz"),
        (24, "French 60Hz"),
        (25, "Australia Ergon"),
        (26, "Australia Energex"),
        (27, "Holland 16/20A"),
        (28, "Korea"),
        (29, "China Station"),
        (30, "Austria"),
        (31, "India"),
        (32, "50Hz Grid Default"),
        (33, "Warehouse"),
        (34, "Philippines"),
        (35, "Ireland"),
        (36, "Taiwan"),
        (37, "Bulgaria"),
        (38, "Barbados"),
        (39, "China Highest"),
        (40, "G59/3"),
        (41, "Sweden"),
        (42, "Chile"),
        (43, "Brazil LV"),
        (44, "NewZealand"),
        (45, "IEEE1547 208VAC"),
        (46, "IEEE1547 220VAC"),
        (47, "IEEE1547 240VAC"),
        (48, "60Hz LV Default"),
        (49, "50Hz LV Default"),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(WORK_MODES.label(1), "Normal");
        assert_eq!(SAFETY_COUNTRIES.label(20), "Holland");
        assert_eq!(SAFETY_COUNTRIES.label(32), "50Hz Grid Default");
    }

    #[test]
    fn lookup_is_total() {
        for code in 0..=u16::MAX {
            let label = WORK_MODES.label(code);
            assert!(!label.is_empty());
        }
        assert_eq!(WORK_MODES.label(3), UNKNOWN_LABEL);
        assert_eq!(SAFETY_COUNTRIES.label(12), UNKNOWN_LABEL);
        assert_eq!(SAFETY_COUNTRIES.label(0xffff), UNKNOWN_LABEL);
    }
}
