//! Agency short codes and the semantic field names they map to.

use std::collections::HashMap;

/// `(short code, semantic name)` in source column order.
pub const FIELD_ALIASES: [(&str, &str); 24] = [
    ("NFDBFIREID", "nfdb_fire_id"),
    ("FIRE_ID", "fire_id"),
    ("FIRENAME", "fire_name"),
    ("SRC_AGENCY", "src_agency"),
    ("RESPONSE", "agency_response"),
    ("YEAR", "year"),
    ("MONTH", "month"),
    ("DAY", "day"),
    ("ATTK_DATE", "ignition_date"),
    ("REP_DATE", "report_date"),
    ("OUT_DATE", "out_date"),
    ("ACQ_DATE", "acq_date"),
    ("CAUSE", "cause_primary"),
    ("CAUSE2", "cause_secondary"),
    ("FIRE_TYPE", "fire_type"),
    ("SIZE_HA", "size_ha"),
    ("PRESCRIBED", "prescribed"),
    ("NAT_PARK", "national_park"),
    ("PROTZONE", "protection_zone"),
    ("MORE_INFO", "more_info"),
    ("CFS_NOTE1", "note1"),
    ("CFS_NOTE2", "note2"),
    ("LATITUDE", "latitude"),
    ("LONGITUDE", "longitude"),
];

/// Short code → semantic name.
pub fn alias_map() -> HashMap<&'static str, &'static str> {
    FIELD_ALIASES.iter().copied().collect()
}

pub fn semantic_name(code: &str) -> Option<&'static str> {
    FIELD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map(|(_, name)| *name)
}

pub fn short_code(name: &str) -> Option<&'static str> {
    FIELD_ALIASES
        .iter()
        .find(|(_, semantic)| *semantic == name)
        .map(|(alias, _)| *alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_symmetric() {
        for (code, name) in FIELD_ALIASES {
            assert_eq!(semantic_name(code), Some(name));
            assert_eq!(short_code(name), Some(code));
        }
        assert_eq!(alias_map().len(), FIELD_ALIASES.len());
    }

    #[test]
    fn unknown_codes_have_no_alias() {
        assert_eq!(semantic_name("GEOMETRY"), None);
        assert_eq!(semantic_name("firename"), None);
    }
}
