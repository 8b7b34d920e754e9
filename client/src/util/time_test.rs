use super::*;

#[test]
fn compact_drops_fraction_and_zone() {
    assert_eq!(compact_timestamp("2024-01-01T10:20:30.123Z"), "2024-01-01 10:20:30");
    assert_eq!(compact_timestamp("2024-01-01T10:20:30+02:00"), "2024-01-01 10:20:30");
    assert_eq!(compact_timestamp("2024-01-01T10:20:30Z"), "2024-01-01 10:20:30");
}

#[test]
fn compact_passes_through_unrecognized_values() {
    assert_eq!(compact_timestamp("yesterday"), "yesterday");
    assert_eq!(compact_timestamp(""), "");
}

#[test]
fn native_fallbacks_split_date_and_time() {
    #[cfg(not(feature = "hydrate"))]
    {
        assert_eq!(format_timestamp("2024-01-01T10:20:30Z"), "2024-01-01 10:20:30");
        assert_eq!(format_date("2024-01-01T10:20:30Z"), "2024-01-01");
        assert_eq!(time_of_day("2024-01-01T10:20:30Z"), "10:20:30");
    }
}
