//! The integer month encoding used by the external prediction service.
//!
//! A month index counts months with 1-based calendar months and an implicit
//! year rollover: the remainder after dividing by twelve is the calendar
//! month, except that a remainder of zero means December of the previous
//! year. Index 24293 is 2024-05, index 24300 is 2024-12.

/// Decode a month index into a `"YYYY-MM"` label.
///
/// The month is always zero-padded to two digits so the labels sort
/// chronologically even when compared as plain strings.
///
/// The service never emits indices at or below zero; they decode to negative
/// years here and are treated as malformed by the series builder.
pub fn decode_month_index(month_index: i64) -> String {
    let mut year = month_index.div_euclid(12);
    let mut month = month_index.rem_euclid(12);

    if month == 0 {
        month = 12;
        year -= 1;
    }

    format!("{year}-{month:02}")
}

/// Encode a year and 1-based calendar month into a month index, such that
/// [decode_month_index] round-trips for months in `[1, 12]`.
pub fn encode_month_index(year: i64, month: u8) -> i64 {
    debug_assert!((1..=12).contains(&month));

    // December is carried by the rollover rule: the index is an even multiple
    // of twelve belonging to the next year's block.
    if month == 12 {
        (year + 1) * 12
    } else {
        year * 12 + i64::from(month)
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_month_index, encode_month_index};

    #[test]
    fn decodes_with_zero_padded_month() {
        assert_eq!(decode_month_index(24293), "2024-05");
    }

    #[test]
    fn zero_remainder_rolls_back_to_december() {
        assert_eq!(decode_month_index(24300), "2024-12");
    }

    #[test]
    fn small_indices_match_the_rollover_convention() {
        assert_eq!(decode_month_index(13), "1-01");
        assert_eq!(decode_month_index(24), "1-12");
    }

    #[test]
    fn index_zero_decodes_to_year_minus_one() {
        // The rollover rule applied literally: remainder zero means December
        // of the year before year zero. Real snapshots never contain this.
        assert_eq!(decode_month_index(0), "-1-12");
    }

    #[test]
    fn round_trips_every_month_of_a_year() {
        for month in 1..=12u8 {
            let label = decode_month_index(encode_month_index(2024, month));

            assert_eq!(label, format!("2024-{month:02}"));
        }
    }

    #[test]
    fn months_are_always_two_digits_in_range() {
        for index in 1..=600 {
            let label = decode_month_index(index);
            let (_, month) = label
                .rsplit_once('-')
                .expect("label should have a month part");

            assert_eq!(month.len(), 2, "month not zero-padded in {label:?}");
            let month: u8 = month.parse().expect("month should be numeric");
            assert!((1..=12).contains(&month), "month out of range in {label:?}");
        }
    }

    #[test]
    fn labels_sort_chronologically_as_strings() {
        let labels: Vec<String> = (24290..24310).map(decode_month_index).collect();

        let mut sorted = labels.clone();
        sorted.sort();

        assert_eq!(labels, sorted);
    }
}
