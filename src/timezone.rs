//! Resolves canonical timezone names into concrete dates and offsets.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the timezone named by `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the name is not a canonical
/// timezone string.
pub fn current_local_date(canonical_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(canonical_timezone) else {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        return Err(Error::InvalidTimezoneError(canonical_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::current_local_date;

    #[test]
    fn resolves_utc() {
        assert!(current_local_date("Etc/UTC").is_ok());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = current_local_date("Atlantis/Lost_City");

        assert_eq!(
            result,
            Err(Error::InvalidTimezoneError("Atlantis/Lost_City".to_owned()))
        );
    }
}
