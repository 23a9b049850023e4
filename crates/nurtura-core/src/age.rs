//! Whole-month age arithmetic.

use jiff::civil::Date;

/// Age in whole months at `today` for a child born on `dob`.
///
/// Calendar-month arithmetic only: the day of month is ignored, so a child
/// near a month boundary can be classified up to 29 days away from exact
/// elapsed time. The assessment catalog's age windows are calibrated against
/// this rounding, so it must not be made more precise.
pub fn age_in_months(dob: Date, today: Date) -> i32 {
    (i32::from(today.year()) - i32::from(dob.year())) * 12
        + (i32::from(today.month()) - i32::from(dob.month()))
}
