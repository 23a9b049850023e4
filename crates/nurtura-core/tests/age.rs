use jiff::civil::date;

use nurtura_core::age::age_in_months;

#[test]
fn whole_years_are_exact_multiples_of_twelve() {
    assert_eq!(age_in_months(date(2023, 8, 6), date(2026, 8, 6)), 36);
}

#[test]
fn day_of_month_is_ignored() {
    // Born on the 31st, assessed on the 1st: still 36 whole months by
    // calendar arithmetic, even though only ~35 months have elapsed.
    assert_eq!(age_in_months(date(2023, 8, 31), date(2026, 8, 1)), 36);
}

#[test]
fn year_boundaries_carry_correctly() {
    assert_eq!(age_in_months(date(2025, 12, 15), date(2026, 1, 2)), 1);
    assert_eq!(age_in_months(date(2025, 11, 1), date(2026, 2, 1)), 3);
}

#[test]
fn a_newborn_is_zero_months_old() {
    assert_eq!(age_in_months(date(2026, 8, 1), date(2026, 8, 28)), 0);
}
