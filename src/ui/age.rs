//! Whole years elapsed since a birth date.

use chrono::{Datelike, NaiveDate};

/// Age on `today`: the year difference, minus one if this year's birthday has not happened yet.
/// A 29 February birthday counts as reached on 1 March in non-leap years.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
