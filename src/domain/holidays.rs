//! Embedded public-holiday calendar (India, Tamil Nadu) used to label
//! synthetic orders. Covers the generator's 2023-2024 date window.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Holidays on the same date every year (month, day)
const FIXED_HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),   // New Year's Day
    (1, 15),  // Pongal
    (1, 16),  // Thiruvalluvar Day
    (1, 17),  // Uzhavar Thirunal
    (1, 26),  // Republic Day
    (4, 14),  // Tamil New Year / Ambedkar Jayanti
    (5, 1),   // Labour Day
    (8, 15),  // Independence Day
    (10, 2),  // Gandhi Jayanti
    (12, 25), // Christmas
];

/// Lunar and religious holidays for the years the generator samples
const MOVABLE_HOLIDAYS: &[(i32, u32, u32)] = &[
    (2023, 4, 4),   // Mahavir Jayanti
    (2023, 4, 7),   // Good Friday
    (2023, 4, 22),  // Ramzan
    (2023, 6, 29),  // Bakrid
    (2023, 7, 29),  // Muharram
    (2023, 9, 6),   // Krishna Jayanthi
    (2023, 9, 17),  // Vinayakar Chathurthi
    (2023, 9, 28),  // Milad-un-Nabi
    (2023, 10, 23), // Ayutha Pooja
    (2023, 10, 24), // Vijaya Dasami
    (2023, 11, 12), // Deepavali
    (2024, 3, 29),  // Good Friday
    (2024, 4, 9),   // Telugu New Year
    (2024, 4, 11),  // Ramzan
    (2024, 4, 21),  // Mahavir Jayanti
    (2024, 6, 17),  // Bakrid
    (2024, 7, 17),  // Muharram
    (2024, 8, 26),  // Krishna Jayanthi
    (2024, 9, 7),   // Vinayakar Chathurthi
    (2024, 9, 16),  // Milad-un-Nabi
    (2024, 10, 11), // Ayutha Pooja
    (2024, 10, 12), // Vijaya Dasami
    (2024, 10, 31), // Deepavali
];

#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    movable: BTreeSet<NaiveDate>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::tamil_nadu()
    }
}

impl HolidayCalendar {
    pub fn tamil_nadu() -> Self {
        let movable = MOVABLE_HOLIDAYS
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .collect();
        Self { movable }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        FIXED_HOLIDAYS
            .iter()
            .any(|&(m, d)| date.month() == m && date.day() == d)
            || self.movable.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_holidays_repeat_yearly() {
        let cal = HolidayCalendar::tamil_nadu();
        assert!(cal.is_holiday(date(2023, 1, 26)));
        assert!(cal.is_holiday(date(2024, 1, 26)));
        assert!(cal.is_holiday(date(2024, 8, 15)));
    }

    #[test]
    fn test_movable_holidays_are_year_specific() {
        let cal = HolidayCalendar::tamil_nadu();
        assert!(cal.is_holiday(date(2023, 11, 12)));
        assert!(!cal.is_holiday(date(2024, 11, 12)));
        assert!(cal.is_holiday(date(2024, 10, 31)));
    }

    #[test]
    fn test_ordinary_day() {
        let cal = HolidayCalendar::tamil_nadu();
        assert!(!cal.is_holiday(date(2024, 3, 5)));
    }
}
