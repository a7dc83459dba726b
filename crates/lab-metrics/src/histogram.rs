//! Organization-wide monthly publication histogram.
//!
//! Unlike the per-paper trend series this is a dense calendar scan: every
//! month of the target year is present, zero when nothing was created.

use chrono::{DateTime, Datelike, Utc};

use lab_core::responses::{MonthlyCount, PublicationHistogram};

pub const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Count creation timestamps per month of `year`. Timestamps from other
/// years are ignored.
pub fn monthly_histogram<I>(year: i32, created: I) -> PublicationHistogram
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut counts = [0u64; 12];
    for ts in created {
        if ts.year() != year {
            continue;
        }
        // month0() is always 0..=11
        if let Some(slot) = usize::try_from(ts.month0()).ok().and_then(|i| counts.get_mut(i)) {
            *slot += 1;
        }
    }

    PublicationHistogram {
        year,
        months: SHORT_MONTH_NAMES
            .iter()
            .zip(counts)
            .map(|(name, papers)| MonthlyCount {
                name: (*name).to_string(),
                papers,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_year_is_twelve_zeros() {
        let hist = monthly_histogram(2024, Vec::new());
        assert_eq!(hist.year, 2024);
        assert_eq!(hist.months.len(), 12);
        assert!(hist.months.iter().all(|m| m.papers == 0));
        let names: Vec<&str> = hist.months.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, SHORT_MONTH_NAMES.to_vec());
    }

    #[test]
    fn counts_by_month_and_ignores_other_years() {
        let hist = monthly_histogram(
            2024,
            vec![
                at(2024, 1, 3),
                at(2024, 1, 31),
                at(2024, 12, 31),
                at(2023, 1, 5),
                at(2025, 1, 1),
            ],
        );
        assert_eq!(hist.months[0].papers, 2);
        assert_eq!(hist.months[11].papers, 1);
        assert_eq!(hist.months.iter().map(|m| m.papers).sum::<u64>(), 3);
    }
}
