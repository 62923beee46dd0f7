use chrono::{Datelike, Days, Local, NaiveDate};
use serde::Serialize;

use crate::models::SessionRecord;

/// One calendar day in the trailing 7-day series.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Short `d.m` axis label.
    pub label: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    pub name: String,
    pub minutes: u32,
    pub percent: u32,
}

/// Derived statistics over the full session list. Pure data; recomputed
/// from scratch whenever the list changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub today_total_seconds: u64,
    pub all_time_total_seconds: u64,
    pub total_distractions: u64,
    /// Oldest first; days with no records yield 0.
    pub last7: Vec<DayBucket>,
    pub categories: Vec<CategorySlice>,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn local_day(record: &SessionRecord) -> NaiveDate {
    record.completed_at.with_timezone(&Local).date_naive()
}

fn round_minutes(seconds: u64) -> u32 {
    (seconds as f64 / 60.0).round() as u32
}

/// Aggregate the session list as of `today` (local calendar days).
///
/// Category percentages are computed from unrounded seconds while the
/// displayed minutes round independently, so percents are not guaranteed
/// to sum to exactly 100.
pub fn summarize(records: &[SessionRecord], today: NaiveDate) -> ReportSummary {
    let mut today_total_seconds = 0u64;
    let mut all_time_total_seconds = 0u64;
    let mut total_distractions = 0u64;
    // First-appearance order, matching the newest-first session list.
    let mut category_seconds: Vec<(String, u64)> = Vec::new();

    for record in records {
        let seconds = record.actual_duration_seconds as u64;
        all_time_total_seconds += seconds;
        total_distractions += record.distractions as u64;
        if local_day(record) == today {
            today_total_seconds += seconds;
        }

        match category_seconds
            .iter_mut()
            .find(|(name, _)| *name == record.category)
        {
            Some((_, total)) => *total += seconds,
            None => category_seconds.push((record.category.clone(), seconds)),
        }
    }

    let last7 = (0..7u64)
        .rev()
        .map(|back| {
            let date = today
                .checked_sub_days(Days::new(back))
                .unwrap_or(today);
            let day_seconds: u64 = records
                .iter()
                .filter(|record| local_day(record) == date)
                .map(|record| record.actual_duration_seconds as u64)
                .sum();
            DayBucket {
                date,
                label: format!("{}.{}", date.day(), date.month()),
                minutes: round_minutes(day_seconds),
            }
        })
        .collect();

    let category_total: u64 = category_seconds.iter().map(|(_, seconds)| seconds).sum();
    let categories = category_seconds
        .into_iter()
        .filter(|(_, seconds)| *seconds > 0)
        .map(|(name, seconds)| CategorySlice {
            name,
            minutes: round_minutes(seconds),
            percent: if category_total > 0 {
                (seconds as f64 / category_total as f64 * 100.0).round() as u32
            } else {
                0
            },
        })
        .collect();

    ReportSummary {
        today_total_seconds,
        all_time_total_seconds,
        total_distractions,
        last7,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record_on(date: NaiveDate, category: &str, seconds: u32, distractions: u32) -> SessionRecord {
        // Local noon keeps the calendar day stable in any timezone.
        let completed_at = Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
            .with_timezone(&Utc);
        SessionRecord {
            id: Uuid::new_v4().to_string(),
            category: category.into(),
            target_duration_seconds: seconds,
            actual_duration_seconds: seconds,
            distractions,
            completed_at,
        }
    }

    #[test]
    fn empty_list_yields_zeroed_summary() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let summary = summarize(&[], today);
        assert_eq!(summary.all_time_total_seconds, 0);
        assert_eq!(summary.last7.len(), 7);
        assert!(summary.last7.iter().all(|day| day.minutes == 0));
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn totals_and_breakdown_scenario() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let records = vec![
            record_on(today, "A", 600, 2),
            record_on(today, "A", 300, 0),
            record_on(yesterday, "B", 900, 1),
        ];

        let summary = summarize(&records, today);
        assert_eq!(summary.today_total_seconds, 900);
        assert_eq!(summary.all_time_total_seconds, 1800);
        assert_eq!(summary.total_distractions, 3);

        assert_eq!(summary.categories.len(), 2);
        assert_eq!(
            summary.categories[0],
            CategorySlice {
                name: "A".into(),
                minutes: 15,
                percent: 50
            }
        );
        assert_eq!(
            summary.categories[1],
            CategorySlice {
                name: "B".into(),
                minutes: 15,
                percent: 50
            }
        );
    }

    #[test]
    fn last7_is_oldest_first_with_gaps_at_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let three_back = today.checked_sub_days(Days::new(3)).unwrap();
        let records = vec![
            record_on(today, "A", 120, 0),
            record_on(three_back, "A", 90, 0),
            // Outside the window, ignored by the series.
            record_on(today.checked_sub_days(Days::new(10)).unwrap(), "A", 600, 0),
        ];

        let summary = summarize(&records, today);
        let days = &summary.last7;
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, today.checked_sub_days(Days::new(6)).unwrap());
        assert_eq!(days[6].date, today);
        assert_eq!(days[6].minutes, 2);
        assert_eq!(days[3].minutes, 2); // 90s rounds up
        assert_eq!(
            days.iter().map(|d| d.minutes).sum::<u32>(),
            4
        );
        assert_eq!(days[6].label, "29.8");
    }

    #[test]
    fn percent_uses_unrounded_seconds() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let records = vec![
            record_on(today, "A", 100, 0),
            record_on(today, "B", 50, 0),
        ];

        let summary = summarize(&records, today);
        assert_eq!(summary.categories[0].percent, 67);
        assert_eq!(summary.categories[1].percent, 33);
        assert_eq!(summary.categories[0].minutes, 2);
        assert_eq!(summary.categories[1].minutes, 1);
    }

    #[test]
    fn zero_duration_categories_are_excluded() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut zero = record_on(today, "Empty", 0, 0);
        zero.actual_duration_seconds = 0;
        let records = vec![zero, record_on(today, "A", 60, 0)];

        let summary = summarize(&records, today);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].name, "A");
        assert_eq!(summary.categories[0].percent, 100);
    }
}
