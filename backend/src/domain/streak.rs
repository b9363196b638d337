//! Streak calculation over check-in dates.
//!
//! The calculation is pure: it takes the full set of check-in days for a
//! habit and never reads the clock. Callers decide what "today" is.

use chrono::NaiveDate;

use super::calendar::previous_day;

/// Count consecutive check-in days ending `today` or the day before.
///
/// Dates may arrive in any order and may repeat. The streak is zero when the
/// newest date is older than yesterday; a check-in yesterday keeps the streak
/// alive until the end of today.
///
/// # Examples
/// ```
/// use backend::domain::streak::current_streak;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let dates = [today.pred_opt().unwrap(), today];
/// assert_eq!(current_streak(dates, today), 2);
/// ```
pub fn current_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut sorted: Vec<NaiveDate> = dates.into_iter().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut days = sorted.into_iter();
    let Some(most_recent) = days.next() else {
        return 0;
    };
    if most_recent < previous_day(today) {
        return 0;
    }

    let mut streak: u32 = 1;
    let mut cursor = most_recent;
    for day in days {
        if day == cursor {
            continue;
        }
        if day == previous_day(cursor) {
            streak = streak.saturating_add(1);
            cursor = day;
        } else {
            break;
        }
    }
    streak
}
