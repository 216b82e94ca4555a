//! Blocking wait for the fixed local report time.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime};
use tracing::info;

/// Next local occurrence of `at`: today if it is still ahead, otherwise
/// tomorrow. DST-ambiguous targets resolve to the earliest valid instant.
pub fn next_occurrence(now: DateTime<Local>, at: NaiveTime) -> DateTime<Local> {
    let mut target_naive = now.date_naive().and_time(at);
    if target_naive <= now.naive_local() {
        target_naive = target_naive + ChronoDuration::days(1);
    }

    match target_naive.and_local_timezone(Local) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        // Skipped by a DST jump; push an hour past the gap.
        chrono::LocalResult::None => {
            let adjusted = target_naive + ChronoDuration::hours(1);
            adjusted
                .and_local_timezone(Local)
                .earliest()
                .unwrap_or_else(Local::now)
        }
    }
}

/// Sleep until the next occurrence of `at` local time.
pub async fn wait_until(at: NaiveTime) {
    let now = Local::now();
    let target = next_occurrence(now, at);
    let delay = (target - now).to_std().unwrap_or_default();

    info!(
        "Waiting until {} ({}s from now)",
        target.format("%Y-%m-%d %H:%M:%S %Z"),
        delay.as_secs()
    );
    tokio::time::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn future_time_today_stays_today() {
        let now = Local.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        let at = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let target = next_occurrence(now, at);
        assert_eq!(target.date_naive(), now.date_naive());
        assert_eq!(target.time(), at);
    }

    #[test]
    fn past_time_rolls_to_tomorrow() {
        let now = Local.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let at = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let target = next_occurrence(now, at);
        assert_eq!(
            target.date_naive(),
            now.date_naive() + ChronoDuration::days(1)
        );
    }

    #[test]
    fn exact_now_rolls_to_tomorrow() {
        let now = Local.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap();
        let at = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let target = next_occurrence(now, at);
        assert!(target > now);
    }
}
