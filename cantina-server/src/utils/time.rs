//! 时间工具函数 — 业务时区转换
//!
//! 所有日期/时间→时间戳转换统一在 handler/service 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use shared::error::AppError;
use shared::AppResult;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_hhmm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::invalid_format(format!("Invalid time format: {}", time)))
}

/// 日期 + 时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期 + cutoff 字符串 ("HH:MM") → Unix millis (业务时区)
pub fn cutoff_millis(date: &str, cutoff: &str, tz: Tz) -> AppResult<i64> {
    let date = parse_date(date)?;
    let time = parse_hhmm(cutoff)?;
    Ok(date_time_to_millis(date, time, tz))
}

/// 当前时间 Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-03-15").is_ok());
        assert!(parse_date("2024-3-15").is_err());
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(
            parse_hhmm("14:00").unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        );
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("14:00:00").is_err());
        assert!(parse_hhmm("2pm").is_err());
    }

    #[test]
    fn test_cutoff_ordering() {
        let tz = chrono_tz::Europe::Madrid;
        let cutoff = cutoff_millis("2024-03-15", "14:00", tz).unwrap();
        let minute_before = cutoff_millis("2024-03-15", "13:59", tz).unwrap();
        let minute_after = cutoff_millis("2024-03-15", "14:01", tz).unwrap();
        assert!(minute_before < cutoff);
        assert!(cutoff < minute_after);
        assert_eq!(minute_after - minute_before, 2 * 60 * 1000);
    }
}
