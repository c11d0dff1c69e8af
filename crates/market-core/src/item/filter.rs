//! Query parameters for the filtered item list.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use std::str::FromStr;

use super::model::ItemStatus;

/// Publish-time window offered by the item filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListedWithin {
    /// From local midnight today to local midnight tomorrow.
    Today,
    Week,
    Month,
    ThreeMonths,
}

impl ListedWithin {
    /// Resolves the window to `(start, end)` relative to `now`.
    pub fn range(self, now: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
        let days_back = match self {
            Self::Today => {
                let today = now.date_naive();
                let start = local_midnight(today).unwrap_or(now);
                let end = today
                    .succ_opt()
                    .and_then(local_midnight)
                    .unwrap_or(start + Duration::days(1));
                return (start, end);
            }
            Self::Week => 7,
            Self::Month => 30,
            Self::ThreeMonths => 90,
        };
        (now - Duration::days(days_back), now)
    }
}

impl FromStr for ListedWithin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "3months" => Ok(Self::ThreeMonths),
            other => Err(format!(
                "unknown time window '{other}' (expected today, week, month or 3months)"
            )),
        }
    }
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Local.from_local_datetime(&naive).earliest()
}

/// Filter for `GET /item`. Unset fields are omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub category: Option<u8>,
    pub status: Option<ItemStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub listed_within: Option<ListedWithin>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Query pairs in the backend's parameter names. Time bounds are unix seconds.
    pub fn query_pairs(&self, now: DateTime<Local>) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", u8::from(status).to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        if let Some(window) = self.listed_within {
            let (start, end) = window.range(now);
            pairs.push(("startTime", start.timestamp().to_string()));
            pairs.push(("endTime", end.timestamp().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 10, 15, 30, 0).single().unwrap()
    }

    #[test]
    fn test_empty_filter_has_no_pairs() {
        let filter = ItemFilter::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs(fixed_now()).is_empty());
    }

    #[test]
    fn test_pairs_use_backend_names() {
        let filter = ItemFilter {
            category: Some(2),
            status: Some(ItemStatus::Reserved),
            min_price: Some(10.0),
            max_price: Some(99.5),
            listed_within: None,
        };

        let pairs = filter.query_pairs(fixed_now());
        assert_eq!(
            pairs,
            vec![
                ("category", "2".to_string()),
                ("status", "1".to_string()),
                ("minPrice", "10".to_string()),
                ("maxPrice", "99.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_today_spans_local_calendar_day() {
        let (start, end) = ListedWithin::Today.range(fixed_now());
        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);
        assert_eq!(start.date_naive(), fixed_now().date_naive());
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn test_rolling_windows_end_now() {
        let now = fixed_now();
        for (window, days) in [
            (ListedWithin::Week, 7),
            (ListedWithin::Month, 30),
            (ListedWithin::ThreeMonths, 90),
        ] {
            let (start, end) = window.range(now);
            assert_eq!(end, now);
            assert_eq!(end - start, Duration::days(days));
        }
    }

    #[test]
    fn test_time_window_adds_both_bounds() {
        let filter = ItemFilter {
            listed_within: Some(ListedWithin::Week),
            ..ItemFilter::default()
        };
        let now = fixed_now();
        let pairs = filter.query_pairs(now);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], ("endTime", now.timestamp().to_string()));
    }

    #[test]
    fn test_parse_window_names() {
        assert_eq!("3months".parse::<ListedWithin>(), Ok(ListedWithin::ThreeMonths));
        assert!("year".parse::<ListedWithin>().is_err());
    }
}
