use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::model::WeekBucket;
use crate::domain::service::Service;
use crate::infra::storage::{self as storage};

/// Monday of the ISO week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

impl Service {
    /// Patient registrations per ISO week over the six weeks ending at the
    /// current one, oldest first. Recomputed on every call, no caching.
    pub async fn patients_per_week(&self) -> Result<Vec<WeekBucket>, DomainError> {
        let today = Utc::now().date_naive();
        let mut buckets = Vec::with_capacity(6);

        for weeks_back in (0..6).rev() {
            let monday = week_start(today - Duration::weeks(weeks_back));
            let start = monday.and_time(NaiveTime::MIN).and_utc();
            let end = (monday + Duration::days(7)).and_time(NaiveTime::MIN).and_utc();

            let count = storage::patients::count_created_between(self.db(), start, end).await?;
            buckets.push(WeekBucket {
                week: format!("Week {}", monday.iso_week().week()),
                count,
            });
        }

        Ok(buckets)
    }
}
