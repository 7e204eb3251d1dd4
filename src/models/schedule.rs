//! Weekly operating hours and explicit schedule blocks.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::{BlockId, BusinessId, EmployeeId, WeeklyScheduleId};
use crate::models::interval::TimeRange;

/// Recurring open/close window for a business on one weekday.
///
/// A row may carry a validity date range (`valid_from`..=`valid_until`, both
/// inclusive) for seasonal overrides such as summer hours. Rows without a
/// range apply year-round; when a seasonal row and a year-round row both match
/// a date, the seasonal row wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub id: WeeklyScheduleId,
    pub business_id: BusinessId,
    pub weekday: Weekday,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub active: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl WeeklySchedule {
    /// Year-round window with no validity restriction.
    pub fn year_round(
        id: WeeklyScheduleId,
        business_id: BusinessId,
        weekday: Weekday,
        opens_at: NaiveTime,
        closes_at: NaiveTime,
    ) -> Self {
        Self {
            id,
            business_id,
            weekday,
            opens_at,
            closes_at,
            active: true,
            valid_from: None,
            valid_until: None,
        }
    }

    /// Seasonal override valid only inside the given inclusive date range.
    pub fn seasonal(
        id: WeeklyScheduleId,
        business_id: BusinessId,
        weekday: Weekday,
        opens_at: NaiveTime,
        closes_at: NaiveTime,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
    ) -> Self {
        Self {
            id,
            business_id,
            weekday,
            opens_at,
            closes_at,
            active: true,
            valid_from: Some(valid_from),
            valid_until: Some(valid_until),
        }
    }

    /// Whether this row applies on the given calendar date.
    ///
    /// The weekday is checked by the caller; this only evaluates the validity
    /// range.
    pub fn is_in_effect_on(&self, date: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if date > until {
                return false;
            }
        }
        true
    }

    /// Width of the validity window in days, used for seasonal precedence:
    /// bounded rows beat unbounded rows, narrower ranges beat wider ones.
    pub fn validity_span_days(&self) -> i64 {
        match (self.valid_from, self.valid_until) {
            (Some(from), Some(until)) => (until - from).num_days(),
            // Half-bounded rows are more specific than fully open rows but
            // less specific than any finite range.
            (Some(_), None) | (None, Some(_)) => i64::MAX - 1,
            (None, None) => i64::MAX,
        }
    }
}

/// Category of an explicit schedule block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    Vacation,
    Holiday,
    Maintenance,
    Personal,
    Other,
}

/// An explicit exclusion window during which no slot may be offered.
///
/// Blocks are stored as absolute `[start, end)` instants. A block with no
/// employee applies to the whole business; an employee-scoped block removes
/// availability only for queries naming that employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: BlockId,
    pub business_id: BusinessId,
    pub employee_id: Option<EmployeeId>,
    pub span: TimeRange,
    pub category: BlockCategory,
    pub reason: String,
    pub active: bool,
}

impl ScheduleBlock {
    pub fn business_wide(
        id: BlockId,
        business_id: BusinessId,
        span: TimeRange,
        category: BlockCategory,
    ) -> Self {
        Self {
            id,
            business_id,
            employee_id: None,
            span,
            category,
            reason: String::new(),
            active: true,
        }
    }

    pub fn for_employee(
        id: BlockId,
        business_id: BusinessId,
        employee_id: EmployeeId,
        span: TimeRange,
        category: BlockCategory,
    ) -> Self {
        Self {
            id,
            business_id,
            employee_id: Some(employee_id),
            span,
            category,
            reason: String::new(),
            active: true,
        }
    }

    /// Whether this block constrains a query with the given employee scope.
    ///
    /// Business-wide blocks always apply; employee-scoped blocks apply only
    /// when the query names that same employee.
    pub fn applies_to(&self, employee_scope: Option<EmployeeId>) -> bool {
        match self.employee_id {
            None => true,
            Some(blocked) => employee_scope == Some(blocked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_year_round_row_always_in_effect() {
        let row = WeeklySchedule::year_round(
            WeeklyScheduleId::new(1),
            BusinessId::random(),
            Weekday::Tue,
            time(9, 0),
            time(18, 0),
        );
        assert!(row.is_in_effect_on(date(2025, 1, 1)));
        assert!(row.is_in_effect_on(date(2025, 12, 31)));
        assert_eq!(row.validity_span_days(), i64::MAX);
    }

    #[test]
    fn test_seasonal_row_respects_validity_range() {
        let row = WeeklySchedule::seasonal(
            WeeklyScheduleId::new(2),
            BusinessId::random(),
            Weekday::Tue,
            time(10, 0),
            time(14, 0),
            date(2025, 6, 1),
            date(2025, 8, 31),
        );
        assert!(!row.is_in_effect_on(date(2025, 5, 31)));
        assert!(row.is_in_effect_on(date(2025, 6, 1)));
        assert!(row.is_in_effect_on(date(2025, 8, 31)));
        assert!(!row.is_in_effect_on(date(2025, 9, 1)));
        assert_eq!(row.validity_span_days(), 91);
    }

    #[test]
    fn test_inactive_row_never_in_effect() {
        let mut row = WeeklySchedule::year_round(
            WeeklyScheduleId::new(3),
            BusinessId::random(),
            Weekday::Mon,
            time(9, 0),
            time(13, 0),
        );
        row.active = false;
        assert!(!row.is_in_effect_on(date(2025, 6, 2)));
    }

    #[test]
    fn test_block_employee_scoping() {
        let business = BusinessId::random();
        let span = TimeRange::new(
            Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 3, 11, 0, 0).unwrap(),
        );
        let global = ScheduleBlock::business_wide(
            BlockId::new(1),
            business,
            span,
            BlockCategory::Holiday,
        );
        let scoped = ScheduleBlock::for_employee(
            BlockId::new(2),
            business,
            EmployeeId::new(7),
            span,
            BlockCategory::Vacation,
        );

        assert!(global.applies_to(None));
        assert!(global.applies_to(Some(EmployeeId::new(7))));
        assert!(!scoped.applies_to(None));
        assert!(scoped.applies_to(Some(EmployeeId::new(7))));
        assert!(!scoped.applies_to(Some(EmployeeId::new(8))));
    }
}
