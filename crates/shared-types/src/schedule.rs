use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blotter::BlotterStatus;

/// Kind of hearing a schedule records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ScheduleType {
    Summon,
    Mediation,
    Conciliation,
}

/// Valid schedule type values matching the DB CHECK constraint.
pub const SCHEDULE_TYPES: &[&str] = &["Summon", "Mediation", "Conciliation"];

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summon => "Summon",
            Self::Mediation => "Mediation",
            Self::Conciliation => "Conciliation",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "Summon" => Some(Self::Summon),
            "Mediation" => Some(Self::Mediation),
            "Conciliation" => Some(Self::Conciliation),
            _ => None,
        }
    }

    /// Hearing opened by moving a case into `status`, if any.
    pub fn for_status(status: BlotterStatus) -> Option<Self> {
        match status {
            BlotterStatus::Summon => Some(Self::Summon),
            BlotterStatus::Mediation => Some(Self::Mediation),
            BlotterStatus::Conciliation => Some(Self::Conciliation),
            _ => None,
        }
    }
}

/// A hearing appearance for a blotter case (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Schedule {
    pub id: Uuid,
    pub case_id: Uuid,
    /// Human identifier of the case, resolved by JOIN.
    pub blotter_id: String,
    pub schedule_type: String,
    pub appearance_date: NaiveDate,
    pub appearance_time: NaiveTime,
    pub created_by: Option<i64>,
    pub date_created: DateTime<Utc>,
}

/// API response for a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScheduleResponse {
    pub id: String,
    pub blotter_id: String,
    pub schedule_type: String,
    pub appearance_date: String,
    /// 24-hour `HH:MM`.
    pub appearance_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    pub date_created: String,
}

impl From<Schedule> for ScheduleResponse {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id.to_string(),
            blotter_id: s.blotter_id,
            schedule_type: s.schedule_type,
            appearance_date: s.appearance_date.to_string(),
            appearance_time: s.appearance_time.format("%H:%M").to_string(),
            created_by: s.created_by,
            date_created: s.date_created.to_rfc3339(),
        }
    }
}

/// One calendar day of hearings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScheduleDay {
    pub date: String,
    pub weekday: String,
    pub schedules: Vec<ScheduleResponse>,
}

/// Query parameters for the weekly hearing board.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct WeekParams {
    /// First day shown. Defaults to today.
    pub start: Option<NaiveDate>,
    /// Number of days shown (1-31). Defaults to 7.
    pub days: Option<u32>,
}

pub const DEFAULT_WEEK_DAYS: u32 = 7;
pub const MAX_WEEK_DAYS: u32 = 31;

/// Last day of a `days`-long window starting at `start`, or `None` when the
/// window runs past the calendar's range.
pub fn window_end(start: NaiveDate, days: u32) -> Option<NaiveDate> {
    start.checked_add_signed(Duration::days(i64::from(days.max(1)) - 1))
}

/// Group hearings by day for `days` consecutive days starting at `start`.
///
/// Every day in the window appears, even without hearings. Within a day,
/// hearings are ordered by appearance time. Hearings outside the window
/// are dropped, as are days past the end of the calendar.
pub fn group_by_day(start: NaiveDate, days: u32, schedules: Vec<Schedule>) -> Vec<ScheduleDay> {
    let mut buckets: Vec<(NaiveDate, Vec<Schedule>)> = (0..days)
        .map_while(|offset| start.checked_add_signed(Duration::days(i64::from(offset))))
        .map(|date| (date, Vec::new()))
        .collect();

    for schedule in schedules {
        let Ok(offset) = usize::try_from((schedule.appearance_date - start).num_days()) else {
            continue;
        };
        if let Some((_, bucket)) = buckets.get_mut(offset) {
            bucket.push(schedule);
        }
    }

    buckets
        .into_iter()
        .map(|(date, mut items)| {
            items.sort_by_key(|s| s.appearance_time);
            ScheduleDay {
                date: date.to_string(),
                weekday: date.format("%A").to_string(),
                schedules: items.into_iter().map(ScheduleResponse::from).collect(),
            }
        })
        .collect()
}

/// Monday and Friday of the working week containing `day`.
pub fn work_week(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(4))
}
