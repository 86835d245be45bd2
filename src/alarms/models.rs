use crate::recommendation::RecommendationOutcome;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    Pending,
    Fired,
    Failed,
}

impl AlarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmStatus::Pending => "pending",
            AlarmStatus::Fired => "fired",
            AlarmStatus::Failed => "failed",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Alarm {
    pub id: u64,
    /// The requested instant as `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "alarmDateTime")]
    pub alarm_date_time: String,
    #[serde(skip)]
    pub target: NaiveDateTime,
    pub mood: String,
    pub status: AlarmStatus,
    pub result: Option<RecommendationOutcome>,
}
