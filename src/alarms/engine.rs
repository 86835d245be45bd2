use super::models::{Alarm, AlarmStatus};
use crate::emotion::normalize_label;
use crate::recommendation::{RecommendationEngine, RecommendationOutcome};
use crate::server::metrics;
use chrono::{Local, NaiveDateTime, TimeZone};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlarmError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Alarm time must be in the future.")]
    PastTime,
}

/// Accepts `HH:MM` (seconds default to zero) or `HH:MM:SS`.
fn parse_alarm_date_time(date: &str, time: &str) -> Result<(String, NaiveDateTime), AlarmError> {
    let alarm_date_time = if time.matches(':').count() >= 2 {
        format!("{} {}", date, time)
    } else {
        format!("{} {}:00", date, time)
    };
    let target = NaiveDateTime::parse_from_str(&alarm_date_time, DATE_TIME_FORMAT).map_err(|e| {
        AlarmError::BadRequest(format!("Invalid alarm date/time '{}': {}", alarm_date_time, e))
    })?;
    Ok((alarm_date_time, target))
}

/// In-memory alarms that each fire one mood lookup at their target instant.
pub struct AlarmEngine {
    recommender: RecommendationEngine,
    alarms: Arc<Mutex<BTreeMap<u64, Alarm>>>,
    next_id: AtomicU64,
    shutdown: CancellationToken,
}

impl AlarmEngine {
    /// Sleeping alarms are dropped, and stay pending, once `shutdown` is
    /// cancelled.
    pub fn new(recommender: RecommendationEngine, shutdown: CancellationToken) -> Self {
        Self {
            recommender,
            alarms: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: AtomicU64::new(1),
            shutdown,
        }
    }

    /// Validates and schedules an alarm, returning it in the pending state.
    /// Must be called from within a tokio runtime.
    pub fn register(&self, date: &str, time: &str, mood: &str) -> Result<Alarm, AlarmError> {
        let (date, time, mood) = (date.trim(), time.trim(), normalize_label(mood));
        if date.is_empty() || time.is_empty() || mood.is_empty() {
            return Err(AlarmError::BadRequest(
                "Missing required parameters.".to_string(),
            ));
        }

        let (alarm_date_time, target) = parse_alarm_date_time(date, time)?;
        let target_local = Local
            .from_local_datetime(&target)
            .earliest()
            .ok_or_else(|| {
                AlarmError::BadRequest(format!(
                    "'{}' does not exist in the local time zone",
                    alarm_date_time
                ))
            })?;
        let now = Local::now();
        if target_local <= now {
            return Err(AlarmError::PastTime);
        }
        let delay = (target_local - now).to_std().unwrap_or_default();

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let alarm = Alarm {
            id,
            alarm_date_time,
            target,
            mood,
            status: AlarmStatus::Pending,
            result: None,
        };
        self.alarms.lock().unwrap().insert(id, alarm.clone());
        metrics::record_alarm_registered();
        info!(
            "Alarm {} set for {} ({:?} from now), mood '{}'",
            id, alarm.alarm_date_time, delay, alarm.mood
        );

        let alarms = Arc::clone(&self.alarms);
        let recommender = self.recommender.clone();
        let shutdown = self.shutdown.clone();
        let mood = alarm.mood.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Alarm {} dropped on shutdown", id);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let (status, outcome) = match recommender.recommend_for_mood(&mood).await {
                Ok(recommendation) => {
                    info!("Alarm {} fired with '{}'", id, recommendation.name);
                    (AlarmStatus::Fired, RecommendationOutcome::Song(recommendation))
                }
                Err(e) => {
                    warn!("Alarm {} failed: {}", id, e);
                    (
                        AlarmStatus::Failed,
                        RecommendationOutcome::Error {
                            error: e.to_string(),
                        },
                    )
                }
            };

            if let Some(alarm) = alarms.lock().unwrap().get_mut(&id) {
                alarm.status = status;
                alarm.result = Some(outcome);
            }
            metrics::record_alarm_finished(status.as_str());
        });

        Ok(alarm)
    }

    /// Result of the most recently registered alarm that has fired or failed.
    pub fn poll_latest(&self) -> Option<RecommendationOutcome> {
        self.alarms
            .lock()
            .unwrap()
            .values()
            .rev()
            .find(|a| a.status != AlarmStatus::Pending)
            .and_then(|a| a.result.clone())
    }

    pub fn get(&self, id: u64) -> Option<Alarm> {
        self.alarms.lock().unwrap().get(&id).cloned()
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.alarms
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.status == AlarmStatus::Pending)
            .count()
    }
}
