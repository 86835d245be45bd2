//! Wake-up alarms that recommend a song for a chosen mood when they fire.

mod engine;
mod models;

pub use engine::{AlarmEngine, AlarmError};
pub use models::{Alarm, AlarmStatus};
