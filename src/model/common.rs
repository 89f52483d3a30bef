use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type Id = String;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Time an operation occupies a workstation, stored with second precision.
///
/// Wire format is `H:MM:SS`: the hour field is unpadded and unbounded (a
/// 26-hour cycle renders as `26:00:00`, there is no day component), minutes
/// and seconds are zero-padded and must be below 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CycleTime {
    total_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleTimeError {
    #[error("Duration has wrong format. Use H:MM:SS.")]
    Format,
    #[error("Minutes and seconds must be below 60.")]
    OutOfRange,
}

impl CycleTime {
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self { total_seconds }
    }

    pub fn as_seconds(&self) -> u64 {
        self.total_seconds
    }
}

impl fmt::Display for CycleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.total_seconds / 3600;
        let minutes = (self.total_seconds % 3600) / 60;
        let seconds = self.total_seconds % 60;
        write!(f, "{}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl FromStr for CycleTime {
    type Err = CycleTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(CycleTimeError::Format);
        }
        let hours: u64 = parts[0].parse().map_err(|_| CycleTimeError::Format)?;
        let minutes: u64 = parts[1].parse().map_err(|_| CycleTimeError::Format)?;
        let seconds: u64 = parts[2].parse().map_err(|_| CycleTimeError::Format)?;
        if minutes >= 60 || seconds >= 60 {
            return Err(CycleTimeError::OutOfRange);
        }
        Ok(Self::from_seconds(hours * 3600 + minutes * 60 + seconds))
    }
}

impl Serialize for CycleTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CycleTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sub_hour_durations_with_single_hour_digit() {
        assert_eq!(CycleTime::from_seconds(90).to_string(), "0:01:30");
        assert_eq!(CycleTime::from_seconds(3600).to_string(), "1:00:00");
    }

    #[test]
    fn hours_overflow_past_24_without_day_component() {
        assert_eq!(CycleTime::from_seconds(26 * 3600).to_string(), "26:00:00");
    }

    #[test]
    fn parses_its_own_rendering() {
        for secs in [0, 59, 90, 3599, 3600, 86400 + 61] {
            let ct = CycleTime::from_seconds(secs);
            assert_eq!(ct.to_string().parse::<CycleTime>(), Ok(ct));
        }
    }

    #[test]
    fn rejects_malformed_durations() {
        assert_eq!("90".parse::<CycleTime>(), Err(CycleTimeError::Format));
        assert_eq!("1:30".parse::<CycleTime>(), Err(CycleTimeError::Format));
        assert_eq!("-1:00:00".parse::<CycleTime>(), Err(CycleTimeError::Format));
        assert_eq!("a:00:00".parse::<CycleTime>(), Err(CycleTimeError::Format));
        assert_eq!("0:75:00".parse::<CycleTime>(), Err(CycleTimeError::OutOfRange));
        assert_eq!("0:00:60".parse::<CycleTime>(), Err(CycleTimeError::OutOfRange));
    }

    #[test]
    fn serializes_as_a_json_string() {
        let json = serde_json::to_string(&CycleTime::from_seconds(90)).unwrap();
        assert_eq!(json, "\"0:01:30\"");
        let back: CycleTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CycleTime::from_seconds(90));
    }
}
