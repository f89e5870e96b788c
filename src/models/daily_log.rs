use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed set of labels. The label is both the display text and
/// the stored value.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: [$name; 6] = [$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownLabel(other.to_string())),
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown option: {0}")]
pub struct UnknownLabel(pub String);

label_enum! {
    /// How the day felt overall.
    Mood {
        Glad => "Glad",
        Trist => "Trist",
        Rolig => "Rolig",
        Engstelig => "Engstelig",
        Sint => "Sint",
        Noytral => "Nøytral",
    }
}

label_enum! {
    Emotion {
        Begeistret => "Begeistret",
        Frustrert => "Frustrert",
        Overveldet => "Overveldet",
        Fornoyd => "Fornøyd",
        Redd => "Redd",
        Sliten => "Sliten",
    }
}

label_enum! {
    /// The sensory channel that caused trouble that day.
    SensoryIssue {
        Stoy => "Støy",
        Lys => "Lys",
        Beroring => "Berøring",
        Lukt => "Lukt",
        Smak => "Smak",
        Bevegelse => "Bevegelse",
    }
}

pub const NOTES_MAX_CHARS: usize = 500;

/// A validated submission that has not been stamped yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogEntry {
    pub mood: Mood,
    pub emotions: Emotion,
    pub sensory_issues: SensoryIssue,
    pub notes: String,
}

impl NewLogEntry {
    /// Attach the save-time timestamp, truncated to the millisecond precision
    /// the stored format keeps.
    pub fn stamp(self, now: DateTime<Utc>) -> LogEntry {
        LogEntry {
            mood: self.mood,
            emotions: self.emotions,
            sensory_issues: self.sensory_issues,
            notes: self.notes,
            timestamp: Some(now.trunc_subsecs(3)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub mood: Mood,
    pub emotions: Emotion,
    pub sensory_issues: SensoryIssue,
    pub notes: String,
    /// Always set on save. Entries written before timestamps existed have
    /// none and are kept as they are.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LogEntry {
    /// The entry without its timestamp, as it was submitted.
    pub fn draft(&self) -> NewLogEntry {
        NewLogEntry {
            mood: self.mood,
            emotions: self.emotions,
            sensory_issues: self.sensory_issues,
            notes: self.notes.clone(),
        }
    }
}

/// `2024-05-01T08:30:00.123Z` on write, any RFC 3339 instant on read.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> NewLogEntry {
        NewLogEntry {
            mood: Mood::Glad,
            emotions: Emotion::Fornoyd,
            sensory_issues: SensoryIssue::Lys,
            notes: "Fin dag".into(),
        }
    }

    #[test]
    fn labels_parse_back_to_their_variant() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>(), Ok(mood));
        }
        for emotion in Emotion::ALL {
            assert_eq!(emotion.as_str().parse::<Emotion>(), Ok(emotion));
        }
        for issue in SensoryIssue::ALL {
            assert_eq!(issue.as_str().parse::<SensoryIssue>(), Ok(issue));
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "glad".parse::<Mood>(),
            Err(UnknownLabel("glad".to_string()))
        );
        assert!("Lys".parse::<Emotion>().is_err());
    }

    #[test]
    fn entry_uses_stored_field_names_and_millisecond_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let entry = sample().stamp(now);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["mood"], "Glad");
        assert_eq!(value["emotions"], "Fornøyd");
        assert_eq!(value["sensoryIssues"], "Lys");
        assert_eq!(value["notes"], "Fin dag");
        assert_eq!(value["timestamp"], "2024-05-01T08:30:00.123Z");
    }

    #[test]
    fn stamped_entry_survives_serialization_unchanged() {
        let entry = sample().stamp(Utc::now());
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.draft(), sample());
    }

    #[test]
    fn offset_timestamps_are_normalized_to_utc() {
        let json = r#"{"mood":"Sint","emotions":"Redd","sensoryIssues":"Støy","notes":"x","timestamp":"2024-05-01T10:30:00+02:00"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(
            entry.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn entry_without_timestamp_is_read_and_written_back_without_one() {
        let json = r#"{"mood":"Glad","emotions":"Redd","sensoryIssues":"Lukt","notes":"gammel"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.timestamp, None);

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("timestamp").is_none());
    }
}
