use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Placeholder written into sheet cells for "not reached".
pub const PLACEHOLDER: &str = "-";

/// Interpretation of a presence-marker cell.
///
/// A marker is [`Presence::Absent`] when the cell is missing, empty, or holds
/// the [`PLACEHOLDER`]; any other text means the candidate reached the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence<'a> {
    /// The stage was not reached.
    Absent,
    /// The stage was reached; carries the raw marker text.
    Present(&'a str),
}

impl<'a> Presence<'a> {
    /// Classifies a raw cell value.
    pub fn of(value: Option<&'a str>) -> Self {
        match value {
            None | Some("") | Some(PLACEHOLDER) => Presence::Absent,
            Some(marker) => Presence::Present(marker),
        }
    }

    /// Returns true when the marker signals the stage was reached.
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }
}

/// One row of the recruitment sheet.
///
/// Every attribute is optional. Records are read-only inputs; the engine only
/// borrows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    /// Acquisition channel.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub platform: Option<String>,
    /// Responsible team member.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub assign_to: Option<String>,
    /// Role applied for.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<String>,
    /// Years of experience; absent is read as zero.
    #[serde(
        default,
        deserialize_with = "lenient::years",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_years: Option<f64>,
    /// Raw apply marker backing the "clicked" stage.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub apply_date: Option<String>,
    /// Parsed apply timestamp used for date range filtering.
    #[serde(
        default,
        deserialize_with = "lenient::date_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub apply_date_time: Option<NaiveDateTime>,
    /// Application form marker.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub form_filled: Option<String>,
    /// Voice note marker.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_note_submitted: Option<String>,
    /// Eligibility task marker.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub eligibility_task_submitted: Option<String>,
    /// Joining marker.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined: Option<String>,
}

impl CandidateRecord {
    /// Years of experience with absent and non-finite values read as zero.
    pub fn experience(&self) -> f64 {
        match self.experience_years {
            Some(years) if years.is_finite() => years,
            _ => 0.0,
        }
    }

    /// Apply timestamp truncated to its calendar day.
    pub fn apply_day(&self) -> Option<NaiveDate> {
        self.apply_date_time.map(|stamp| stamp.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_rejects_empty_and_placeholder() {
        assert_eq!(Presence::of(None), Presence::Absent);
        assert_eq!(Presence::of(Some("")), Presence::Absent);
        assert_eq!(Presence::of(Some("-")), Presence::Absent);
        assert_eq!(Presence::of(Some("--")), Presence::Present("--"));
        assert!(Presence::of(Some("yes")).is_present());
        assert!(Presence::of(Some(" ")).is_present());
    }

    #[test]
    fn missing_experience_reads_as_zero() {
        let record = CandidateRecord::default();
        assert_eq!(record.experience(), 0.0);
        let record = CandidateRecord {
            experience_years: Some(f64::NAN),
            ..CandidateRecord::default()
        };
        assert_eq!(record.experience(), 0.0);
    }

    #[test]
    fn decodes_loose_json_rows() {
        let json = r#"{
            "platform": "LinkedIn",
            "assignTo": "Asha",
            "experienceYears": "4",
            "applyDate": "12/01/2024",
            "applyDateTime": "2024-01-12T09:15:00",
            "formFilled": "-",
            "joined": null,
            "unrelatedColumn": 17
        }"#;
        let record: CandidateRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(record.platform.as_deref(), Some("LinkedIn"));
        assert_eq!(record.experience(), 4.0);
        assert_eq!(
            record.apply_day(),
            NaiveDate::from_ymd_opt(2024, 1, 12)
        );
        assert!(!Presence::of(record.form_filled.as_deref()).is_present());
        assert_eq!(record.joined, None);
    }

    #[test]
    fn malformed_fields_decode_as_absent() {
        let json = r#"{"experienceYears": "senior", "applyDateTime": "soon"}"#;
        let record: CandidateRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(record.experience_years, None);
        assert_eq!(record.apply_date_time, None);
    }

    #[test]
    fn numeric_and_boolean_cells_decode_as_text() {
        let json = r#"{
            "platform": 42,
            "position": 2.5,
            "applyDate": 45292,
            "formFilled": 1,
            "voiceNoteSubmitted": true,
            "eligibilityTaskSubmitted": false,
            "joined": {"nested": "cell"}
        }"#;
        let record: CandidateRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(record.platform.as_deref(), Some("42"));
        assert_eq!(record.position.as_deref(), Some("2.5"));
        assert_eq!(record.apply_date.as_deref(), Some("45292"));
        assert_eq!(record.form_filled.as_deref(), Some("1"));
        assert_eq!(record.voice_note_submitted.as_deref(), Some("true"));
        assert_eq!(record.eligibility_task_submitted, None);
        assert_eq!(record.joined, None);
    }

    #[test]
    fn serialized_rows_decode_back() {
        let record = CandidateRecord {
            position: Some("Designer".into()),
            experience_years: Some(1.5),
            apply_date_time: NaiveDate::from_ymd_opt(2024, 2, 29)
                .and_then(|day| day.and_hms_opt(8, 0, 0)),
            ..CandidateRecord::default()
        };
        let json = serde_json::to_string(&record).expect("encode");
        let back: CandidateRecord = serde_json::from_str(&json).expect("decode");
        assert_eq!(back, record);
    }
}
