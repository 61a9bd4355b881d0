use std::fmt::{self, Display};

use funnel_core::{CandidateRecord, Presence};
use serde::{Deserialize, Serialize};

/// Funnel stages in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Candidate clicked through and applied.
    Clicked,
    /// Application form filled.
    FormFilled,
    /// Voice note submitted.
    AudioSubmitted,
    /// Eligibility task submitted.
    EligibilitySubmitted,
    /// Candidate joined.
    Hired,
}

impl Stage {
    /// All stages in funnel order.
    pub const ALL: [Stage; 5] = [
        Stage::Clicked,
        Stage::FormFilled,
        Stage::AudioSubmitted,
        Stage::EligibilitySubmitted,
        Stage::Hired,
    ];

    /// Static definition binding this stage to its marker field.
    pub fn definition(self) -> &'static StageDefinition {
        &STAGES[self as usize]
    }

    /// Whether the record carries this stage's presence marker.
    pub fn reached(self, record: &CandidateRecord) -> bool {
        self.definition().reached(record)
    }

    /// The stage immediately before this one, if any.
    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::Clicked => None,
            Stage::FormFilled => Some(Stage::Clicked),
            Stage::AudioSubmitted => Some(Stage::FormFilled),
            Stage::EligibilitySubmitted => Some(Stage::AudioSubmitted),
            Stage::Hired => Some(Stage::EligibilitySubmitted),
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        self.definition().label
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Binding of a stage to the record field that marks it reached.
pub struct StageDefinition {
    /// Stage identifier.
    pub stage: Stage,
    /// Human readable label.
    pub label: &'static str,
    marker: fn(&CandidateRecord) -> Option<&str>,
}

impl StageDefinition {
    /// Raw marker cell for this stage.
    pub fn marker<'a>(&self, record: &'a CandidateRecord) -> Presence<'a> {
        Presence::of((self.marker)(record))
    }

    /// Stage predicate: true when the marker is present.
    pub fn reached(&self, record: &CandidateRecord) -> bool {
        self.marker(record).is_present()
    }
}

impl fmt::Debug for StageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageDefinition")
            .field("stage", &self.stage)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn apply_marker(record: &CandidateRecord) -> Option<&str> {
    record.apply_date.as_deref()
}

fn form_marker(record: &CandidateRecord) -> Option<&str> {
    record.form_filled.as_deref()
}

fn audio_marker(record: &CandidateRecord) -> Option<&str> {
    record.voice_note_submitted.as_deref()
}

fn eligibility_marker(record: &CandidateRecord) -> Option<&str> {
    record.eligibility_task_submitted.as_deref()
}

fn hire_marker(record: &CandidateRecord) -> Option<&str> {
    record.joined.as_deref()
}

/// Stage predicate table, indexed by [`Stage`] discriminant.
pub static STAGES: [StageDefinition; 5] = [
    StageDefinition {
        stage: Stage::Clicked,
        label: "Clicked",
        marker: apply_marker,
    },
    StageDefinition {
        stage: Stage::FormFilled,
        label: "Form Filled",
        marker: form_marker,
    },
    StageDefinition {
        stage: Stage::AudioSubmitted,
        label: "Audio Submitted",
        marker: audio_marker,
    },
    StageDefinition {
        stage: Stage::EligibilitySubmitted,
        label: "Eligibility Submitted",
        marker: eligibility_marker,
    },
    StageDefinition {
        stage: Stage::Hired,
        label: "Hired",
        marker: hire_marker,
    },
];
