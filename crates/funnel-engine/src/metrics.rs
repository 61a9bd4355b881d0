use funnel_core::CandidateRecord;
use serde::{Deserialize, Serialize};

use crate::percent::Percentage;
use crate::stages::Stage;

/// Number of filtered records that reached each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTotals {
    /// Records with an apply marker.
    pub clicked: usize,
    /// Records with a form marker.
    pub form_filled: usize,
    /// Records with a voice note marker.
    pub audio_submitted: usize,
    /// Records with an eligibility task marker.
    pub eligibility_submitted: usize,
    /// Records with a joining marker.
    pub hired: usize,
}

impl StageTotals {
    /// Count for a single stage.
    pub fn get(&self, stage: Stage) -> usize {
        match stage {
            Stage::Clicked => self.clicked,
            Stage::FormFilled => self.form_filled,
            Stage::AudioSubmitted => self.audio_submitted,
            Stage::EligibilitySubmitted => self.eligibility_submitted,
            Stage::Hired => self.hired,
        }
    }

    fn slot(&mut self, stage: Stage) -> &mut usize {
        match stage {
            Stage::Clicked => &mut self.clicked,
            Stage::FormFilled => &mut self.form_filled,
            Stage::AudioSubmitted => &mut self.audio_submitted,
            Stage::EligibilitySubmitted => &mut self.eligibility_submitted,
            Stage::Hired => &mut self.hired,
        }
    }

    /// Whether each stage count is at most the previous one.
    pub fn is_monotone(&self) -> bool {
        Stage::ALL.windows(2).all(|pair| self.get(pair[1]) <= self.get(pair[0]))
    }
}

/// Stage-to-stage and overall conversion rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRates {
    /// FormFilled over Clicked.
    pub click_to_form: Percentage,
    /// AudioSubmitted over FormFilled.
    pub form_to_audio: Percentage,
    /// EligibilitySubmitted over AudioSubmitted.
    pub audio_to_eligibility: Percentage,
    /// Hired over EligibilitySubmitted.
    pub eligibility_to_hire: Percentage,
    /// Hired over Clicked.
    pub overall: Percentage,
}

impl ConversionRates {
    /// Derives every rate from the stage totals.
    pub fn from_totals(totals: &StageTotals) -> Self {
        Self {
            click_to_form: Percentage::ratio(totals.form_filled, totals.clicked),
            form_to_audio: Percentage::ratio(totals.audio_submitted, totals.form_filled),
            audio_to_eligibility: Percentage::ratio(
                totals.eligibility_submitted,
                totals.audio_submitted,
            ),
            eligibility_to_hire: Percentage::ratio(totals.hired, totals.eligibility_submitted),
            overall: Percentage::ratio(totals.hired, totals.clicked),
        }
    }

    /// Rate into `stage` from its predecessor; `None` for the first stage.
    pub fn entering(&self, stage: Stage) -> Option<Percentage> {
        match stage {
            Stage::Clicked => None,
            Stage::FormFilled => Some(self.click_to_form),
            Stage::AudioSubmitted => Some(self.form_to_audio),
            Stage::EligibilitySubmitted => Some(self.audio_to_eligibility),
            Stage::Hired => Some(self.eligibility_to_hire),
        }
    }

    /// The four sequential rates labelled `(from, to, rate)`.
    pub fn sequential(&self) -> Vec<(Stage, Stage, Percentage)> {
        Stage::ALL
            .into_iter()
            .filter_map(|stage| {
                let from = stage.previous()?;
                let rate = self.entering(stage)?;
                Some((from, stage, rate))
            })
            .collect()
    }
}

/// Stage totals with their conversion rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMetrics {
    /// Per-stage presence counts.
    pub totals: StageTotals,
    /// Conversion rates derived from the totals.
    pub rates: ConversionRates,
}

/// Counts stage presence across `filtered` and derives the conversion rates.
pub fn compute_stage_metrics<'a, I>(filtered: I) -> StageMetrics
where
    I: IntoIterator<Item = &'a CandidateRecord>,
{
    let mut totals = StageTotals::default();
    for record in filtered {
        for stage in Stage::ALL {
            if stage.reached(record) {
                *totals.slot(stage) += 1;
            }
        }
    }
    let rates = ConversionRates::from_totals(&totals);
    tracing::debug!(
        clicked = totals.clicked,
        form_filled = totals.form_filled,
        audio_submitted = totals.audio_submitted,
        eligibility_submitted = totals.eligibility_submitted,
        hired = totals.hired,
        "computed stage totals"
    );
    StageMetrics { totals, rates }
}
