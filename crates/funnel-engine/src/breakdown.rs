use std::collections::HashMap;
use std::fmt::{self, Display};

use funnel_core::CandidateRecord;
use serde::{Deserialize, Serialize};

use crate::percent::Percentage;
use crate::stages::Stage;

/// Group label for records with a missing or empty dimension value.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Record attribute a breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// Acquisition channel.
    Platform,
    /// Role applied for.
    Position,
    /// Responsible team member.
    #[serde(rename = "assignTo")]
    Assignee,
}

impl Dimension {
    /// All dimensions in display order.
    pub const ALL: [Dimension; 3] = [Dimension::Platform, Dimension::Position, Dimension::Assignee];

    /// Reads this dimension's raw value from a record.
    pub fn value(self, record: &CandidateRecord) -> Option<&str> {
        match self {
            Dimension::Platform => record.platform.as_deref(),
            Dimension::Position => record.position.as_deref(),
            Dimension::Assignee => record.assign_to.as_deref(),
        }
    }

    /// Group label for a record; empty and missing values become [`UNKNOWN_LABEL`].
    pub fn label_of(self, record: &CandidateRecord) -> &str {
        match self.value(record) {
            Some(value) if !value.is_empty() => value,
            _ => UNKNOWN_LABEL,
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Platform => "Platform",
            Dimension::Position => "Position",
            Dimension::Assignee => "Team Member",
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One group of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    /// Dimension value shared by the group.
    pub dimension_value: String,
    /// Number of stage-qualifying records in the group.
    pub count: usize,
    /// Share of the stage-qualifying subset.
    pub percentage: Percentage,
}

/// Tally of stage-qualifying records grouped by one dimension.
///
/// Entries are sorted by count, largest first; equal counts keep the order in
/// which their values first appeared. The full list is always returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown {
    entries: Vec<BreakdownEntry>,
}

impl Breakdown {
    /// Sorted entries.
    pub fn entries(&self) -> &[BreakdownEntry] {
        &self.entries
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no record qualified.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all group counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Looks up the entry for a dimension value.
    pub fn get(&self, value: &str) -> Option<&BreakdownEntry> {
        self.entries
            .iter()
            .find(|entry| entry.dimension_value == value)
    }
}

impl<'a> IntoIterator for &'a Breakdown {
    type Item = &'a BreakdownEntry;
    type IntoIter = std::slice::Iter<'a, BreakdownEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Groups the records satisfying `stage_predicate` by `dimension`.
pub fn build_breakdown<'a, I, P>(filtered: I, stage_predicate: P, dimension: Dimension) -> Breakdown
where
    I: IntoIterator<Item = &'a CandidateRecord>,
    P: Fn(&CandidateRecord) -> bool,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, usize)> = Vec::new();
    let mut qualifying = 0usize;
    for record in filtered.into_iter().filter(|&record| stage_predicate(record)) {
        qualifying += 1;
        let label = dimension.label_of(record);
        match index.get(label) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                index.insert(label, groups.len());
                groups.push((label, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    let entries = groups
        .into_iter()
        .map(|(value, count)| BreakdownEntry {
            dimension_value: value.to_string(),
            count,
            percentage: Percentage::ratio(count, qualifying),
        })
        .collect();
    Breakdown { entries }
}

/// The three per-dimension breakdowns of one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageBreakdowns {
    /// Grouped by platform.
    pub platform: Breakdown,
    /// Grouped by position.
    pub position: Breakdown,
    /// Grouped by assignee.
    pub assign_to: Breakdown,
}

impl StageBreakdowns {
    /// Breakdown for a single dimension.
    pub fn get(&self, dimension: Dimension) -> &Breakdown {
        match dimension {
            Dimension::Platform => &self.platform,
            Dimension::Position => &self.position,
            Dimension::Assignee => &self.assign_to,
        }
    }
}

/// Builds every dimension breakdown for `stage`.
pub fn build_stage_breakdowns(filtered: &[&CandidateRecord], stage: Stage) -> StageBreakdowns {
    let definition = stage.definition();
    let for_dimension = |dimension: Dimension| {
        build_breakdown(
            filtered.iter().copied(),
            |record| definition.reached(record),
            dimension,
        )
    };
    StageBreakdowns {
        platform: for_dimension(Dimension::Platform),
        position: for_dimension(Dimension::Position),
        assign_to: for_dimension(Dimension::Assignee),
    }
}
