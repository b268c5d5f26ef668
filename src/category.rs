use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time_format::Millis;

/// One named slot of a category, with the times recorded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub description: String,
    /// Cumulative time from run start through the end of this segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_time: Option<Millis>,
    /// Duration of this segment alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_time: Option<Millis>,
    /// Lowest segment time observed for this slot (the gold).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<Millis>,
}

impl Segment {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn clear_times(&mut self) {
        self.split_time = None;
        self.segment_time = None;
    }
}

/// A named, ordered list of segments: the persisted baseline for runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Category {
    pub fn new(title: impl Into<String>, descriptions: &[&str]) -> Self {
        Self {
            title: title.into(),
            segments: descriptions.iter().map(|d| Segment::new(*d)).collect(),
        }
    }

    /// Check title, segment count and descriptions, collecting every problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("Title is required!".to_string());
        }
        if self.segments.is_empty() {
            problems.push("At least one segment is required!".to_string());
        } else {
            for (i, segment) in self.segments.iter().enumerate() {
                if segment.description.trim().is_empty() {
                    problems.push(format!("{}° segment description is required!", i + 1));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { problems })
        }
    }

    /// Final split of the stored run, i.e. the full-run personal best.
    pub fn personal_best(&self) -> Option<Millis> {
        self.segments.last().and_then(|s| s.split_time)
    }

    /// Sum of golds, only when every segment has one.
    pub fn sum_of_best(&self) -> Option<Millis> {
        if self.segments.is_empty() {
            return None;
        }
        self.segments
            .iter()
            .map(|s| s.best_time)
            .sum::<Option<Millis>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn validate_accepts_complete_category() {
        let cat = Category::new("Any%", &["Forest", "Castle"]);
        assert_eq!(cat.validate(), Ok(()));
    }

    #[test]
    fn validate_aggregates_problems() {
        let cat = Category {
            title: "  ".to_string(),
            segments: vec![Segment::new("A"), Segment::new(""), Segment::new("")],
        };
        let err = cat.validate().unwrap_err();
        assert_eq!(
            err.problems,
            vec![
                "Title is required!",
                "2° segment description is required!",
                "3° segment description is required!",
            ]
        );
    }

    #[test]
    fn validate_requires_segments() {
        let cat = Category {
            title: "Empty".to_string(),
            segments: vec![],
        };
        assert_matches!(cat.validate(), Err(ValidationError { problems }) if problems == vec!["At least one segment is required!"]);
    }

    #[test]
    fn json_omits_unset_times_and_keeps_zero() {
        let mut seg = Segment::new("Intro");
        seg.split_time = Some(0);
        let json = serde_json::to_string(&seg).unwrap();
        assert_eq!(json, r#"{"description":"Intro","splitTime":0}"#);
    }

    #[test]
    fn json_reads_null_as_unset() {
        let seg: Segment = serde_json::from_str(
            r#"{"description":"A","splitTime":null,"segmentTime":1500,"bestTime":null}"#,
        )
        .unwrap();
        assert_eq!(seg.split_time, None);
        assert_eq!(seg.segment_time, Some(1500));
        assert_eq!(seg.best_time, None);
    }

    #[test]
    fn sum_of_best_needs_every_gold() {
        let mut cat = Category::new("Any%", &["A", "B"]);
        assert_eq!(cat.sum_of_best(), None);
        cat.segments[0].best_time = Some(1_000);
        assert_eq!(cat.sum_of_best(), None);
        cat.segments[1].best_time = Some(2_500);
        assert_eq!(cat.sum_of_best(), Some(3_500));
    }

    #[test]
    fn personal_best_is_final_split() {
        let mut cat = Category::new("Any%", &["A", "B"]);
        assert_eq!(cat.personal_best(), None);
        cat.segments[1].split_time = Some(25_000);
        assert_eq!(cat.personal_best(), Some(25_000));
    }
}
