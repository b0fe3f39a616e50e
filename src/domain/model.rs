use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A cataloged event as read from the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub slug: String,
    pub name: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

impl Event {
    /// Base filename of the event's map image.
    pub fn image_filename(&self) -> String {
        format!("{}.png", self.slug)
    }
}

/// An ordered text section attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: i64,
    pub event_id: i64,
    pub content: String,
    pub ordering: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Skipped { path: PathBuf },
    Saved { path: PathBuf, center: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOutcome {
    pub slug: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl EventOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, OutcomeStatus::Saved { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub force: bool,
    pub outcomes: Vec<EventOutcome>,
}

impl RunReport {
    pub fn considered(&self) -> usize {
        self.outcomes.len()
    }

    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn outcome(&self, slug: &str) -> Option<&EventOutcome> {
        self.outcomes.iter().find(|o| o.slug == slug)
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed {} events: {} saved, {} skipped, {} failed",
            self.considered(),
            self.saved(),
            self.skipped(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_json_shape() {
        let now = Utc::now();
        let report = RunReport {
            started_at: now,
            finished_at: now,
            force: false,
            outcomes: vec![
                EventOutcome {
                    slug: "lourdes".to_string(),
                    status: OutcomeStatus::Saved {
                        path: PathBuf::from("maps/lourdes.png"),
                        center: "Lourdes, France".to_string(),
                    },
                },
                EventOutcome {
                    slug: "fatima".to_string(),
                    status: OutcomeStatus::Skipped {
                        path: PathBuf::from("maps/fatima.png"),
                    },
                },
                EventOutcome {
                    slug: "kibeho".to_string(),
                    status: OutcomeStatus::Failed {
                        error: "Map service returned 500: boom".to_string(),
                    },
                },
            ],
        };

        assert_eq!(report.considered(), 3);
        assert_eq!(report.saved(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.summary(),
            "Processed 3 events: 1 saved, 1 skipped, 1 failed"
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "saved");
        assert_eq!(json["outcomes"][0]["center"], "Lourdes, France");
        assert_eq!(json["outcomes"][2]["slug"], "kibeho");
    }
}
