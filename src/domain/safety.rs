use crate::error::{MarketplaceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    InappropriateContent,
    Harassment,
    Spam,
    Fraud,
    Other,
}

impl ReportReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::InappropriateContent => "Inappropriate Content",
            ReportReason::Harassment => "Harassment",
            ReportReason::Spam => "Spam",
            ReportReason::Fraud => "Fraud or Scam",
            ReportReason::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Investigating,
    Resolved,
    Dismissed,
}

/// A report as it is being filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportDraft {
    pub reported_user_id: String,
    pub reason: Option<ReportReason>,
    pub description: String,
    /// References to evidence files uploaded alongside the report.
    pub evidence: Vec<String>,
    pub anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub reported_user_id: String,
    /// `None` for anonymous reports.
    pub reported_by_user_id: Option<String>,
    pub reason: ReportReason,
    pub description: String,
    pub evidence: Vec<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl ReportDraft {
    pub fn new(reported_user_id: impl Into<String>) -> Self {
        Self {
            reported_user_id: reported_user_id.into(),
            ..Self::default()
        }
    }

    /// Turns the draft into a pending report. A reason and a non-blank
    /// description are required.
    pub fn submit(self, reporter_id: &str, now: DateTime<Utc>) -> Result<Report> {
        let reason = self.reason.ok_or_else(|| {
            MarketplaceError::ValidationError("Select a reason for the report".to_string())
        })?;
        if self.description.trim().is_empty() {
            return Err(MarketplaceError::ValidationError(
                "Describe what happened".to_string(),
            ));
        }

        tracing::info!(reported = %self.reported_user_id, ?reason, "report submitted");
        Ok(Report {
            reported_user_id: self.reported_user_id,
            reported_by_user_id: (!self.anonymous).then(|| reporter_id.to_string()),
            reason,
            description: self.description.trim().to_string(),
            evidence: self.evidence,
            status: ReportStatus::Pending,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub blocked_user_id: String,
    pub blocked_by_user_id: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Block {
    pub fn new(
        blocked_user_id: &str,
        blocked_by_user_id: &str,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if blocked_user_id == blocked_by_user_id {
            return Err(MarketplaceError::ValidationError(
                "Users cannot block themselves".to_string(),
            ));
        }
        Ok(Self {
            blocked_user_id: blocked_user_id.to_string(),
            blocked_by_user_id: blocked_by_user_id.to_string(),
            reason: reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_requires_reason_and_description() {
        let now = Utc::now();
        let draft = ReportDraft::new("1");
        assert!(matches!(
            draft.clone().submit("c1", now),
            Err(MarketplaceError::ValidationError(_))
        ));

        let draft = ReportDraft {
            reason: Some(ReportReason::Spam),
            description: "   ".to_string(),
            ..ReportDraft::new("1")
        };
        assert!(draft.submit("c1", now).is_err());
    }

    #[test]
    fn test_report_submission() {
        let now = Utc::now();
        let draft = ReportDraft {
            reason: Some(ReportReason::Harassment),
            description: " repeated unwanted messages ".to_string(),
            evidence: vec!["screenshot.png".to_string()],
            ..ReportDraft::new("1")
        };
        let report = draft.submit("c1", now).unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.reported_by_user_id.as_deref(), Some("c1"));
        assert_eq!(report.description, "repeated unwanted messages");
        assert_eq!(report.evidence.len(), 1);
    }

    #[test]
    fn test_anonymous_report_hides_reporter() {
        let draft = ReportDraft {
            reason: Some(ReportReason::Fraud),
            description: "asked for payment off-platform".to_string(),
            anonymous: true,
            ..ReportDraft::new("2")
        };
        let report = draft.submit("c1", Utc::now()).unwrap();
        assert!(report.reported_by_user_id.is_none());
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(
            ReportReason::InappropriateContent.label(),
            "Inappropriate Content"
        );
        assert_eq!(ReportReason::Fraud.label(), "Fraud or Scam");
        assert_eq!(ReportReason::Other.label(), "Other");
    }

    #[test]
    fn test_block() {
        let now = Utc::now();
        let block = Block::new("2", "c1", Some("  "), now).unwrap();
        assert!(block.reason.is_none());
        assert!(Block::new("c1", "c1", None, now).is_err());
    }
}
