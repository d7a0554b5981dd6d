use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Login credentials (username/password for storage)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The HEdex reports a Sakai server can serve.
///
/// Each variant maps to the wire-level action name under
/// `/direct/hedex/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Report {
    EngagementActivity,
    SessionDurations,
    Assignments,
}

impl Report {
    pub const ALL: [Report; 3] = [
        Report::EngagementActivity,
        Report::SessionDurations,
        Report::Assignments,
    ];

    /// The action name as it appears in the request path.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Report::EngagementActivity => "Get_Retention_Engagement_EngagementActivity",
            Report::SessionDurations => "Get_Retention_Engagement_SessionDurations",
            Report::Assignments => "Get_Retention_Engagement_Assignments",
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Report {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Get_Retention_Engagement_EngagementActivity" | "EngagementActivity" => {
                Ok(Report::EngagementActivity)
            }
            "Get_Retention_Engagement_SessionDurations" | "SessionDurations" => {
                Ok(Report::SessionDurations)
            }
            "Get_Retention_Engagement_Assignments" | "Assignments" => Ok(Report::Assignments),
            other => Err(format!("unknown report name: {}", other)),
        }
    }
}

/// Optional query parameters the report endpoints accept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Academic terms to filter by; sent comma-joined as `terms`.
    pub terms: Vec<String>,
    /// Sent as `sendChangesOnly` when set.
    pub send_changes_only: Option<bool>,
    /// Sent as `lastRunDate` when set.
    pub last_run_date: Option<String>,
}

/// One report pull. Only meaningful alongside a non-empty session
/// token from a prior successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report: Report,
    /// Caller-identifying string the remote API requires for attribution.
    pub agent: String,
    /// Earliest date of interest, `YYYY-MM-DD`.
    pub start_date: String,
    #[serde(default)]
    pub options: FetchOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for report in Report::ALL {
            assert_eq!(report.wire_name().parse::<Report>().unwrap(), report);
        }
    }

    #[test]
    fn short_names_parse() {
        assert_eq!(
            "Assignments".parse::<Report>().unwrap(),
            Report::Assignments
        );
        assert!("Get_Retention_Engagement_Grades".parse::<Report>().is_err());
    }
}
