use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub const ISSUE_FIELDS: &str = "record::id(id) AS id, fakturering_id, problem_type, beskrivelse, \
    forslag, status, loest_af, loest_tid, oprettet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IssueStatus {
    Open,
    UserAccepted,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::UserAccepted => "UserAccepted",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(IssueStatus::Open),
            "UserAccepted" => Ok(IssueStatus::UserAccepted),
            other => Err(format!("Ukendt problemstatus: {other}")),
        }
    }
}

impl TryFrom<String> for IssueStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueStatus> for String {
    fn from(value: IssueStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A data problem the sync found on a permit row.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Issue {
    pub id: i64,
    pub fakturering_id: i64,
    pub problem_type: Option<String>,
    pub beskrivelse: Option<String>,
    pub forslag: Option<String>,
    pub status: IssueStatus,
    pub loest_af: Option<String>,
    pub loest_tid: Option<String>,
    pub oprettet: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateIssue {
    pub fakturering_id: i64,
    pub problem_type: Option<String>,
    pub beskrivelse: Option<String>,
    pub forslag: Option<String>,
    pub status: IssueStatus,
    pub oprettet: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, validator::Validate)]
pub struct IssueQuery {
    pub status: Option<IssueStatus>,
    pub fakturering_id: Option<i64>,
}
