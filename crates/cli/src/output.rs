//! Serialized shapes the `--json` flag prints.

use serde::Serialize;

use viability_api::{HelperEntry, UserProfile};
use viability_scoring::Verdict;
use viability_types::validate::FieldIssue;

#[derive(Serialize)]
pub(crate) struct AnalyzeOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<&'a str>,
    #[serde(flatten)]
    pub verdict: &'a Verdict,
}

impl<'a> AnalyzeOutput<'a> {
    pub(crate) fn new(analysis_id: Option<&'a str>, verdict: &'a Verdict) -> Self {
        Self {
            analysis_id,
            verdict,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ValidationOutput<'a> {
    pub error: &'static str,
    pub issues: &'a [FieldIssue],
}

impl<'a> ValidationOutput<'a> {
    pub(crate) fn new(issues: &'a [FieldIssue]) -> Self {
        Self {
            error: "validation",
            issues,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct DeleteOutput<'a> {
    pub id: &'a str,
    pub deleted: bool,
}

#[derive(Serialize)]
pub(crate) struct StatusOutput {
    pub state_dir: String,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_id: Option<String>,
    pub draft_present: bool,
    pub attempts_used: u32,
    pub attempts_max: u32,
    pub limit_reached: bool,
    pub signed_in: bool,
}

#[derive(Serialize)]
pub(crate) struct ResetOutput {
    pub reset: bool,
}

#[derive(Serialize)]
pub(crate) struct WhoamiOutput {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

#[derive(Serialize)]
pub(crate) struct RegisterOutput {
    pub registered: bool,
    pub profile: UserProfile,
}

#[derive(Serialize)]
pub(crate) struct HelpersOutput<'a> {
    pub table: &'static str,
    pub cached: bool,
    pub entries: &'a [HelperEntry],
}
