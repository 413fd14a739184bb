//! Narrative insight seam.
//!
//! # Responsibility
//! - Define the boundary to an external summary generator.
//! - Parse the generator's JSON reply into a typed `Insight`.
//!
//! # Invariants
//! - Generators only ever see a cloned snapshot; they cannot reach ledger
//!   state.

use crate::model::entry::TimeEntry;
use crate::report::period::ReportingPeriod;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub summary: String,
    pub suggestions: Vec<String>,
    /// 0 to 100.
    pub productivity_score: f64,
}

#[derive(Debug)]
pub enum InsightError {
    /// Generator could not be reached or refused the request.
    Unavailable(String),
    Malformed(serde_json::Error),
    ScoreOutOfRange(f64),
}

impl Display for InsightError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "insight generator unavailable: {message}"),
            Self::Malformed(err) => write!(f, "malformed insight payload: {err}"),
            Self::ScoreOutOfRange(score) => {
                write!(f, "productivity score {score} is outside 0..=100")
            }
        }
    }
}

impl Error for InsightError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// External summary generator.
pub trait InsightGenerator {
    fn generate(
        &self,
        entries: &[TimeEntry],
        period: &ReportingPeriod,
    ) -> Result<Insight, InsightError>;
}

/// Parses a `{summary, suggestions, productivityScore}` JSON reply.
pub fn parse_insight_json(payload: &str) -> Result<Insight, InsightError> {
    let insight: Insight = serde_json::from_str(payload.trim())?;
    if !(0.0..=100.0).contains(&insight.productivity_score) {
        return Err(InsightError::ScoreOutOfRange(insight.productivity_score));
    }
    Ok(insight)
}

#[cfg(test)]
mod tests {
    use super::{parse_insight_json, InsightError};

    #[test]
    fn parses_camel_case_reply() {
        let insight = parse_insight_json(
            r#" {"summary":"Mostly deep work","suggestions":["sleep earlier"],"productivityScore":72} "#,
        )
        .unwrap();
        assert_eq!(insight.summary, "Mostly deep work");
        assert_eq!(insight.suggestions, vec!["sleep earlier".to_string()]);
        assert_eq!(insight.productivity_score, 72.0);
    }

    #[test]
    fn rejects_missing_fields_and_bad_scores() {
        assert!(matches!(
            parse_insight_json(r#"{"summary":"x"}"#),
            Err(InsightError::Malformed(_))
        ));
        assert!(matches!(
            parse_insight_json(r#"{"summary":"x","suggestions":[],"productivityScore":140}"#),
            Err(InsightError::ScoreOutOfRange(_))
        ));
    }
}
