//! The per-vaccine recommendation produced by the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a recommendation says what it says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionType {
    /// On the routine schedule for this age.
    Routine,
    /// Behind the routine schedule; accelerated catch-up intervals apply.
    CatchUp,
    /// Individual clinical decision-making with the provider.
    SharedClinicalDecision,
    /// Indicated only because of a risk condition.
    RiskBased,
    /// Should not be administered to this patient.
    NotRecommended,
    /// Travel vaccine outside the routine US schedule.
    InternationalAdvisory,
    /// Series started but the patient is now past the eligible age.
    AgedOut,
}

impl DecisionType {
    /// Kebab-case wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Routine => "routine",
            DecisionType::CatchUp => "catch-up",
            DecisionType::SharedClinicalDecision => "shared-clinical-decision",
            DecisionType::RiskBased => "risk-based",
            DecisionType::NotRecommended => "not-recommended",
            DecisionType::InternationalAdvisory => "international-advisory",
            DecisionType::AgedOut => "aged-out",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One vaccine's guidance for one patient.
///
/// `series_complete = true` never coexists with a "give dose" instruction:
/// a complete series carries no `next_dose_date` and its text never asks
/// for another dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Age-sensitive display name ("DTaP" vs "Tdap").
    pub vaccine_name: String,
    pub recommendation_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_dose_date: Option<NaiveDate>,
    pub series_complete: bool,
    #[serde(default)]
    pub notes: Vec<String>,
    pub decision_type: DecisionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contraindications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub precautions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_situations: Vec<String>,
}

impl Recommendation {
    /// Starts a recommendation with empty notes and no scheduled dose.
    pub fn new(
        vaccine_name: impl Into<String>,
        decision_type: DecisionType,
        text: impl Into<String>,
    ) -> Self {
        Recommendation {
            vaccine_name: vaccine_name.into(),
            recommendation_text: text.into(),
            next_dose_date: None,
            series_complete: false,
            notes: Vec::new(),
            decision_type,
            contraindications: Vec::new(),
            precautions: Vec::new(),
            special_situations: Vec::new(),
        }
    }

    pub fn note(&mut self, note: impl Into<String>) -> &mut Self {
        self.notes.push(note.into());
        self
    }
}
