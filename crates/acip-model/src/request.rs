//! Request and result aggregates for one catch-up evaluation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conditions::SpecialConditions;
use crate::recommendation::Recommendation;
use crate::vaccine::VaccineHistoryEntry;

/// Everything one evaluation needs. Dates stay strings here; the engine
/// parses them strictly. Missing optional fields default to empty/false
/// rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpRequest {
    pub birth_date: String,
    /// Evaluation date; defaults to today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_date: Option<String>,
    #[serde(default)]
    pub vaccine_history: Vec<VaccineHistoryEntry>,
    #[serde(default)]
    pub special_conditions: SpecialConditions,
    /// Keys are canonical vaccine ids or any recognizable vaccine name;
    /// `true` short-circuits that vaccine to complete.
    #[serde(default)]
    pub immunity_evidence: BTreeMap<String, bool>,
}

/// The full evaluation result: one recommendation per applicable vaccine,
/// sorted by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpResult {
    /// Human-readable, e.g. "4 years 2 months".
    pub patient_age: String,
    pub recommendations: Vec<Recommendation>,
    /// Guideline edition the rule table encodes, e.g. "2025.1".
    pub cdc_version: String,
    /// Derived from the resolved evaluation date so identical requests
    /// serialize byte-identically.
    pub processed_at: DateTime<Utc>,
}
