//! Canonical vaccine identities and the wire shape of a dose history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identity of one vaccine series.
///
/// Every spelling a clinician might record (brand name, abbreviation,
/// CVX-style long name) normalizes to exactly one of these codes before
/// evaluation. Doses submitted under synonyms of the same identity are
/// merged into a single timeline.
///
/// `Other` carries the lowercased, trimmed input for names outside the
/// known set. It is never an error: unrecognized vaccines are handled by a
/// default recommendation downstream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccineId {
    HepatitisB,
    Rotavirus,
    /// One combined identity for the whole diphtheria/tetanus/pertussis
    /// series. The display name is age-dependent: "DTaP" under 7 years,
    /// "Tdap" at 7 years and older.
    DtapTdap,
    Hib,
    Pneumococcal,
    Ipv,
    Influenza,
    Mmr,
    Varicella,
    HepatitisA,
    Hpv,
    MeningococcalAcwy,
    MeningococcalB,
    Covid19,
    Dengue,
    YellowFever,
    JapaneseEncephalitis,
    Typhoid,
    Cholera,
    Rsv,
    #[serde(untagged)]
    Other(String),
}

impl VaccineId {
    /// Canonical snake_case code, as used in immunity-evidence keys.
    pub fn as_str(&self) -> &str {
        match self {
            VaccineId::HepatitisB => "hepatitis_b",
            VaccineId::Rotavirus => "rotavirus",
            VaccineId::DtapTdap => "dtap_tdap",
            VaccineId::Hib => "hib",
            VaccineId::Pneumococcal => "pneumococcal",
            VaccineId::Ipv => "ipv",
            VaccineId::Influenza => "influenza",
            VaccineId::Mmr => "mmr",
            VaccineId::Varicella => "varicella",
            VaccineId::HepatitisA => "hepatitis_a",
            VaccineId::Hpv => "hpv",
            VaccineId::MeningococcalAcwy => "meningococcal_acwy",
            VaccineId::MeningococcalB => "meningococcal_b",
            VaccineId::Covid19 => "covid19",
            VaccineId::Dengue => "dengue",
            VaccineId::YellowFever => "yellow_fever",
            VaccineId::JapaneseEncephalitis => "japanese_encephalitis",
            VaccineId::Typhoid => "typhoid",
            VaccineId::Cholera => "cholera",
            VaccineId::Rsv => "rsv",
            VaccineId::Other(name) => name,
        }
    }

    /// Live attenuated vaccines, contraindicated under pregnancy or
    /// immunocompromise.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            VaccineId::Mmr | VaccineId::Varicella | VaccineId::Rotavirus
        )
    }

    /// False only for [`VaccineId::Other`] identities.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, VaccineId::Other(_))
    }
}

impl fmt::Display for VaccineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One administered dose as submitted by the caller.
///
/// The date stays a string at the wire boundary; the engine parses it
/// strictly and rejects anything that is not `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseRecord {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl DoseRecord {
    pub fn new(date: impl Into<String>) -> Self {
        DoseRecord {
            date: date.into(),
            product: None,
        }
    }

    pub fn with_product(date: impl Into<String>, product: impl Into<String>) -> Self {
        DoseRecord {
            date: date.into(),
            product: Some(product.into()),
        }
    }
}

/// One history entry exactly as submitted: a raw vaccine name plus its
/// doses. Entries whose names normalize to the same identity are merged
/// before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineHistoryEntry {
    pub vaccine_name: String,
    #[serde(default)]
    pub doses: Vec<DoseRecord>,
}
