//! Patient risk flags that modify schedule decisions.

use serde::{Deserialize, Serialize};

/// Independent boolean risk flags. Absent wire fields default to `false`,
/// so an omitted `specialConditions` object means "no special conditions".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecialConditions {
    pub immunocompromised: bool,
    pub pregnancy: bool,
    pub hiv_infection: bool,
    pub asplenia: bool,
    pub cochlear_implant: bool,
    pub csf_leak: bool,
    pub diabetes: bool,
    pub chronic_heart_disease: bool,
    pub chronic_lung_disease: bool,
    pub chronic_liver_disease: bool,
    pub chronic_kidney_disease: bool,
}

impl SpecialConditions {
    /// Conditions that contraindicate live vaccines (MMR, varicella,
    /// rotavirus).
    pub fn contraindicates_live(&self) -> bool {
        self.pregnancy || self.immunocompromised
    }

    /// High-risk indications for Hib and pneumococcal doses at ages where
    /// the series is no longer routine.
    pub fn high_risk_hib_pneumococcal(&self) -> bool {
        self.immunocompromised
            || self.hiv_infection
            || self.asplenia
            || self.cochlear_implant
            || self.csf_leak
    }

    /// High-risk indications for the meningococcal vaccines.
    pub fn high_risk_meningococcal(&self) -> bool {
        self.immunocompromised || self.hiv_infection || self.asplenia
    }

    /// Wire names of every set flag, in declaration order. Used to select
    /// which special-situation advisories apply.
    pub fn active(&self) -> Vec<&'static str> {
        let flags = [
            (self.immunocompromised, "immunocompromised"),
            (self.pregnancy, "pregnancy"),
            (self.hiv_infection, "hivInfection"),
            (self.asplenia, "asplenia"),
            (self.cochlear_implant, "cochlearImplant"),
            (self.csf_leak, "csfLeak"),
            (self.diabetes, "diabetes"),
            (self.chronic_heart_disease, "chronicHeartDisease"),
            (self.chronic_lung_disease, "chronicLungDisease"),
            (self.chronic_liver_disease, "chronicLiverDisease"),
            (self.chronic_kidney_disease, "chronicKidneyDisease"),
        ];
        flags
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect()
    }
}
