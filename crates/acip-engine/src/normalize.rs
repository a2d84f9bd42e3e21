//! Vaccine name normalization.
//!
//! Clinical histories spell the same series many ways: brand names
//! ("Prevnar"), abbreviations ("PCV13"), registry long names
//! ("Pneumococcal Conjugate, Unspecified"), or free text. [`to_internal`]
//! maps any spelling to one canonical [`VaccineId`] in three tiers:
//!
//! 1. exact case-insensitive lookup in the alias table,
//! 2. ordered substring tokens, most specific first,
//! 3. the lowercased, trimmed input itself as [`VaccineId::Other`].
//!
//! Tier 3 means normalization is total: an unrecognized name is never an
//! error, it just routes to the default recommendation downstream.
//!
//! The token order in tier 2 is load-bearing. "haemophilus" and
//! "influenzae" must resolve before "influenza" so Hib never classifies
//! as flu, and "meningococcal b" before "meningococcal" so MenB never
//! classifies as MenACWY. Short ambiguous codes ("TD", "DT") live only in
//! the exact table where they cannot misfire on longer words.

use std::collections::HashMap;
use std::sync::OnceLock;

use acip_model::VaccineId;
use acip_schedule::registry;

/// Exact aliases, all lowercase: canonical codes, display names,
/// abbreviations, and brand names.
fn alias_entries() -> Vec<(&'static str, VaccineId)> {
    use VaccineId as V;
    vec![
        // canonical codes
        ("hepatitis_b", V::HepatitisB),
        ("rotavirus", V::Rotavirus),
        ("dtap_tdap", V::DtapTdap),
        ("hib", V::Hib),
        ("pneumococcal", V::Pneumococcal),
        ("ipv", V::Ipv),
        ("influenza", V::Influenza),
        ("mmr", V::Mmr),
        ("varicella", V::Varicella),
        ("hepatitis_a", V::HepatitisA),
        ("hpv", V::Hpv),
        ("meningococcal_acwy", V::MeningococcalAcwy),
        ("meningococcal_b", V::MeningococcalB),
        ("covid19", V::Covid19),
        ("dengue", V::Dengue),
        ("yellow_fever", V::YellowFever),
        ("japanese_encephalitis", V::JapaneseEncephalitis),
        ("typhoid", V::Typhoid),
        ("cholera", V::Cholera),
        ("rsv", V::Rsv),
        // hepatitis B
        ("hepb", V::HepatitisB),
        ("hep b", V::HepatitisB),
        ("hepatitis b", V::HepatitisB),
        ("engerix-b", V::HepatitisB),
        ("recombivax hb", V::HepatitisB),
        ("heplisav-b", V::HepatitisB),
        // rotavirus
        ("rv", V::Rotavirus),
        ("rv1", V::Rotavirus),
        ("rv5", V::Rotavirus),
        ("rotarix", V::Rotavirus),
        ("rotateq", V::Rotavirus),
        // diphtheria/tetanus/pertussis; the two-letter codes stay exact-only
        ("dtap", V::DtapTdap),
        ("tdap", V::DtapTdap),
        ("dt", V::DtapTdap),
        ("td", V::DtapTdap),
        ("dtp", V::DtapTdap),
        ("adacel", V::DtapTdap),
        ("boostrix", V::DtapTdap),
        ("daptacel", V::DtapTdap),
        ("infanrix", V::DtapTdap),
        ("kinrix", V::DtapTdap),
        ("quadracel", V::DtapTdap),
        // Hib
        ("acthib", V::Hib),
        ("hiberix", V::Hib),
        ("pedvaxhib", V::Hib),
        ("haemophilus influenzae type b", V::Hib),
        // pneumococcal
        ("pcv", V::Pneumococcal),
        ("pcv13", V::Pneumococcal),
        ("pcv15", V::Pneumococcal),
        ("pcv20", V::Pneumococcal),
        ("prevnar", V::Pneumococcal),
        ("prevnar 13", V::Pneumococcal),
        ("prevnar 20", V::Pneumococcal),
        ("vaxneuvance", V::Pneumococcal),
        ("ppsv23", V::Pneumococcal),
        ("pneumovax 23", V::Pneumococcal),
        ("pneumococcal conjugate", V::Pneumococcal),
        ("pneumococcal conjugate, unspecified", V::Pneumococcal),
        // polio
        ("polio", V::Ipv),
        ("opv", V::Ipv),
        ("ipol", V::Ipv),
        // influenza
        ("flu", V::Influenza),
        ("fluzone", V::Influenza),
        ("flumist", V::Influenza),
        ("fluarix", V::Influenza),
        ("flulaval", V::Influenza),
        ("flucelvax", V::Influenza),
        ("iiv", V::Influenza),
        ("laiv", V::Influenza),
        // MMR
        ("m-m-r ii", V::Mmr),
        ("priorix", V::Mmr),
        ("measles, mumps, and rubella", V::Mmr),
        ("measles", V::Mmr),
        ("mumps", V::Mmr),
        ("rubella", V::Mmr),
        // varicella
        ("var", V::Varicella),
        ("varivax", V::Varicella),
        ("chickenpox", V::Varicella),
        // hepatitis A
        ("hepa", V::HepatitisA),
        ("hep a", V::HepatitisA),
        ("hepatitis a", V::HepatitisA),
        ("havrix", V::HepatitisA),
        ("vaqta", V::HepatitisA),
        // HPV
        ("gardasil", V::Hpv),
        ("gardasil 9", V::Hpv),
        ("9vhpv", V::Hpv),
        ("human papillomavirus", V::Hpv),
        // meningococcal
        ("menacwy", V::MeningococcalAcwy),
        ("mcv4", V::MeningococcalAcwy),
        ("menveo", V::MeningococcalAcwy),
        ("menquadfi", V::MeningococcalAcwy),
        ("menactra", V::MeningococcalAcwy),
        ("meningococcal acwy", V::MeningococcalAcwy),
        ("meningococcal conjugate", V::MeningococcalAcwy),
        ("menb", V::MeningococcalB),
        ("bexsero", V::MeningococcalB),
        ("trumenba", V::MeningococcalB),
        ("meningococcal b", V::MeningococcalB),
        ("menb-4c", V::MeningococcalB),
        ("menb-fhbp", V::MeningococcalB),
        // COVID-19
        ("covid", V::Covid19),
        ("covid-19", V::Covid19),
        ("sars-cov-2", V::Covid19),
        ("comirnaty", V::Covid19),
        ("spikevax", V::Covid19),
        ("novavax", V::Covid19),
        // travel
        ("dengvaxia", V::Dengue),
        ("yellow fever", V::YellowFever),
        ("yf-vax", V::YellowFever),
        ("stamaril", V::YellowFever),
        ("japanese encephalitis", V::JapaneseEncephalitis),
        ("ixiaro", V::JapaneseEncephalitis),
        ("typhim vi", V::Typhoid),
        ("vivotif", V::Typhoid),
        ("vaxchora", V::Cholera),
        ("nirsevimab", V::Rsv),
        ("beyfortus", V::Rsv),
        ("abrysvo", V::Rsv),
        ("arexvy", V::Rsv),
        ("respiratory syncytial virus", V::Rsv),
    ]
}

/// Substring fallback tokens, checked in order. More specific tokens come
/// first; reordering changes classification outcomes.
static TOKEN_RULES: &[(&str, VaccineId)] = &[
    // Hib before anything influenza: "haemophilus influenzae" must never
    // classify as flu.
    ("haemophilus", VaccineId::Hib),
    ("influenzae", VaccineId::Hib),
    ("hib", VaccineId::Hib),
    // MenB before the generic meningococcal token.
    ("meningococcal b", VaccineId::MeningococcalB),
    ("menb", VaccineId::MeningococcalB),
    ("bexsero", VaccineId::MeningococcalB),
    ("trumenba", VaccineId::MeningococcalB),
    ("meningococcal", VaccineId::MeningococcalAcwy),
    ("menacwy", VaccineId::MeningococcalAcwy),
    ("pneumo", VaccineId::Pneumococcal),
    ("prevnar", VaccineId::Pneumococcal),
    ("pcv", VaccineId::Pneumococcal),
    ("hepatitis b", VaccineId::HepatitisB),
    ("hep b", VaccineId::HepatitisB),
    ("hepb", VaccineId::HepatitisB),
    ("hepatitis a", VaccineId::HepatitisA),
    ("hep a", VaccineId::HepatitisA),
    ("rotavirus", VaccineId::Rotavirus),
    ("rotarix", VaccineId::Rotavirus),
    ("rotateq", VaccineId::Rotavirus),
    ("dtap", VaccineId::DtapTdap),
    ("tdap", VaccineId::DtapTdap),
    ("diphtheria", VaccineId::DtapTdap),
    ("pertussis", VaccineId::DtapTdap),
    ("tetanus", VaccineId::DtapTdap),
    ("polio", VaccineId::Ipv),
    ("varicella", VaccineId::Varicella),
    ("chickenpox", VaccineId::Varicella),
    ("mmr", VaccineId::Mmr),
    ("measles", VaccineId::Mmr),
    ("mumps", VaccineId::Mmr),
    ("rubella", VaccineId::Mmr),
    ("influenza", VaccineId::Influenza),
    ("flu", VaccineId::Influenza),
    ("papilloma", VaccineId::Hpv),
    ("gardasil", VaccineId::Hpv),
    ("hpv", VaccineId::Hpv),
    ("covid", VaccineId::Covid19),
    ("sars-cov", VaccineId::Covid19),
    ("yellow fever", VaccineId::YellowFever),
    ("japanese encephalitis", VaccineId::JapaneseEncephalitis),
    ("dengue", VaccineId::Dengue),
    ("typhoid", VaccineId::Typhoid),
    ("cholera", VaccineId::Cholera),
    ("respiratory syncytial", VaccineId::Rsv),
    ("rsv", VaccineId::Rsv),
];

fn aliases() -> &'static HashMap<&'static str, VaccineId> {
    static ALIASES: OnceLock<HashMap<&'static str, VaccineId>> = OnceLock::new();
    ALIASES.get_or_init(|| alias_entries().into_iter().collect())
}

/// Maps any raw vaccine name to its canonical identity. Total and
/// deterministic: unrecognized names come back as
/// `VaccineId::Other(lowercased trimmed input)`.
pub fn to_internal(raw: &str) -> VaccineId {
    let lower = raw.trim().to_lowercase();
    if let Some(id) = aliases().get(lower.as_str()) {
        return id.clone();
    }
    for (token, id) in TOKEN_RULES {
        if lower.contains(token) {
            return id.clone();
        }
    }
    VaccineId::Other(lower)
}

/// True when the name maps to a known canonical identity.
pub fn is_recognized(raw: &str) -> bool {
    to_internal(raw).is_recognized()
}

/// Age-sensitive display name. The combined diphtheria/tetanus/pertussis
/// identity displays "DTaP" under 7 years and "Tdap" at 7 and older;
/// every other known identity uses its schedule display name.
pub fn display_name(id: &VaccineId, age_years: i64) -> String {
    match id {
        VaccineId::DtapTdap => {
            if age_years < 7 {
                "DTaP".to_string()
            } else {
                "Tdap".to_string()
            }
        }
        VaccineId::Other(name) => name.clone(),
        _ => registry()
            .rule(id)
            .map(|rule| rule.display_name.to_string())
            .unwrap_or_else(|| id.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_aliases_beat_tokens() {
        assert_eq!(to_internal("PCV13"), VaccineId::Pneumococcal);
        assert_eq!(to_internal("Prevnar"), VaccineId::Pneumococcal);
        assert_eq!(
            to_internal("Pneumococcal Conjugate, Unspecified"),
            VaccineId::Pneumococcal
        );
        assert_eq!(to_internal("  Td  "), VaccineId::DtapTdap);
    }

    #[test]
    fn test_hib_never_classifies_as_flu() {
        assert_eq!(
            to_internal("Haemophilus influenzae type b (Hib)"),
            VaccineId::Hib
        );
        assert_eq!(to_internal("H. influenzae vaccine"), VaccineId::Hib);
        assert_eq!(to_internal("Influenza (seasonal)"), VaccineId::Influenza);
    }

    #[test]
    fn test_menb_before_generic_meningococcal() {
        assert_eq!(
            to_internal("Meningococcal B vaccine"),
            VaccineId::MeningococcalB
        );
        assert_eq!(
            to_internal("Meningococcal vaccine"),
            VaccineId::MeningococcalAcwy
        );
    }

    #[test]
    fn test_unrecognized_passes_through_lowercased() {
        let id = to_internal("  Anthrax Vaccine Adsorbed ");
        assert_eq!(id, VaccineId::Other("anthrax vaccine adsorbed".to_string()));
        assert!(!is_recognized("anthrax vaccine adsorbed"));
    }

    #[test]
    fn test_short_codes_stay_exact_only() {
        // "td" as a whole name resolves, but embedded "td" must not.
        assert_eq!(to_internal("td"), VaccineId::DtapTdap);
        assert_eq!(
            to_internal("outdated vaccine"),
            VaccineId::Other("outdated vaccine".to_string())
        );
    }

    #[test]
    fn test_display_name_switches_at_seven() {
        assert_eq!(display_name(&VaccineId::DtapTdap, 6), "DTaP");
        assert_eq!(display_name(&VaccineId::DtapTdap, 7), "Tdap");
        assert_eq!(display_name(&VaccineId::Pneumococcal, 3), "Pneumococcal");
        assert_eq!(
            display_name(&VaccineId::Other("anthrax".into()), 3),
            "anthrax"
        );
    }
}
