//! The 2025.1 catch-up schedule data, one [`CdcRule`] per canonical
//! vaccine identity.
//!
//! The table is process-wide, built once behind a `OnceLock`, and never
//! mutated afterwards; concurrent readers share it freely. Interval lists
//! and catch-up buckets live in statics so rules can reference them
//! without allocation.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use acip_model::VaccineId;

use crate::rule::{CatchUpBucket, CdcRule, DoseCount, Gap, Intervals, ProductVariant};

/// Guideline edition encoded by this table.
pub const CDC_GUIDELINE_VERSION: &str = "2025.1";

/// Vaccines evaluated for every request, history or not. Travel vaccines
/// are deliberately absent; they are evaluated only when the caller
/// supplies a history entry for them.
pub const STANDARD_PANEL: &[VaccineId] = &[
    VaccineId::HepatitisB,
    VaccineId::Rotavirus,
    VaccineId::DtapTdap,
    VaccineId::Hib,
    VaccineId::Pneumococcal,
    VaccineId::Ipv,
    VaccineId::Influenza,
    VaccineId::Mmr,
    VaccineId::Varicella,
    VaccineId::HepatitisA,
    VaccineId::Hpv,
    VaccineId::MeningococcalAcwy,
    VaccineId::MeningococcalB,
    VaccineId::Covid19,
];

// ==== interval lists ====

static HEPB_INTERVALS: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(8)];
static ROTA_INTERVALS: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(4)];
static ROTARIX_INTERVALS: &[Gap] = &[Gap::Weeks(4)];
static DTAP_UNDER_7: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(4), Gap::Months(6), Gap::Months(6)];
static TDAP_7_AND_UP: &[Gap] = &[Gap::Weeks(4), Gap::Months(6)];
static FOUR_DOSE_CONJUGATE: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(4), Gap::Weeks(8)];
static THREE_DOSE_CONJUGATE: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(8)];
static EIGHT_WEEKS: &[Gap] = &[Gap::Weeks(8)];
static IPV_INTERVALS: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(4), Gap::Months(6)];
static FOUR_WEEKS: &[Gap] = &[Gap::Weeks(4)];
static VARICELLA_UNDER_13: &[Gap] = &[Gap::Months(3)];
static SIX_MONTHS: &[Gap] = &[Gap::Months(6)];
static HPV_TWO_DOSE: &[Gap] = &[Gap::Months(5)];
static HPV_THREE_DOSE: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(12)];
static COVID_PFIZER: &[Gap] = &[Gap::Weeks(3), Gap::Weeks(8)];
static COVID_MODERNA: &[Gap] = &[Gap::Weeks(4), Gap::Weeks(4)];
static COVID_NOVAVAX: &[Gap] = &[Gap::Weeks(3)];
static NO_INTERVALS: &[Gap] = &[];

// ==== age-resolved dose counts and intervals ====

fn dtap_doses(age_years: i64) -> usize {
    if age_years < 7 { 5 } else { 3 }
}

fn dtap_intervals(age_years: i64) -> &'static [Gap] {
    if age_years < 7 { DTAP_UNDER_7 } else { TDAP_7_AND_UP }
}

fn varicella_intervals(age_years: i64) -> &'static [Gap] {
    if age_years < 13 {
        VARICELLA_UNDER_13
    } else {
        FOUR_WEEKS
    }
}

fn menacwy_doses(age_years: i64) -> usize {
    // Starting at 16 or later, a single dose completes the series.
    if age_years < 16 { 2 } else { 1 }
}

fn covid_doses(age_years: i64) -> usize {
    if age_years < 5 { 3 } else { 1 }
}

// ==== catch-up buckets ====

static HIB_BUCKETS: &[CatchUpBucket] = &[
    CatchUpBucket {
        min_months: 0,
        max_months_exclusive: 7,
        doses: 4,
        intervals: FOUR_DOSE_CONJUGATE,
        final_dose_min_age: Some(Gap::Months(12)),
        note: "Started before 7 months: 4 doses with the booster at 12 through 15 months",
    },
    CatchUpBucket {
        min_months: 7,
        max_months_exclusive: 12,
        doses: 3,
        intervals: THREE_DOSE_CONJUGATE,
        final_dose_min_age: Some(Gap::Months(12)),
        note: "Started at 7 through 11 months: 3 doses with the booster at 12 months or later",
    },
    CatchUpBucket {
        min_months: 12,
        max_months_exclusive: 15,
        doses: 2,
        intervals: EIGHT_WEEKS,
        final_dose_min_age: None,
        note: "Started at 12 through 14 months: 2 doses 8 weeks apart",
    },
    CatchUpBucket {
        min_months: 15,
        max_months_exclusive: 60,
        doses: 1,
        intervals: NO_INTERVALS,
        final_dose_min_age: None,
        note: "Started at 15 through 59 months: a single dose completes the series",
    },
];

static PCV_BUCKETS: &[CatchUpBucket] = &[
    CatchUpBucket {
        min_months: 0,
        max_months_exclusive: 7,
        doses: 4,
        intervals: FOUR_DOSE_CONJUGATE,
        final_dose_min_age: Some(Gap::Months(12)),
        note: "Started before 7 months: 4 doses with the booster at 12 through 15 months",
    },
    CatchUpBucket {
        min_months: 7,
        max_months_exclusive: 12,
        doses: 3,
        intervals: THREE_DOSE_CONJUGATE,
        final_dose_min_age: Some(Gap::Months(12)),
        note: "Started at 7 through 11 months: 3 doses with the booster at 12 months or later",
    },
    CatchUpBucket {
        min_months: 12,
        max_months_exclusive: 24,
        doses: 2,
        intervals: EIGHT_WEEKS,
        final_dose_min_age: None,
        note: "Started at 12 through 23 months: 2 doses 8 weeks apart",
    },
    CatchUpBucket {
        min_months: 24,
        max_months_exclusive: 60,
        doses: 1,
        intervals: NO_INTERVALS,
        final_dose_min_age: None,
        note: "Started at 24 through 59 months: a single dose completes the series",
    },
];

static HPV_BUCKETS: &[CatchUpBucket] = &[
    CatchUpBucket {
        min_months: 108,
        max_months_exclusive: 180,
        doses: 2,
        intervals: HPV_TWO_DOSE,
        final_dose_min_age: None,
        note: "2-dose schedule: first dose before the 15th birthday",
    },
    CatchUpBucket {
        min_months: 180,
        max_months_exclusive: 540,
        doses: 3,
        intervals: HPV_THREE_DOSE,
        final_dose_min_age: None,
        note: "3-dose schedule: first dose at 15 years or older",
    },
];

// ==== product variants ====

static ROTA_PRODUCTS: &[ProductVariant] = &[
    ProductVariant {
        match_token: "rotarix",
        doses: 2,
        intervals: ROTARIX_INTERVALS,
        note: "Rotarix (RV1): 2-dose series",
    },
    ProductVariant {
        match_token: "rotateq",
        doses: 3,
        intervals: ROTA_INTERVALS,
        note: "RotaTeq (RV5): 3-dose series",
    },
];

static MENB_PRODUCTS: &[ProductVariant] = &[
    ProductVariant {
        match_token: "bexsero",
        doses: 2,
        intervals: FOUR_WEEKS,
        note: "Bexsero (MenB-4C): 2 doses at least 4 weeks apart",
    },
    ProductVariant {
        match_token: "trumenba",
        doses: 2,
        intervals: SIX_MONTHS,
        note: "Trumenba (MenB-FHbp): 2 doses at least 6 months apart",
    },
];

static COVID_PRODUCTS: &[ProductVariant] = &[
    ProductVariant {
        match_token: "pfizer",
        doses: 3,
        intervals: COVID_PFIZER,
        note: "Pfizer-BioNTech: 3-dose primary series under 5 years",
    },
    ProductVariant {
        match_token: "comirnaty",
        doses: 3,
        intervals: COVID_PFIZER,
        note: "Pfizer-BioNTech: 3-dose primary series under 5 years",
    },
    ProductVariant {
        match_token: "moderna",
        doses: 2,
        intervals: COVID_MODERNA,
        note: "Moderna: 2-dose primary series under 5 years",
    },
    ProductVariant {
        match_token: "spikevax",
        doses: 2,
        intervals: COVID_MODERNA,
        note: "Moderna: 2-dose primary series under 5 years",
    },
    ProductVariant {
        match_token: "novavax",
        doses: 2,
        intervals: COVID_NOVAVAX,
        note: "Novavax: 2-dose series, 12 years and older",
    },
];

// ==== the table ====

fn build_rules() -> Vec<CdcRule> {
    vec![
        CdcRule {
            contraindications: &["Severe allergic reaction to a prior dose or to yeast"],
            ..CdcRule::base(
                VaccineId::HepatitisB,
                "Hepatitis B",
                Gap::Days(0),
                DoseCount::Fixed(3),
                Intervals::Fixed(HEPB_INTERVALS),
            )
        },
        CdcRule {
            maximum_age: Some(Gap::Months(8)),
            start_deadline: Some(Gap::Weeks(15)),
            products: ROTA_PRODUCTS,
            live: true,
            contraindications: &[
                "History of intussusception",
                "Severe combined immunodeficiency (SCID)",
            ],
            precautions: &["Altered immunocompetence", "Chronic gastrointestinal disease"],
            ..CdcRule::base(
                VaccineId::Rotavirus,
                "Rotavirus",
                Gap::Weeks(6),
                DoseCount::Fixed(3),
                Intervals::Fixed(ROTA_INTERVALS),
            )
        },
        CdcRule {
            contraindications: &[
                "Encephalopathy within 7 days of a previous dose of DTP, DTaP, or Tdap",
            ],
            precautions: &[
                "Progressive neurologic disorder until the condition has stabilized",
                "Guillain-Barre syndrome within 6 weeks of a prior tetanus toxoid dose",
            ],
            ..CdcRule::base(
                VaccineId::DtapTdap,
                "DTaP",
                Gap::Weeks(6),
                DoseCount::ByAge(dtap_doses),
                Intervals::ByAge(dtap_intervals),
            )
        },
        CdcRule {
            catch_up: HIB_BUCKETS,
            special_situations: &[
                (
                    "asplenia",
                    "Unvaccinated children 12 through 59 months at elevated risk need 2 doses 8 weeks apart",
                ),
                (
                    "immunocompromised",
                    "A single dose is indicated for unvaccinated high-risk patients 5 years and older",
                ),
            ],
            ..CdcRule::base(
                VaccineId::Hib,
                "Hib",
                Gap::Weeks(6),
                DoseCount::Fixed(4),
                Intervals::Fixed(FOUR_DOSE_CONJUGATE),
            )
        },
        CdcRule {
            catch_up: PCV_BUCKETS,
            special_situations: &[
                (
                    "cochlearImplant",
                    "Cochlear implant recipients should complete the series and may need PPSV23 at 2 years or older",
                ),
                (
                    "csfLeak",
                    "CSF leak is a high-risk indication; complete the conjugate series and review PPSV23 eligibility",
                ),
                (
                    "immunocompromised",
                    "Immunocompromising conditions call for 2 doses 8 weeks apart when starting at 24 through 71 months",
                ),
            ],
            ..CdcRule::base(
                VaccineId::Pneumococcal,
                "Pneumococcal",
                Gap::Weeks(6),
                DoseCount::Fixed(4),
                Intervals::Fixed(FOUR_DOSE_CONJUGATE),
            )
        },
        CdcRule {
            final_dose_min_age: Some(Gap::Months(48)),
            ..CdcRule::base(
                VaccineId::Ipv,
                "IPV",
                Gap::Weeks(6),
                DoseCount::Fixed(4),
                Intervals::Fixed(IPV_INTERVALS),
            )
        },
        CdcRule {
            precautions: &[
                "Guillain-Barre syndrome within 6 weeks of a previous influenza vaccine",
            ],
            special_situations: &[
                (
                    "chronicHeartDisease",
                    "Chronic heart disease raises the risk of influenza complications; annual vaccination is a priority",
                ),
                (
                    "chronicLungDisease",
                    "Chronic lung disease raises the risk of influenza complications; annual vaccination is a priority",
                ),
            ],
            ..CdcRule::base(
                VaccineId::Influenza,
                "Influenza",
                Gap::Months(6),
                DoseCount::Fixed(1),
                Intervals::Fixed(FOUR_WEEKS),
            )
        },
        CdcRule {
            live: true,
            contraindications: &["Pregnancy", "Severe immunocompromise"],
            precautions: &["Recent receipt of an antibody-containing blood product"],
            ..CdcRule::base(
                VaccineId::Mmr,
                "MMR",
                Gap::Months(12),
                DoseCount::Fixed(2),
                Intervals::Fixed(FOUR_WEEKS),
            )
        },
        CdcRule {
            live: true,
            contraindications: &["Pregnancy", "Severe immunocompromise"],
            precautions: &["Recent receipt of an antibody-containing blood product"],
            ..CdcRule::base(
                VaccineId::Varicella,
                "Varicella",
                Gap::Months(12),
                DoseCount::Fixed(2),
                Intervals::ByAge(varicella_intervals),
            )
        },
        CdcRule::base(
            VaccineId::HepatitisA,
            "Hepatitis A",
            Gap::Months(12),
            DoseCount::Fixed(2),
            Intervals::Fixed(SIX_MONTHS),
        ),
        CdcRule {
            catch_up: HPV_BUCKETS,
            precautions: &["Pregnancy: delay remaining doses until after pregnancy"],
            special_situations: &[(
                "immunocompromised",
                "3-dose schedule regardless of age at initiation",
            )],
            ..CdcRule::base(
                VaccineId::Hpv,
                "HPV",
                Gap::Months(108),
                DoseCount::Fixed(2),
                Intervals::Fixed(HPV_TWO_DOSE),
            )
        },
        CdcRule {
            special_situations: &[
                (
                    "asplenia",
                    "Asplenia: 2-dose primary series 8 weeks apart with boosters every 5 years",
                ),
                (
                    "hivInfection",
                    "HIV infection: 2-dose primary series 8 weeks apart",
                ),
            ],
            // Doses before 10 years of age do not count toward the
            // adolescent series; the minimum here is the counting floor.
            ..CdcRule::base(
                VaccineId::MeningococcalAcwy,
                "Meningococcal ACWY",
                Gap::Months(120),
                DoseCount::ByAge(menacwy_doses),
                Intervals::Fixed(EIGHT_WEEKS),
            )
        },
        CdcRule {
            products: MENB_PRODUCTS,
            special_situations: &[(
                "asplenia",
                "Asplenia: 3-dose Trumenba schedule at 0, 1 to 2, and 6 months",
            )],
            ..CdcRule::base(
                VaccineId::MeningococcalB,
                "Meningococcal B",
                Gap::Months(120),
                DoseCount::Fixed(2),
                Intervals::Fixed(FOUR_WEEKS),
            )
        },
        CdcRule {
            products: COVID_PRODUCTS,
            special_situations: &[(
                "immunocompromised",
                "At least 3 doses in the initial series; additional doses may be indicated",
            )],
            ..CdcRule::base(
                VaccineId::Covid19,
                "COVID-19",
                Gap::Months(6),
                DoseCount::ByAge(covid_doses),
                Intervals::Fixed(COVID_PFIZER),
            )
        },
        // Travel and advisory-only vaccines. Dosing is not projected for
        // these; their recommenders emit fixed educational guidance.
        CdcRule::base(
            VaccineId::Dengue,
            "Dengue",
            Gap::Months(108),
            DoseCount::Fixed(0),
            Intervals::Fixed(NO_INTERVALS),
        ),
        CdcRule::base(
            VaccineId::YellowFever,
            "Yellow Fever",
            Gap::Months(9),
            DoseCount::Fixed(0),
            Intervals::Fixed(NO_INTERVALS),
        ),
        CdcRule::base(
            VaccineId::JapaneseEncephalitis,
            "Japanese Encephalitis",
            Gap::Months(2),
            DoseCount::Fixed(0),
            Intervals::Fixed(NO_INTERVALS),
        ),
        CdcRule::base(
            VaccineId::Typhoid,
            "Typhoid",
            Gap::Months(24),
            DoseCount::Fixed(0),
            Intervals::Fixed(NO_INTERVALS),
        ),
        CdcRule::base(
            VaccineId::Cholera,
            "Cholera",
            Gap::Months(24),
            DoseCount::Fixed(0),
            Intervals::Fixed(NO_INTERVALS),
        ),
        CdcRule::base(
            VaccineId::Rsv,
            "RSV",
            Gap::Days(0),
            DoseCount::Fixed(0),
            Intervals::Fixed(NO_INTERVALS),
        ),
    ]
}

/// Read-only lookup over every schedule entry.
#[derive(Debug)]
pub struct ScheduleRegistry {
    rules: BTreeMap<VaccineId, CdcRule>,
}

impl ScheduleRegistry {
    fn build() -> Self {
        let mut rules = BTreeMap::new();
        for rule in build_rules() {
            rules.insert(rule.id.clone(), rule);
        }
        ScheduleRegistry { rules }
    }

    pub fn rule(&self, id: &VaccineId) -> Option<&CdcRule> {
        self.rules.get(id)
    }

    /// Every identity with a schedule entry, in `VaccineId` order.
    pub fn ids(&self) -> impl Iterator<Item = &VaccineId> + '_ {
        self.rules.keys()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Process-wide schedule table, built on first use.
pub fn registry() -> &'static ScheduleRegistry {
    static REGISTRY: OnceLock<ScheduleRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ScheduleRegistry::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_panel_vaccine_has_a_rule() {
        let registry = registry();
        for id in STANDARD_PANEL {
            assert!(registry.rule(id).is_some(), "missing rule for {id}");
        }
    }

    #[test]
    fn registry_covers_travel_vaccines() {
        let registry = registry();
        assert_eq!(registry.len(), 20);
        assert!(registry.rule(&VaccineId::YellowFever).is_some());
        assert!(registry.rule(&VaccineId::Other("anthrax".into())).is_none());
    }

    #[test]
    fn hib_bucket_selection_uses_start_age() {
        let rule = registry().rule(&VaccineId::Hib).expect("hib rule");
        assert_eq!(rule.bucket_for_start_age(3).expect("bucket").doses, 4);
        assert_eq!(rule.bucket_for_start_age(7).expect("bucket").doses, 3);
        assert_eq!(rule.bucket_for_start_age(12).expect("bucket").doses, 2);
        assert_eq!(rule.bucket_for_start_age(15).expect("bucket").doses, 1);
        assert_eq!(rule.bucket_for_start_age(59).expect("bucket").doses, 1);
        assert!(rule.bucket_for_start_age(60).is_none());
    }

    #[test]
    fn rotavirus_products_override_dose_count() {
        let rule = registry().rule(&VaccineId::Rotavirus).expect("rotavirus rule");
        let rotarix = rule.product_variant("Rotarix (GSK)").expect("rotarix");
        assert_eq!(rotarix.doses, 2);
        let rotateq = rule.product_variant("ROTATEQ").expect("rotateq");
        assert_eq!(rotateq.doses, 3);
        assert!(rule.product_variant("unknown brand").is_none());
    }

    #[test]
    fn dtap_dose_count_switches_at_seven_years() {
        let rule = registry().rule(&VaccineId::DtapTdap).expect("dtap rule");
        assert_eq!(rule.doses.resolve(6), 5);
        assert_eq!(rule.doses.resolve(7), 3);
        assert_eq!(rule.intervals.resolve(6).len(), 4);
        assert_eq!(rule.intervals.resolve(7).len(), 2);
    }

    #[test]
    fn varicella_interval_is_age_dependent() {
        let rule = registry().rule(&VaccineId::Varicella).expect("varicella rule");
        assert_eq!(rule.intervals.before_dose(2, 12), Some(Gap::Months(3)));
        assert_eq!(rule.intervals.before_dose(2, 13), Some(Gap::Weeks(4)));
    }
}
