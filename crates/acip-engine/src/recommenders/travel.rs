//! Travel and advisory-only entries. None of these carry a dosing
//! schedule here: each produces fixed educational guidance, marked
//! complete so no dose is ever projected. They are evaluated only when
//! the caller's history mentions them.

use acip_model::{DecisionType, Recommendation};

use crate::context::VaccineContext;

fn advisory(
    ctx: &VaccineContext<'_>,
    decision: DecisionType,
    text: &str,
    notes: &[&str],
) -> Option<Recommendation> {
    let mut rec = Recommendation::new(ctx.display_name(), decision, text);
    rec.series_complete = true;
    for note in notes {
        rec.note(*note);
    }
    Some(rec)
}

pub fn dengue(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    advisory(
        ctx,
        DecisionType::InternationalAdvisory,
        "Dengue vaccination applies only in endemic areas after laboratory-confirmed prior infection",
        &[
            "Licensed for children 9 through 16 years living in endemic areas with a previous dengue infection",
            "Consult a travel medicine specialist before travel to endemic regions",
        ],
    )
}

pub fn yellow_fever(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    advisory(
        ctx,
        DecisionType::InternationalAdvisory,
        "Yellow fever vaccination is required for travel to parts of Africa and South America",
        &[
            "Given only at designated vaccination centers; an International Certificate of Vaccination may be required",
            "Minimum age 9 months",
        ],
    )
}

pub fn japanese_encephalitis(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    advisory(
        ctx,
        DecisionType::InternationalAdvisory,
        "Japanese encephalitis vaccination is recommended for extended stays in endemic areas of Asia",
        &["2-dose series at least 28 days apart, finished at least 1 week before travel"],
    )
}

pub fn typhoid(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    advisory(
        ctx,
        DecisionType::InternationalAdvisory,
        "Typhoid vaccination is recommended before travel to areas with poor sanitation",
        &["Injectable vaccine from 2 years of age or oral vaccine from 6 years"],
    )
}

pub fn cholera(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    advisory(
        ctx,
        DecisionType::InternationalAdvisory,
        "Cholera vaccination is considered only for travel to areas of active transmission",
        &["Single-dose oral vaccine for travelers 2 through 64 years"],
    )
}

pub fn rsv(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    if ctx.conditions.pregnancy {
        return advisory(
            ctx,
            DecisionType::RiskBased,
            "Maternal RSV vaccination is recommended at 32 through 36 weeks of pregnancy during RSV season",
            &["Protects the infant through transferred antibodies"],
        );
    }
    advisory(
        ctx,
        DecisionType::NotRecommended,
        "RSV protection for infants is given as the monoclonal antibody nirsevimab, not a vaccine",
        &["Maternal RSV vaccination applies only during pregnancy"],
    )
}
