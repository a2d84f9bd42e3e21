//! Per-vaccine recommenders and their registry.
//!
//! Each vaccine's decision table lives in its own module as a pure
//! function over a [`VaccineContext`]. Dispatch goes through a registry
//! keyed by canonical identity rather than a string switch, so adding a
//! vaccine means adding a module and one registration line.
//!
//! A recommender returning `None` means the vaccine is inapplicable and
//! stays out of the result entirely. That is only allowed when the caller
//! submitted no doses for it; any history, even fully excluded, produces
//! a visible recommendation so exclusion notes are never dropped.
//!
//! Two gates run in the dispatch layer, before and after the per-vaccine
//! logic:
//!
//! - reported immunity short-circuits the vaccine to a complete,
//!   not-recommended entry;
//! - live vaccines under pregnancy or immunocompromise have any
//!   actionable instruction replaced with a do-not-administer entry.

mod covid19;
mod dtap_tdap;
mod hepatitis_a;
mod hepatitis_b;
mod hib;
mod hpv;
mod influenza;
mod ipv;
mod meningococcal_acwy;
mod meningococcal_b;
mod mmr;
mod pneumococcal;
mod rotavirus;
mod travel;
mod varicella;

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use chrono::NaiveDate;

use acip_model::{DecisionType, Recommendation, SpecialConditions, VaccineId};
use acip_schedule::registry as schedule_registry;

use crate::context::{Dose, VaccineContext};
use crate::datemath;
use crate::normalize;
use crate::validator;

/// One vaccine's decision logic.
pub trait VaccineRecommender: Send + Sync {
    /// Canonical identity this recommender handles.
    fn vaccine_id(&self) -> VaccineId;

    /// Short description for listings and logs.
    fn description(&self) -> &'static str {
        "Vaccine recommender"
    }

    /// Evaluates one patient. `None` excludes the vaccine from output.
    fn recommend(&self, ctx: &VaccineContext<'_>) -> Option<Recommendation>;
}

/// Registry of recommenders indexed by canonical identity.
///
/// Thread-safe for shared reads; the default registry is cached behind a
/// [`OnceLock`].
pub struct RecommenderRegistry {
    recommenders: HashMap<VaccineId, Box<dyn VaccineRecommender>>,
}

impl RecommenderRegistry {
    pub fn new() -> Self {
        Self {
            recommenders: HashMap::new(),
        }
    }

    /// Registers a recommender for its identity, replacing any previous
    /// registration.
    pub fn register(&mut self, recommender: Box<dyn VaccineRecommender>) {
        self.recommenders
            .insert(recommender.vaccine_id(), recommender);
    }

    /// Recommender for a known identity. Unrecognized identities have no
    /// entry; dispatch routes them to the default guidance instead.
    pub fn get(&self, id: &VaccineId) -> Option<&dyn VaccineRecommender> {
        self.recommenders.get(id).map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.recommenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommenders.is_empty()
    }

    /// Registered identities, unordered.
    pub fn ids(&self) -> impl Iterator<Item = &VaccineId> + '_ {
        self.recommenders.keys()
    }
}

impl Default for RecommenderRegistry {
    fn default() -> Self {
        let mut registry = RecommenderRegistry::new();
        registry.register(recommender(VaccineId::HepatitisB, hepatitis_b::recommend));
        registry.register(recommender(VaccineId::Rotavirus, rotavirus::recommend));
        registry.register(recommender(VaccineId::DtapTdap, dtap_tdap::recommend));
        registry.register(recommender(VaccineId::Hib, hib::recommend));
        registry.register(recommender(VaccineId::Pneumococcal, pneumococcal::recommend));
        registry.register(recommender(VaccineId::Ipv, ipv::recommend));
        registry.register(recommender(VaccineId::Influenza, influenza::recommend));
        registry.register(recommender(VaccineId::Mmr, mmr::recommend));
        registry.register(recommender(VaccineId::Varicella, varicella::recommend));
        registry.register(recommender(VaccineId::HepatitisA, hepatitis_a::recommend));
        registry.register(recommender(VaccineId::Hpv, hpv::recommend));
        registry.register(recommender(
            VaccineId::MeningococcalAcwy,
            meningococcal_acwy::recommend,
        ));
        registry.register(recommender(
            VaccineId::MeningococcalB,
            meningococcal_b::recommend,
        ));
        registry.register(recommender(VaccineId::Covid19, covid19::recommend));
        registry.register(recommender(VaccineId::Dengue, travel::dengue));
        registry.register(recommender(VaccineId::YellowFever, travel::yellow_fever));
        registry.register(recommender(
            VaccineId::JapaneseEncephalitis,
            travel::japanese_encephalitis,
        ));
        registry.register(recommender(VaccineId::Typhoid, travel::typhoid));
        registry.register(recommender(VaccineId::Cholera, travel::cholera));
        registry.register(recommender(VaccineId::Rsv, travel::rsv));
        registry
    }
}

/// Cached default registry with every standard recommender.
pub fn default_registry() -> &'static RecommenderRegistry {
    static DEFAULT_REGISTRY: OnceLock<RecommenderRegistry> = OnceLock::new();
    DEFAULT_REGISTRY.get_or_init(RecommenderRegistry::default)
}

/// Adapts a plain function to [`VaccineRecommender`].
struct FunctionRecommender {
    id: VaccineId,
    recommend_fn: fn(&VaccineContext<'_>) -> Option<Recommendation>,
}

fn recommender(
    id: VaccineId,
    recommend_fn: fn(&VaccineContext<'_>) -> Option<Recommendation>,
) -> Box<dyn VaccineRecommender> {
    Box::new(FunctionRecommender { id, recommend_fn })
}

impl VaccineRecommender for FunctionRecommender {
    fn vaccine_id(&self) -> VaccineId {
        self.id.clone()
    }

    fn description(&self) -> &'static str {
        "Function-based recommender"
    }

    fn recommend(&self, ctx: &VaccineContext<'_>) -> Option<Recommendation> {
        (self.recommend_fn)(ctx)
    }
}

/// Evaluates one vaccine end to end: immunity gate, dose validation,
/// per-vaccine logic, live-vaccine gate, advisory attachment.
pub fn evaluate(
    id: &VaccineId,
    birth_date: NaiveDate,
    current_date: NaiveDate,
    doses: &[Dose],
    conditions: &SpecialConditions,
    immunity: &BTreeSet<VaccineId>,
) -> Option<Recommendation> {
    let age_years = datemath::years_between(birth_date, current_date);
    let display = normalize::display_name(id, age_years);

    if immunity.contains(id) {
        let mut rec = Recommendation::new(
            display.clone(),
            DecisionType::NotRecommended,
            "No vaccination needed: evidence of immunity",
        );
        rec.series_complete = true;
        rec.note(format!("Evidence of immunity reported for {display}"));
        return Some(rec);
    }

    let Some(rule) = schedule_registry().rule(id) else {
        // Unrecognized vaccine: echo what was submitted, never an error.
        return Some(unknown_vaccine(&display, doses));
    };

    let validated = if rule.advisory_only() {
        validator::ValidatedDoses {
            counted: doses.to_vec(),
            excluded: Vec::new(),
        }
    } else {
        validator::validate_doses(rule, birth_date, doses)
    };
    let exclusion_notes = validated.notes();
    let ctx = VaccineContext {
        id: id.clone(),
        birth_date,
        current_date,
        counted: validated.counted,
        all_doses: doses,
        conditions,
        rule,
    };

    tracing::debug!(
        vaccine = %id,
        submitted = doses.len(),
        counted = ctx.dose_count(),
        "dispatching recommender"
    );

    let recommender = default_registry().get(id)?;
    let mut rec = recommender.recommend(&ctx)?;

    if !exclusion_notes.is_empty() {
        let mut notes = exclusion_notes;
        notes.append(&mut rec.notes);
        rec.notes = notes;
    }
    if rule.live && conditions.contraindicates_live() && rec.next_dose_date.is_some() {
        rec = block_live_vaccine(&ctx, rec);
    }
    attach_advisories(&ctx, &mut rec);
    Some(rec)
}

/// Guidance for a name outside the known canonical set.
fn unknown_vaccine(display: &str, doses: &[Dose]) -> Recommendation {
    let mut rec = Recommendation::new(
        display,
        DecisionType::Routine,
        format!("Consult current CDC guidance for {display}"),
    );
    rec.note(format!(
        "{} dose(s) recorded; no schedule rules are defined for this vaccine",
        doses.len()
    ));
    rec
}

/// Replaces an actionable instruction with a do-not-administer entry for
/// a live vaccine under pregnancy or immunocompromise.
fn block_live_vaccine(ctx: &VaccineContext<'_>, rec: Recommendation) -> Recommendation {
    let reason = if ctx.conditions.pregnancy {
        "pregnancy"
    } else {
        "immunocompromise"
    };
    let mut blocked = Recommendation::new(
        rec.vaccine_name.clone(),
        DecisionType::NotRecommended,
        format!(
            "Do not administer {}: live vaccine contraindicated during {reason}",
            rec.vaccine_name
        ),
    );
    blocked.notes = rec.notes;
    blocked.note("Series remains incomplete; revisit once the contraindication no longer applies");
    blocked
}

/// Surfaces static advisory text: contraindications and precautions for
/// live vaccines under blocking conditions, and special-situation text
/// for whichever risk flags are set.
fn attach_advisories(ctx: &VaccineContext<'_>, rec: &mut Recommendation) {
    if ctx.rule.live && ctx.conditions.contraindicates_live() {
        rec.contraindications = ctx
            .rule
            .contraindications
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        rec.precautions = ctx
            .rule
            .precautions
            .iter()
            .map(|s| (*s).to_string())
            .collect();
    }
    for flag in ctx.conditions.active() {
        if let Some(text) = ctx.rule.special_situation(flag) {
            rec.special_situations.push(text.to_string());
        }
    }
}

// ==== helpers shared by the per-vaccine modules ====

/// Standard actionable guidance for the dose labelled `label` ("dose 2",
/// "Tdap booster dose"): due now once the minimum date has passed,
/// otherwise scheduled for it. Overdue doses classify as catch-up,
/// future doses as routine; recommenders override the decision type
/// where their vaccine calls for something else.
pub(crate) fn give_labeled(
    ctx: &VaccineContext<'_>,
    label: &str,
    min_date: NaiveDate,
) -> Recommendation {
    let name = ctx.display_name();
    if min_date <= ctx.current_date {
        let mut rec = Recommendation::new(
            name,
            DecisionType::CatchUp,
            format!("Give {label} now"),
        );
        rec.next_dose_date = Some(ctx.current_date);
        rec
    } else {
        let mut rec = Recommendation::new(
            name,
            DecisionType::Routine,
            format!("Give {label} on or after {}", datemath::format_iso(min_date)),
        );
        rec.next_dose_date = Some(min_date);
        rec
    }
}

/// [`give_labeled`] for a numbered series dose.
pub(crate) fn give_dose(ctx: &VaccineContext<'_>, n: usize, min_date: NaiveDate) -> Recommendation {
    give_labeled(ctx, &format!("dose {n}"), min_date)
}

pub(crate) fn dose_word(n: usize) -> &'static str {
    if n == 1 { "dose" } else { "doses" }
}

/// A completed series. Never carries a next dose or a give instruction.
pub(crate) fn series_complete(ctx: &VaccineContext<'_>, text: &str) -> Recommendation {
    let mut rec = Recommendation::new(ctx.display_name(), DecisionType::Routine, text);
    rec.series_complete = true;
    rec
}

/// Plain series walk for vaccines without buckets, brackets, or upper age
/// limits: complete at the rule's dose count, otherwise the next dose at
/// its minimum age or interval.
pub(crate) fn simple_series(ctx: &VaccineContext<'_>) -> Recommendation {
    let count = ctx.dose_count();
    let required = ctx.rule.doses.resolve(ctx.age_years());
    if count >= required {
        return series_complete(ctx, &format!("Series complete ({required} doses)"));
    }
    let next = count + 1;
    let min_date = match ctx.last_counted() {
        None => ctx.rule.minimum_age.after(ctx.birth_date),
        Some(last) => match ctx.rule.intervals.before_dose(next, ctx.age_years()) {
            Some(gap) => gap.after(last.date),
            None => last.date,
        },
    };
    give_dose(ctx, next, min_date)
}

/// Context builders shared by the per-vaccine test modules.
#[cfg(test)]
pub(crate) mod harness {
    use chrono::NaiveDate;

    use acip_model::{SpecialConditions, VaccineId};
    use acip_schedule::registry;

    use crate::context::{Dose, VaccineContext};
    use crate::validator;

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    pub(crate) fn doses(dates: &[&str]) -> Vec<Dose> {
        dates.iter().map(|d| Dose::new(date(d))).collect()
    }

    pub(crate) fn doses_of(product: &str, dates: &[&str]) -> Vec<Dose> {
        dates
            .iter()
            .map(|d| Dose {
                date: date(d),
                product: Some(product.to_string()),
            })
            .collect()
    }

    /// Builds a context the way dispatch does, validator included.
    pub(crate) fn context<'a>(
        id: VaccineId,
        birth: &str,
        current: &str,
        all: &'a [Dose],
        conditions: &'a SpecialConditions,
    ) -> VaccineContext<'a> {
        let rule = registry().rule(&id).expect("schedule entry");
        let counted = if rule.advisory_only() {
            all.to_vec()
        } else {
            validator::validate_doses(rule, date(birth), all).counted
        };
        VaccineContext {
            id,
            birth_date: date(birth),
            current_date: date(current),
            counted,
            all_doses: all,
            conditions,
            rule,
        }
    }
}
