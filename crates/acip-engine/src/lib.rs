pub mod context;
pub mod datemath;
pub mod normalize;
pub mod orchestrator;
pub mod recommenders;
pub mod validator;

pub use context::{Dose, VaccineContext};
pub use datemath::{describe_age, format_iso, parse_date};
pub use normalize::{display_name, is_recognized, to_internal};
pub use orchestrator::run_catch_up;
pub use recommenders::{RecommenderRegistry, VaccineRecommender, default_registry, evaluate};
pub use validator::{
    EffectiveSchedule, ExcludedDose, GRACE_PERIOD_DAYS, ValidatedDoses, effective_schedule,
    validate_doses,
};
