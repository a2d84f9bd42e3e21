pub mod conditions;
pub mod error;
pub mod recommendation;
pub mod request;
pub mod vaccine;

pub use conditions::SpecialConditions;
pub use error::{CatchUpError, Result};
pub use recommendation::{DecisionType, Recommendation};
pub use request::{CatchUpRequest, CatchUpResult};
pub use vaccine::{DoseRecord, VaccineHistoryEntry, VaccineId};
