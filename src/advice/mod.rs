pub mod rules;

pub use rules::{is_healthy, recommend, LOW_CONFIDENCE_CAVEAT, LOW_CONFIDENCE_THRESHOLD};
