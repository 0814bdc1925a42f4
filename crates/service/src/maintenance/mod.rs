//! Preventive maintenance: plan management, date suggestion and the periodic due check.

pub mod schedule;
pub mod service;

pub use schedule::{Suggestion, CandidateScore};
pub use service::{NewPlan, PlanFilter, PlanUpdate, RunSummary};
