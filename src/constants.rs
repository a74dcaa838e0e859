//! Values shared across modules

/// Subject on which all core commands are published
pub const SUBJECT_CORE_INGRESS: &str = "core.income.request";
