//! Shared data models

pub mod badge;
pub mod supplier;

pub use badge::{Badge, BadgeCategory, BadgeRarity, BadgeRequirement};
pub use supplier::{SupplierMetrics, SupplierMetricsSnapshot, SupplierTier};
