//! Badge catalog model
//!
//! The catalog itself is a fixed, versioned list owned by the settlement
//! server's gamification engine; these are only the shapes.

use serde::{Deserialize, Serialize};

/// Badge category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Achievement,
    Milestone,
    Special,
    Social,
}

/// Badge rarity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Unlock requirement: (kind, threshold)
///
/// Threshold kinds scale progress linearly; boolean and comparison kinds
/// are all-or-nothing. Every kind is backed by a real counter or stored
/// fact on [`super::SupplierMetrics`] - progress is never randomized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeRequirement {
    /// total_orders >= threshold, partial credit
    Orders { threshold: i64 },
    /// quotes_submitted >= threshold, partial credit
    Quotes { threshold: i64 },
    /// verified == true, no partial credit
    Verification,
    /// rating >= threshold, no partial credit
    Rating { threshold: f64 },
    /// average_response_time_hours <= threshold, no partial credit
    ResponseTime { threshold: f64 },
    /// joined within the last 30 days, no partial credit
    EarlyJoin,
    /// qc_clean_streak >= threshold, partial credit
    QcSuccess { threshold: i64 },
    /// social_shares >= threshold, partial credit
    SocialShares { threshold: i64 },
}

/// A catalog badge - static, not mutable at runtime
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
    /// Points granted while unlocked
    pub points: i64,
    pub requirement: BadgeRequirement,
}
