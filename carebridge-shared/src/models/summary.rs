use serde::Serialize;

use super::{Donation, DonationStatus};

/// Totals shown at the top of the charity donation pages.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct DonationSummary {
    pub total: f64,
    pub anonymous: f64,
    pub named: f64,
    pub completed_count: usize,
}

impl DonationSummary {
    /// Aggregate a fetched donation list.
    #[must_use]
    pub fn from_donations(donations: &[Donation]) -> Self {
        let total: f64 = donations.iter().map(|donation| donation.amount).sum();
        let anonymous: f64 = donations
            .iter()
            .filter(|donation| donation.is_anonymous)
            .map(|donation| donation.amount)
            .sum();
        let completed_count = donations
            .iter()
            .filter(|donation| donation.status == DonationStatus::Completed)
            .count();
        Self {
            total,
            anonymous,
            named: total - anonymous,
            completed_count,
        }
    }
}
