//! Records managed through the CareBridge CRUD pages and the drafts submitted
//! to create or update them.

use serde::{Deserialize, Serialize};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A person or family a charity supports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Beneficiary {
    pub id: i64,
    #[serde(default)]
    pub charity_id: Option<i64>,
    #[serde(default)]
    pub charity_name: Option<String>,
    pub name: String,
    #[serde(default)]
    pub needs: String,
}

/// Form contents for creating or editing a [`Beneficiary`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeneficiaryDraft {
    pub charity_id: Option<i64>,
    pub name: String,
    pub needs: String,
}

impl BeneficiaryDraft {
    /// Names of required fields that are still empty.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.charity_id.is_none() {
            missing.push("charity_id");
        }
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.needs) {
            missing.push("needs");
        }
        missing
    }
}

impl From<&Beneficiary> for BeneficiaryDraft {
    fn from(record: &Beneficiary) -> Self {
        Self {
            charity_id: record.charity_id,
            name: record.name.clone(),
            needs: record.needs.clone(),
        }
    }
}

/// An impact story published by a charity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Story {
    pub id: i64,
    #[serde(default)]
    pub charity_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Form contents for creating or editing a [`Story`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoryDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: String,
}

impl StoryDraft {
    /// Names of required fields that are still empty. The image is optional.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.title) {
            missing.push("title");
        }
        if is_blank(&self.content) {
            missing.push("content");
        }
        missing
    }
}

impl From<&Story> for StoryDraft {
    fn from(record: &Story) -> Self {
        Self {
            title: record.title.clone(),
            content: record.content.clone(),
            image_url: record.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Processing state of a donation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
    #[serde(other)]
    Other,
}

impl DonationStatus {
    /// Lower-case label as sent by the API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::Other => "other",
        }
    }
}

/// A gift recorded against a charity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donation {
    pub id: i64,
    pub amount: f64,
    #[serde(default)]
    pub charity_id: Option<i64>,
    #[serde(default)]
    pub charity_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub beneficiary_id: Option<i64>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub status: DonationStatus,
    #[serde(default)]
    pub donation_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl Donation {
    /// Name shown in donation tables; anonymous gifts never reveal the donor.
    #[must_use]
    pub fn display_donor(&self) -> &str {
        if self.is_anonymous {
            "Anonymous"
        } else {
            self.donor_name.as_deref().unwrap_or("Unknown donor")
        }
    }
}

/// Form contents for making or editing a donation.
///
/// A fresh draft carries `Pending`. A draft seeded from a record carries that
/// record's status, or `None` when the status is not one this client knows,
/// in which case the field is left out of the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DonationPayload")]
pub struct DonationDraft {
    pub amount: f64,
    pub charity_id: Option<i64>,
    pub category_id: Option<i64>,
    pub beneficiary_id: Option<i64>,
    pub donation_type: String,
    pub donor_name: String,
    pub is_anonymous: bool,
    pub status: Option<DonationStatus>,
}

impl Default for DonationDraft {
    fn default() -> Self {
        Self {
            amount: 0.0,
            charity_id: None,
            category_id: None,
            beneficiary_id: None,
            donation_type: "money".to_string(),
            donor_name: String::new(),
            is_anonymous: false,
            status: Some(DonationStatus::Pending),
        }
    }
}

impl DonationDraft {
    /// Names of required fields that are still empty or out of range.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !(self.amount.is_finite() && self.amount > 0.0) {
            missing.push("amount");
        }
        if self.charity_id.is_none() {
            missing.push("charity_id");
        }
        missing
    }
}

impl From<&Donation> for DonationDraft {
    fn from(record: &Donation) -> Self {
        Self {
            amount: record.amount,
            charity_id: record.charity_id,
            category_id: record.category_id,
            beneficiary_id: record.beneficiary_id,
            donation_type: record
                .donation_type
                .clone()
                .unwrap_or_else(|| "money".to_string()),
            donor_name: record.donor_name.clone().unwrap_or_default(),
            is_anonymous: record.is_anonymous,
            status: match record.status {
                DonationStatus::Other => None,
                known => Some(known),
            },
        }
    }
}

/// Wire shape of a donation create or update.
#[derive(Debug, Clone, Serialize)]
struct DonationPayload {
    amount: f64,
    charity_id: Option<i64>,
    category_id: Option<i64>,
    beneficiary_id: Option<i64>,
    donation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<DonationStatus>,
    donor_name: String,
    is_anonymous: bool,
    next_donation_date: Option<String>,
}

impl From<DonationDraft> for DonationPayload {
    fn from(draft: DonationDraft) -> Self {
        let donor_name = if draft.is_anonymous {
            "Anonymous".to_string()
        } else {
            draft.donor_name
        };
        Self {
            amount: draft.amount,
            charity_id: draft.charity_id,
            category_id: draft.category_id,
            beneficiary_id: draft.beneficiary_id,
            donation_type: draft.donation_type,
            status: draft.status,
            donor_name,
            is_anonymous: draft.is_anonymous,
            next_donation_date: None,
        }
    }
}

/// A registered charity organisation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_approved: bool,
}

impl Charity {
    /// Approval label shown next to each application.
    #[must_use]
    pub fn approval_label(&self) -> &'static str {
        if self.is_approved {
            "Approved"
        } else {
            "Pending Approval"
        }
    }
}

/// Application form for a new charity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharityDraft {
    pub name: String,
    pub description: String,
}

impl CharityDraft {
    /// Names of required fields that are still empty.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.description) {
            missing.push("description");
        }
        missing
    }
}

impl From<&Charity> for CharityDraft {
    fn from(record: &Charity) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
        }
    }
}
