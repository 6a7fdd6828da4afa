//! The CareBridge collections and the charity settings endpoint.

use shared::models::{
    Beneficiary, BeneficiaryDraft, Charity, CharityDraft, CharitySettings, Donation,
    DonationDraft, Story, StoryDraft,
};
use tracing::info;

use crate::{
    error::ClientError,
    http::ApiClient,
    resource::{Card, Resource, ResourceDescriptor},
};

/// Profile endpoint of the signed-in charity.
pub const CHARITY_SETTINGS_PATH: &str = "/api/charity-settings";

impl Resource for Beneficiary {
    type Draft = BeneficiaryDraft;

    const DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
        label: "Beneficiary",
        singular: "beneficiary",
        plural: "beneficiaries",
        collection_path: "/beneficiaries",
        create_path: None,
        required_fields: &["charity_id", "name", "needs"],
        search_fields: &["name", "charity_name"],
        confirm_delete: false,
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "needs" => Some(&self.needs),
            "charity_name" => self.charity_name.as_deref(),
            _ => None,
        }
    }

    fn card(&self) -> Card {
        let card = Card::new(&self.name, &self.needs);
        match &self.charity_name {
            Some(charity) => card.with_meta(charity),
            None => card,
        }
    }

    fn missing_required(draft: &BeneficiaryDraft) -> Vec<&'static str> {
        draft.missing_required()
    }
}

impl Resource for Story {
    type Draft = StoryDraft;

    const DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
        label: "Story",
        singular: "story",
        plural: "stories",
        collection_path: "/stories",
        create_path: None,
        required_fields: &["title", "content"],
        search_fields: &["title", "content"],
        confirm_delete: true,
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "content" => Some(&self.content),
            _ => None,
        }
    }

    fn card(&self) -> Card {
        let card = Card::new(&self.title, &self.content);
        match self.image_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => card.with_meta(url),
            None => card,
        }
    }

    fn missing_required(draft: &StoryDraft) -> Vec<&'static str> {
        draft.missing_required()
    }
}

impl Resource for Donation {
    type Draft = DonationDraft;

    const DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
        label: "Donation",
        singular: "donation",
        plural: "donations",
        collection_path: "/donations",
        create_path: None,
        required_fields: &["amount", "charity_id"],
        search_fields: &["donor_name", "charity_name", "status"],
        confirm_delete: false,
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "donor_name" => Some(self.display_donor()),
            "charity_name" => self.charity_name.as_deref(),
            "status" => Some(self.status.as_str()),
            "donation_type" => self.donation_type.as_deref(),
            _ => None,
        }
    }

    fn card(&self) -> Card {
        let title = format!("${:.2}", self.amount);
        let body = match &self.charity_name {
            Some(charity) => format!("{} to {charity}", self.display_donor()),
            None => self.display_donor().to_string(),
        };
        Card::new(title, body).with_meta(self.status.as_str())
    }

    fn missing_required(draft: &DonationDraft) -> Vec<&'static str> {
        draft.missing_required()
    }
}

impl Resource for Charity {
    type Draft = CharityDraft;

    const DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
        label: "Charity",
        singular: "charity",
        plural: "charities",
        collection_path: "/charities",
        create_path: Some("/charities/create"),
        required_fields: &["name", "description"],
        search_fields: &["name", "description"],
        confirm_delete: false,
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn card(&self) -> Card {
        Card::new(&self.name, &self.description).with_meta(self.approval_label())
    }

    fn missing_required(draft: &CharityDraft) -> Vec<&'static str> {
        draft.missing_required()
    }
}

/// Fetch the signed-in charity's profile.
///
/// # Errors
/// See [`ApiClient::request`].
pub async fn fetch_charity_settings(client: &ApiClient) -> Result<CharitySettings, ClientError> {
    client.get(CHARITY_SETTINGS_PATH).await
}

/// Save the signed-in charity's profile and return what the server stored.
///
/// The server may answer with an empty body, in which case `settings` is
/// returned as sent.
///
/// # Errors
/// See [`ApiClient::request`].
pub async fn update_charity_settings(
    client: &ApiClient,
    settings: &CharitySettings,
) -> Result<CharitySettings, ClientError> {
    let stored: Option<CharitySettings> = client.patch(CHARITY_SETTINGS_PATH, settings).await?;
    info!(name = %settings.name, "updated charity settings");
    Ok(stored.unwrap_or_else(|| settings.clone()))
}
