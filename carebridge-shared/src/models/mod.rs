pub mod auth;
pub mod errors;
pub mod records;
pub mod role;
pub mod summary;
pub mod volunteer;

pub use auth::{
    AuthTokenResponse, CharitySettings, Claims, LoginRequest, RegisterRequest, SelectRoleRequest,
    SelectRoleResponse,
};
pub use errors::ErrorResponse;
pub use records::{
    Beneficiary, BeneficiaryDraft, Charity, CharityDraft, Donation, DonationDraft, DonationStatus,
    Story, StoryDraft,
};
pub use role::Role;
pub use summary::DonationSummary;
pub use volunteer::VolunteerApplication;
