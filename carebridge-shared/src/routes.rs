//! Page routes of the CareBridge web application.
//!
//! The client never renders these pages; it needs the table to decide where a
//! session bootstrap should send the user.

use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Known application pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Route {
    Home,
    Login,
    Signup,
    Search,
    SelectRole,
    Dashboard,
    DonorDashboard,
    CharityDashboard,
    AdminDashboard,
    Beneficiaries,
    ImpactStories,
    ManageDonations,
    CharitySettings,
}

impl Route {
    /// Absolute path of the page.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Search => "/search",
            Self::SelectRole => "/select-role",
            Self::Dashboard => "/dashboard",
            Self::DonorDashboard => "/donor-dashboard",
            Self::CharityDashboard => "/charity-dashboard",
            Self::AdminDashboard => "/admin-dashboard",
            Self::Beneficiaries => "/charity-dashboard/beneficiaries",
            Self::ImpactStories => "/charity-dashboard/impact-stories",
            Self::ManageDonations => "/charity-dashboard/manage-donations",
            Self::CharitySettings => "/charity-dashboard/settings",
        }
    }

    /// Match a request path against the table. A trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::iter().find(|route| route.path() == normalized)
    }

    /// Generic landing points where a signed-in user may be bounced to the
    /// dashboard matching their role. Resource sub-pages are never entry points.
    #[must_use]
    pub fn is_entry_point(self) -> bool {
        matches!(
            self,
            Self::Home
                | Self::Dashboard
                | Self::SelectRole
                | Self::DonorDashboard
                | Self::CharityDashboard
                | Self::AdminDashboard
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
