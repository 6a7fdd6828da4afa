//! The public volunteer signup form.

use serde::{Deserialize, Serialize};

use super::auth::looks_like_email;

/// Body of `POST /volunteer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolunteerApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Why the applicant wants to help. Optional.
    #[serde(default)]
    pub message: String,
}

impl VolunteerApplication {
    /// Names of required fields that are still empty.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Whether a non-empty `email` is shaped like an address.
    #[must_use]
    pub fn has_valid_email(&self) -> bool {
        looks_like_email(self.email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_the_only_optional_field() {
        let application = VolunteerApplication::default();
        assert_eq!(application.missing_required(), ["name", "email", "phone"]);

        let application = VolunteerApplication {
            name: "Wanjiru".to_string(),
            email: "wanjiru@example.org".to_string(),
            phone: "+254 700 000000".to_string(),
            message: String::new(),
        };
        assert!(application.missing_required().is_empty());
        assert!(application.has_valid_email());
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let application = VolunteerApplication {
            name: "   ".to_string(),
            email: "wanjiru".to_string(),
            phone: "0700".to_string(),
            message: "weekends".to_string(),
        };
        assert_eq!(application.missing_required(), ["name"]);
        assert!(!application.has_valid_email());
    }

    #[test]
    fn body_uses_the_form_field_names() {
        let json = serde_json::to_value(VolunteerApplication {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            phone: "1".to_string(),
            message: "hi".to_string(),
        })
        .unwrap();
        assert_eq!(json["phone"], "1");
        assert_eq!(json["message"], "hi");
    }
}
