//! Person value - contact and identity details for anyone the workshop tracks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PersonId, UserId, ValidationError};

/// How a person prefers to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    Sms,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
            ContactMethod::Sms => "sms",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "email" => Ok(ContactMethod::Email),
            "phone" => Ok(ContactMethod::Phone),
            "sms" => Ok(ContactMethod::Sms),
            other => Err(ValidationError::invalid_format(
                "preferred_contact_method",
                format!("unknown contact method '{}'", other),
            )),
        }
    }
}

/// A person known to the workshop.
///
/// The emergency contact is another person referenced by id; nothing
/// prevents two people naming each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Public handle, if the person goes by one.
    pub handle: Option<String>,
    /// Linked authentication identity.
    pub user_id: Option<UserId>,
    pub phone_number: Option<String>,
    pub preferred_contact_method: ContactMethod,
    pub emergency_contact: Option<PersonId>,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id,
            name,
            handle: None,
            user_id: None,
            phone_number: None,
            preferred_contact_method: ContactMethod::default(),
            emergency_contact: None,
        })
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        let handle = handle.into();
        self.handle = if handle.trim().is_empty() {
            None
        } else {
            Some(handle)
        };
        self
    }

    pub fn linked_to(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// `"handle (name)"` when a handle is set, otherwise the name.
    pub fn name_display(&self) -> String {
        match &self.handle {
            Some(handle) => format!("{} ({})", handle, self.name),
            None => self.name.clone(),
        }
    }

    /// Returns true if this person is linked to the given identity.
    pub fn is_linked_to(&self, user_id: &UserId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_display_uses_handle_when_present() {
        let person = Person::new(PersonId::new(), "Alex Smith")
            .unwrap()
            .with_handle("Sparky");
        assert_eq!(person.name_display(), "Sparky (Alex Smith)");
    }

    #[test]
    fn name_display_falls_back_to_name() {
        let person = Person::new(PersonId::new(), "Alex Smith")
            .unwrap()
            .with_handle("   ");
        assert_eq!(person.name_display(), "Alex Smith");
        assert_eq!(person.to_string(), "Alex Smith");
    }

    #[test]
    fn default_contact_method_is_email() {
        let person = Person::new(PersonId::new(), "Jo").unwrap();
        assert_eq!(person.preferred_contact_method, ContactMethod::Email);
        assert_eq!(ContactMethod::parse("sms").unwrap(), ContactMethod::Sms);
        assert!(ContactMethod::parse("fax").is_err());
    }

    #[test]
    fn is_linked_to_matches_identity() {
        let user = UserId::new("auth|42").unwrap();
        let person = Person::new(PersonId::new(), "Jo").unwrap().linked_to(user.clone());
        assert!(person.is_linked_to(&user));
        assert!(!person.is_linked_to(&UserId::new("auth|43").unwrap()));
    }
}
