//! Rooms and categories a course can be associated with.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CategoryId, RoomId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("room.name"));
        }
        Ok(Self {
            id,
            name,
            description: None,
            location: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("category.name"));
        }
        Ok(Self {
            id,
            name,
            description: None,
        })
    }
}
