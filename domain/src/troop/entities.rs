//! Group and trainee entities

use crate::core::serde_helpers::null_as_default;
use serde::Deserialize;

/// A trainee cohort the signed-in account is affiliated with.
///
/// Identity is [`Group::id`]. Groups are returned by the group listing and are
/// never mutated afterwards; free-text fields arrive padded from the portal and
/// are trimmed once via [`Group::trimmed`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    #[serde(rename = "group_id", deserialize_with = "crate::core::serde_helpers::string_or_number")]
    pub id: String,
    #[serde(rename = "group_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_name: String,
    #[serde(default, deserialize_with = "crate::core::serde_helpers::string_or_number")]
    pub unit_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(rename = "enter_date", default, deserialize_with = "null_as_default")]
    pub entered_date: String,
}

impl Group {
    /// Strip the surrounding whitespace the portal pads names with.
    pub fn trimmed(mut self) -> Self {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.unit_name);
        trim_in_place(&mut self.full_name);
        self
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

/// Trainee fields exactly as the group detail endpoint returns them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TraineeProfile {
    #[serde(rename = "trainee_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "birth", default, deserialize_with = "null_as_default")]
    pub birthday: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationship: String,
}

/// The trainee of a group, together with the group it belongs to.
///
/// The group is borrowed, not copied: it is only carried along so that
/// letters can be addressed (`unit_code`, `group_id`) without the caller
/// passing the group twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraineeInfo<'g> {
    pub group: &'g Group,
    pub name: String,
    pub birthday: String,
    pub relationship: String,
}

impl<'g> TraineeInfo<'g> {
    pub fn new(group: &'g Group, profile: TraineeProfile) -> Self {
        Self {
            group,
            name: profile.name,
            birthday: profile.birthday,
            relationship: profile.relationship,
        }
    }
}
