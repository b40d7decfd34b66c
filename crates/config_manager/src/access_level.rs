//! Sheriff's access-level vocabulary and its mapping to GitHub's permission bitmap.

use serde::{Deserialize, Serialize};

use github_client::CollaboratorPermissions;

/// A declared access level, independent of the platform's own vocabulary.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl AccessLevel {
    /// The GitHub-native permission string sent on collaborator/team-repo payloads.
    pub fn to_github(self) -> &'static str {
        match self {
            AccessLevel::Read => "pull",
            AccessLevel::Triage => "triage",
            AccessLevel::Write => "push",
            AccessLevel::Maintain => "maintain",
            AccessLevel::Admin => "admin",
        }
    }

    pub fn from_github(value: &str) -> Option<Self> {
        match value {
            "pull" => Some(AccessLevel::Read),
            "triage" => Some(AccessLevel::Triage),
            "push" => Some(AccessLevel::Write),
            "maintain" => Some(AccessLevel::Maintain),
            "admin" => Some(AccessLevel::Admin),
            _ => None,
        }
    }

    /// Decodes a GitHub permissions bitmap into the highest-true flag, in
    /// `{admin, maintain, push, triage, pull}` order.
    pub fn from_bitmap(bitmap: &CollaboratorPermissions) -> Option<Self> {
        if bitmap.admin {
            Some(AccessLevel::Admin)
        } else if bitmap.maintain {
            Some(AccessLevel::Maintain)
        } else if bitmap.push {
            Some(AccessLevel::Write)
        } else if bitmap.triage {
            Some(AccessLevel::Triage)
        } else if bitmap.pull {
            Some(AccessLevel::Read)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_github_is_left_inverse_of_to_github() {
        for level in [
            AccessLevel::Read,
            AccessLevel::Triage,
            AccessLevel::Write,
            AccessLevel::Maintain,
            AccessLevel::Admin,
        ] {
            assert_eq!(AccessLevel::from_github(level.to_github()), Some(level));
        }
    }

    #[test]
    fn from_bitmap_picks_highest_true_flag() {
        let bitmap = CollaboratorPermissions {
            admin: false,
            maintain: true,
            push: true,
            triage: true,
            pull: true,
        };
        assert_eq!(AccessLevel::from_bitmap(&bitmap), Some(AccessLevel::Maintain));
    }

    #[test]
    fn from_bitmap_all_false_is_none() {
        let bitmap = CollaboratorPermissions::default();
        assert_eq!(AccessLevel::from_bitmap(&bitmap), None);
    }
}
