use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Identifier of a story.
///
/// The backend keys stories by integer, while some clients address them by a
/// string slug, so both forms are accepted and kept distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryId {
    Number(i64),
    Name(String),
}

impl StoryId {
    /// Name of the real-time group that collaborators of this story join.
    pub fn group_name(&self) -> String {
        format!("story-{}", self)
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            StoryId::Number(id) => Some(*id),
            StoryId::Name(_) => None,
        }
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryId::Number(id) => write!(f, "{}", id),
            StoryId::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for StoryId {
    fn from(id: i64) -> Self {
        StoryId::Number(id)
    }
}

impl From<i32> for StoryId {
    fn from(id: i32) -> Self {
        StoryId::Number(i64::from(id))
    }
}

impl From<&str> for StoryId {
    fn from(name: &str) -> Self {
        StoryId::Name(name.to_string())
    }
}

impl From<String> for StoryId {
    fn from(name: String) -> Self {
        StoryId::Name(name)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Client-generated block identifier, stable for the lifetime of a block.
    BlockId
);

string_id!(
    /// Identifier of a directed connection between two blocks.
    ConnectionId
);

impl BlockId {
    /// Generates a fresh id prefixed with the block type, e.g. `textResponse-<uuid>`.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4()))
    }
}

impl ConnectionId {
    pub fn generate() -> Self {
        Self(format!("conn-{}", Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_id_group_name() {
        assert_eq!(StoryId::from(42).group_name(), "story-42");
        assert_eq!(StoryId::from("onboarding").group_name(), "story-onboarding");
    }

    #[test]
    fn story_id_deserializes_number_and_string() {
        let number: StoryId = serde_json::from_str("7").unwrap();
        let name: StoryId = serde_json::from_str("\"S9\"").unwrap();
        assert_eq!(number, StoryId::Number(7));
        assert_eq!(name, StoryId::Name("S9".to_string()));
        assert_ne!(StoryId::from(7), StoryId::from("7"));
    }

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let a = BlockId::generate("textResponse");
        let b = BlockId::generate("textResponse");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("textResponse-"));
        assert!(ConnectionId::generate().as_str().starts_with("conn-"));
    }
}
