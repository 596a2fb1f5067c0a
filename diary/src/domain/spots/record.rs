//! Spot records, their identifiers, and the draft used while editing.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Coordinate;
use crate::domain::ports::PickedImage;

/// Identifier as it may appear in stored JSON.
///
/// Older collections used millisecond timestamps (sometimes with a random
/// fractional part) as ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "RawId", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<RawId> for $name {
            fn from(raw: RawId) -> Self {
                Self(raw.into())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id! {
    /// Unique identifier of a spot within the collection.
    SpotId
}

opaque_id! {
    /// Unique identifier of an image within its spot.
    ImageId
}

/// Reference to a photo attached to a spot. The store never inspects `uri`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotImage {
    pub id: ImageId,
    pub uri: String,
}

impl SpotImage {
    /// Attach a picked image under a fresh id.
    pub fn from_picked(picked: PickedImage) -> Self {
        Self {
            id: ImageId::random(),
            uri: picked.uri,
        }
    }
}

/// A saved fishing spot.
///
/// ## Invariants
/// - `id` is unique within its collection.
/// - `title` is non-blank for every record the store persists.
///
/// Serialised with the field names the mobile app has always stored:
/// `{"id", "coordinate": {"latitude", "longitude"}, "title",
/// "description", "images": [{"id", "uri"}]}`. Missing `description` or
/// `images` decode as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRecord {
    pub id: SpotId,
    pub coordinate: Coordinate,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<SpotImage>,
}

/// An unsaved spot being edited, either a new pin or a copy of a record.
///
/// Drafts may have a blank title and are never persisted as-is; hand them to
/// [`super::SpotStore::save_draft`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpotDraft {
    pub id: SpotId,
    pub coordinate: Coordinate,
    pub title: String,
    pub description: String,
    pub images: Vec<SpotImage>,
}

impl SpotDraft {
    /// Start a blank draft for a new pin at `coordinate`.
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            id: SpotId::random(),
            coordinate,
            title: String::new(),
            description: String::new(),
            images: Vec::new(),
        }
    }

    /// Start editing an existing record.
    pub fn from_record(record: &SpotRecord) -> Self {
        Self {
            id: record.id.clone(),
            coordinate: record.coordinate,
            title: record.title.clone(),
            description: record.description.clone(),
            images: record.images.clone(),
        }
    }

    /// Append picked images, each under a fresh id.
    pub fn add_images(&mut self, picked: impl IntoIterator<Item = PickedImage>) {
        self.images
            .extend(picked.into_iter().map(SpotImage::from_picked));
    }

    /// Drop the image with `id`. Returns whether anything was removed.
    pub fn remove_image(&mut self, id: &ImageId) -> bool {
        let before = self.images.len();
        self.images.retain(|image| &image.id != id);
        self.images.len() != before
    }
}
