pub mod post;

use bson::Bson;
use bson::oid::ObjectId;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error, Unexpected},
};
use std::{fmt::Display, marker::PhantomData, str::FromStr};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error("A post title is required and must be non-empty.")]
    MissingTitle,
    #[error("Post content is required and must be non-empty.")]
    MissingContent,
}

/// Store-assigned identifier, phantom-typed per entity kind.
///
/// Serializes as the 24-character hex form of the underlying object id in both
/// JSON and BSON, so the wire and store representations never diverge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Id<Marker>(ObjectId, PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(object_id: ObjectId) -> Self {
        Self(object_id, PhantomData)
    }

    #[must_use]
    pub fn generate() -> Self {
        Self::new(ObjectId::new())
    }

    #[must_use]
    pub fn object_id(self) -> ObjectId {
        self.0
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        self.0.to_hex()
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<ObjectId> for Id<Marker> {
    fn from(value: ObjectId) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for ObjectId {
    fn from(value: Id<Marker>) -> Self {
        value.0
    }
}

impl<Marker> From<Id<Marker>> for Bson {
    fn from(value: Id<Marker>) -> Self {
        Bson::String(value.to_hex())
    }
}

impl<Marker> FromStr for Id<Marker> {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self::new)
    }
}

impl<Marker> Serialize for Id<Marker> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de, Marker> Deserialize<'de> for Id<Marker> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex).map(Self::new).map_err(|_| {
            D::Error::invalid_value(Unexpected::Str(&hex), &"a 24-character hex object id")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Id;
    use crate::model::post::PostMarker;

    #[test]
    fn id_serializes_as_hex_string() {
        let id: Id<PostMarker> = "65b0f1e2a4c8d9b3e5f6a7b8".parse().unwrap();

        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"65b0f1e2a4c8d9b3e5f6a7b8\""
        );
        assert_eq!(id.to_hex(), "65b0f1e2a4c8d9b3e5f6a7b8");
    }

    #[test]
    fn id_deserializes_from_hex_string() {
        let id: Id<PostMarker> =
            serde_json::from_str("\"65b0f1e2a4c8d9b3e5f6a7b8\"").unwrap();

        assert_eq!(id.to_hex(), "65b0f1e2a4c8d9b3e5f6a7b8");
    }

    #[test]
    fn id_rejects_invalid_input() {
        let illegal_inputs = [
            "\"\"",
            "\"not-hex\"",
            "\"65b0f1e2\"",
            "\"65b0f1e2a4c8d9b3e5f6a7b8ff\"",
            "42",
        ];

        for illegal_input in illegal_inputs {
            assert!(serde_json::from_str::<Id<PostMarker>>(illegal_input).is_err());
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        let first = Id::<PostMarker>::generate();
        let second = Id::<PostMarker>::generate();

        assert_ne!(first, second);
    }
}
