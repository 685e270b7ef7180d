//! Types exchanged with the Zoo API.
#![allow(clippy::large_enum_variant)]
use serde::{Deserialize, Serialize};
oas3_client_gen_support::discriminated_enum! {
    /// An animal living in the zoo.
    pub enum Animal {
        discriminator: "type",
        variants: [("cat", Cat(Cat)), ("dog", Dog(Dog))],
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub r#type: String,
    pub lives: i32,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub r#type: String,
    pub bark: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<DogSize>,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DogSize {
    Value1,
    Value2,
    Value3,
}
impl From<DogSize> for i64 {
    fn from(value: DogSize) -> Self {
        match value {
            DogSize::Value1 => 1,
            DogSize::Value2 => 2,
            DogSize::Value3 => 3,
        }
    }
}
impl TryFrom<i64> for DogSize {
    type Error = String;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Value1),
            2 => Ok(Self::Value2),
            3 => Ok(Self::Value3),
            other => Err(format!("unknown DogSize value {other}")),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enclosure {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habitat: Option<EnclosureHabitat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residents: Option<Vec<Animal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour: Option<Waypoint>,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnclosureHabitat {
    #[serde(rename = "savanna")]
    Savanna,
    #[serde(rename = "jungle")]
    Jungle,
    #[serde(rename = "polar")]
    Polar,
}
impl EnclosureHabitat {
    /// Value as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savanna => "savanna",
            Self::Jungle => "jungle",
            Self::Polar => "polar",
        }
    }
}
impl std::fmt::Display for EnclosureHabitat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Stop>,
}
/// Composed from `Waypoint`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<Stop>>,
    pub label: String,
}
