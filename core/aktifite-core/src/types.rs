//! Core types shared by every Aktifite client.
//!
//! `Sport` and `City` are the single source of truth for labels and glyphs;
//! screens must not keep their own copies of these tables.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AktifiteError;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Mints a fresh ULID-backed identifier.
            pub fn generate() -> Self {
                $name(ulid::Ulid::new().to_string())
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
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }
    };
}

string_id!(
    /// Session-derived user identity (the hosted auth user id).
    UserId
);
string_id!(
    /// Activity identifier, assigned by the activity store on insert.
    ActivityId
);
string_id!(NotificationId);
string_id!(ThreadId);

// ═══════════════════════════════════════════════════════════════════════════════
// Sports & Cities
// ═══════════════════════════════════════════════════════════════════════════════

/// Sport category of an activity. Serialized as its display label, which is
/// also the stored `sport_type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Tenis,
    Basketbol,
    Futbol,
    Voleybol,
    #[serde(rename = "Yüzme")]
    Yuzme,
    #[serde(rename = "Koşu")]
    Kosu,
    Bisiklet,
    Yoga,
    #[serde(rename = "Masa Tenisi")]
    MasaTenisi,
    Badminton,
    Golf,
    Boks,
    Dans,
    Kayak,
}

impl Sport {
    pub const ALL: [Sport; 14] = [
        Sport::Tenis,
        Sport::Basketbol,
        Sport::Futbol,
        Sport::Voleybol,
        Sport::Yuzme,
        Sport::Kosu,
        Sport::Bisiklet,
        Sport::Yoga,
        Sport::MasaTenisi,
        Sport::Badminton,
        Sport::Golf,
        Sport::Boks,
        Sport::Dans,
        Sport::Kayak,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sport::Tenis => "Tenis",
            Sport::Basketbol => "Basketbol",
            Sport::Futbol => "Futbol",
            Sport::Voleybol => "Voleybol",
            Sport::Yuzme => "Yüzme",
            Sport::Kosu => "Koşu",
            Sport::Bisiklet => "Bisiklet",
            Sport::Yoga => "Yoga",
            Sport::MasaTenisi => "Masa Tenisi",
            Sport::Badminton => "Badminton",
            Sport::Golf => "Golf",
            Sport::Boks => "Boks",
            Sport::Dans => "Dans",
            Sport::Kayak => "Kayak",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Sport::Tenis => "🎾",
            Sport::Basketbol => "🏀",
            Sport::Futbol => "⚽",
            Sport::Voleybol => "🏐",
            Sport::Yuzme => "🏊",
            Sport::Kosu => "🏃",
            Sport::Bisiklet => "🚴",
            Sport::Yoga => "🧘",
            Sport::MasaTenisi => "🏓",
            Sport::Badminton => "🏸",
            Sport::Golf => "⛳",
            Sport::Boks => "🥊",
            Sport::Dans => "💃",
            Sport::Kayak => "⛷️",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sport {
    type Err = AktifiteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.label() == value)
            .ok_or_else(|| AktifiteError::UnknownSport(value.to_string()))
    }
}

/// City an activity takes place in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "İstanbul (Avrupa)")]
    IstanbulAvrupa,
    #[serde(rename = "İstanbul (Asya)")]
    IstanbulAsya,
    Ankara,
    #[serde(rename = "İzmir")]
    Izmir,
}

impl City {
    pub const ALL: [City; 4] = [
        City::IstanbulAvrupa,
        City::IstanbulAsya,
        City::Ankara,
        City::Izmir,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            City::IstanbulAvrupa => "İstanbul (Avrupa)",
            City::IstanbulAsya => "İstanbul (Asya)",
            City::Ankara => "Ankara",
            City::Izmir => "İzmir",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for City {
    type Err = AktifiteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        City::ALL
            .into_iter()
            .find(|city| city.label() == value)
            .ok_or_else(|| AktifiteError::UnknownCity(value.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_AVATAR_GLYPH: &str = "👤";

/// Either an emoji glyph or an uploaded image (data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Avatar {
    Glyph { glyph: String },
    Image { data_url: String },
}

impl Default for Avatar {
    fn default() -> Self {
        Avatar::Glyph {
            glyph: DEFAULT_AVATAR_GLYPH.to_string(),
        }
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Avatar::Glyph { glyph } => f.write_str(glyph),
            Avatar::Image { .. } => f.write_str("🖼️"),
        }
    }
}

/// Public face of a user in participant lists, requests and threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub avatar: Avatar,
}

impl UserSummary {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        UserSummary {
            id: id.into(),
            name: name.into(),
            avatar: Avatar::default(),
        }
    }
}

/// The current session subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Avatar,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub favorite_sports: Vec<Sport>,
}

impl UserProfile {
    pub fn new(id: impl Into<UserId>) -> Self {
        UserProfile {
            id: id.into(),
            name: String::new(),
            avatar: Avatar::default(),
            email: String::new(),
            city: None,
            birth_date: None,
            favorite_sports: Vec::new(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_parses_from_label() {
        assert_eq!("Masa Tenisi".parse::<Sport>().unwrap(), Sport::MasaTenisi);
        assert_eq!("Yüzme".parse::<Sport>().unwrap(), Sport::Yuzme);
    }

    #[test]
    fn test_unknown_sport_is_rejected() {
        assert!(matches!(
            "Kriket".parse::<Sport>(),
            Err(AktifiteError::UnknownSport(s)) if s == "Kriket"
        ));
    }

    #[test]
    fn test_sport_serializes_as_label() {
        let json = serde_json::to_string(&Sport::Kosu).unwrap();
        assert_eq!(json, "\"Koşu\"");
    }

    #[test]
    fn test_every_sport_has_distinct_glyph() {
        let mut glyphs: Vec<_> = Sport::ALL.iter().map(|s| s.glyph()).collect();
        glyphs.sort();
        glyphs.dedup();
        assert_eq!(glyphs.len(), Sport::ALL.len());
    }

    #[test]
    fn test_city_label_round_trips_through_from_str() {
        for city in City::ALL {
            assert_eq!(city.label().parse::<City>().unwrap(), city);
        }
    }

    #[test]
    fn test_default_avatar_is_glyph() {
        assert_eq!(Avatar::default().to_string(), DEFAULT_AVATAR_GLYPH);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = ActivityId::from("act-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"act-1\"");
    }
}
