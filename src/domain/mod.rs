//! Domain types for content publishing with strong typing.
//!
//! Every closed vocabulary stored as text in the database (roles, content
//! types, languages, statuses, media types) gets an enum here so that
//! unknown values are rejected at the boundary instead of being carried
//! around as strings.

pub mod policy;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub use policy::{Permissions, can_manage_content, can_manage_roles, has_admin_access, is_admin};

/// Error returned when a stored or submitted value is not part of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a lowercase string-backed enum with `as_str`, `Display`, `FromStr`
/// and serde support.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Flat role held by a user. A user may hold several.
    Role, "role" {
        Admin => "admin",
        Moderator => "moderator",
        ContentCreator => "content_creator",
    }
}

string_enum! {
    ContentType, "content type" {
        Video => "video",
        Image => "image",
        Article => "article",
    }
}

string_enum! {
    Language, "language" {
        En => "en",
        Km => "km",
    }
}

string_enum! {
    /// Publication status. Any transition between statuses is allowed.
    ContentStatus, "status" {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

string_enum! {
    MediaType, "media type" {
        Image => "image",
        Video => "video",
        Other => "other",
    }
}

impl Default for ContentStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl MediaType {
    /// Classifies a MIME type (`image/png`, `video/mp4`, ...).
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Other
        }
    }
}

/// The set of roles a user holds at the moment of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The authenticated user an operation is performed on behalf of.
///
/// Roles are loaded fresh for every request, so a grant or revoke takes
/// effect on the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub roles: RoleSet,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
        }
    }

    #[must_use]
    pub fn permissions(&self) -> Permissions {
        Permissions::for_roles(&self.roles)
    }
}

/// Current time as an RFC 3339 UTC timestamp, the format every table uses.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Returns `None` for missing or whitespace-only form values.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
