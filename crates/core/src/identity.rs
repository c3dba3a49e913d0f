//! The signed-in identity and the party it acts as.
//!
//! Login responses and stored blobs are inconsistent: the customer profile
//! may sit under `customer` or be flattened at the top level, and operator
//! accounts likewise under `user` or at the top level. [`Identity::from_value`]
//! accepts all of these and always yields exactly one acting party. The
//! `role` decides which sub-key applies: `customer` reads the customer
//! profile, every other role reads the user profile.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::lenient::{self, id_from_value, scalar_to_string};
use crate::roles;
use crate::types::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: Option<String>,
    #[serde(rename = "customerId", default, deserialize_with = "lenient::id")]
    pub customer_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq)]
enum Party {
    Customer(CustomerProfile),
    Staff(UserProfile),
}

/// Who the session acts as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActingParty<'a> {
    Customer(&'a CustomerProfile),
    Employee(&'a UserProfile),
}

/// Which slice of the data a list screen requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Records belonging to one customer.
    Customer(EntityId),
    /// Records assigned to one employee.
    Employee(EntityId),
    /// Everything (administrators).
    All,
}

/// The logged-in identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    role: String,
    party: Party,
    token: Option<String>,
}

impl Identity {
    pub fn customer(profile: CustomerProfile, token: Option<String>) -> Self {
        Self {
            role: roles::ROLE_CUSTOMER.to_string(),
            party: Party::Customer(profile),
            token,
        }
    }

    pub fn staff(profile: UserProfile, token: Option<String>) -> Self {
        let role = profile
            .role
            .clone()
            .unwrap_or_else(|| roles::ROLE_USER.to_string());
        Self {
            role,
            party: Party::Staff(profile),
            token,
        }
    }

    /// Decode any of the identity shapes the API and older stored blobs use.
    ///
    /// Returns `None` when the value names no usable party.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let token = map
            .get("token")
            .or_else(|| map.get("accessToken"))
            .and_then(scalar_to_string);

        let nested = |key: &str| map.get(key).filter(|v| v.is_object());
        let top_level = || {
            map.get("_id")
                .and_then(id_from_value)
                .map(|_| Value::Object(strip_envelope_keys(map)))
        };

        let role = map
            .get("role")
            .and_then(scalar_to_string)
            .or_else(|| {
                nested("user")
                    .and_then(|u| u.get("role"))
                    .and_then(scalar_to_string)
            })
            .or_else(|| nested("customer").map(|_| roles::ROLE_CUSTOMER.to_string()))?;

        if roles::is_customer(&role) {
            let source = nested("customer").cloned().or_else(top_level)?;
            let profile: CustomerProfile = serde_json::from_value(source).ok()?;
            Some(Self::customer(profile, token))
        } else {
            let source = nested("user").cloned().or_else(top_level)?;
            let mut profile: UserProfile = serde_json::from_value(source).ok()?;
            if profile.role.is_none() {
                profile.role = Some(role.clone());
            }
            Some(Self {
                role,
                party: Party::Staff(profile),
                token,
            })
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn acting_party(&self) -> ActingParty<'_> {
        match &self.party {
            Party::Customer(c) => ActingParty::Customer(c),
            Party::Staff(u) => ActingParty::Employee(u),
        }
    }

    pub fn is_customer(&self) -> bool {
        matches!(self.party, Party::Customer(_))
    }

    pub fn is_admin(&self) -> bool {
        roles::is_admin(&self.role)
    }

    pub fn customer_profile(&self) -> Option<&CustomerProfile> {
        match &self.party {
            Party::Customer(c) => Some(c),
            Party::Staff(_) => None,
        }
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        match &self.party {
            Party::Staff(u) => Some(u),
            Party::Customer(_) => None,
        }
    }

    pub fn customer_profile_mut(&mut self) -> Option<&mut CustomerProfile> {
        match &mut self.party {
            Party::Customer(c) => Some(c),
            Party::Staff(_) => None,
        }
    }

    pub fn user_profile_mut(&mut self) -> Option<&mut UserProfile> {
        match &mut self.party {
            Party::Staff(u) => Some(u),
            Party::Customer(_) => None,
        }
    }

    /// Id of the acting party.
    pub fn party_id(&self) -> Option<&str> {
        match &self.party {
            Party::Customer(c) => c.id.as_deref(),
            Party::Staff(u) => u.id.as_deref(),
        }
    }

    /// Name shown in the header and used in export file names.
    pub fn display_name(&self) -> &str {
        let name = match &self.party {
            Party::Customer(c) => c.name.as_deref().or(c.email.as_deref()),
            Party::Staff(u) => u.name.as_deref().or(u.email.as_deref()),
        };
        name.unwrap_or("user")
    }

    /// The data slice list screens fetch for this identity.
    pub fn scope(&self) -> Scope {
        match &self.party {
            Party::Customer(c) => c.id.clone().map_or(Scope::All, Scope::Customer),
            Party::Staff(_) if self.is_admin() => Scope::All,
            Party::Staff(u) => u.id.clone().map_or(Scope::All, Scope::Employee),
        }
    }
}

/// Top-level profile fields without the keys that describe the envelope.
fn strip_envelope_keys(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !matches!(k.as_str(), "token" | "accessToken" | "customer" | "user"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[derive(Serialize)]
struct IdentityRecord<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer: Option<&'a CustomerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IdentityRecord {
            role: &self.role,
            customer: self.customer_profile(),
            user: self.user_profile(),
            token: self.token(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("identity names no customer or user"))
    }
}
