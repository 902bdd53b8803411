use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! content_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }
        }
    };
}

content_id_newtype!(ItemId);
content_id_newtype!(CollectionId);
content_id_newtype!(ScreenId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub Uuid);

impl ClientId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Host,
    Navigator,
    Selector,
    Inspector,
}

impl Role {
    pub fn is_host(self) -> bool {
        matches!(self, Role::Host)
    }
}

/// Who this client is for the lifetime of one session. Built once at
/// startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub client_id: ClientId,
    pub role: Role,
    pub display_name: String,
    pub session_start: DateTime<Utc>,
}

impl ClientIdentity {
    pub fn new(role: Role, display_name: impl Into<String>, session_start: DateTime<Utc>) -> Self {
        Self {
            client_id: ClientId::random(),
            role,
            display_name: display_name.into(),
            session_start,
        }
    }
}
