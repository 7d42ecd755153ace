use serde::{Deserialize, Serialize};

/// Mutable profile fields kept by the identity provider as user metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque id issued by the identity provider.
    pub id: String,
    pub email: String,
    pub profile: Profile,
}

impl User {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.profile.first_name, self.profile.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}
