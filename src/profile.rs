use crate::messages::Notification;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub bio: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            bio: "Content creator and video enthusiast".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Bio,
}

impl ProfileField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "bio" => Some(Self::Bio),
            _ => None,
        }
    }
}

/// Profile editor with an explicit draft
///
/// Edits go to a draft copy while editing is active; `cancel` throws the
/// draft away and `save` commits it after validation.
pub struct ProfileEditor {
    profile: UserProfile,
    draft: Option<UserProfile>,
    email_pattern: Regex,
    save_delay: Duration,
}

impl ProfileEditor {
    pub fn new(profile: UserProfile, save_delay: Duration) -> Result<Self> {
        let email_pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?;
        Ok(Self {
            profile,
            draft: None,
            email_pattern,
            save_delay,
        })
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The values currently on screen (draft while editing)
    pub fn displayed(&self) -> &UserProfile {
        self.draft.as_ref().unwrap_or(&self.profile)
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Flip edit mode, returning the new mode. Leaving edit mode discards the draft.
    pub fn toggle_editing(&mut self) -> bool {
        if self.draft.take().is_none() {
            self.draft = Some(self.profile.clone());
        }
        self.is_editing()
    }

    pub fn set_field(&mut self, field: ProfileField, value: &str) -> Result<()> {
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Profile is not being edited, run `edit` first"))?;

        let value = value.trim().to_string();
        match field {
            ProfileField::Name => draft.name = value,
            ProfileField::Email => draft.email = value,
            ProfileField::Bio => draft.bio = value,
        }
        Ok(())
    }

    fn validate(&self, profile: &UserProfile) -> Result<()> {
        if profile.name.is_empty() {
            return Err(anyhow::anyhow!("Name cannot be empty"));
        }

        if !self.email_pattern.is_match(&profile.email) {
            return Err(anyhow::anyhow!("'{}' is not a valid email", profile.email));
        }

        Ok(())
    }

    /// Commit the draft. The remote call is simulated with a fixed delay.
    pub async fn save(&mut self) -> Result<Notification> {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Nothing to save, run `edit` first"))?;
        self.validate(draft)?;

        tokio::time::sleep(self.save_delay).await;

        if let Some(draft) = self.draft.take() {
            tracing::info!("Profile updated for {}", draft.email);
            self.profile = draft;
        }

        Ok(Notification::new("Success", "Profile updated successfully!"))
    }
}
