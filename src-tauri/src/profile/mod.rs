//! Teacher profile: bilingual form data persisted by the backend.

mod types;

pub use types::{ArabicFields, FrenchFields, ProfileField, TeacherProfile};

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{info, warn};

use crate::api::BackendClient;
use crate::error::{LessonKitError, Result};
use crate::settings::Language;

/// Result of an explicit save, reported back to the form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    /// Both names are blank; nothing was sent.
    MissingName,
    /// The backend answered with a non-success status.
    Rejected { status: u16 },
    /// The backend could not be reached or its answer was unreadable.
    Failed { reason: String },
}

impl SaveOutcome {
    /// Translation key of the message shown next to the form.
    pub fn message_key(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => "profileSaved",
            SaveOutcome::MissingName => "fillNameError",
            SaveOutcome::Rejected { .. } => "failedSave",
            SaveOutcome::Failed { .. } => "errorSaving",
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Fetch the stored profile. Any failure is logged and yields empty fields.
pub async fn load_profile(client: &BackendClient) -> TeacherProfile {
    match client.fetch_teacher_profile().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Failed to load teacher profile: {}", e);
            TeacherProfile::default()
        }
    }
}

/// Validate and persist the whole profile.
pub async fn save_profile(client: &BackendClient, profile: &TeacherProfile) -> SaveOutcome {
    if !profile.has_name() {
        info!("Refusing to save a profile without a name");
        return SaveOutcome::MissingName;
    }

    match client.save_teacher_profile(profile).await {
        Ok(()) => SaveOutcome::Saved,
        Err(LessonKitError::Status { status, message }) => {
            warn!("Profile save rejected ({}): {}", status, message);
            SaveOutcome::Rejected { status }
        }
        Err(e) => {
            warn!("Profile save failed: {}", e);
            SaveOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// The profile form being edited, kept between page visits until reloaded.
pub struct ProfileSession {
    draft: Mutex<TeacherProfile>,
    client: BackendClient,
}

impl ProfileSession {
    pub fn new(client: BackendClient) -> Self {
        Self {
            draft: Mutex::new(TeacherProfile::default()),
            client,
        }
    }

    /// Replace the draft with the stored profile.
    pub async fn load(&self) -> Result<TeacherProfile> {
        let profile = load_profile(&self.client).await;
        *self.lock()? = profile.clone();
        Ok(profile)
    }

    pub fn draft(&self) -> Result<TeacherProfile> {
        Ok(self.lock()?.clone())
    }

    /// Edit one field of the draft; shared fields update both languages.
    pub fn update(
        &self,
        language: Language,
        field: ProfileField,
        value: String,
    ) -> Result<TeacherProfile> {
        let mut draft = self.lock()?;
        draft.set(language, field, value);
        Ok(draft.clone())
    }

    /// Persist the draft. The draft is kept whatever the outcome.
    pub async fn save(&self) -> Result<SaveOutcome> {
        let profile = self.draft()?;
        Ok(save_profile(&self.client, &profile).await)
    }

    fn lock(&self) -> Result<MutexGuard<'_, TeacherProfile>> {
        self.draft
            .lock()
            .map_err(|_| LessonKitError::State("profile lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn test_message_keys() {
        assert_eq!(SaveOutcome::Saved.message_key(), "profileSaved");
        assert_eq!(SaveOutcome::MissingName.message_key(), "fillNameError");
        assert_eq!(SaveOutcome::Rejected { status: 500 }.message_key(), "failedSave");
        assert_eq!(
            SaveOutcome::Failed { reason: "down".into() }.message_key(),
            "errorSaving"
        );
    }

    #[tokio::test]
    async fn test_save_without_name_sends_nothing() {
        // Port 9 (discard) is never contacted: validation runs first.
        let client = BackendClient::new(BackendConfig::parse("http://127.0.0.1:9").unwrap());
        let mut profile = TeacherProfile::default();
        profile.set(Language::Fr, ProfileField::Ppr, "123");

        assert_eq!(save_profile(&client, &profile).await, SaveOutcome::MissingName);
    }

    #[tokio::test]
    async fn test_session_keeps_draft_after_rejected_save() {
        let session = ProfileSession::new(BackendClient::new(
            BackendConfig::parse("http://127.0.0.1:9").unwrap(),
        ));
        let draft = session
            .update(Language::Ar, ProfileField::SchoolYear, "2024/2025".into())
            .unwrap();
        assert_eq!(draft.fr.school_year, "2024/2025");

        assert_eq!(session.save().await.unwrap(), SaveOutcome::MissingName);
        assert_eq!(session.draft().unwrap(), draft);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let value = serde_json::to_value(SaveOutcome::Rejected { status: 503 }).unwrap();
        assert_eq!(value["outcome"], "rejected");
        assert_eq!(value["status"], 503);
    }
}
