use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::api::lenient_string;
use crate::settings::Language;

/// Teacher details as stored by the backend, one block per language.
///
/// `PPR` and the school year exist in both blocks and are kept identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeacherProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fr: FrenchFields,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ar: ArabicFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FrenchFields {
    #[serde(rename = "Nom", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "PPR", default, deserialize_with = "lenient_string")]
    pub ppr: String,
    #[serde(rename = "Année Scolaire", default, deserialize_with = "lenient_string")]
    pub school_year: String,
    #[serde(rename = "Établissement", default, deserialize_with = "lenient_string")]
    pub school: String,
    #[serde(rename = "Niveau", default, deserialize_with = "lenient_string")]
    pub level: String,
    /// Keys this client does not edit; sent back untouched on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArabicFields {
    #[serde(rename = "الأستاذ", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "رقم التأجير", default, deserialize_with = "lenient_string")]
    pub ppr: String,
    #[serde(rename = "السنة الدراسية", default, deserialize_with = "lenient_string")]
    pub school_year: String,
    #[serde(rename = "المؤسسة", default, deserialize_with = "lenient_string")]
    pub school: String,
    #[serde(rename = "المستوى", default, deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An editable profile field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    /// Teacher registration number, shared by both languages.
    Ppr,
    /// Shared by both languages.
    SchoolYear,
    School,
    Level,
}

impl ProfileField {
    /// Fields edited separately in each language block, in display order.
    pub const PER_LANGUAGE: [ProfileField; 3] =
        [ProfileField::Name, ProfileField::School, ProfileField::Level];

    pub const SHARED: [ProfileField; 2] = [ProfileField::Ppr, ProfileField::SchoolYear];

    pub fn is_shared(self) -> bool {
        matches!(self, ProfileField::Ppr | ProfileField::SchoolYear)
    }

    /// Key used by the backend for this field in the given language block.
    pub fn key(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Fr, ProfileField::Name) => "Nom",
            (Language::Fr, ProfileField::Ppr) => "PPR",
            (Language::Fr, ProfileField::SchoolYear) => "Année Scolaire",
            (Language::Fr, ProfileField::School) => "Établissement",
            (Language::Fr, ProfileField::Level) => "Niveau",
            (Language::Ar, ProfileField::Name) => "الأستاذ",
            (Language::Ar, ProfileField::Ppr) => "رقم التأجير",
            (Language::Ar, ProfileField::SchoolYear) => "السنة الدراسية",
            (Language::Ar, ProfileField::School) => "المؤسسة",
            (Language::Ar, ProfileField::Level) => "المستوى",
        }
    }
}

impl TeacherProfile {
    pub fn get(&self, language: Language, field: ProfileField) -> &str {
        match language {
            Language::Fr => match field {
                ProfileField::Name => &self.fr.name,
                ProfileField::Ppr => &self.fr.ppr,
                ProfileField::SchoolYear => &self.fr.school_year,
                ProfileField::School => &self.fr.school,
                ProfileField::Level => &self.fr.level,
            },
            Language::Ar => match field {
                ProfileField::Name => &self.ar.name,
                ProfileField::Ppr => &self.ar.ppr,
                ProfileField::SchoolYear => &self.ar.school_year,
                ProfileField::School => &self.ar.school,
                ProfileField::Level => &self.ar.level,
            },
        }
    }

    /// Update one field. Shared fields are written to both language blocks
    /// whatever `language` is given.
    pub fn set(&mut self, language: Language, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        if field.is_shared() {
            *self.slot_mut(Language::Fr, field) = value.clone();
            *self.slot_mut(Language::Ar, field) = value;
        } else {
            *self.slot_mut(language, field) = value;
        }
    }

    /// Re-align the shared fields after loading data that may disagree.
    /// The French block wins unless it is empty.
    pub fn mirror_shared(&mut self) {
        for field in ProfileField::SHARED {
            let fr = self.get(Language::Fr, field);
            let value = if fr.is_empty() {
                self.get(Language::Ar, field).to_string()
            } else {
                fr.to_string()
            };
            self.set(Language::Fr, field, value);
        }
    }

    /// A profile can be saved once a name is given in at least one language.
    pub fn has_name(&self) -> bool {
        !self.fr.name.trim().is_empty() || !self.ar.name.trim().is_empty()
    }

    fn slot_mut(&mut self, language: Language, field: ProfileField) -> &mut String {
        match language {
            Language::Fr => match field {
                ProfileField::Name => &mut self.fr.name,
                ProfileField::Ppr => &mut self.fr.ppr,
                ProfileField::SchoolYear => &mut self.fr.school_year,
                ProfileField::School => &mut self.fr.school,
                ProfileField::Level => &mut self.fr.level,
            },
            Language::Ar => match field {
                ProfileField::Name => &mut self.ar.name,
                ProfileField::Ppr => &mut self.ar.ppr,
                ProfileField::SchoolYear => &mut self.ar.school_year,
                ProfileField::School => &mut self.ar.school,
                ProfileField::Level => &mut self.ar.level,
            },
        }
    }
}

/// A language block sent as `null` reads as an empty block.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
