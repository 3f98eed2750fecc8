use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Which generated file a download refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Lesson,
    Mindmap,
}

/// Response of `POST /generate_from_id/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub title: String,
    /// Case data produced by the backend. Shown as-is, never interpreted.
    #[serde(default)]
    pub lesson_data: serde_json::Value,
    /// `None` when the backend could not render a PDF.
    #[serde(default)]
    pub pdf_path: Option<String>,
    #[serde(default)]
    pub mindmap_pdf_path: Option<String>,
}

impl GenerationResult {
    pub fn path_for(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::Lesson => self.pdf_path.as_deref(),
            ArtifactKind::Mindmap => self.mindmap_pdf_path.as_deref(),
        }
    }

    /// File name to request from the download endpoint, if that artifact exists.
    pub fn filename_for(&self, kind: ArtifactKind) -> Option<String> {
        self.path_for(kind).and_then(artifact_filename)
    }
}

/// Response of the legacy `POST /generate` upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacyLessonResult {
    pub title: String,
    #[serde(default)]
    pub csv_data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub pdf_path: Option<String>,
}

impl LegacyLessonResult {
    pub fn pdf_filename(&self) -> Option<String> {
        self.pdf_path.as_deref().and_then(artifact_filename)
    }
}

/// Last segment of a backend path, e.g. `/out/a.pdf` -> `a.pdf`.
///
/// Returns `None` for empty segments and for `.`/`..`.
pub fn artifact_filename(path: &str) -> Option<String> {
    let name = path
        .rsplit(&['/', '\\'][..])
        .next()
        .map(str::trim)
        .unwrap_or_default();

    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}

/// Error body shape used by the backend (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Accept strings, numbers and null for text fields. Some backend records
/// store registration numbers and session labels as numbers.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_last_segment() {
        assert_eq!(artifact_filename("/out/a.pdf").as_deref(), Some("a.pdf"));
        assert_eq!(artifact_filename("a.pdf").as_deref(), Some("a.pdf"));
        assert_eq!(
            artifact_filename("C:\\exports\\fiche 3.pdf").as_deref(),
            Some("fiche 3.pdf")
        );
    }

    #[test]
    fn test_filename_absent_for_directories() {
        assert_eq!(artifact_filename(""), None);
        assert_eq!(artifact_filename("/out/"), None);
        assert_eq!(artifact_filename("/out/.."), None);
    }

    #[test]
    fn test_generation_result_without_pdf() {
        let result: GenerationResult =
            serde_json::from_str(r#"{"title":"A","lesson_data":{},"pdf_path":null}"#).unwrap();
        assert_eq!(result.filename_for(ArtifactKind::Lesson), None);
        assert_eq!(result.filename_for(ArtifactKind::Mindmap), None);
    }

    #[test]
    fn test_generation_result_with_mindmap() {
        let result: GenerationResult = serde_json::from_str(
            r#"{"title":"A","lesson_data":{"objectif":"lire"},"pdf_path":"/out/a.pdf","mindmap_pdf_path":"/out/maps/a_map.pdf"}"#,
        )
        .unwrap();
        assert_eq!(result.filename_for(ArtifactKind::Lesson).as_deref(), Some("a.pdf"));
        assert_eq!(
            result.filename_for(ArtifactKind::Mindmap).as_deref(),
            Some("a_map.pdf")
        );
        assert_eq!(result.lesson_data["objectif"], "lire");
    }

    #[test]
    fn test_generation_result_requires_title() {
        let err = serde_json::from_str::<GenerationResult>(r#"{"pdf_path":"/out/a.pdf"}"#);
        assert!(err.is_err());
    }
}
