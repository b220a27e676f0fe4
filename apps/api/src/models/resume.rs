//! Structured résumé record as returned by the analysis service.
//!
//! Deserialization is forgiving: a malformed list field becomes an
//! empty list, malformed list elements are dropped one by one, and scalar
//! fields accept numbers or `null`. The layout engine never sees a half-parsed
//! record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

const PLACEHOLDER_NAME: &str = "Resume";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    /// Single display line, e.g. "555-0100 | jane@example.com | github.com/jane".
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_info: String,
    /// Carried with the record but not laid out.
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(rename = "skills", alias = "skillGroups", default, deserialize_with = "lenient_list")]
    pub skill_groups: Vec<SkillGroup>,
    #[serde(
        rename = "experience",
        alias = "experienceEntries",
        default,
        deserialize_with = "lenient_list"
    )]
    pub experience: Vec<ExperienceEntry>,
    #[serde(
        rename = "projects",
        alias = "projectEntries",
        default,
        deserialize_with = "lenient_list"
    )]
    pub projects: Vec<ProjectEntry>,
    #[serde(
        rename = "education",
        alias = "educationEntries",
        default,
        deserialize_with = "lenient_list"
    )]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub certifications: Vec<Certification>,
}

impl ResumeDocument {
    /// Stand-in record used when the analysis service returned pre-rendered
    /// markup instead of structured data.
    pub fn placeholder() -> Self {
        Self {
            full_name: PLACEHOLDER_NAME.to_string(),
            summary: "AI-optimized resume".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Comma-separated display string; an array of strings is joined on input.
    #[serde(default, deserialize_with = "string_or_list")]
    pub items: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(alias = "bullets", default, deserialize_with = "lenient_list")]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub technologies: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(alias = "bullets", default, deserialize_with = "lenient_list")]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub school: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub date: Option<String>,
}

/// Envelope produced by the analysis service for one résumé + job description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub original_score: f64,
    #[serde(default)]
    pub optimized_score: f64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords_found: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords_missing: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub improvements_made: Vec<String>,
    #[serde(default)]
    pub rewritten_resume: Option<ResumeDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_b64: Option<String>,
}

impl AnalysisResult {
    /// Takes a non-blank `pdfB64` out of the envelope.
    pub fn take_supplied_pdf(&mut self) -> Option<String> {
        self.pdf_b64.take().filter(|s| !s.trim().is_empty())
    }

    /// Name the download is saved under, before underscoring.
    pub fn document_name(&self) -> &str {
        match &self.rewritten_resume {
            Some(doc) => &doc.full_name,
            None => PLACEHOLDER_NAME,
        }
    }

    /// The record to lay out: the structured résumé, or a placeholder when the
    /// service only sent markup.
    pub fn into_document(self) -> ResumeDocument {
        match self.rewritten_resume {
            Some(doc) => doc,
            None => {
                if self.html_resume.is_some() {
                    warn!("analysis result carries markup only, rendering placeholder record");
                }
                ResumeDocument::placeholder()
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
// ────────────────────────────────────────────────────────────────────────────

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => {
            warn!(value = %other, "expected a string field, using empty string");
            String::new()
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(scalar_to_string).unwrap_or_default())
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.trim().is_empty() { None } else { Some(s) })
}

fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => scalar_to_string(other),
        None => String::new(),
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(error = %e, "dropping malformed list element");
                    None
                }
            })
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            warn!(value = %other, "expected a list, treating as empty");
            Vec::new()
        }
    })
}
