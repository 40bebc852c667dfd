use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Success,
    Error,
}

/// Coarse topic tag used by the presentation layer for styling only.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum House {
    Stark,
    Lannister,
    Targaryen,
}

impl House {
    pub fn as_str(self) -> &'static str {
        match self {
            House::Stark => "stark",
            House::Lannister => "lannister",
            House::Targaryen => "targaryen",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            House::Stark => "House Stark Knowledge",
            House::Lannister => "House Lannister Knowledge",
            House::Targaryen => "House Targaryen Knowledge",
        }
    }
}

/// The single answer contract handed back to callers, whichever source produced it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub status: AnswerStatus,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_house: Option<House>,
}

impl AnswerResult {
    pub fn success(text: impl Into<String>, source_house: Option<House>) -> Self {
        Self {
            status: AnswerStatus::Success,
            text: text.into(),
            source_house,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            status: AnswerStatus::Error,
            text: text.into(),
            source_house: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AnswerStatus::Success
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub keyword: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(keyword: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            answer: answer.into(),
        }
    }
}

/// Body layout the upstream knowledge service expects for a question.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestShape {
    /// Gradio predict layout: `{"data": [question]}`.
    #[default]
    Data,
    /// Plain layout: `{"text": question}`.
    Text,
}

impl FromStr for RequestShape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "data" | "gradio" => Ok(RequestShape::Data),
            "text" => Ok(RequestShape::Text),
            other => Err(format!("unknown upstream request shape: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
