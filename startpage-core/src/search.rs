use crate::error::StartPageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchEngine {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub url_template: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

impl SearchEngine {
    /// Build the search URL for `query` by substituting the encoded query for `{query}`.
    pub fn search_url(&self, query: &str) -> Result<Url, StartPageError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StartPageError::Validation(
                "Search query is empty".to_string(),
            ));
        }
        validate_template(&self.url_template)?;

        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let url = self.url_template.replace(QUERY_PLACEHOLDER, &encoded);
        Ok(Url::parse(&url)?)
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

pub const NEW_ENGINE_ICON: &str = "fas fa-search";
pub const NEW_ENGINE_COLOR: &str = "#007DFF";

fn validate_template(template: &str) -> Result<(), StartPageError> {
    if !template.contains(QUERY_PLACEHOLDER) {
        return Err(StartPageError::Validation(format!(
            "URL template must contain the {} placeholder",
            QUERY_PLACEHOLDER
        )));
    }
    Ok(())
}

/// Body of `POST /api/search-engines`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewSearchEngine {
    pub name: String,
    pub display_name: String,
    pub url_template: String,
    pub icon: String,
    pub color: String,
    pub is_active: bool,
    pub is_default: bool,
}

impl NewSearchEngine {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        url_template: impl Into<String>,
    ) -> Self {
        NewSearchEngine {
            name: name.into(),
            display_name: display_name.into(),
            url_template: url_template.into(),
            icon: NEW_ENGINE_ICON.to_string(),
            color: NEW_ENGINE_COLOR.to_string(),
            is_active: true,
            is_default: false,
        }
    }

    pub fn validate(&self) -> Result<(), StartPageError> {
        if self.name.trim().is_empty() || self.display_name.trim().is_empty() {
            return Err(StartPageError::Validation(
                "Engine name and display name are required".to_string(),
            ));
        }
        validate_template(&self.url_template)
    }
}

/// Partial engine update; only `Some` fields are sent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SearchEngineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl SearchEngineUpdate {
    /// The update that makes an engine the default one.
    pub fn make_default() -> Self {
        SearchEngineUpdate {
            is_default: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SearchEngineUpdate::default()
    }

    pub fn validate(&self) -> Result<(), StartPageError> {
        if self.is_empty() {
            return Err(StartPageError::Validation("Nothing to update".to_string()));
        }
        if let Some(template) = &self.url_template {
            validate_template(template)?;
        }
        Ok(())
    }
}

/// Body of `POST /api/search`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub search_engine: String,
}

/// Search URL resolved by the backend, which also records the query in its history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub search_url: String,
    /// Display name of the engine used.
    pub search_engine: String,
    pub query: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchHistoryEntry {
    pub id: i64,
    pub query: String,
    pub search_engine: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The engine flagged as default, else the one with the lowest sort order.
pub fn default_engine(engines: &[SearchEngine]) -> Option<&SearchEngine> {
    engines
        .iter()
        .filter(|e| e.is_active)
        .find(|e| e.is_default)
        .or_else(|| engines.iter().filter(|e| e.is_active).min_by_key(|e| e.sort_order))
}

pub fn find_engine<'a>(engines: &'a [SearchEngine], name: &str) -> Option<&'a SearchEngine> {
    engines
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name) || e.display_name == name)
}

/// Engines used when the backend cannot be reached.
pub fn builtin_engines() -> Vec<SearchEngine> {
    let engine = |id: i64, name: &str, display: &str, template: &str, icon: &str, color: &str| {
        SearchEngine {
            id,
            name: name.to_string(),
            display_name: display.to_string(),
            url_template: template.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            is_active: true,
            is_default: id == 1,
            sort_order: id as i32,
        }
    };

    vec![
        engine(1, "baidu", "百度", "https://www.baidu.com/s?wd={query}", "fas fa-search", "#007DFF"),
        engine(2, "google", "Google", "https://www.google.com/search?q={query}", "fab fa-google", "#EA4335"),
        engine(3, "bing", "必应", "https://www.bing.com/search?q={query}", "fab fa-microsoft", "#00BCF2"),
    ]
}
