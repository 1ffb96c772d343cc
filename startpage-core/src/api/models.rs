use crate::error::StartPageError;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const DEFAULT_LINK_GLYPH: &str = "fas fa-globe";
pub const NEW_LINK_ICON: &str = "fas fa-link";
pub const NEW_LINK_COLOR: &str = "#007DFF";
pub const NEW_LINK_CATEGORY: &str = "其他";

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_URL_LENGTH: usize = 500;

/// Sentinel the backend and the UI use for "no category filter".
pub const ALL_CATEGORIES: &str = "all";

fn default_glyph() -> String {
    DEFAULT_LINK_GLYPH.to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default = "default_glyph")]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl LinkRecord {
    pub fn new(id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        LinkRecord {
            id,
            name: name.into(),
            url: url.into(),
            icon: default_glyph(),
            color: NEW_LINK_COLOR.to_string(),
            category: None,
            is_active: true,
            created_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The link color as RGB, if it is a well-formed `#RRGGBB` string.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(&self.color)
    }

    /// Host part of the link URL, used for favicon lookups and labels.
    pub fn domain(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    pub fn has_custom_icon(&self) -> bool {
        !self.icon.is_empty() && self.icon != DEFAULT_LINK_GLYPH
    }
}

pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    if !hex_color_regex().is_match(color) {
        return None;
    }
    let r = u8::from_str_radix(&color[1..3], 16).ok()?;
    let g = u8::from_str_radix(&color[3..5], 16).ok()?;
    let b = u8::from_str_radix(&color[5..7], 16).ok()?;
    Some((r, g, b))
}

fn hex_color_regex() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color pattern"))
}

/// Category selection for link queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(trimmed.to_string())
        }
    }

    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or_default()
    }

    /// Query value for the backend, `None` when no filtering applies.
    pub fn query_value(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Named(name) => Some(name),
        }
    }

    pub fn matches(&self, link: &LinkRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => link.category.as_deref() == Some(name.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Tabs shown above the grid: `All` first, then each distinct category once.
pub fn category_tabs(categories: &[String]) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(
            categories
                .iter()
                .map(|c| CategoryFilter::parse(c))
                .filter(|c| *c != CategoryFilter::All)
                .unique(),
        )
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub color: String,
    pub category: String,
}

impl NewLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        NewLink {
            name: name.into(),
            url: url.into(),
            icon: NEW_LINK_ICON.to_string(),
            color: NEW_LINK_COLOR.to_string(),
            category: NEW_LINK_CATEGORY.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), StartPageError> {
        validate_name(&self.name)?;
        validate_url(&self.url)?;
        validate_color(&self.color)
    }
}

/// Partial update; only `Some` fields are sent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.icon.is_none()
            && self.color.is_none()
            && self.category.is_none()
    }

    pub fn validate(&self) -> Result<(), StartPageError> {
        if self.is_empty() {
            return Err(StartPageError::Validation("Nothing to update".to_string()));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), StartPageError> {
    if name.trim().is_empty() {
        return Err(StartPageError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(StartPageError::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_url(url: &str) -> Result<(), StartPageError> {
    if url.trim().is_empty() {
        return Err(StartPageError::Validation("URL is required".to_string()));
    }
    if url.chars().count() > MAX_URL_LENGTH {
        return Err(StartPageError::Validation(format!(
            "URL must be at most {} characters",
            MAX_URL_LENGTH
        )));
    }
    url::Url::parse(url)?;
    Ok(())
}

fn validate_color(color: &str) -> Result<(), StartPageError> {
    if parse_hex_color(color).is_none() {
        return Err(StartPageError::Validation(format!(
            "Color '{}' is not a #RRGGBB value",
            color
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_record_defaults_from_backend_json() {
        let json = r##"{"id": 7, "name": "Docs", "url": "https://docs.rs/", "color": "#112233",
                       "category": "dev", "created_at": "2024-05-01T10:00:00"}"##;
        let link: LinkRecord = serde_json::from_str(json).unwrap();

        assert_eq!(link.icon, DEFAULT_LINK_GLYPH);
        assert!(link.is_active);
        assert_eq!(link.category.as_deref(), Some("dev"));
        assert_eq!(link.rgb(), Some((0x11, 0x22, 0x33)));
        assert_eq!(link.domain().as_deref(), Some("docs.rs"));
        assert!(!link.has_custom_icon());
    }

    #[test]
    fn test_category_filter_sentinel() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_option(None), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("news"),
            CategoryFilter::Named("news".to_string())
        );
        assert_eq!(CategoryFilter::All.query_value(), None);
    }

    #[test]
    fn test_category_tabs_prepend_all_and_dedup() {
        let categories = vec![
            "work".to_string(),
            "all".to_string(),
            "fun".to_string(),
            "work".to_string(),
        ];
        let tabs = category_tabs(&categories);
        assert_eq!(
            tabs,
            vec![
                CategoryFilter::All,
                CategoryFilter::Named("work".to_string()),
                CategoryFilter::Named("fun".to_string()),
            ]
        );
    }

    #[test]
    fn test_new_link_validation() {
        assert!(NewLink::new("Rust", "https://www.rust-lang.org").validate().is_ok());
        assert!(NewLink::new("", "https://www.rust-lang.org").validate().is_err());
        assert!(NewLink::new("Rust", "not a url").validate().is_err());
        assert!(NewLink::new("x".repeat(51), "https://a.io").validate().is_err());

        let mut bad_color = NewLink::new("Rust", "https://www.rust-lang.org");
        bad_color.color = "red".to_string();
        assert!(matches!(
            bad_color.validate(),
            Err(StartPageError::Validation(_))
        ));
    }

    #[test]
    fn test_link_update_serializes_only_set_fields() {
        let update = LinkUpdate {
            name: Some("New".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"name":"New"}"#);
        assert!(LinkUpdate::default().validate().is_err());
    }
}
