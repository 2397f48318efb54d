//! Token records and their loosely typed input form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an editor should present a token's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Color,
    Text,
    Number,
    Textarea,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Color,
    #[default]
    Text,
    Number,
    Spacing,
    Font,
    Shadow,
    Gradient,
    Border,
    Dimension,
    Transition,
}

impl TokenType {
    pub const ALL: [TokenType; 10] = [
        TokenType::Color,
        TokenType::Text,
        TokenType::Number,
        TokenType::Spacing,
        TokenType::Font,
        TokenType::Shadow,
        TokenType::Gradient,
        TokenType::Border,
        TokenType::Dimension,
        TokenType::Transition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Text => "text",
            TokenType::Number => "number",
            TokenType::Spacing => "spacing",
            TokenType::Font => "font",
            TokenType::Shadow => "shadow",
            TokenType::Gradient => "gradient",
            TokenType::Border => "border",
            TokenType::Dimension => "dimension",
            TokenType::Transition => "transition",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TokenType::Color => "Color",
            TokenType::Text => "Text",
            TokenType::Number => "Number",
            TokenType::Spacing => "Spacing",
            TokenType::Font => "Font",
            TokenType::Shadow => "Shadow",
            TokenType::Gradient => "Gradient",
            TokenType::Border => "Border",
            TokenType::Dimension => "Dimension",
            TokenType::Transition => "Transition",
        }
    }

    pub fn input(&self) -> InputKind {
        match self {
            TokenType::Color => InputKind::Color,
            TokenType::Number => InputKind::Number,
            TokenType::Shadow | TokenType::Gradient | TokenType::Transition => InputKind::Textarea,
            _ => InputKind::Text,
        }
    }

    /// Textarea types keep internal line breaks in their values.
    pub fn is_multiline(&self) -> bool {
        self.input() == InputKind::Textarea
    }

    /// Parse a catalog name; anything unknown degrades to `Text`.
    pub fn parse(name: &str) -> TokenType {
        let name = name.trim().to_ascii_lowercase();
        TokenType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    #[default]
    Draft,
    Ready,
    Deprecated,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Draft => "draft",
            TokenStatus::Ready => "ready",
            TokenStatus::Deprecated => "deprecated",
        }
    }

    /// Parse a status; anything unknown is `Draft`.
    pub fn parse(name: &str) -> TokenStatus {
        match name.trim().to_ascii_lowercase().as_str() {
            "ready" => TokenStatus::Ready,
            "deprecated" => TokenStatus::Deprecated,
            _ => TokenStatus::Draft,
        }
    }
}

/// A normalized design token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub description: String,
    pub group: String,
    pub context: String,
    pub status: TokenStatus,
    /// External user id, `0` when unassigned.
    pub owner: u64,
    pub version: String,
    pub changelog: String,
    pub linked_components: Vec<String>,
}

/// Token as submitted by a caller or read back from storage, before
/// normalization. Every field is optional and loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawToken {
    pub name: Option<String>,
    pub value: Option<Value>,
    #[serde(rename = "type")]
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    pub context: Option<String>,
    pub status: Option<String>,
    pub owner: Option<Value>,
    pub version: Option<String>,
    pub changelog: Option<String>,
    #[serde(alias = "linkedComponents")]
    pub linked_components: Option<Value>,
}

impl RawToken {
    /// Minimal raw token with just a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(Value::String(value.into())),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Overlay a metadata patch; fields absent from the patch are kept.
    pub fn apply_patch(&mut self, patch: &MetadataPatch) {
        if let Some(status) = &patch.status {
            self.status = Some(status.clone());
        }
        if let Some(owner) = &patch.owner {
            self.owner = Some(owner.clone());
        }
        if let Some(version) = &patch.version {
            self.version = Some(version.clone());
        }
        if let Some(changelog) = &patch.changelog {
            self.changelog = Some(changelog.clone());
        }
        if let Some(linked) = &patch.linked_components {
            self.linked_components = Some(linked.clone());
        }
    }
}

impl From<&Token> for RawToken {
    fn from(token: &Token) -> Self {
        Self {
            name: Some(token.name.clone()),
            value: Some(Value::String(token.value.clone())),
            token_type: Some(token.token_type.as_str().to_string()),
            description: Some(token.description.clone()),
            group: Some(token.group.clone()),
            context: Some(token.context.clone()),
            status: Some(token.status.as_str().to_string()),
            owner: Some(Value::from(token.owner)),
            version: Some(token.version.clone()),
            changelog: Some(token.changelog.clone()),
            linked_components: Some(Value::from(token.linked_components.clone())),
        }
    }
}

/// Governance fields that can be edited without touching a token's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataPatch {
    pub status: Option<String>,
    pub owner: Option<Value>,
    pub version: Option<String>,
    pub changelog: Option<String>,
    #[serde(alias = "linkedComponents")]
    pub linked_components: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_is_text() {
        assert_eq!(TokenType::parse("Color"), TokenType::Color);
        assert_eq!(TokenType::parse(" shadow "), TokenType::Shadow);
        assert_eq!(TokenType::parse("sparkle"), TokenType::Text);
        assert_eq!(TokenType::parse(""), TokenType::Text);
    }

    #[test]
    fn textarea_types() {
        let multiline: Vec<_> = TokenType::ALL
            .into_iter()
            .filter(TokenType::is_multiline)
            .collect();
        assert_eq!(
            multiline,
            vec![TokenType::Shadow, TokenType::Gradient, TokenType::Transition]
        );
    }

    #[test]
    fn unknown_status_is_draft() {
        assert_eq!(TokenStatus::parse("READY"), TokenStatus::Ready);
        assert_eq!(TokenStatus::parse("deprecated"), TokenStatus::Deprecated);
        assert_eq!(TokenStatus::parse("archived"), TokenStatus::Draft);
    }

    #[test]
    fn token_serializes_type_field() {
        let token = Token {
            name: "--a".into(),
            value: "1".into(),
            token_type: TokenType::Number,
            description: String::new(),
            group: "General".into(),
            context: ":root".into(),
            status: TokenStatus::Ready,
            owner: 3,
            version: "1.0.0".into(),
            changelog: String::new(),
            linked_components: vec!["button".into()],
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["status"], "ready");
        assert_eq!(json["linked_components"][0], "button");
    }

    #[test]
    fn raw_token_accepts_loose_json() {
        let raw: RawToken = serde_json::from_str(
            r#"{"name":"--a","value":4,"owner":"7","linkedComponents":"card, button"}"#,
        )
        .unwrap();
        assert_eq!(raw.value, Some(Value::from(4)));
        assert_eq!(raw.owner, Some(Value::from("7")));
        assert!(raw.linked_components.is_some());
        assert!(raw.context.is_none());
    }

    #[test]
    fn patch_overlays_only_present_fields() {
        let mut raw = RawToken::new("--a", "1");
        raw.version = Some("1.0.0".into());
        raw.apply_patch(&MetadataPatch {
            status: Some("ready".into()),
            ..MetadataPatch::default()
        });
        assert_eq!(raw.status.as_deref(), Some("ready"));
        assert_eq!(raw.version.as_deref(), Some("1.0.0"));
    }
}
