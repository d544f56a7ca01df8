//! Structural validation of presentation documents.
//!
//! The walker checks a raw `serde_json::Value` against the presentation shape
//! and collects every violation with its JSON path before anything is decoded.
//! Inconsistencies the viewer can live with (stale slide count, odd ids,
//! unknown content types) are reported as warnings instead.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::{ContentType, Presentation};

const BACKGROUND_KINDS: &[&str] = &["image", "gradient"];
const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const BUTTON_VARIANTS: &[&str] = &["primary", "outline"];

/// A successfully decoded document plus the non-fatal findings.
#[derive(Debug, Clone)]
pub struct Validated {
    pub presentation: Presentation,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{}", format_issues(.0))]
    Schema(Vec<SchemaIssue>),

    #[error("failed to decode presentation: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ValidationError {
    pub fn issues(&self) -> &[SchemaIssue] {
        match self {
            Self::Schema(issues) => issues,
            _ => &[],
        }
    }
}

fn format_issues(issues: &[SchemaIssue]) -> String {
    let mut out = format!("{} schema violation(s)", issues.len());
    for issue in issues {
        out.push_str("\n  ");
        out.push_str(&issue.to_string());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub path: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingField,
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    InvalidEnum {
        value: String,
        expected: &'static [&'static str],
    },
    InvalidGradient {
        source: String,
    },
    /// More than one spelling of the same field.
    ConflictingKeys {
        keys: Vec<String>,
    },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::MissingField => write!(f, "{}: missing required field", self.path),
            IssueKind::TypeMismatch { expected, found } => {
                write!(f, "{}: expected {expected}, found {found}", self.path)
            }
            IssueKind::InvalidEnum { value, expected } => write!(
                f,
                "{}: invalid value {value:?}, expected one of {}",
                self.path,
                expected.join(", ")
            ),
            IssueKind::InvalidGradient { source } => write!(
                f,
                "{}: gradient background needs a linear-gradient(...) or radial-gradient(...) source, found {source:?}",
                self.path
            ),
            IssueKind::ConflictingKeys { keys } => write!(
                f,
                "{}: only one of {} may be given",
                self.path,
                keys.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    SlideCountMismatch { declared: u64, actual: usize },
    DuplicateId { id: u64, path: String },
    IdNotPosition { id: u64, position: usize },
    UnknownContentType { path: String, value: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlideCountMismatch { declared, actual } => write!(
                f,
                "presentation.totalSlides is {declared} but the deck has {actual} slide(s)"
            ),
            Self::DuplicateId { id, path } => write!(f, "{path}: duplicate slide id {id}"),
            Self::IdNotPosition { id, position } => {
                write!(f, "slide {position} has id {id}; ids are expected to match positions")
            }
            Self::UnknownContentType { path, value } => {
                write!(f, "{path}: unknown content type {value:?}, slide will render empty")
            }
        }
    }
}

/// Parse and validate a JSON document.
pub fn validate_str(text: &str) -> Result<Validated, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ValidationError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    validate_value(&value)
}

/// Validate an already-parsed JSON document.
pub fn validate_value(value: &Value) -> Result<Validated, ValidationError> {
    let mut walker = Walker::default();
    walker.presentation(value);

    if !walker.issues.is_empty() {
        return Err(ValidationError::Schema(walker.issues));
    }

    let presentation: Presentation = serde_json::from_value(value.clone())?;
    Ok(Validated {
        presentation,
        warnings: walker.warnings,
    })
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Default)]
struct Walker {
    issues: Vec<SchemaIssue>,
    warnings: Vec<ValidationWarning>,
}

impl Walker {
    fn push(&mut self, path: String, kind: IssueKind) {
        self.issues.push(SchemaIssue { path, kind });
    }

    fn mismatch(&mut self, path: String, expected: &'static str, value: &Value) {
        self.push(
            path,
            IssueKind::TypeMismatch {
                expected,
                found: type_name(value),
            },
        );
    }

    /// Look up a required key, trying aliases in order. Giving two
    /// spellings at once is an issue.
    fn required<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        path: &str,
        keys: &[&str],
    ) -> Option<&'a Value> {
        let present: Vec<String> = keys
            .iter()
            .filter(|k| obj.contains_key(**k))
            .map(|k| k.to_string())
            .collect();
        if present.len() > 1 {
            self.push(
                join(path, keys[0]),
                IssueKind::ConflictingKeys { keys: present },
            );
            return None;
        }
        match keys.iter().find_map(|k| obj.get(*k)) {
            Some(v) => Some(v),
            None => {
                self.push(join(path, keys[0]), IssueKind::MissingField);
                None
            }
        }
    }

    /// Look up an optional key. `null` counts as absent.
    fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
        obj.get(key).filter(|v| !v.is_null())
    }

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.mismatch(path.to_string(), "object", other);
                None
            }
        }
    }

    fn array<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.mismatch(path.to_string(), "array", other);
                None
            }
        }
    }

    fn string<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a str> {
        match value {
            Value::String(s) => Some(s),
            other => {
                self.mismatch(path.to_string(), "string", other);
                None
            }
        }
    }

    fn boolean(&mut self, value: &Value, path: &str) {
        if !value.is_boolean() {
            self.mismatch(path.to_string(), "boolean", value);
        }
    }

    fn unsigned(&mut self, value: &Value, path: &str, max: u64) -> Option<u64> {
        match value.as_u64() {
            Some(n) if n <= max => Some(n),
            _ => {
                self.mismatch(path.to_string(), "non-negative integer", value);
                None
            }
        }
    }

    fn enumeration<'a>(
        &mut self,
        value: &'a Value,
        path: &str,
        allowed: &'static [&'static str],
    ) -> Option<&'a str> {
        let s = self.string(value, path)?;
        if allowed.contains(&s) {
            Some(s)
        } else {
            self.push(
                path.to_string(),
                IssueKind::InvalidEnum {
                    value: s.to_string(),
                    expected: allowed,
                },
            );
            None
        }
    }

    fn required_string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) {
        if let Some(v) = self.required(obj, path, &[key]) {
            self.string(v, &join(path, key));
        }
    }

    fn optional_string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) {
        if let Some(v) = Self::optional(obj, key) {
            self.string(v, &join(path, key));
        }
    }

    fn string_array(&mut self, value: &Value, path: &str) {
        if let Some(items) = self.array(value, path) {
            for (i, item) in items.iter().enumerate() {
                self.string(item, &index(path, i));
            }
        }
    }

    /// An object whose listed fields are all required strings.
    fn string_record(&mut self, value: &Value, path: &str, fields: &[&str]) {
        if let Some(obj) = self.object(value, path) {
            for field in fields {
                self.required_string(obj, path, field);
            }
        }
    }

    fn record_array(&mut self, value: &Value, path: &str, fields: &[&str]) {
        if let Some(items) = self.array(value, path) {
            for (i, item) in items.iter().enumerate() {
                self.string_record(item, &index(path, i), fields);
            }
        }
    }

    fn presentation(&mut self, root: &Value) {
        let Some(obj) = self.object(root, "$") else {
            return;
        };

        let mut declared = None;
        if let Some(meta) = self.required(obj, "", &["presentation", "metadata"]) {
            if let Some(meta) = self.object(meta, "presentation") {
                self.required_string(meta, "presentation", "title");
                self.required_string(meta, "presentation", "subtitle");
                if let Some(v) =
                    self.required(meta, "presentation", &["totalSlides", "totalSlideCount"])
                {
                    declared = self.unsigned(v, "presentation.totalSlides", u64::MAX);
                }
            }
        }

        let Some(slides) = self.required(obj, "", &["slides"]) else {
            return;
        };
        let Some(slides) = self.array(slides, "slides") else {
            return;
        };

        let mut seen = HashSet::new();
        for (i, slide) in slides.iter().enumerate() {
            let path = index("slides", i);
            if let Some(id) = self.slide(slide, &path) {
                if !seen.insert(id) {
                    self.warnings.push(ValidationWarning::DuplicateId {
                        id,
                        path: join(&path, "id"),
                    });
                }
                if id != i as u64 + 1 {
                    self.warnings.push(ValidationWarning::IdNotPosition {
                        id,
                        position: i + 1,
                    });
                }
            }
        }

        if let Some(declared) = declared {
            if declared != slides.len() as u64 {
                self.warnings.push(ValidationWarning::SlideCountMismatch {
                    declared,
                    actual: slides.len(),
                });
            }
        }
    }

    /// Returns the slide id when it is well-formed.
    fn slide(&mut self, value: &Value, path: &str) -> Option<u64> {
        let obj = self.object(value, path)?;

        let id = self
            .required(obj, path, &["id"])
            .and_then(|v| self.unsigned(v, &join(path, "id"), u32::MAX as u64));

        if let Some(v) = self.required(obj, path, &["type", "contentType"]) {
            let type_path = join(path, "type");
            if let Some(tag) = self.string(v, &type_path) {
                if !ContentType::from(tag.to_string()).is_known() {
                    self.warnings.push(ValidationWarning::UnknownContentType {
                        path: type_path,
                        value: tag.to_string(),
                    });
                }
            }
        }

        if let Some(v) = self.required(obj, path, &["background"]) {
            self.background(v, &join(path, "background"));
        }

        if let Some(v) = self.required(obj, path, &["overlay"]) {
            self.boolean(v, &join(path, "overlay"));
        }

        if let Some(v) = self.required(obj, path, &["content"]) {
            self.content(v, &join(path, "content"));
        }

        id
    }

    fn background(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };

        let kind = self
            .required(obj, path, &["type"])
            .and_then(|v| self.enumeration(v, &join(path, "type"), BACKGROUND_KINDS));

        let source = self
            .required(obj, path, &["source"])
            .and_then(|v| self.string(v, &join(path, "source")));

        self.optional_string(obj, path, "fallback");

        if let (Some("gradient"), Some(source)) = (kind, source) {
            if !crate::background::is_gradient(source) {
                self.push(
                    join(path, "source"),
                    IssueKind::InvalidGradient {
                        source: source.to_string(),
                    },
                );
            }
        }
    }

    fn content(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };

        if let Some(v) = Self::optional(obj, "alignment") {
            self.enumeration(v, &join(path, "alignment"), ALIGNMENTS);
        }

        if let Some(v) = Self::optional(obj, "badge") {
            let badge_path = join(path, "badge");
            if let Some(badge) = self.object(v, &badge_path) {
                self.required_string(badge, &badge_path, "text");
                self.required_string(badge, &badge_path, "color");
                self.optional_string(badge, &badge_path, "textColor");
            }
        }

        self.optional_string(obj, path, "title");
        self.optional_string(obj, path, "subtitle");

        if let Some(v) = Self::optional(obj, "paragraphs") {
            self.string_array(v, &join(path, "paragraphs"));
        }
        if let Some(v) = Self::optional(obj, "items") {
            self.string_array(v, &join(path, "items"));
        }

        for key in ["quote", "highlight"] {
            if let Some(v) = Self::optional(obj, key) {
                self.string_record(v, &join(path, key), &["text", "color"]);
            }
        }

        if let Some(v) = Self::optional(obj, "footer") {
            let footer_path = join(path, "footer");
            match v {
                Value::String(_) => {}
                Value::Array(_) => self.string_array(v, &footer_path),
                other => self.mismatch(footer_path, "string or array of strings", other),
            }
        }

        if let Some(v) = Self::optional(obj, "cards") {
            self.record_array(v, &join(path, "cards"), &["icon", "title", "description"]);
        }
        if let Some(v) = Self::optional(obj, "stats") {
            self.record_array(v, &join(path, "stats"), &["number", "label"]);
        }
        if let Some(v) = Self::optional(obj, "awards") {
            self.record_array(v, &join(path, "awards"), &["icon", "title", "source"]);
        }

        if let Some(v) = Self::optional(obj, "lists") {
            let lists_path = join(path, "lists");
            if let Some(lists) = self.array(v, &lists_path) {
                for (i, list) in lists.iter().enumerate() {
                    let list_path = index(&lists_path, i);
                    if let Some(list) = self.object(list, &list_path) {
                        self.required_string(list, &list_path, "title");
                        if let Some(items) = self.required(list, &list_path, &["items"]) {
                            self.string_array(items, &join(&list_path, "items"));
                        }
                    }
                }
            }
        }

        if let Some(v) = Self::optional(obj, "buttons") {
            let buttons_path = join(path, "buttons");
            if let Some(buttons) = self.array(v, &buttons_path) {
                for (i, button) in buttons.iter().enumerate() {
                    let button_path = index(&buttons_path, i);
                    if let Some(button) = self.object(button, &button_path) {
                        self.required_string(button, &button_path, "text");
                        self.required_string(button, &button_path, "action");
                        if let Some(v) = self.required(button, &button_path, &["variant"]) {
                            self.enumeration(v, &join(&button_path, "variant"), BUTTON_VARIANTS);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slide(id: u64, kind: &str) -> Value {
        json!({
            "id": id,
            "type": kind,
            "background": {"type": "gradient", "source": "linear-gradient(135deg, #000 0%, #fff 100%)"},
            "overlay": false,
            "content": {"alignment": "center", "title": "Slide"}
        })
    }

    fn deck(total: u64, slides: Vec<Value>) -> Value {
        json!({
            "presentation": {"title": "Deck", "subtitle": "Sub", "totalSlides": total},
            "slides": slides
        })
    }

    fn paths(err: &ValidationError) -> Vec<&str> {
        err.issues().iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_valid_document_has_no_warnings() {
        let doc = deck(2, vec![slide(1, "title"), slide(2, "cta")]);
        let validated = validate_value(&doc).unwrap();
        assert_eq!(validated.presentation.slides.len(), 2);
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn test_count_mismatch_is_only_a_warning() {
        let doc = deck(5, vec![slide(1, "title")]);
        let validated = validate_value(&doc).unwrap();
        assert_eq!(
            validated.warnings,
            vec![ValidationWarning::SlideCountMismatch {
                declared: 5,
                actual: 1
            }]
        );
    }

    #[test]
    fn test_id_warnings() {
        let doc = deck(3, vec![slide(1, "title"), slide(1, "content"), slide(7, "cta")]);
        let validated = validate_value(&doc).unwrap();
        assert!(validated.warnings.contains(&ValidationWarning::DuplicateId {
            id: 1,
            path: "slides[1].id".to_string()
        }));
        assert!(validated.warnings.contains(&ValidationWarning::IdNotPosition {
            id: 7,
            position: 3
        }));
    }

    #[test]
    fn test_unknown_content_type_warns() {
        let doc = deck(1, vec![slide(1, "timeline")]);
        let validated = validate_value(&doc).unwrap();
        assert!(matches!(
            &validated.warnings[0],
            ValidationWarning::UnknownContentType { value, .. } if value == "timeline"
        ));
    }

    #[test]
    fn test_missing_fields_reported_with_paths() {
        let doc = json!({
            "presentation": {"title": "Deck", "totalSlides": 1},
            "slides": [{"id": 1, "type": "title", "overlay": true, "content": {}}]
        });
        let err = validate_value(&doc).unwrap_err();
        let p = paths(&err);
        assert!(p.contains(&"presentation.subtitle"));
        assert!(p.contains(&"slides[0].background"));
        assert!(
            err.issues()
                .iter()
                .all(|i| i.kind == IssueKind::MissingField)
        );
    }

    #[test]
    fn test_wrong_enum_value() {
        let mut doc = deck(1, vec![slide(1, "title")]);
        doc["slides"][0]["background"]["type"] = json!("video");
        doc["slides"][0]["content"]["alignment"] = json!("justify");
        let err = validate_value(&doc).unwrap_err();
        let issues = err.issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "slides[0].background.type");
        assert!(matches!(
            &issues[0].kind,
            IssueKind::InvalidEnum { value, .. } if value == "video"
        ));
        assert_eq!(issues[1].path, "slides[0].content.alignment");
    }

    #[test]
    fn test_type_mismatches() {
        let mut doc = deck(1, vec![slide(1, "stats")]);
        doc["slides"][0]["id"] = json!("one");
        doc["slides"][0]["content"]["stats"] = json!([{"number": 40, "label": "Clients"}]);
        doc["slides"][0]["content"]["footer"] = json!(12);
        let err = validate_value(&doc).unwrap_err();
        let issues = err.issues();
        assert_eq!(
            issues[0],
            SchemaIssue {
                path: "slides[0].id".to_string(),
                kind: IssueKind::TypeMismatch {
                    expected: "non-negative integer",
                    found: "string"
                }
            }
        );
        assert!(paths(&err).contains(&"slides[0].content.stats[0].number"));
        assert!(paths(&err).contains(&"slides[0].content.footer"));
    }

    #[test]
    fn test_gradient_source_must_be_gradient() {
        let mut doc = deck(1, vec![slide(1, "title")]);
        doc["slides"][0]["background"]["source"] = json!("/assets/slide-1.jpg");
        let err = validate_value(&doc).unwrap_err();
        assert!(matches!(
            err.issues()[0].kind,
            IssueKind::InvalidGradient { .. }
        ));
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let mut doc = deck(1, vec![slide(1, "content")]);
        doc["slides"][0]["content"]["badge"] = Value::Null;
        doc["slides"][0]["background"] = json!({"type": "image", "source": "/a.jpg", "fallback": null});
        assert!(validate_value(&doc).is_ok());
    }

    #[test]
    fn test_null_alignment_decodes_as_center() {
        let mut doc = deck(1, vec![slide(1, "title")]);
        doc["slides"][0]["content"]["alignment"] = Value::Null;
        let validated = validate_value(&doc).unwrap();
        assert_eq!(
            validated.presentation.slides[0].content.alignment,
            crate::schema::Alignment::Center
        );
    }

    #[test]
    fn test_both_spellings_of_a_field_are_rejected() {
        let mut doc = deck(1, vec![slide(1, "title")]);
        doc["slides"][0]["contentType"] = json!("title");
        doc["metadata"] = doc["presentation"].clone();
        let err = validate_value(&doc).unwrap_err();
        let issues = err.issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "presentation");
        assert_eq!(
            issues[1],
            SchemaIssue {
                path: "slides[0].type".to_string(),
                kind: IssueKind::ConflictingKeys {
                    keys: vec!["type".to_string(), "contentType".to_string()]
                }
            }
        );
        assert!(err.to_string().contains("only one of type, contentType"));
    }

    #[test]
    fn test_trailing_comma_is_a_syntax_error() {
        let err = validate_str(r#"{"presentation": {"title": "x",}}"#).unwrap_err();
        assert!(matches!(err, ValidationError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = validate_value(&json!([1, 2])).unwrap_err();
        assert_eq!(paths(&err), vec!["$"]);
    }

    #[test]
    fn test_error_message_lists_every_issue() {
        let doc = json!({"slides": [{"id": 1}]});
        let err = validate_value(&doc).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with(&format!("{} schema violation(s)", err.issues().len())));
        assert!(msg.contains("presentation: missing required field"));
        assert!(msg.contains("slides[0].content: missing required field"));
    }
}
