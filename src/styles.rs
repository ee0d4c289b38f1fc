use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use crate::frame::CellStyle;

/// The part of a cell style that ends up in a class declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub fill: Option<&'static str>,
    pub bold: bool,
    pub underline: bool,
}

impl From<CellStyle> for TextStyle {
    fn from(style: CellStyle) -> Self {
        Self {
            fill: style.fg,
            bold: style.bold,
            underline: style.underline,
        }
    }
}

impl TextStyle {
    pub fn declaration(&self) -> String {
        let mut parts = Vec::new();
        if let Some(fill) = self.fill {
            parts.push(format!("fill: {fill}"));
        }
        if self.bold {
            parts.push("font-weight: bold".to_owned());
        }
        if self.underline {
            parts.push("text-decoration: underline".to_owned());
        }
        parts.join(";")
    }

    pub fn is_plain(&self) -> bool {
        self.fill.is_none() && !self.bold && !self.underline
    }

    fn canonical(&self) -> String {
        serde_json::json!({
            "fill": self.fill,
            "bold": self.bold,
            "underline": self.underline,
        })
        .to_string()
    }

    /// Class name derived from the style content.
    pub fn class_id(&self) -> String {
        let digest = Sha256::digest(self.canonical().as_bytes());
        let hex = digest[..4]
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();
        format!("t{hex}")
    }
}

/// Class declarations seen while building one document.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    declared: IndexMap<String, String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the class for `style`, recording its declaration the first time
    /// it is seen. Plain text has no class.
    pub fn declare_once(&mut self, style: TextStyle) -> Option<String> {
        if style.is_plain() {
            return None;
        }
        let id = style.class_id();
        if !self.declared.contains_key(&id) {
            tracing::trace!(class = %id, "declaring text style");
            self.declared.insert(id.clone(), style.declaration());
        }
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declared
            .iter()
            .map(|(id, declaration)| (id.as_str(), declaration.as_str()))
    }

    pub fn stylesheet(&self) -> String {
        self.declarations()
            .map(|(id, declaration)| format!(".{id} {{{declaration}}}"))
            .collect::<Vec<String>>()
            .join("\n")
    }
}
