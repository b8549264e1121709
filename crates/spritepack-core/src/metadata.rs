//! Pack metadata and identifier normalization.
//!
//! Metadata travels next to the exported sprites as JSON. Identifiers are
//! slugged to a filesystem-safe form and categories are canonicalized
//! against a fixed vocabulary so hand-typed variants collapse to one
//! spelling.

use serde::{Deserialize, Serialize};

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Canonical category vocabulary.
pub const CATEGORY_OPTIONS: &[&str] = &[
    "Food & Beverage",
    "Retail",
    "Hospitality",
    "Civic Services",
    "Infrastructure",
    "Recreation",
    "Entertainment",
    "Landmarks",
    "Streetscape",
    "Civic Memorial",
    "Automotive Services",
    "Residential",
    "Maintenance",
    "Uncategorized",
];

/// Canonical theme vocabulary.
pub const THEME_OPTIONS: &[&str] = &[
    "Asian",
    "Cyberpunk",
    "European",
    "Modern",
    "Victorian",
    "Industrial",
    "Steampunk",
    "Medieval/Fantasy",
    "Sci-Fi",
    "Nordic/Scandinavian",
    "Mediterranean",
    "Colonial/Main Street",
    "Post-Apocalyptic",
];

/// Lowercased alias -> canonical category. Keys are matched after
/// separator folding in [`normalize_category`].
const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("food beverage", "Food & Beverage"),
    ("food and beverage", "Food & Beverage"),
    ("food & beverage", "Food & Beverage"),
    ("retail", "Retail"),
    ("hospitality", "Hospitality"),
    ("civic services", "Civic Services"),
    ("infrastructure", "Infrastructure"),
    ("recreation", "Recreation"),
    ("entertainment", "Entertainment"),
    ("landmarks", "Landmarks"),
    ("streetscape", "Streetscape"),
    ("civic memorial", "Civic Memorial"),
    ("automotive services", "Automotive Services"),
    ("residential", "Residential"),
    ("maintenance", "Maintenance"),
    ("uncategorized", "Uncategorized"),
    ("other", "Uncategorized"),
];

/// Slug an identifier: lowercase, keep `[a-z0-9_-]`, fold whitespace and
/// underscore runs to a single `_`, strip leading dashes and trailing
/// underscores. An empty result becomes `"model"`.
pub fn normalize_id(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_sep = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '_' {
            pending_sep = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            if pending_sep {
                slug.push('_');
                pending_sep = false;
            }
            slug.push(c);
        }
        // Other characters are dropped without acting as separators.
    }
    let slug = slug.trim_start_matches('-');
    if slug.is_empty() {
        "model".to_string()
    } else {
        slug.to_string()
    }
}

/// Canonicalize a category: fold `-`/`_` and whitespace runs to single
/// spaces, lowercase, then look up the alias table and the canonical
/// vocabulary. Unknown categories pass through trimmed but unaltered.
pub fn normalize_category(value: &str) -> String {
    let raw = value.trim();
    if raw.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }

    let folded = raw
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if let Some((_, canonical)) = CATEGORY_ALIASES.iter().find(|(alias, _)| *alias == folded) {
        return (*canonical).to_string();
    }
    if let Some(canonical) = CATEGORY_OPTIONS
        .iter()
        .find(|option| folded == option.to_lowercase())
    {
        return (*canonical).to_string();
    }
    raw.to_string()
}

/// Metadata for one sprite pack, serialized to JSON alongside the exported
/// images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackMetadata {
    pub id: String,
    pub name: String,
    pub set_id: String,
    pub category: String,
    pub theme: String,
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub variant_group: String,
    pub variant_label: String,
    pub group_label: String,
    pub manufacturer: String,
    pub link: String,
    pub instructions: String,
    pub notes: String,
    /// Per-rotation placement offsets, `[x, y]` for each of the four
    /// cardinal rotations.
    pub offsets: [[f64; 2]; 4],
}

impl Default for PackMetadata {
    fn default() -> Self {
        Self {
            id: "new_model".to_string(),
            name: "New Model".to_string(),
            set_id: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            theme: String::new(),
            tiles_x: 2,
            tiles_y: 2,
            variant_group: String::new(),
            variant_label: String::new(),
            group_label: String::new(),
            manufacturer: String::new(),
            link: String::new(),
            instructions: String::new(),
            notes: String::new(),
            offsets: [[0.0; 2]; 4],
        }
    }
}

impl PackMetadata {
    /// Serialization-ready copy: slugged id, canonical category, trimmed
    /// free-text fields, tile counts floored at 1.
    pub fn normalized(&self) -> Self {
        let name = self.name.trim();
        Self {
            id: normalize_id(&self.id),
            name: if name.is_empty() {
                "New Model".to_string()
            } else {
                name.to_string()
            },
            set_id: self.set_id.trim().to_string(),
            category: normalize_category(&self.category),
            theme: self.theme.trim().to_string(),
            tiles_x: self.tiles_x.max(1),
            tiles_y: self.tiles_y.max(1),
            variant_group: self.variant_group.trim().to_string(),
            variant_label: self.variant_label.trim().to_string(),
            group_label: self.group_label.trim().to_string(),
            manufacturer: self.manufacturer.trim().to_string(),
            link: self.link.trim().to_string(),
            instructions: self.instructions.trim().to_string(),
            notes: self.notes.trim().to_string(),
            offsets: self.offsets,
        }
    }
}
