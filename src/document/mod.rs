//! # Card Template Document Model
//!
//! A single type hierarchy that is both the Rust API and the persisted JSON.
//! A [`Template`] owns a FRONT [`Face`] and, when multi-sided, a BACK face.
//! Each face holds an ordered list of positioned [`Item`]s; document order is
//! paint order.
//!
//! ```ignore
//! use cardpress::document::*;
//!
//! let mut template = Template::new("Staff badge");
//! let id = template.front.add(ItemKind::BoundLabel(BoundLabel::new("FullName")));
//! template.front.item_mut(&id).unwrap().top = 12.0;
//!
//! let json = template.to_json()?;
//! let loaded = Template::from_json(&json)?;
//! assert_eq!(loaded, template);
//! ```
//!
//! ## Persisted form
//!
//! ```text
//! { "id", "name", "SIDE": "SINGLE"?, "FRONT": Face, "BACK": Face? }
//! Face  = { "width", "height", "background"?, "items": { <id>: Item, ... } }
//! Item  = { "type", "id", "top", "left", ...payload }
//! ```
//!
//! Loading normalizes legacy data (see [`Template::normalize`]); saving always
//! writes the normalized form.

pub mod types;

pub use types::*;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CardError, Result};
use crate::fields::path::normalize_field_path;

/// Default card width (CR80, portrait).
pub const DEFAULT_WIDTH_MM: f64 = 53.98;
/// Default card height (CR80, portrait).
pub const DEFAULT_HEIGHT_MM: f64 = 85.6;

// ============================================================================
// IDENTIFIERS & ENUMS
// ============================================================================

/// Item identifier, unique within its face.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which printable side of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceKind {
    #[serde(rename = "FRONT", alias = "front")]
    Front,
    #[serde(rename = "BACK", alias = "back")]
    Back,
}

impl FaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaceKind::Front => "FRONT",
            FaceKind::Back => "BACK",
        }
    }
}

impl fmt::Display for FaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single- or double-sided template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Single,
    Multi,
}

// ============================================================================
// ITEMS
// ============================================================================

/// Define the ItemKind enum and its dispatch methods from a single list.
///
/// Adding a new item type: add one line here, define the payload in
/// `types.rs` with `impl ItemMeta`, then follow the compiler through the
/// exhaustive matches in the resolver and renderer.
macro_rules! define_items {
    ($($variant:ident($inner:ty) => $tag:literal),+ $(,)?) => {
        /// Typed payload of an item.
        ///
        /// `#[serde(tag = "type")]` gives JSON like
        /// `{"type": "bound_label", "fieldPath": "FullName", ...}`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum ItemKind {
            $(#[serde(rename = $tag)] $variant($inner),)+
        }

        impl ItemKind {
            /// Serialized type tag.
            pub fn type_name(&self) -> &'static str {
                match self { $(ItemKind::$variant(_) => $tag,)+ }
            }

            /// Human-readable display label (from [`ItemMeta::label`]).
            pub fn label(&self) -> &'static str {
                match self { $(ItemKind::$variant(_) => <$inner>::label(),)+ }
            }

            /// Editor defaults for every item type, in palette order.
            pub fn all_editor_defaults() -> Vec<Self> {
                vec![$(ItemKind::$variant(<$inner>::editor_default()),)+]
            }
        }
    };
}

define_items! {
    FixedText(FixedText) => "fixed_text",
    BoundLabel(BoundLabel) => "bound_label",
    DynamicImage(DynamicImage) => "dynamic_image",
    FixedImage(FixedImage) => "fixed_image",
    Barcode(Barcode) => "barcode",
}

impl ItemKind {
    /// Field path this item binds to, if it binds to one.
    pub fn field_path(&self) -> Option<&str> {
        match self {
            ItemKind::FixedText(_) | ItemKind::FixedImage(_) => None,
            ItemKind::BoundLabel(b) => Some(&b.field_path),
            ItemKind::DynamicImage(d) => Some(&d.field_path),
            ItemKind::Barcode(b) => Some(&b.field_path),
        }
    }

    fn field_path_mut(&mut self) -> Option<&mut String> {
        match self {
            ItemKind::FixedText(_) | ItemKind::FixedImage(_) => None,
            ItemKind::BoundLabel(b) => Some(&mut b.field_path),
            ItemKind::DynamicImage(d) => Some(&mut d.field_path),
            ItemKind::Barcode(b) => Some(&mut b.field_path),
        }
    }

    /// Physical box size in mm: (width, height) for images and QR codes,
    /// (box width, font size) for text.
    pub fn size_mm(&self) -> (f64, f64) {
        match self {
            ItemKind::FixedText(t) => (t.style.box_width_mm(), t.style.font_size_mm()),
            ItemKind::BoundLabel(b) => (b.style.box_width_mm(), b.style.font_size_mm()),
            ItemKind::DynamicImage(d) => d.size_mm(),
            ItemKind::FixedImage(f) => f.size_mm(),
            ItemKind::Barcode(b) => b.size_mm(),
        }
    }
}

/// Editor palette entry.
#[derive(Debug, Clone, Serialize)]
pub struct ItemTypeMeta {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub label: &'static str,
}

/// Item type metadata for the editor palette.
pub fn item_types() -> Vec<ItemTypeMeta> {
    ItemKind::all_editor_defaults()
        .iter()
        .map(|k| ItemTypeMeta {
            type_name: k.type_name(),
            label: k.label(),
        })
        .collect()
}

/// Editor default for a type tag. `None` for unknown tags.
pub fn default_item(type_name: &str) -> Option<ItemKind> {
    ItemKind::all_editor_defaults()
        .into_iter()
        .find(|k| k.type_name() == type_name)
}

/// A positioned element on a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    /// Distance from the face's top edge in mm (≥ 0).
    #[serde(default)]
    pub top: f64,
    /// Distance from the face's left edge in mm (≥ 0).
    #[serde(default)]
    pub left: f64,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: ItemId::generate(),
            top: 0.0,
            left: 0.0,
            kind,
        }
    }

    pub fn at(mut self, top: f64, left: f64) -> Self {
        self.top = top.max(0.0);
        self.left = left.max(0.0);
        self
    }

    fn normalize(&mut self) {
        self.top = clamp_position(self.top);
        self.left = clamp_position(self.left);
        if let Some(path) = self.kind.field_path_mut() {
            *path = normalize_field_path(path);
        }
    }
}

fn clamp_position(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// (De)serialize the ordered item list as a JSON object keyed by item id.
///
/// Reading also accepts a plain array. The map key wins over any `id`
/// stored inside the item.
mod items_map {
    use super::{Item, ItemId};
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Item], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for item in items {
            map.serialize_entry(item.id.as_str(), item)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(key, v)| {
                    let mut item: Item = serde_json::from_value(v)
                        .map_err(|e| D::Error::custom(format!("items[{}]: {}", key, e)))?;
                    item.id = ItemId::from(key);
                    Ok(item)
                })
                .collect(),
            serde_json::Value::Array(list) => list
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    let mut item: Item = serde_json::from_value(v)
                        .map_err(|e| D::Error::custom(format!("items[{}]: {}", i, e)))?;
                    if item.id.is_empty() {
                        item.id = ItemId::generate();
                    }
                    Ok(item)
                })
                .collect(),
            other => Err(D::Error::custom(format!(
                "items: expected object or array, got {}",
                other
            ))),
        }
    }
}

// ============================================================================
// FACE
// ============================================================================

/// One printable side of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Width in mm (> 0).
    pub width: f64,
    /// Height in mm (> 0).
    pub height: f64,
    /// Optional inline `data:` URI painted under all items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, with = "items_map")]
    pub items: Vec<Item>,
}

impl Default for Face {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH_MM, DEFAULT_HEIGHT_MM)
    }
}

impl Face {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            items: Vec::new(),
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Append a new item at the top-left corner and return its id.
    pub fn add(&mut self, kind: ItemKind) -> ItemId {
        let item = Item::new(kind);
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Append an existing item, replacing its id if it collides or is empty.
    pub fn insert(&mut self, mut item: Item) -> ItemId {
        if item.id.is_empty() || self.item(&item.id).is_some() {
            item.id = ItemId::generate();
        }
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.items.iter().position(|i| &i.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn validate(&self, kind: FaceKind) -> std::result::Result<(), String> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(format!(
                "{} face must have a positive size, got {} x {}",
                kind, self.width, self.height
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// A card template: FRONT face plus an optional BACK face.
///
/// The BACK face exists iff the template is multi-sided, so [`Template::side`]
/// is derived rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TemplateRecord", into = "TemplateRecord")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub front: Face,
    back: Option<Face>,
}

/// Wire shape of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TemplateRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "SIDE", default, skip_serializing_if = "Option::is_none")]
    side: Option<String>,
    #[serde(rename = "FRONT")]
    front: Face,
    #[serde(rename = "BACK", default, skip_serializing_if = "Option::is_none")]
    back: Option<Face>,
}

impl TryFrom<TemplateRecord> for Template {
    type Error = String;

    fn try_from(record: TemplateRecord) -> std::result::Result<Self, Self::Error> {
        let single = record
            .side
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("SINGLE"));
        // A document that was never saved has no id yet.
        let id = if record.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            record.id
        };
        let mut template = Template {
            id,
            name: record.name,
            front: record.front,
            back: if single { None } else { record.back },
        };
        template.front.validate(FaceKind::Front)?;
        template.normalize();
        Ok(template)
    }
}

impl From<Template> for TemplateRecord {
    fn from(template: Template) -> Self {
        let side = template.back.is_none().then(|| "SINGLE".to_string());
        TemplateRecord {
            id: template.id,
            name: template.name,
            side,
            front: template.front,
            back: template.back,
        }
    }
}

impl Template {
    /// Create an empty single-sided template with a default-size FRONT face.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            front: Face::default(),
            back: None,
        }
    }

    /// Parse a persisted template, normalizing legacy data.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CardError::template(e.to_string()))
    }

    /// Parse a template from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| CardError::template(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn side(&self) -> Side {
        if self.back.is_some() { Side::Multi } else { Side::Single }
    }

    /// Switch between single- and double-sided.
    ///
    /// Going multi-sided creates an empty BACK with FRONT's size; going
    /// single-sided discards the BACK face.
    pub fn set_side(&mut self, side: Side) {
        match side {
            Side::Single => self.back = None,
            Side::Multi => {
                if self.back.is_none() {
                    self.back = Some(Face::new(self.front.width, self.front.height));
                }
            }
        }
    }

    pub fn back(&self) -> Option<&Face> {
        self.back.as_ref()
    }

    pub fn back_mut(&mut self) -> Option<&mut Face> {
        self.back.as_mut()
    }

    pub fn face(&self, kind: FaceKind) -> Option<&Face> {
        match kind {
            FaceKind::Front => Some(&self.front),
            FaceKind::Back => self.back.as_ref(),
        }
    }

    pub fn face_mut(&mut self, kind: FaceKind) -> Option<&mut Face> {
        match kind {
            FaceKind::Front => Some(&mut self.front),
            FaceKind::Back => self.back.as_mut(),
        }
    }

    /// Faces in print order: FRONT, then BACK when present.
    pub fn faces(&self) -> Vec<(FaceKind, &Face)> {
        let mut faces = vec![(FaceKind::Front, &self.front)];
        if let Some(back) = &self.back {
            faces.push((FaceKind::Back, back));
        }
        faces
    }

    /// Resize the card. BACK follows FRONT.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.front.width = width;
        self.front.height = height;
        if let Some(back) = &mut self.back {
            back.width = width;
            back.height = height;
        }
    }

    pub fn item_count(&self) -> usize {
        self.faces().iter().map(|(_, f)| f.items.len()).sum()
    }

    /// Bring the template into canonical form.
    ///
    /// - bare `CustomFieldNN` field paths become `Employee.CustomField.CustomFieldNN`
    /// - negative or non-finite positions are clamped to 0
    /// - BACK takes FRONT's width/height
    ///
    /// Idempotent.
    pub fn normalize(&mut self) {
        let (width, height) = (self.front.width, self.front.height);
        for item in &mut self.front.items {
            item.normalize();
        }
        if let Some(back) = &mut self.back {
            back.width = width;
            back.height = height;
            for item in &mut back.items {
                item.normalize();
            }
        }
    }

    /// Local checks run before any call to the template store.
    pub fn validate_for_save(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CardError::MissingName);
        }
        if self.item_count() == 0 {
            return Err(CardError::EmptyTemplate);
        }
        self.front
            .validate(FaceKind::Front)
            .map_err(CardError::Template)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Template {
        let mut t = Template::new("Badge");
        t.set_side(Side::Multi);
        t.front.insert(Item::new(ItemKind::FixedText(FixedText::new("ACME"))).at(2.0, 3.0));
        t.front.insert(Item::new(ItemKind::BoundLabel(BoundLabel::new("FullName"))).at(40.0, 3.0));
        t.front.insert(Item::new(ItemKind::DynamicImage(DynamicImage::editor_default())));
        let back = t.back_mut().unwrap();
        back.insert(Item::new(ItemKind::Barcode(Barcode::new("TagCode"))).at(10.0, 10.0));
        back.insert(Item::new(ItemKind::FixedImage(FixedImage::default())));
        t
    }

    #[test]
    fn test_roundtrip() {
        let t = sample();
        let json = t.to_json().unwrap();
        let back = Template::from_json(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.to_json().unwrap(), json);
    }

    #[test]
    fn test_item_order_preserved() {
        let t = sample();
        let loaded = Template::from_json(&t.to_json().unwrap()).unwrap();
        let types: Vec<_> = loaded.front.items.iter().map(|i| i.kind.type_name()).collect();
        assert_eq!(types, vec!["fixed_text", "bound_label", "dynamic_image"]);
    }

    #[test]
    fn test_single_side_marker() {
        let t = Template::new("Solo");
        let value: serde_json::Value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["SIDE"], "SINGLE");
        assert!(value.get("BACK").is_none());

        let multi = sample();
        let value: serde_json::Value = serde_json::to_value(&multi).unwrap();
        assert!(value.get("SIDE").is_none());
        assert!(value.get("BACK").is_some());
    }

    #[test]
    fn test_side_inferred_from_back() {
        let json = r#"{"name":"x","FRONT":{"width":50,"height":80,"items":{}},
                       "BACK":{"width":10,"height":10,"items":{}}}"#;
        let t = Template::from_json(json).unwrap();
        assert_eq!(t.side(), Side::Multi);
        assert_eq!(t.back().unwrap().width, 50.0);
        assert_eq!(t.back().unwrap().height, 80.0);

        let json = r#"{"name":"x","SIDE":"SINGLE","FRONT":{"width":50,"height":80,"items":{}},
                       "BACK":{"width":50,"height":80,"items":{}}}"#;
        let t = Template::from_json(json).unwrap();
        assert_eq!(t.side(), Side::Single);
        assert!(t.back().is_none());

        let json = r#"{"name":"x","FRONT":{"width":50,"height":80}}"#;
        assert_eq!(Template::from_json(json).unwrap().side(), Side::Single);
    }

    #[test]
    fn test_missing_id_assigned_on_load() {
        let json = r#"{"name":"New badge","SIDE":"SINGLE","FRONT":{"width":50,"height":80,"items":{
            "a":{"type":"fixed_text","top":0,"left":0}}}}"#;
        let t = Template::from_json(json).unwrap();
        assert!(uuid::Uuid::parse_str(&t.id).is_ok());
        assert_ne!(Template::from_json(json).unwrap().id, t.id);

        let json = r#"{"id":"kept","name":"x","FRONT":{"width":50,"height":80}}"#;
        assert_eq!(Template::from_json(json).unwrap().id, "kept");
    }

    #[test]
    fn test_legacy_custom_field_normalized_on_load() {
        let json = r#"{"name":"x","SIDE":"SINGLE","FRONT":{"width":50,"height":80,"items":{
            "a":{"type":"bound_label","top":1,"left":2,"fieldPath":"CustomField04"},
            "b":{"type":"barcode","top":-3,"left":2,"fieldPath":"CustomField5"}}}}"#;
        let t = Template::from_json(json).unwrap();
        assert_eq!(
            t.front.items[0].kind.field_path(),
            Some("Employee.CustomField.CustomField04")
        );
        assert_eq!(
            t.front.items[1].kind.field_path(),
            Some("Employee.CustomField.CustomField5")
        );
        assert_eq!(t.front.items[1].top, 0.0);

        let mut again = t.clone();
        again.normalize();
        assert_eq!(again, t);
        assert!(t.to_json().unwrap().contains("Employee.CustomField.CustomField04"));
    }

    #[test]
    fn test_map_key_is_item_id() {
        let json = r#"{"name":"x","FRONT":{"width":50,"height":80,"items":{
            "key-1":{"type":"fixed_text","id":"stale","text":"hi"}}}}"#;
        let t = Template::from_json(json).unwrap();
        assert_eq!(t.front.items[0].id.as_str(), "key-1");
    }

    #[test]
    fn test_items_array_accepted() {
        let json = r#"{"name":"x","FRONT":{"width":50,"height":80,"items":[
            {"type":"fixed_text","text":"hi"}]}}"#;
        let t = Template::from_json(json).unwrap();
        assert_eq!(t.front.items.len(), 1);
        assert!(!t.front.items[0].id.is_empty());
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let json = r#"{"name":"x","FRONT":{"width":0,"height":80}}"#;
        assert!(matches!(Template::from_json(json), Err(CardError::Template(_))));
    }

    #[test]
    fn test_unknown_item_type_rejected() {
        let json = r#"{"name":"x","FRONT":{"width":50,"height":80,"items":{"a":{"type":"ellipse"}}}}"#;
        assert!(Template::from_json(json).is_err());
    }

    #[test]
    fn test_validate_for_save() {
        let mut t = Template::new("  ");
        t.front.add(ItemKind::FixedText(FixedText::new("x")));
        assert!(matches!(t.validate_for_save(), Err(CardError::MissingName)));

        let t = Template::new("Named");
        assert!(matches!(t.validate_for_save(), Err(CardError::EmptyTemplate)));

        let mut t = Template::new("Named");
        t.set_side(Side::Multi);
        t.back_mut().unwrap().add(ItemKind::Barcode(Barcode::new("TagCode")));
        assert!(t.validate_for_save().is_ok());
    }

    #[test]
    fn test_set_side_and_size() {
        let mut t = Template::new("x");
        t.set_size(85.6, 53.98);
        t.set_side(Side::Multi);
        assert_eq!(t.back().unwrap().width, 85.6);
        t.set_size(60.0, 40.0);
        assert_eq!(t.back().unwrap().height, 40.0);
        t.set_side(Side::Single);
        assert!(t.face(FaceKind::Back).is_none());
    }

    #[test]
    fn test_insert_replaces_colliding_id() {
        let mut face = Face::default();
        let first = face.insert(Item::new(ItemKind::FixedText(FixedText::new("a"))));
        let mut dup = Item::new(ItemKind::FixedText(FixedText::new("b")));
        dup.id = first.clone();
        let second = face.insert(dup);
        assert_ne!(first, second);
        assert!(face.remove(&first).is_some());
        assert!(face.remove(&first).is_none());
    }

    #[test]
    fn test_editor_defaults_complete() {
        let types = item_types();
        assert_eq!(types.len(), 5);
        let mut seen = std::collections::HashSet::new();
        for meta in &types {
            assert!(seen.insert(meta.type_name), "Duplicate type: {}", meta.type_name);
            let kind = default_item(meta.type_name).unwrap();
            let json = serde_json::to_value(Item::new(kind)).unwrap();
            assert_eq!(json["type"].as_str().unwrap(), meta.type_name);
        }
        assert!(default_item("ellipse").is_none());
    }
}
