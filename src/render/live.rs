//! Live target: pixel-space nodes for the editing canvas.
//!
//! The placement engine never touches nodes directly. It returns a
//! [`PlacementEffect`] and [`LiveFace::apply`] updates only the node it
//! names. Content edits go through [`LiveFace::replace`] with a freshly
//! prepared item.

use super::{Content, ImageSrc, PreparedFace, PreparedItem};
use crate::document::{FaceKind, ItemId};
use crate::placement::PlacementEffect;
use crate::units::mm_to_px;

/// One rendered item on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveNode {
    pub item: ItemId,
    /// Translate from the face's top-left corner, px.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
    pub content: Content,
}

impl LiveNode {
    fn from_prepared(item: PreparedItem, selected: bool) -> Self {
        Self {
            x: mm_to_px(item.left),
            y: mm_to_px(item.top),
            width: mm_to_px(item.width),
            height: mm_to_px(item.height),
            selected,
            item: item.id,
            content: item.content,
        }
    }
}

/// A face rendered onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFace {
    pub kind: FaceKind,
    pub width: f64,
    pub height: f64,
    pub background: Option<ImageSrc>,
    pub nodes: Vec<LiveNode>,
}

impl LiveFace {
    pub fn from_prepared(face: PreparedFace, selected: Option<&ItemId>) -> Self {
        Self {
            kind: face.kind,
            width: mm_to_px(face.width),
            height: mm_to_px(face.height),
            background: face.background,
            nodes: face
                .items
                .into_iter()
                .map(|item| {
                    let is_selected = selected == Some(&item.id);
                    LiveNode::from_prepared(item, is_selected)
                })
                .collect(),
        }
    }

    pub fn node(&self, id: &ItemId) -> Option<&LiveNode> {
        self.nodes.iter().find(|n| &n.item == id)
    }

    fn node_mut(&mut self, id: &ItemId) -> Option<&mut LiveNode> {
        self.nodes.iter_mut().find(|n| &n.item == id)
    }

    /// Bitmap dimensions for this face, at least 1×1.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }

    /// Reflect a placement effect on the affected node only.
    pub fn apply(&mut self, effect: &PlacementEffect) {
        match effect {
            PlacementEffect::None => {}
            PlacementEffect::Moved { item, x, y } => {
                if let Some(node) = self.node_mut(item) {
                    node.x = *x;
                    node.y = *y;
                }
            }
            PlacementEffect::Selection(selected) => {
                for node in &mut self.nodes {
                    node.selected = selected.as_ref() == Some(&node.item);
                }
            }
            PlacementEffect::Deleted(item) => self.nodes.retain(|n| &n.item != item),
        }
    }

    /// Swap in a re-prepared item, keeping its paint position and selection.
    /// Unknown items are appended.
    pub fn replace(&mut self, item: PreparedItem) {
        match self.nodes.iter().position(|n| n.item == item.id) {
            Some(index) => {
                let selected = self.nodes[index].selected;
                self.nodes[index] = LiveNode::from_prepared(item, selected);
            }
            None => self.nodes.push(LiveNode::from_prepared(item, false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Face, FixedText, ItemKind, Style};
    use crate::placement::{Key, PlacementEngine};
    use crate::units::px_to_mm;

    fn text_item(id: &str, top: f64, left: f64) -> PreparedItem {
        PreparedItem {
            id: ItemId::from(id),
            top,
            left,
            width: 40.0,
            height: 4.8,
            content: Content::Text {
                text: id.into(),
                style: Style::default(),
            },
        }
    }

    fn live() -> LiveFace {
        LiveFace::from_prepared(
            PreparedFace {
                kind: FaceKind::Front,
                width: 53.98,
                height: 85.6,
                background: None,
                items: vec![text_item("a", 10.0, 5.0), text_item("b", 20.0, 5.0)],
            },
            Some(&ItemId::from("b")),
        )
    }

    #[test]
    fn test_from_prepared_converts_to_px() {
        let live = live();
        assert_eq!(live.pixel_size(), (408, 647));
        let a = live.node(&ItemId::from("a")).unwrap();
        assert!((px_to_mm(a.x) - 5.0).abs() < 1e-9);
        assert!((px_to_mm(a.y) - 10.0).abs() < 1e-9);
        assert!(!a.selected);
        assert!(live.node(&ItemId::from("b")).unwrap().selected);
    }

    #[test]
    fn test_apply_effects() {
        let mut live = live();
        live.apply(&PlacementEffect::Selection(Some(ItemId::from("a"))));
        assert!(live.node(&ItemId::from("a")).unwrap().selected);
        assert!(!live.node(&ItemId::from("b")).unwrap().selected);

        live.apply(&PlacementEffect::Moved {
            item: ItemId::from("a"),
            x: 12.0,
            y: 34.0,
        });
        let a = live.node(&ItemId::from("a")).unwrap();
        assert_eq!((a.x, a.y), (12.0, 34.0));

        live.apply(&PlacementEffect::Deleted(ItemId::from("b")));
        assert_eq!(live.nodes.len(), 1);
    }

    #[test]
    fn test_replace_keeps_selection_and_order() {
        let mut live = live();
        let mut updated = text_item("b", 30.0, 1.0);
        updated.content = Content::Text {
            text: "changed".into(),
            style: Style::default(),
        };
        live.replace(updated);
        assert_eq!(live.nodes[1].item, ItemId::from("b"));
        assert!(live.nodes[1].selected);
        assert!(matches!(&live.nodes[1].content, Content::Text { text, .. } if text == "changed"));
    }

    #[test]
    fn test_nudge_drives_node() {
        let mut face = Face::default();
        let id = face.add(ItemKind::FixedText(FixedText::new("x")));
        let mut engine = PlacementEngine::new();
        let mut live = LiveFace::from_prepared(
            PreparedFace {
                kind: FaceKind::Front,
                width: face.width,
                height: face.height,
                background: None,
                items: vec![text_item(id.as_str(), 0.0, 0.0)],
            },
            None,
        );
        live.apply(&engine.click(&id));
        let effect = engine.key(&mut face, Key::ArrowRight, false, false);
        live.apply(&effect);
        let node = live.node(&id).unwrap();
        assert!((px_to_mm(node.x) - 0.5).abs() < 1e-9);
        assert!(node.selected);
    }
}
