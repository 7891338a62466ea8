//! # Card Pipeline Tests
//!
//! End-to-end runs over the public API: a template is persisted and
//! reloaded, bound to records, rendered to each target and composed into a
//! print document.
//!
//! Image fetches point at an unroutable address so these tests never leave
//! the machine.

use async_trait::async_trait;
use cardpress::document::{Barcode, BoundLabel, DynamicImage, FixedText, ItemKind};
use cardpress::fields::{BindingContext, FieldCatalog};
use cardpress::placement::{Key, PlacementEffect, PlacementEngine};
use cardpress::print::{PrintRecord, capture_batch, compose_pages, page_order};
use cardpress::render::{
    Bitmap, CaptureError, LiveFace, Rasterize, RenderContext, RenderOutput, RenderTarget,
};
use cardpress::store::{FileTemplateStore, TemplateStore};
use cardpress::{CardError, FaceKind, Renderer, Side, Template};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const IMAGE_BASE: &str = "http://127.0.0.1:9";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn renderer() -> Renderer {
    let context = RenderContext::new(IMAGE_BASE, None).unwrap();
    Renderer::new(Arc::new(FieldCatalog::standard(None)), Arc::new(context))
}

/// Two-sided staff badge: photo, name and QR on FRONT, disclaimer on BACK.
fn staff_badge() -> Template {
    let mut template = Template::new("Staff badge");
    template.front.add(ItemKind::DynamicImage(DynamicImage {
        field_path: "PictureID".into(),
        ..Default::default()
    }));
    template.front.add(ItemKind::BoundLabel(BoundLabel::new("FullName")));
    template.front.add(ItemKind::BoundLabel(BoundLabel::new("DepartmentName")));
    template.front.add(ItemKind::Barcode(Barcode::new("CardCode")));
    template.set_side(Side::Multi);
    if let Some(back) = template.back_mut() {
        back.add(ItemKind::FixedText(FixedText::new("If found, return to reception")));
    }
    template
}

fn record(name: &str, surname: &str, code: &str) -> BindingContext {
    BindingContext::from_record(&json!({
        "CardCode": code,
        "PictureID": format!("{}-photo", code),
        "Employee": {
            "Name": name,
            "SurName": surname,
            "EmployeeDepartments": [
                {"Department": {"DepartmentName": "R&D"}},
                {"Department": {"DepartmentName": "Ops"}}
            ]
        }
    }))
}

/// Rasterizer that always fails, to exercise the placeholder path.
struct BrokenRasterizer;

#[async_trait]
impl Rasterize for BrokenRasterizer {
    async fn rasterize(&self, _face: &LiveFace) -> Result<Bitmap, CaptureError> {
        Err(CaptureError::Failed("no canvas".into()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn test_persist_load_and_preview() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTemplateStore::new(dir.path());
    let template = staff_badge();

    let summary = store.save(&template).await.unwrap();
    assert_eq!(summary.side, Side::Multi);
    assert_eq!(summary.item_count, 5);

    let loaded = store.load(&template.id).await.unwrap();
    assert_eq!(loaded, template);

    let ctx = record("Ada", "Lovelace", "C-1");
    let markup = renderer()
        .preview_markup(FaceKind::Front, &loaded.front, Some(&ctx))
        .await;
    assert!(markup.contains(">Ada Lovelace</div>"));
    assert!(markup.contains(">R&amp;D, Ops</div>"));
    assert!(markup.contains(&format!("{}/images/C-1-photo", IMAGE_BASE)));
    assert!(markup.contains("class=\"card-item card-qr\""));
    assert!(markup.contains("width:53.98mm;height:85.6mm"));
}

#[tokio::test]
async fn test_unbound_preview_shows_display_names_and_avatar() {
    let markup = renderer()
        .preview_markup(FaceKind::Front, &staff_badge().front, None)
        .await;
    assert!(markup.contains(">Full Name</div>"));
    assert!(markup.contains("data:image/svg+xml"));
}

#[tokio::test]
async fn test_single_side_drops_back_on_reload() {
    let mut json: serde_json::Value = serde_json::to_value(staff_badge()).unwrap();
    json["SIDE"] = json!("SINGLE");
    let template = Template::from_value(json).unwrap();
    assert_eq!(template.side(), Side::Single);
    assert!(template.face(FaceKind::Back).is_none());
    assert_eq!(template.item_count(), 4);
}

#[tokio::test]
async fn test_save_requires_name_and_items() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTemplateStore::new(dir.path());

    let err = store.save(&Template::new("Blank")).await.unwrap_err();
    assert!(matches!(err, CardError::EmptyTemplate));

    let mut unnamed = staff_badge();
    unnamed.name = String::new();
    let err = store.save(&unnamed).await.unwrap_err();
    assert_eq!(err.to_string(), "Template name is required");
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplex_print_document() {
    let single = {
        let mut t = staff_badge();
        t.set_side(Side::Single);
        t
    };
    let records = vec![
        PrintRecord::new(staff_badge(), Some(record("Ada", "Lovelace", "C-1"))),
        PrintRecord::new(single, Some(record("Grace", "Hopper", "C-2"))),
        PrintRecord::new(staff_badge(), Some(record("Alan", "Turing", "C-3"))),
    ];

    let order = page_order(records.iter().map(|r| &r.template));
    assert_eq!(
        order,
        vec![
            (0, FaceKind::Front),
            (0, FaceKind::Back),
            (1, FaceKind::Front),
            (2, FaceKind::Front),
            (2, FaceKind::Back),
        ]
    );

    let pages = compose_pages(&renderer(), &records).await;
    assert_eq!(pages.len(), 5);
    let html = pages.to_html();
    let ada = html.find("Ada Lovelace").unwrap();
    let grace = html.find("Grace Hopper").unwrap();
    let alan = html.find("Alan Turing").unwrap();
    assert!(ada < grace && grace < alan);
    assert_eq!(html.matches("page-break-after:always").count(), 4);
    assert_eq!(html.matches("If found, return to reception").count(), 2);
}

#[tokio::test]
async fn test_capture_targets() {
    let template = staff_badge();
    let ctx = record("Ada", "Lovelace", "C-1");

    let output = renderer()
        .render_face(FaceKind::Back, template.back().unwrap(), Some(&ctx), RenderTarget::Capture)
        .await;
    let RenderOutput::Bitmap(bitmap) = output else {
        panic!("capture target must produce a bitmap");
    };
    assert_eq!((bitmap.width(), bitmap.height()), (408, 647));
    assert!(bitmap.to_png().unwrap().starts_with(&[0x89, b'P', b'N', b'G']));

    let broken = renderer().with_rasterizer(Arc::new(BrokenRasterizer));
    let captured = capture_batch(&broken, &[PrintRecord::new(template, Some(ctx))]).await;
    assert_eq!(captured.len(), 2);
    assert!(captured.iter().all(|c| c.bitmap == Bitmap::placeholder(408, 647)));
}

#[tokio::test]
async fn test_editing_session_moves_live_node() {
    let mut template = staff_badge();
    let renderer = renderer();
    let id = template.front.items[1].id.clone();

    let mut live = renderer
        .live_face(FaceKind::Front, &template.front, None, None)
        .await;
    let mut engine = PlacementEngine::new();
    assert_eq!(engine.click(&id), PlacementEffect::Selection(Some(id.clone())));
    live.apply(&PlacementEffect::Selection(Some(id.clone())));

    let effect = engine.key(&mut template.front, Key::ArrowRight, true, false);
    live.apply(&effect);
    let left = template.front.item(&id).unwrap().left;
    assert!(left > 0.0);
    let node = live.node(&id).unwrap();
    assert!(node.selected);
    assert_eq!(node.x, cardpress::units::mm_to_px(left));

    assert_eq!(
        engine.key(&mut template.front, Key::ArrowRight, false, true),
        PlacementEffect::None
    );

    assert!(matches!(
        engine.double_click(&mut template.front, &id),
        PlacementEffect::Deleted(_)
    ));
    assert!(template.front.item(&id).is_none());
}

#[tokio::test]
async fn test_catalog_name_fields_render_record_values() {
    let renderer = renderer();
    let mut face = Template::new("Names").front;
    for option in renderer
        .catalog()
        .options()
        .iter()
        .filter(|o| o.field_path.ends_with("Name"))
    {
        face.add(ItemKind::BoundLabel(BoundLabel::new(option.field_path.clone())));
    }
    let ctx = BindingContext::from_record(&json!({
        "Employee": {
            "Name": "Ada",
            "SurName": "Lovelace",
            "EmployeeDepartments": [{"Department": {"DepartmentName": "R&D"}}],
            "Faculty": {"FacultyName": "Engineering"},
            "Company": {"CompanyName": "Analytical Engines"}
        }
    }));

    let markup = renderer.preview_markup(FaceKind::Front, &face, Some(&ctx)).await;
    for expected in [">Ada Lovelace<", ">R&amp;D<", ">Engineering<", ">Analytical Engines<"] {
        assert!(markup.contains(expected), "missing {}", expected);
    }
    for label in ["Department Name", "Faculty Name", "Company Name"] {
        assert!(!markup.contains(label), "unresolved {}", label);
    }
}
