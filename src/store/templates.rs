//! Template persistence.
//!
//! Stores hold templates in the persisted JSON format. Every save runs
//! [`Template::validate_for_save`] first, so an unnamed or empty template is
//! rejected before the backing store is touched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::document::{Side, Template};
use crate::error::{CardError, Result};

/// Listing entry for a stored template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub item_count: usize,
    pub saved_at: DateTime<Utc>,
}

impl TemplateSummary {
    fn of(template: &Template, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            side: template.side(),
            item_count: template.item_count(),
            saved_at,
        }
    }
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Validate and persist. Replaces any template with the same id.
    async fn save(&self, template: &Template) -> Result<TemplateSummary>;

    async fn load(&self, id: &str) -> Result<Template>;

    /// All stored templates, most recently saved first.
    async fn list(&self) -> Result<Vec<TemplateSummary>>;
}

/// Ids become file names, so keep them to a safe alphabet.
fn check_id(id: &str) -> Result<()> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(CardError::Template(format!("invalid template id {:?}", id)))
    }
}

// ============================================================================
// FILE STORE
// ============================================================================

/// One `{id}.json` file per template in a directory.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

fn modified_at(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    async fn save(&self, template: &Template) -> Result<TemplateSummary> {
        template.validate_for_save()?;
        let path = self.path_for(&template.id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, template.to_json_pretty()?).await?;
        let saved_at = Utc::now();
        info!(id = %template.id, name = %template.name, path = %path.display(), "template saved");
        Ok(TemplateSummary::of(template, saved_at))
    }

    async fn load(&self, id: &str) -> Result<Template> {
        let path = self.path_for(id)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CardError::TemplateNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(id = %id, "template loaded");
        Template::from_json(&text)
    }

    async fn list(&self) -> Result<Vec<TemplateSummary>> {
        let mut out = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = tokio::fs::read_to_string(&path).await?;
            match Template::from_json(&text) {
                Ok(template) => {
                    let saved_at = modified_at(&entry.metadata().await?);
                    out.push(TemplateSummary::of(&template, saved_at));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable template"),
            }
        }
        out.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(out)
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, (Template, DateTime<Utc>)>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn save(&self, template: &Template) -> Result<TemplateSummary> {
        template.validate_for_save()?;
        check_id(&template.id)?;
        let saved_at = Utc::now();
        self.templates
            .write()
            .await
            .insert(template.id.clone(), (template.clone(), saved_at));
        Ok(TemplateSummary::of(template, saved_at))
    }

    async fn load(&self, id: &str) -> Result<Template> {
        self.templates
            .read()
            .await
            .get(id)
            .map(|(t, _)| t.clone())
            .ok_or_else(|| CardError::TemplateNotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<TemplateSummary>> {
        let templates = self.templates.read().await;
        let mut out: Vec<_> = templates
            .values()
            .map(|(t, at)| TemplateSummary::of(t, *at))
            .collect();
        out.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(out)
    }
}
