use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use axum::body::Bytes;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use crate::uploads::UploadedImage;

#[derive(Clone, Debug)]
pub struct StagedImage {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Server-side state of a listing form between submissions.
#[derive(Clone, Debug)]
pub struct ListingDraft {
    pub kind: &'static str,
    pub fields: BTreeMap<String, String>,
    pub editing: Option<String>,
    pub existing_images: Vec<String>,
    pub staged: Vec<StagedImage>,
    touched: Instant,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub id: Uuid,
    pub url: String,
    pub file_name: String,
}

pub fn preview_url(draft: Uuid, image: Uuid) -> String {
    format!("/previews/{}/{}", draft, image)
}

impl ListingDraft {
    pub fn previews(&self, draft: Uuid) -> Vec<PreviewImage> {
        self.staged
            .iter()
            .map(|image| PreviewImage {
                id: image.id,
                url: preview_url(draft, image.id),
                file_name: image.file_name.clone(),
            })
            .collect()
    }
}

/// Bounds on what the store keeps in memory.
#[derive(Clone, Copy, Debug)]
pub struct DraftLimits {
    pub ttl: Duration,
    pub max_drafts: usize,
    pub max_staged_images: usize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    #[error("listing draft no longer exists")]
    Missing,
    #[error("A listing can hold at most {0} new images at a time")]
    TooMany(usize),
}

#[derive(Clone)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<Uuid, ListingDraft>>>,
    limits: DraftLimits,
}

impl DraftStore {
    pub fn new(limits: DraftLimits) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            limits,
        }
    }

    fn sweep(&self, drafts: &mut HashMap<Uuid, ListingDraft>) {
        let before = drafts.len();
        drafts.retain(|_, draft| draft.touched.elapsed() < self.limits.ttl);
        let swept = before - drafts.len();
        if swept > 0 {
            info!("Swept {} expired listing drafts", swept);
        }
    }

    /// Makes room for one more draft by dropping the least recently touched ones.
    fn evict_oldest(&self, drafts: &mut HashMap<Uuid, ListingDraft>) {
        while !drafts.is_empty() && drafts.len() >= self.limits.max_drafts {
            let oldest = drafts
                .iter()
                .min_by_key(|(_, draft)| draft.touched)
                .map(|(id, _)| *id);
            let Some(oldest) = oldest else {
                break;
            };
            drafts.remove(&oldest);
            info!("Evicted listing draft {} to stay under {} drafts", oldest, self.limits.max_drafts);
        }
    }

    pub async fn create(
        &self,
        kind: &'static str,
        fields: BTreeMap<String, String>,
        editing: Option<String>,
        existing_images: Vec<String>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let mut drafts = self.drafts.write().await;
        self.sweep(&mut drafts);
        self.evict_oldest(&mut drafts);
        drafts.insert(
            id,
            ListingDraft {
                kind,
                fields,
                editing,
                existing_images,
                staged: Vec::new(),
                touched: Instant::now(),
            },
        );
        id
    }

    /// Copy of a live draft of the given kind.
    pub async fn snapshot(&self, id: Uuid, kind: &str) -> Option<ListingDraft> {
        let drafts = self.drafts.read().await;
        drafts
            .get(&id)
            .filter(|draft| draft.kind == kind && draft.touched.elapsed() < self.limits.ttl)
            .cloned()
    }

    async fn with_draft<R>(&self, id: Uuid, change: impl FnOnce(&mut ListingDraft) -> R) -> Option<R> {
        let mut drafts = self.drafts.write().await;
        self.sweep(&mut drafts);
        let draft = drafts.get_mut(&id)?;
        draft.touched = Instant::now();
        Some(change(draft))
    }

    pub async fn update_fields(&self, id: Uuid, fields: BTreeMap<String, String>) -> bool {
        self.with_draft(id, |draft| draft.fields = fields).await.is_some()
    }

    /// Adds an already validated batch and returns the new preview entries. A batch that
    /// would push the draft over its image cap is refused whole.
    pub async fn stage(&self, id: Uuid, images: Vec<UploadedImage>) -> Result<Vec<PreviewImage>, StageError> {
        let max_staged = self.limits.max_staged_images;
        self.with_draft(id, |draft| {
            if draft.staged.len() + images.len() > max_staged {
                return Err(StageError::TooMany(max_staged));
            }
            let previews: Vec<PreviewImage> = images
                .into_iter()
                .map(|image| {
                    let staged = StagedImage {
                        id: Uuid::new_v4(),
                        file_name: image.file_name,
                        content_type: image
                            .content_type
                            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
                        bytes: image.bytes,
                    };
                    let preview = PreviewImage {
                        id: staged.id,
                        url: preview_url(id, staged.id),
                        file_name: staged.file_name.clone(),
                    };
                    draft.staged.push(staged);
                    preview
                })
                .collect();
            Ok(previews)
        })
        .await
        .unwrap_or(Err(StageError::Missing))
    }

    /// Drops one staged image; its preview URL stops resolving.
    pub async fn revoke(&self, id: Uuid, image: Uuid) -> bool {
        self.with_draft(id, |draft| {
            let before = draft.staged.len();
            draft.staged.retain(|staged| staged.id != image);
            draft.staged.len() != before
        })
        .await
        .unwrap_or(false)
    }

    /// Back to an empty create form: every staged image is revoked and the edit target forgotten.
    pub async fn reset(&self, id: Uuid, fields: BTreeMap<String, String>) -> bool {
        self.with_draft(id, |draft| {
            draft.fields = fields;
            draft.editing = None;
            draft.existing_images.clear();
            draft.staged.clear();
        })
        .await
        .is_some()
    }

    pub async fn discard(&self, id: Uuid) {
        self.drafts.write().await.remove(&id);
    }

    pub async fn preview(&self, id: Uuid, image: Uuid) -> Option<(String, Bytes)> {
        let drafts = self.drafts.read().await;
        let draft = drafts
            .get(&id)
            .filter(|draft| draft.touched.elapsed() < self.limits.ttl)?;
        draft
            .staged
            .iter()
            .find(|staged| staged.id == image)
            .map(|staged| (staged.content_type.clone(), staged.bytes.clone()))
    }
}
