//! Send handlers behind the image and video nodes
//!
//! Each handler validates its inputs before touching the network, formats
//! the annotation, resolves the destination folder and registers the files.
//! Folder problems degrade to "no folder"; upload problems are returned.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info, warn};

use crate::client::CatalogClient;
use crate::error::{EagleError, Result};
use crate::metadata::{prompt_tags, GenerationInfo};
use crate::types::{CatalogItem, TagPolicy, METADATA_PNG_TAG};

/// Extension of the metadata snapshot written next to a video
pub const METADATA_SNAPSHOT_EXTENSION: &str = "png";

/// Inputs shared by both nodes
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub positive: String,
    pub negative: String,
    pub save_tags: TagPolicy,
    /// Folder name or id; empty means the catalog root
    pub folder: String,
    pub memo: String,
    /// Hidden host input: the executed prompt graph
    pub prompt: Option<Value>,
    /// Hidden host input: extra PNG info (saved workflow)
    pub extra_pnginfo: Option<Value>,
}

impl SendOptions {
    fn generation_info(&self) -> GenerationInfo {
        GenerationInfo::from_prompt_graph(
            &self.positive,
            &self.negative,
            self.prompt.as_ref(),
            self.extra_pnginfo.as_ref(),
        )
    }
}

/// Image node inputs: files already encoded by the host
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    pub images: Vec<PathBuf>,
    pub options: SendOptions,
}

impl ImageRequest {
    /// Check every input file; runs before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(EagleError::InvalidInput("no images to send".to_string()));
        }
        self.images.iter().try_for_each(|image| ensure_exists(image))
    }
}

/// Video node inputs
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub video_path: PathBuf,
    pub send_metadata_png: bool,
    pub options: SendOptions,
}

impl VideoRequest {
    pub fn validate(&self) -> Result<()> {
        ensure_exists(&self.video_path)
    }
}

/// Pass-through outputs for downstream nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutput {
    pub positive: String,
    pub negative: String,
}

impl NodeOutput {
    fn from_options(options: &SendOptions) -> Self {
        Self {
            positive: options.positive.clone(),
            negative: options.negative.clone(),
        }
    }
}

/// Tags for an item according to `policy`
pub fn build_tags(policy: TagPolicy, positive: &str, info: &GenerationInfo) -> Vec<String> {
    let mut tags = Vec::new();
    if policy.includes_prompt() {
        tags.extend(prompt_tags(positive));
    }
    if policy.includes_checkpoint() && !info.model_name.is_empty() {
        tags.push(info.model_name.clone());
    }
    tags
}

/// Send already-saved images to Eagle
pub async fn send_images(client: &CatalogClient, request: &ImageRequest) -> Result<NodeOutput> {
    request.validate()?;

    let options = &request.options;
    let generation = options.generation_info();
    let annotation = generation.format_info(&options.memo);
    let tags = build_tags(options.save_tags, &options.positive, &generation);
    let folder_id = resolve_folder(client, &options.folder).await;

    for image in &request.images {
        let item = CatalogItem::new(path_string(image), file_name(image))
            .with_annotation(annotation.clone())
            .with_tags(tags.clone());
        client.add_item_from_path(item, Some(folder_id.as_str())).await?;
    }

    info!("Sent {} image(s) to Eagle", request.images.len());
    Ok(NodeOutput::from_options(options))
}

/// Send a video and, optionally, its metadata snapshot image to Eagle
pub async fn send_video(client: &CatalogClient, request: &VideoRequest) -> Result<NodeOutput> {
    request.validate()?;
    let video = &request.video_path;

    let options = &request.options;
    let generation = options.generation_info();
    let annotation = generation.format_info(&options.memo);
    let folder_id = resolve_folder(client, &options.folder).await;
    let tags = build_tags(options.save_tags, &options.positive, &generation);

    let item = CatalogItem::new(path_string(video), file_name(video))
        .with_annotation(annotation.clone())
        .with_tags(tags.clone());
    client.add_item_from_path(item, Some(folder_id.as_str())).await?;

    if request.send_metadata_png {
        send_metadata_snapshot(client, video, &annotation, &tags, &folder_id).await?;
    }

    Ok(NodeOutput::from_options(options))
}

/// Path of the snapshot image belonging to `video`
pub fn metadata_snapshot_path(video: &Path) -> PathBuf {
    video.with_extension(METADATA_SNAPSHOT_EXTENSION)
}

async fn send_metadata_snapshot(
    client: &CatalogClient,
    video: &Path,
    annotation: &str,
    tags: &[String],
    folder_id: &str,
) -> Result<()> {
    let png = metadata_snapshot_path(video);
    if !png.exists() {
        info!("Metadata PNG not found: {}", png.display());
        return Ok(());
    }

    let mut snapshot_tags = tags.to_vec();
    snapshot_tags.push(METADATA_PNG_TAG.to_string());

    let item = CatalogItem::new(path_string(&png), file_name(&png))
        .with_annotation(format!(
            "{}\n[Metadata PNG for {}]",
            annotation,
            file_name(video)
        ))
        .with_tags(snapshot_tags);

    client
        .add_item_from_path(item, Some(folder_id))
        .await
        .inspect_err(|e| error!("Failed to send metadata PNG {}: {}", png.display(), e))?;
    Ok(())
}

async fn resolve_folder(client: &CatalogClient, folder: &str) -> String {
    let outcome = client.find_or_create_folder(folder).await;
    if let Some(ref e) = outcome.error {
        warn!("Folder '{}' unavailable, sending to root: {}", folder, e);
    }
    outcome.into_value()
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(EagleError::FileNotFound(path.to_path_buf()))
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
