//! Generation metadata: extraction from the host prompt graph, annotation text, prompt tags

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `<lora:name:0.8>` style extra-network tokens
static EXTRA_NETWORK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Trailing `:1.2` emphasis weight
static WEIGHT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*:\s*-?\d+(\.\d+)?\s*$").expect("valid regex"));

/// Generation parameters recovered from the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub model_name: String,
    pub positive: String,
    pub negative: String,
    pub seed: Option<u64>,
    pub steps: Option<u64>,
    pub cfg: Option<f64>,
    pub sampler_name: Option<String>,
    pub scheduler: Option<String>,
    pub denoise: Option<f64>,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

impl GenerationInfo {
    /// Collect parameters from the host's prompt graph.
    ///
    /// `prompt` maps node ids to `{class_type, inputs}`. Nodes are visited in
    /// ascending id order and the first loader/sampler/latent node of each kind
    /// wins. Inputs wired to other nodes are arrays and are ignored. When the
    /// graph has no checkpoint loader, the saved workflow in `extra_pnginfo` is
    /// consulted for the model name.
    pub fn from_prompt_graph(
        positive: &str,
        negative: &str,
        prompt: Option<&Value>,
        extra_pnginfo: Option<&Value>,
    ) -> Self {
        let mut info = GenerationInfo {
            positive: positive.to_string(),
            negative: negative.to_string(),
            ..Default::default()
        };

        let mut checkpoint: Option<String> = None;
        let mut seen_sampler = false;
        let mut seen_latent = false;

        for (class_type, inputs) in ordered_nodes(prompt) {
            if checkpoint.is_none() {
                if class_type.starts_with("CheckpointLoader") {
                    checkpoint = string_input(inputs, "ckpt_name");
                } else if class_type == "UNETLoader" {
                    checkpoint = string_input(inputs, "unet_name");
                }
            }

            if !seen_sampler && class_type.starts_with("KSampler") {
                seen_sampler = true;
                info.seed = u64_input(inputs, "seed").or_else(|| u64_input(inputs, "noise_seed"));
                info.steps = u64_input(inputs, "steps");
                info.cfg = f64_input(inputs, "cfg");
                info.sampler_name = string_input(inputs, "sampler_name");
                info.scheduler = string_input(inputs, "scheduler");
                info.denoise = f64_input(inputs, "denoise");
            }

            if !seen_latent && class_type.starts_with("EmptyLatentImage") {
                seen_latent = true;
                info.width = u64_input(inputs, "width");
                info.height = u64_input(inputs, "height");
            }
        }

        if checkpoint.is_none() {
            checkpoint = workflow_checkpoint(extra_pnginfo);
        }

        info.model_name = checkpoint.as_deref().map(model_stem).unwrap_or_default();
        info
    }

    /// Human-readable annotation for the catalog item
    pub fn format_info(&self, memo: &str) -> String {
        let mut lines: Vec<String> = Vec::new();

        if !self.positive.trim().is_empty() {
            lines.push(self.positive.trim().to_string());
        }
        if !self.negative.trim().is_empty() {
            lines.push(format!("Negative prompt: {}", self.negative.trim()));
        }

        let params = self.parameter_line();
        if !params.is_empty() {
            lines.push(params);
        }

        let mut text = lines.join("\n");
        let memo = memo.trim();
        if !memo.is_empty() {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(memo);
        }
        text
    }

    fn parameter_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(steps) = self.steps {
            parts.push(format!("Steps: {}", steps));
        }
        if let Some(ref sampler) = self.sampler_name {
            parts.push(format!("Sampler: {}", sampler));
        }
        if let Some(ref scheduler) = self.scheduler {
            parts.push(format!("Scheduler: {}", scheduler));
        }
        if let Some(cfg) = self.cfg {
            parts.push(format!("CFG scale: {}", cfg));
        }
        if let Some(seed) = self.seed {
            parts.push(format!("Seed: {}", seed));
        }
        if let (Some(w), Some(h)) = (self.width, self.height) {
            parts.push(format!("Size: {}x{}", w, h));
        }
        if let Some(denoise) = self.denoise {
            parts.push(format!("Denoise: {}", denoise));
        }
        if !self.model_name.is_empty() {
            parts.push(format!("Model: {}", self.model_name));
        }
        parts.join(", ")
    }
}

/// Tags derived from a prompt: one per comma/line separated phrase, without
/// emphasis brackets, weights or extra-network tokens, first occurrence kept.
pub fn prompt_tags(prompt: &str) -> Vec<String> {
    let cleaned = EXTRA_NETWORK.replace_all(prompt, ",");
    let mut tags: Vec<String> = Vec::new();

    for raw in cleaned.split([',', '\n']) {
        let phrase = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | '{' | '}'));
        let phrase = WEIGHT_SUFFIX.replace(phrase, "");
        let phrase = phrase
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '{' | '}'))
            .to_string();

        if !phrase.is_empty() && !tags.contains(&phrase) {
            tags.push(phrase);
        }
    }
    tags
}

/// Checkpoint file name without directories or extension
pub fn model_stem(ckpt_name: &str) -> String {
    let file = ckpt_name.rsplit(['/', '\\']).next().unwrap_or(ckpt_name);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem.to_string(),
        _ => file.to_string(),
    }
}

fn ordered_nodes(prompt: Option<&Value>) -> Vec<(&str, &Value)> {
    let Some(Value::Object(graph)) = prompt else {
        return Vec::new();
    };

    let mut nodes: Vec<(&String, &Value)> = graph.iter().collect();
    let rank = |id: &str| id.parse::<u64>().unwrap_or(u64::MAX);
    nodes.sort_by(|(a, _), (b, _)| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));

    nodes
        .into_iter()
        .filter_map(|(_, node)| {
            let class_type = node.get("class_type")?.as_str()?;
            let inputs = node.get("inputs")?;
            Some((class_type, inputs))
        })
        .collect()
}

fn workflow_checkpoint(extra_pnginfo: Option<&Value>) -> Option<String> {
    extra_pnginfo?
        .get("workflow")?
        .get("nodes")?
        .as_array()?
        .iter()
        .filter(|node| {
            node.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| t.starts_with("CheckpointLoader"))
        })
        .find_map(|node| node.get("widgets_values")?.get(0)?.as_str().map(str::to_string))
}

fn string_input(inputs: &Value, key: &str) -> Option<String> {
    inputs.get(key)?.as_str().map(str::to_string)
}

fn u64_input(inputs: &Value, key: &str) -> Option<u64> {
    let value = inputs.get(key)?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

fn f64_input(inputs: &Value, key: &str) -> Option<f64> {
    inputs.get(key)?.as_f64()
}
