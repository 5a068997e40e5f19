//! Categorisation prompt and reply parsing.

use super::providers::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SYSTEM_PROMPT: &str = "You are an efficient categorizer. Output only valid JSON.";

/// Category keys the model is asked to produce, in output order.
pub const CATEGORIES: [&str; 3] = ["productivity", "health", "creativity"];

/// One categorised item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hack {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// The model's reply once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorized {
    #[serde(default)]
    pub productivity: Vec<Hack>,
    #[serde(default)]
    pub health: Vec<Hack>,
    #[serde(default)]
    pub creativity: Vec<Hack>,
}

impl Categorized {
    /// Categories paired with their items, in [`CATEGORIES`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[Hack])> {
        CATEGORIES.into_iter().zip([
            self.productivity.as_slice(),
            self.health.as_slice(),
            self.creativity.as_slice(),
        ])
    }

    /// All items across categories, in category order.
    pub fn all_hacks(&self) -> impl Iterator<Item = &Hack> {
        self.iter().flat_map(|(_, hacks)| hacks.iter())
    }

    pub fn get(&self, category: &str) -> Option<&[Hack]> {
        self.iter()
            .find(|(name, _)| *name == category)
            .map(|(_, hacks)| hacks)
    }

    /// Serialised empty categorisation.
    pub fn empty_json() -> String {
        r#"{"productivity":[],"health":[],"creativity":[]}"#.to_string()
    }
}

/// Build the fixed categorisation instruction around the caller's request.
pub fn build_messages(request: &Map<String, Value>) -> Vec<ChatMessage> {
    let data = Value::Object(request.clone()).to_string();
    let prompt = format!(
        "Categorize the following search results into 'productivity', 'health', 'creativity'. \
         Filter for uniqueness. Output as JSON: {{'productivity': [list of {{'title': str, 'snippet': str}}], ...}} \
         Data: {}",
        data
    );

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
}

/// Parse a model reply into categories.
///
/// Markdown code fences are tolerated. Returns `None` when the reply is not a
/// JSON object naming at least one known category.
pub fn parse_categorized(reply: &str) -> Option<Categorized> {
    let value: Value = serde_json::from_str(strip_code_fence(reply)).ok()?;
    let object = value.as_object()?;

    if !CATEGORIES.iter().any(|c| object.contains_key(*c)) {
        return None;
    }

    serde_json::from_value(value).ok()
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    // Drop the info string ("json") on the opening fence line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim(),
    }
}
