//! Product outputs derived from a categorised reply.
//!
//! One generation call feeds five downstream products: a newsletter, a tool
//! vault, forum topics, a coaching bot knowledge base, and workshop sessions.

use super::categorize::{Categorized, Hack};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const NEWSLETTER_ITEMS: usize = 5;
const FORUM_TOPICS: usize = 3;
const WORKSHOP_MATERIALS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOutputs {
    pub newsletter: Newsletter,
    pub tool_vault: ToolVault,
    pub forum: Forum,
    pub coaching_bot: CoachingBot,
    pub workshops: Workshops,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Newsletter {
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolVault {
    pub updates: Vec<Hack>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forum {
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachingBot {
    pub knowledge_base: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workshops {
    pub sessions: Vec<WorkshopSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkshopSession {
    pub theme: String,
    pub materials: Vec<String>,
}

/// A caller-supplied profile used to personalise the coaching bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub interest: Option<String>,
}

/// Read `user_profiles` from the request, skipping entries without an id.
pub fn user_profiles(request: &Map<String, Value>) -> Vec<UserProfile> {
    let Some(profiles) = request.get("user_profiles").and_then(Value::as_array) else {
        return Vec::new();
    };

    profiles
        .iter()
        .filter_map(|profile| {
            let id = match profile.get("id")? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let interest = profile
                .get("interest")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(UserProfile { id, interest })
        })
        .collect()
}

/// Titles of the request's `raw_data` items, in order.
pub fn raw_titles(request: &Map<String, Value>) -> Vec<String> {
    request
        .get("raw_data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("title").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn build_outputs(
    categorized: &Categorized,
    raw_titles: &[String],
    profiles: &[UserProfile],
) -> ProductOutputs {
    let newsletter = Newsletter {
        content: categorized
            .all_hacks()
            .take(NEWSLETTER_ITEMS)
            .map(|h| h.snippet.clone())
            .collect(),
    };

    let tool_vault = ToolVault {
        updates: categorized
            .all_hacks()
            .filter(|h| h.snippet.to_lowercase().contains("tool"))
            .cloned()
            .collect(),
    };

    let topics = if raw_titles.is_empty() {
        categorized
            .all_hacks()
            .take(FORUM_TOPICS)
            .map(|h| h.title.clone())
            .collect()
    } else {
        raw_titles.iter().take(FORUM_TOPICS).cloned().collect()
    };

    let mut knowledge_base: BTreeMap<String, Vec<String>> = categorized
        .iter()
        .map(|(category, hacks)| (category.to_string(), snippets(hacks)))
        .collect();
    for profile in profiles {
        let Some(hacks) = profile.interest.as_deref().and_then(|i| categorized.get(i)) else {
            continue;
        };
        knowledge_base.insert(profile.id.clone(), snippets(hacks));
    }

    let sessions = categorized
        .iter()
        .map(|(category, hacks)| WorkshopSession {
            theme: category.to_string(),
            materials: hacks
                .iter()
                .take(WORKSHOP_MATERIALS)
                .map(|h| h.snippet.clone())
                .collect(),
        })
        .collect();

    ProductOutputs {
        newsletter,
        tool_vault,
        forum: Forum { topics },
        coaching_bot: CoachingBot { knowledge_base },
        workshops: Workshops { sessions },
    }
}

fn snippets(hacks: &[Hack]) -> Vec<String> {
    hacks.iter().map(|h| h.snippet.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hack(title: &str, snippet: &str) -> Hack {
        Hack {
            title: title.to_string(),
            snippet: snippet.to_string(),
        }
    }

    fn sample() -> Categorized {
        Categorized {
            productivity: vec![
                hack("Pomodoro", "Use a timer tool for focus"),
                hack("Inbox zero", "Batch email twice a day"),
                hack("Time blocking", "Plan the day in blocks"),
            ],
            health: vec![
                hack("Walks", "Walk after lunch"),
                hack("Sleep", "Same bedtime daily"),
            ],
            creativity: vec![hack("Morning pages", "Write three pages with any TOOL")],
        }
    }

    #[test]
    fn newsletter_takes_first_five_snippets_across_categories() {
        let outputs = build_outputs(&sample(), &[], &[]);
        assert_eq!(
            outputs.newsletter.content,
            vec![
                "Use a timer tool for focus",
                "Batch email twice a day",
                "Plan the day in blocks",
                "Walk after lunch",
                "Same bedtime daily",
            ]
        );
    }

    #[test]
    fn tool_vault_matches_case_insensitively() {
        let outputs = build_outputs(&sample(), &[], &[]);
        let titles: Vec<_> = outputs.tool_vault.updates.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Pomodoro", "Morning pages"]);
    }

    #[test]
    fn forum_prefers_raw_titles() {
        let raw = vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ];
        let outputs = build_outputs(&sample(), &raw, &[]);
        assert_eq!(outputs.forum.topics, vec!["a", "b", "c"]);

        let outputs = build_outputs(&sample(), &[], &[]);
        assert_eq!(
            outputs.forum.topics,
            vec!["Pomodoro", "Inbox zero", "Time blocking"]
        );
    }

    #[test]
    fn coaching_bot_personalises_known_interests_only() {
        let profiles = vec![
            UserProfile {
                id: "u1".to_string(),
                interest: Some("health".to_string()),
            },
            UserProfile {
                id: "u2".to_string(),
                interest: Some("finance".to_string()),
            },
        ];
        let outputs = build_outputs(&sample(), &[], &profiles);
        let kb = &outputs.coaching_bot.knowledge_base;

        assert_eq!(kb["u1"], vec!["Walk after lunch", "Same bedtime daily"]);
        assert!(!kb.contains_key("u2"));
        assert_eq!(kb["creativity"].len(), 1);
    }

    #[test]
    fn workshops_cover_every_category_with_two_materials() {
        let outputs = build_outputs(&sample(), &[], &[]);
        let sessions = &outputs.workshops.sessions;

        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].theme, "productivity");
        assert_eq!(sessions[0].materials.len(), 2);
        assert_eq!(sessions[2].theme, "creativity");
        assert_eq!(sessions[2].materials.len(), 1);
    }

    #[test]
    fn reads_profiles_and_raw_titles_leniently() {
        let request = json!({
            "user_profiles": [
                {"id": "alice", "interest": "health"},
                {"id": 7},
                {"interest": "creativity"}
            ],
            "raw_data": [{"title": "One"}, {"snippet": "no title"}, {"title": "Two"}]
        });
        let request = request.as_object().unwrap();

        assert_eq!(
            user_profiles(request),
            vec![
                UserProfile {
                    id: "alice".to_string(),
                    interest: Some("health".to_string()),
                },
                UserProfile {
                    id: "7".to_string(),
                    interest: None,
                },
            ]
        );
        assert_eq!(raw_titles(request), vec!["One", "Two"]);
    }
}
