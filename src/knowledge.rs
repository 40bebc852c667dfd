use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{AnswerResult, House, KnowledgeEntry};

pub const DEFAULT_ANSWER: &str =
    "I don't have specific information about that from the available knowledge.";

// Priority order matters: the first keyword found in the question wins.
const BUILTIN_KNOWLEDGE: &[(&str, &str)] = &[
    (
        "ned stark",
        "Eddard \"Ned\" Stark was the Lord of Winterfell and Warden of the North. He was known \
         for his honor and integrity. He served as Hand of the King to Robert Baratheon before \
         being executed by Joffrey Baratheon.",
    ),
    (
        "jon snow",
        "Jon Snow is the bastard son of Eddard Stark who joined the Night's Watch. He later \
         became Lord Commander and was eventually revealed to be the son of Lyanna Stark and \
         Rhaegar Targaryen.",
    ),
    (
        "winterfell",
        "Winterfell is the ancestral castle of House Stark and the seat of power in the North. \
         It was built over a natural hot spring, with hot water running through the walls to \
         keep it warm during the harsh northern winters.",
    ),
    (
        "targaryen",
        "House Targaryen is a noble family of Valyrian descent who once ruled the Seven \
         Kingdoms. They are known for their silver hair, purple eyes, and their ability to \
         bond with dragons.",
    ),
    (
        "lannister",
        "House Lannister is one of the Great Houses of the Seven Kingdoms, ruling over the \
         Westerlands from their seat of Casterly Rock. They are known for their wealth and \
         their saying, \"A Lannister always pays his debts.\"",
    ),
    (
        "tyrion",
        "Tyrion Lannister is the youngest son of Tywin Lannister. He is a dwarf and known for \
         his high intelligence and wit. Despite facing prejudice throughout his life, he served \
         as Hand of the King to Daenerys Targaryen.",
    ),
    (
        "casterly rock",
        "Casterly Rock is the ancestral seat of House Lannister. The fortress is carved out of \
         a great stone hill and is one of the strongest castles in the Seven Kingdoms. Beneath \
         it are gold mines that made the Lannisters the richest family in Westeros.",
    ),
    (
        "tywin",
        "Tywin Lannister was the head of House Lannister, Lord of Casterly Rock, and Warden of \
         the West. He was known for his strategic mind, ruthlessness, and his dedication to \
         family legacy.",
    ),
];

const HOUSE_MARKERS: &[(House, &[&str])] = &[
    (House::Stark, &["stark"]),
    (House::Lannister, &["lannister", "tyrion", "tywin", "casterly"]),
    (House::Targaryen, &["targaryen"]),
];

/// First house whose marker appears in `text`, case-insensitively.
pub fn detect_house(text: &str) -> Option<House> {
    let lower = text.to_lowercase();
    HOUSE_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| lower.contains(marker)))
        .map(|(house, _)| *house)
}

/// Local, deterministic answer source keyed by topic keywords.
#[derive(Clone, Debug)]
pub struct KeywordResponder {
    entries: Vec<KnowledgeEntry>,
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self {
            entries: BUILTIN_KNOWLEDGE
                .iter()
                .map(|(keyword, answer)| KnowledgeEntry::new(*keyword, *answer))
                .collect(),
        }
    }
}

impl KeywordResponder {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        if entries.is_empty() {
            anyhow::bail!("knowledge base must contain at least one entry");
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                anyhow::bail!("knowledge base contains an empty keyword");
            }
            if !seen.insert(keyword.clone()) {
                anyhow::bail!("duplicate knowledge keyword: {}", keyword);
            }
            normalized.push(KnowledgeEntry {
                keyword,
                answer: entry.answer,
            });
        }

        Ok(Self {
            entries: normalized,
        })
    }

    /// Loads a JSON array of `{keyword, answer}` objects; file order is priority order.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading knowledge base: {}", path.display()))?;
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid knowledge base JSON: {}", path.display()))?;
        Self::new(entries)
            .with_context(|| format!("invalid knowledge base: {}", path.display()))
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn lookup(&self, question: &str) -> AnswerResult {
        let lower = question.to_lowercase();
        let text = self
            .entries
            .iter()
            .find(|entry| lower.contains(entry.keyword.as_str()))
            .map(|entry| entry.answer.as_str())
            .unwrap_or(DEFAULT_ANSWER);

        AnswerResult::success(text, detect_house(&lower))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::AnswerStatus;

    #[test]
    fn jon_snow_question_mentions_nights_watch_without_house() {
        let result = KeywordResponder::default().lookup("Tell me about Jon Snow");
        assert_eq!(result.status, AnswerStatus::Success);
        assert!(result.text.contains("Night's Watch"));
        assert_eq!(result.source_house, None);
    }

    #[test]
    fn casterly_rock_matches_lannister_entry_when_configured() {
        let result = KeywordResponder::default().lookup("What is Casterly Rock?");
        assert!(result.text.starts_with("Casterly Rock is the ancestral seat"));
        assert_eq!(result.source_house, Some(House::Lannister));
    }

    #[test]
    fn casterly_rock_falls_to_default_without_matching_keyword() {
        let responder =
            KeywordResponder::new(vec![KnowledgeEntry::new("winterfell", "A northern castle.")])
                .unwrap();
        let result = responder.lookup("What is Casterly Rock?");
        assert_eq!(result.text, DEFAULT_ANSWER);
        assert_eq!(result.status, AnswerStatus::Success);
        assert_eq!(result.source_house, Some(House::Lannister));
    }

    #[test]
    fn first_keyword_in_table_order_wins() {
        let result = KeywordResponder::default().lookup("Is Tyrion a Lannister?");
        assert!(result.text.starts_with("House Lannister is one of the Great Houses"));
    }

    #[test]
    fn empty_and_unknown_questions_get_default_answer() {
        let responder = KeywordResponder::default();
        for question in ["", "   ", "banana bread recipe"] {
            let result = responder.lookup(question);
            assert_eq!(result.text, DEFAULT_ANSWER);
            assert_eq!(result.status, AnswerStatus::Success);
            assert_eq!(result.source_house, None);
        }
    }

    #[test]
    fn house_detection_follows_marker_priority() {
        assert_eq!(detect_house("the STARK children"), Some(House::Stark));
        assert_eq!(detect_house("Tywin's gold"), Some(House::Lannister));
        assert_eq!(detect_house("Stark and Targaryen blood"), Some(House::Stark));
        assert_eq!(detect_house("dragons of old Valyria"), None);
    }

    #[test]
    fn rejects_empty_and_duplicate_tables() {
        assert!(KeywordResponder::new(vec![]).is_err());
        assert!(KeywordResponder::new(vec![
            KnowledgeEntry::new("Tywin", "one"),
            KnowledgeEntry::new("tywin ", "two"),
        ])
        .is_err());
    }

    #[test]
    fn load_reads_json_table_in_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"keyword": "Dragonstone", "answer": "An island fortress."}},
               {{"keyword": "dragon", "answer": "A large winged beast."}}]"#
        )
        .unwrap();

        let responder = KeywordResponder::load(file.path()).unwrap();
        assert_eq!(responder.entries()[0].keyword, "dragonstone");
        assert_eq!(
            responder.lookup("Who holds Dragonstone?").text,
            "An island fortress."
        );
        assert_eq!(responder.lookup("Show me a dragon").text, "A large winged beast.");
    }
}
