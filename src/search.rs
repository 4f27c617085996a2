use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryRecord {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeRecord {
    pub filename: String,
    pub description: String,
}

/// A stored record that the aggregator can match against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchableRecord<'a> {
    Diary(&'a DiaryRecord),
    Meme(&'a MemeRecord),
}

impl SearchableRecord<'_> {
    pub fn kind(&self) -> RecordKind {
        match self {
            SearchableRecord::Diary(_) => RecordKind::Diary,
            SearchableRecord::Meme(_) => RecordKind::Meme,
        }
    }

    /// Fields eligible for matching, in the order they are checked.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            SearchableRecord::Diary(d) => {
                vec![("title", d.title.as_str()), ("content", d.content.as_str())]
            }
            SearchableRecord::Meme(m) => vec![
                ("description", m.description.as_str()),
                ("filename", m.filename.as_str()),
            ],
        }
    }

    /// `needle` must already be lower-cased.
    fn contains(&self, needle: &str) -> bool {
        self.fields()
            .iter()
            .any(|(_, value)| value.to_lowercase().contains(needle))
    }

    fn to_match(&self) -> MatchResult {
        MatchResult {
            kind: self.kind(),
            fields: self
                .fields()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Diary,
    Meme,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Diary => "diary",
            RecordKind::Meme => "meme",
        }
    }
}

/// One search hit, detached from the record it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl MatchResult {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Filter both candidate collections by case-insensitive substring and merge
/// the hits: every diary match first, then every meme match, each in the
/// order supplied. A blank query yields nothing.
pub fn search(query: &str, diaries: &[DiaryRecord], memes: &[MemeRecord]) -> Vec<MatchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let results: Vec<MatchResult> = diaries
        .iter()
        .map(SearchableRecord::Diary)
        .chain(memes.iter().map(SearchableRecord::Meme))
        .filter(|record| record.contains(&needle))
        .map(|record| record.to_match())
        .collect();

    trace!(
        diaries = diaries.len(),
        memes = memes.len(),
        hits = results.len(),
        "search"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diary(title: &str, content: &str) -> DiaryRecord {
        DiaryRecord {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn meme(filename: &str, description: &str) -> MemeRecord {
        MemeRecord {
            filename: filename.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn matches_diary_content() {
        let diaries = vec![diary("Мой день", "сегодня был дождь")];
        let results = search("дождь", &diaries, &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, RecordKind::Diary);
        assert_eq!(results[0].field("title"), Some("Мой день"));
        assert_eq!(results[0].field("content"), Some("сегодня был дождь"));
    }

    #[test]
    fn matches_meme_case_insensitively() {
        let results = search("ДОЖДЬ", &[], &[meme("rain.png", "Опять ДоЖдЬ")]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, RecordKind::Meme);
        assert_eq!(results[0].field("filename"), Some("rain.png"));
    }

    #[test]
    fn inflected_form_is_not_a_substring() {
        // "дождь" ends in a soft sign, "дождливый" does not contain it.
        let memes = vec![meme("rain.png", "дождливый день")];
        assert!(search("ДОЖДЬ", &[], &memes).is_empty());
        assert_eq!(search("ДОЖД", &[], &memes).len(), 1);
    }

    #[test]
    fn matches_meme_by_filename() {
        let memes = vec![meme("Rain.PNG", "осень")];
        let results = search("rain", &[], &memes);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field("description"), Some("осень"));
    }

    #[test]
    fn matches_title_in_any_case() {
        let diaries = vec![diary("Про озеленение", "")];
        assert_eq!(search("ОЗЕЛЕНЕНИЕ", &diaries, &[]).len(), 1);
    }

    #[test]
    fn blank_query_returns_nothing() {
        let diaries = vec![diary("a", "b")];
        let memes = vec![meme("c.png", "d")];
        assert!(search("", &diaries, &memes).is_empty());
        assert!(search("   ", &diaries, &memes).is_empty());
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let diaries = vec![diary("жара", "")];
        assert_eq!(search("  жара ", &diaries, &[]).len(), 1);
    }

    #[test]
    fn diaries_come_before_memes_in_input_order() {
        let diaries = vec![diary("лес 1", ""), diary("поле", ""), diary("лес 2", "")];
        let memes = vec![meme("лес.png", ""), meme("x.png", "лесной пожар")];
        let results = search("лес", &diaries, &memes);

        let tags: Vec<(&str, Option<&str>)> = results
            .iter()
            .map(|r| {
                let key = match r.kind {
                    RecordKind::Diary => "title",
                    RecordKind::Meme => "filename",
                };
                (r.kind.as_str(), r.field(key))
            })
            .collect();
        assert_eq!(
            tags,
            vec![
                ("diary", Some("лес 1")),
                ("diary", Some("лес 2")),
                ("meme", Some("лес.png")),
                ("meme", Some("x.png")),
            ]
        );
    }

    #[test]
    fn multi_word_query_is_one_substring() {
        let diaries = vec![diary("день дождь", ""), diary("дождь день", "")];
        let results = search("дождь день", &diaries, &[]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field("title"), Some("дождь день"));
    }

    #[test]
    fn no_dedup_across_kinds() {
        let diaries = vec![diary("same", "same")];
        let memes = vec![meme("same", "same")];
        assert_eq!(search("same", &diaries, &memes).len(), 2);
    }

    #[test]
    fn empty_candidates_yield_empty_results() {
        assert!(search("anything", &[], &[]).is_empty());
    }

    #[test]
    fn serializes_with_type_tag() {
        let results = search("rain", &[], &[meme("rain.png", "wet")]);
        let json = serde_json::to_value(&results[0]).expect("json");
        assert_eq!(json["type"], "meme");
        assert_eq!(json["filename"], "rain.png");
        assert_eq!(json["description"], "wet");
    }
}
