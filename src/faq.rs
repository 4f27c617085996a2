use tracing::trace;

use crate::knowledge::{KnowledgeBase, KnowledgeEntry};

pub const FALLBACK_ANSWER: &str = "I don't know the answer to this yet, try rephrasing.";

/// Entries whose topic words all occur in `question`, in knowledge-base order.
///
/// The question is only lower-cased, not normalized. Each topic word is
/// tested as a plain substring, so "вода" also fires on "водами".
pub fn firing_entries<'a>(question: &str, kb: &'a KnowledgeBase) -> Vec<&'a KnowledgeEntry> {
    let question = question.to_lowercase();
    kb.entries()
        .iter()
        .filter(|entry| {
            entry
                .topic_words()
                .iter()
                .all(|word| question.contains(word.as_str()))
        })
        .collect()
}

/// Answer `question` from `kb`.
///
/// Callers must only pass a present, non-empty question. Answers of all
/// firing entries are joined with a single space; when nothing fires the
/// result is [`FALLBACK_ANSWER`].
pub fn answer(question: &str, kb: &KnowledgeBase) -> String {
    let fired = firing_entries(question, kb);
    trace!(fired = fired.len(), "faq match");
    join_answers(&fired)
}

/// Space-join the answers of `fired`, or [`FALLBACK_ANSWER`] when it is empty.
pub fn join_answers(fired: &[&KnowledgeEntry]) -> String {
    if fired.is_empty() {
        return FALLBACK_ANSWER.to_string();
    }

    fired
        .iter()
        .map(|entry| entry.answer())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb(pairs: &[(&str, &str)]) -> KnowledgeBase {
        KnowledgeBase::from_pairs(pairs.iter().copied()).expect("kb")
    }

    #[test]
    fn single_entry_fires() {
        let kb = kb(&[("озеленение городов", "helps cool cities")]);
        assert_eq!(
            answer("расскажи про озеленение городов", &kb),
            "helps cool cities"
        );
    }

    #[test]
    fn falls_back_when_not_all_words_present() {
        let kb = kb(&[("озеленение городов", "helps cool cities")]);
        assert_eq!(answer("что такое загрязнение воздуха", &kb), FALLBACK_ANSWER);
        assert_eq!(answer("озеленение крыш", &kb), FALLBACK_ANSWER);
    }

    #[test]
    fn joins_all_firing_answers_in_kb_order() {
        let kb = kb(&[
            ("загрязнение воздуха", "air"),
            ("засуха", "unrelated"),
            ("транспорт и климат", "transport"),
        ]);
        let q = "как транспорт и климат связаны с загрязнение воздуха";
        assert_eq!(answer(q, &kb), "air transport");
    }

    #[test]
    fn reordering_kb_reorders_but_keeps_set() {
        let forward = kb(&[("a", "first"), ("b", "second")]);
        let backward = kb(&[("b", "second"), ("a", "first")]);
        assert_eq!(answer("a b", &forward), "first second");
        assert_eq!(answer("a b", &backward), "second first");
    }

    #[test]
    fn word_order_does_not_matter() {
        let kb = kb(&[("урожай и климат", "harvest")]);
        assert_eq!(answer("климат и урожай", &kb), "harvest");
    }

    #[test]
    fn topic_word_matches_inside_longer_word() {
        let kb = kb(&[("вода", "water")]);
        assert_eq!(answer("под водами", &kb), "water");
        // "подводный" spells "подвод-", so it does not contain "вода".
        assert_eq!(answer("подводный мир", &kb), FALLBACK_ANSWER);
    }

    #[test]
    fn question_case_is_ignored_but_punctuation_is_not_stripped() {
        let kb = kb(&[("ipcc", "panel"), ("засуха", "drought")]);
        assert_eq!(answer("Что такое IPCC?", &kb), "panel");
        assert_eq!(answer("ЗАСУХА!!!", &kb), "drought");
        // Punctuation inside a topic word's span blocks the match.
        assert_eq!(answer("за-суха", &kb), FALLBACK_ANSWER);
    }

    #[test]
    fn duplicate_topics_both_fire() {
        let kb = kb(&[("ледники", "one"), ("ледники", "two")]);
        assert_eq!(answer("ледники тают", &kb), "one two");
    }

    #[test]
    fn is_deterministic() {
        let kb = KnowledgeBase::builtin();
        let q = "глобальное потепление и океан, а также здоровье";
        assert_eq!(answer(q, &kb), answer(q, &kb));
    }

    #[test]
    fn builtin_table_answers_overlapping_topics() {
        let kb = KnowledgeBase::builtin();
        let fired: Vec<String> = firing_entries("глобальное потепление и здоровье", &kb)
            .into_iter()
            .map(|e| e.topic_phrase())
            .collect();
        assert_eq!(fired, vec!["глобальное потепление и здоровье"]);
    }

    #[test]
    fn empty_kb_falls_back() {
        assert_eq!(answer("anything", &KnowledgeBase::default()), FALLBACK_ANSWER);
    }
}
