use std::fs::File;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::faq::{FALLBACK_ANSWER, firing_entries, join_answers};
use crate::knowledge::KnowledgeBase;

pub const DEFAULT_REQUIRED_PASS_RATE: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    /// `None` means the case expects the fallback sentence.
    #[serde(default)]
    pub expected_answer: Option<String>,
}

impl EvalCase {
    fn expected(&self) -> &str {
        self.expected_answer.as_deref().unwrap_or(FALLBACK_ANSWER)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_answer: String,
    pub fired: Vec<String>,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f32,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f32) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

pub fn read_eval_cases_json(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path)?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file)?;

    if let Some(case) = cases.iter().find(|c| c.question.trim().is_empty()) {
        return Err(MatchError::InvalidInput(format!(
            "case {}: question must not be empty",
            case.case_id
        )));
    }
    Ok(cases)
}

pub fn evaluate_cases(kb: &KnowledgeBase, cases: &[EvalCase]) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let entries = firing_entries(&case.question, kb);
        let actual = join_answers(&entries);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let fired = entries.iter().map(|entry| entry.topic_phrase()).collect();

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed: actual == case.expected(),
            actual_answer: actual,
            fired,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}
