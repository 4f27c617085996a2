use std::path::Path;

use tracing::{debug, info};

use crate::cli::{Cli, Command};
use crate::error::{MatchError, Result};
use crate::eval::{EvalSummary, evaluate_cases, read_eval_cases_json};
use crate::faq::answer;
use crate::knowledge::{KnowledgeBase, load_knowledge_jsonl};
use crate::normalize::normalize;
use crate::search::{DiaryRecord, MatchResult, MemeRecord, search};
use crate::storage::load_optional_jsonl;

pub enum Report {
    Answer {
        question: String,
        answer: String,
    },
    Search {
        query: String,
        results: Vec<MatchResult>,
    },
    Normalized {
        text: String,
        normalized: String,
    },
    Eval {
        run_id: String,
        required_pass_rate: f32,
        summary: EvalSummary,
    },
}

impl Report {
    pub fn succeeded(&self) -> bool {
        match self {
            Report::Eval {
                required_pass_rate,
                summary,
                ..
            } => summary.meets(*required_pass_rate),
            _ => true,
        }
    }
}

pub fn load_knowledge(path: Option<&Path>) -> Result<KnowledgeBase> {
    match path {
        Some(path) => load_knowledge_jsonl(path),
        None => {
            debug!("using built-in knowledge base");
            Ok(KnowledgeBase::builtin())
        }
    }
}

pub fn run_command(cli: &Cli) -> Result<Report> {
    cli.validate().map_err(MatchError::InvalidArg)?;

    match &cli.command {
        Command::Ask { question } => {
            let kb = load_knowledge(cli.kb.as_deref())?;
            Ok(Report::Answer {
                question: question.clone(),
                answer: answer(question, &kb),
            })
        }
        Command::Search {
            query,
            diary,
            memes,
        } => {
            let diaries: Vec<DiaryRecord> = load_optional_jsonl(diary.as_deref())?;
            let memes: Vec<MemeRecord> = load_optional_jsonl(memes.as_deref())?;
            Ok(Report::Search {
                query: query.trim().to_string(),
                results: search(query, &diaries, &memes),
            })
        }
        Command::Normalize { text } => Ok(Report::Normalized {
            text: text.clone(),
            normalized: normalize(text),
        }),
        Command::Eval {
            cases,
            min_pass_rate,
        } => {
            let kb = load_knowledge(cli.kb.as_deref())?;
            let cases = read_eval_cases_json(cases)?;
            let run_id = format!("eval-{}", chrono::Utc::now().timestamp_millis());
            let summary = evaluate_cases(&kb, &cases);
            info!(
                run_id = %run_id,
                total = summary.total,
                passed = summary.passed,
                "evaluation finished"
            );
            Ok(Report::Eval {
                run_id,
                required_pass_rate: *min_pass_rate,
                summary,
            })
        }
    }
}
