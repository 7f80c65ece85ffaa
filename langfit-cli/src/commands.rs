//! Subcommand implementations
//!
//! Every command writes to a caller-supplied writer so the quiz loop can be
//! driven from scripted input in tests.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use langfit_engine::share::{self, ShareTarget};
use langfit_engine::{PersonalityType, QuizEngine, QuizEvent, QuizSession};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{info, warn};

/// Interactive quiz
pub fn play<R: BufRead, W: Write>(
    engine: &QuizEngine,
    base_url: &str,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Programming Language Personality Test")?;
    writeln!(out, "Answer with the number of your choice.")?;

    let mut session = engine.start();
    let bank = engine.personality_questions();

    for (index, question) in bank.iter().enumerate() {
        let options: Vec<&str> = question.answers.iter().map(|a| a.prompt).collect();
        let heading = format!("[{}/{}] {}", index + 1, bank.len(), question.prompt);
        let choice = ask(&mut input, out, &heading, &options)?;
        session = engine.apply(
            &session,
            QuizEvent::AnswerPersonality {
                question_id: question.id.to_string(),
                answer_id: question.answers[choice].id.to_string(),
            },
        );
    }

    if let Some(personality) = session.personality {
        writeln!(out)?;
        writeln!(out, "Your type: {}", personality)?;
        writeln!(out, "{}", personality.description())?;
        if !session.questions.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "Now a few questions about how you like to build software."
            )?;
        }
    }

    while let Some(question) = session.current_question().cloned() {
        let options: Vec<&str> = question.answers.iter().map(|a| a.prompt.as_str()).collect();
        let heading = format!(
            "[{}/{}] {}",
            session.cursor + 1,
            session.questions.len(),
            question.prompt
        );
        let choice = ask(&mut input, out, &heading, &options)?;
        session = engine.apply(
            &session,
            QuizEvent::AnswerLanguage {
                question_id: question.id.clone(),
                answer_id: question.answers[choice].id.clone(),
            },
        );
    }

    print_result(&session, base_url, out)
}

/// Prompt until a valid option number is entered; returns its index
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    heading: &str,
    options: &[&str],
) -> Result<usize> {
    writeln!(out)?;
    writeln!(out, "{}", heading)?;
    for (index, option) in options.iter().enumerate() {
        writeln!(out, "  {}) {}", index + 1, option)?;
    }

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("Input closed before the quiz finished");
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
            _ => writeln!(out, "Please enter a number between 1 and {}", options.len())?,
        }
    }
}

fn print_result<W: Write>(session: &QuizSession, base_url: &str, out: &mut W) -> Result<()> {
    if !session.is_completed() {
        bail!("Quiz ended before the result was resolved");
    }
    let (Some(result), Some(personality)) = (&session.result, session.personality) else {
        bail!("Quiz ended without a result");
    };

    writeln!(out)?;
    writeln!(out, "Your language: {}", result.name)?;
    writeln!(out, "{}", result.description)?;
    if !result.personality.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", result.personality)?;
    }
    if !result.strengths.is_empty() {
        writeln!(out)?;
        writeln!(out, "Strengths:")?;
        for strength in &result.strengths {
            writeln!(out, "  - {}", strength)?;
        }
    }
    if !result.use_cases.is_empty() {
        writeln!(out, "Great for:")?;
        for use_case in &result.use_cases {
            writeln!(out, "  - {}", use_case)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", share::share_text(&result.name, personality))?;
    writeln!(
        out,
        "{}",
        share::share_url(base_url, &result.id, personality)
    )?;
    Ok(())
}

/// Seeded random run
pub fn simulate<W: Write>(
    engine: &QuizEngine,
    base_url: &str,
    seed: u64,
    as_json: bool,
    out: &mut W,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = engine.start();

    for question in engine.personality_questions() {
        let answer = &question.answers[rng.gen_range(0..question.answers.len())];
        session = engine.apply(
            &session,
            QuizEvent::AnswerPersonality {
                question_id: question.id.to_string(),
                answer_id: answer.id.to_string(),
            },
        );
    }
    while let Some(question) = session.current_question().cloned() {
        let answer = &question.answers[rng.gen_range(0..question.answers.len())];
        session = engine.apply(
            &session,
            QuizEvent::AnswerLanguage {
                question_id: question.id.clone(),
                answer_id: answer.id.clone(),
            },
        );
    }
    info!(
        "Simulation with seed {} finished in {:?} phase",
        seed, session.phase
    );

    if as_json {
        serde_json::to_writer_pretty(&mut *out, &session)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut ranked: Vec<(&String, &u32)> = session.scores.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    writeln!(
        out,
        "Seed {}: {} answered {} adaptive questions",
        seed,
        session.personality_code().unwrap_or_default(),
        session.questions.len()
    )?;
    writeln!(out, "Top scores:")?;
    for (language, score) in ranked.iter().take(5) {
        writeln!(out, "  {:<14} {}", language, score)?;
    }
    if let Some(reason) = session.resolution {
        writeln!(out, "Resolution: {}", reason.as_str())?;
    }
    print_result(&session, base_url, out)
}

/// Candidate set and adaptive questions for a type
pub fn questions<W: Write>(
    engine: &QuizEngine,
    personality: PersonalityType,
    as_json: bool,
    out: &mut W,
) -> Result<()> {
    let selection = engine.select(personality);
    let questions = engine.questions_for(&selection.candidates, personality);

    if as_json {
        let document = json!({
            "personality": personality,
            "pass": selection.pass,
            "candidates": selection.candidates,
            "questions": questions,
        });
        serde_json::to_writer_pretty(&mut *out, &document)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{}: {} candidates ({:?} pass)",
        personality,
        selection.candidates.len(),
        selection.pass
    )?;
    writeln!(out, "  {}", selection.candidates.join(", "))?;

    for (index, question) in questions.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "{}. [{}] {} (quality {:.2})",
            index + 1,
            question.category.as_str(),
            question.prompt,
            question.quality
        )?;
        for answer in &question.answers {
            writeln!(
                out,
                "   - {} -> {}",
                answer.prompt,
                answer.languages.join(", ")
            )?;
        }
    }
    Ok(())
}

/// The sixteen types with their candidate counts
pub fn types<W: Write>(engine: &QuizEngine, out: &mut W) -> Result<()> {
    for personality in PersonalityType::all() {
        let selection = engine.select(personality);
        writeln!(
            out,
            "{}  {:>2} candidates  {}",
            personality,
            selection.candidates.len(),
            personality.description()
        )?;
    }
    Ok(())
}

pub fn share_encode<W: Write>(
    engine: &QuizEngine,
    base_url: &str,
    language_id: &str,
    personality: PersonalityType,
    out: &mut W,
) -> Result<()> {
    if !engine.catalog().contains(language_id) {
        warn!(
            "'{}' is not in the catalog; the link will show a placeholder",
            language_id
        );
    }
    let resolution = engine.shared_result(language_id, personality);
    let url = share::share_url(base_url, language_id, personality);
    let text = share::share_text(&resolution.language.name, personality);

    writeln!(out, "Token: {}", share::encode(language_id, personality))?;
    writeln!(out, "URL:   {}", url)?;
    writeln!(out, "Text:  {}", text)?;
    for target in ShareTarget::ALL {
        writeln!(out, "{:<9} {}", target.as_str(), target.link(&url, &text))?;
    }
    Ok(())
}

pub fn share_decode<W: Write>(
    engine: &QuizEngine,
    base_url: &str,
    token: &str,
    out: &mut W,
) -> Result<()> {
    let Some(shared) = share::decode_token_or_url(token) else {
        bail!("Share link is invalid");
    };
    let session = engine.apply(
        &engine.start(),
        QuizEvent::LoadSharedResult {
            language_id: shared.language_id,
            personality: shared.personality,
        },
    );
    writeln!(out, "Shared result for {}", shared.personality)?;
    print_result(&session, base_url, out)
}
