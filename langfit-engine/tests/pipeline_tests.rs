//! End-to-end pipeline tests over the built-in catalog and template bank
//!
//! Covers:
//! - Candidate floor for all sixteen types
//! - Adaptive question validity
//! - Determinism of the full pipeline
//! - Score monotonicity while folding answers
//! - The documented scenarios (ESTJ classification, rust-only systems
//!   answer, singleton candidate set)
//! - Randomized sessions driven by a seeded RNG

use langfit_common::EngineConfig;
use langfit_engine::catalog::Catalog;
use langfit_engine::resolver::{fold_answers, seed_scores};
use langfit_engine::synthesizer::{AdaptiveAnswer, AdaptiveQuestion};
use langfit_engine::templates::TemplateBank;
use langfit_engine::{
    Phase, PersonalityType, QuestionCategory, QuizEngine, QuizEvent, QuizSession, ResolutionReason,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};

fn engine() -> QuizEngine {
    QuizEngine::builtin().expect("built-in data must load")
}

fn t(code: &str) -> PersonalityType {
    code.parse().unwrap()
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Personality answers that classify as `personality`
fn personality_answers_for(personality: PersonalityType) -> Vec<(String, String)> {
    let code = personality.code().to_lowercase();
    let letters: Vec<char> = code.chars().collect();
    vec![
        ("ei1".to_string(), format!("ei1{}", letters[0])),
        ("sn1".to_string(), format!("sn1{}", letters[1])),
        ("sn2".to_string(), format!("sn2{}", letters[1])),
        ("tf1".to_string(), format!("tf1{}", letters[2])),
        ("jp1".to_string(), format!("jp1{}", letters[3])),
    ]
}

fn answer_personality(
    engine: &QuizEngine,
    session: QuizSession,
    pairs: &[(String, String)],
) -> QuizSession {
    pairs.iter().fold(session, |session, (q, a)| {
        engine.apply(
            &session,
            QuizEvent::AnswerPersonality {
                question_id: q.clone(),
                answer_id: a.clone(),
            },
        )
    })
}

fn answer_language(
    engine: &QuizEngine,
    session: QuizSession,
    pairs: &[(String, String)],
) -> QuizSession {
    pairs.iter().fold(session, |session, (q, a)| {
        engine.apply(
            &session,
            QuizEvent::AnswerLanguage {
                question_id: q.clone(),
                answer_id: a.clone(),
            },
        )
    })
}

/// Answer every adaptive question with its first answer
fn first_answers(questions: &[AdaptiveQuestion]) -> Vec<(String, String)> {
    questions
        .iter()
        .map(|q| (q.id.clone(), q.answers[0].id.clone()))
        .collect()
}

#[test]
fn test_candidate_floor_for_every_type() {
    let engine = engine();
    assert!(engine.catalog().len() >= 6);

    for personality in PersonalityType::all() {
        let selection = engine.select(personality);
        assert!(
            selection.candidates.len() >= engine.config().candidate_floor,
            "{} has only {} candidates",
            personality,
            selection.candidates.len()
        );
        assert!(selection.candidates.len() <= engine.config().candidate_ceiling);
        assert!(selection.candidates.len() < engine.catalog().len());
    }
}

#[test]
fn test_adaptive_questions_are_valid_for_every_type() {
    let engine = engine();

    for personality in PersonalityType::all() {
        let candidates = engine.select(personality).into_candidates();
        let questions = engine.questions_for(&candidates, personality);

        assert!(!questions.is_empty(), "{} got no questions", personality);
        assert!(questions.len() <= engine.config().question_cap);

        let mut question_ids = HashSet::new();
        for question in &questions {
            assert!(
                question_ids.insert(question.id.clone()),
                "duplicate {}",
                question.id
            );
            assert!(
                question.answers.len() >= 2,
                "{} has < 2 answers",
                question.id
            );

            let mut answer_ids = HashSet::new();
            for answer in &question.answers {
                assert!(answer_ids.insert(answer.id.clone()));
                assert!(
                    !answer.languages.is_empty(),
                    "{}/{} is empty",
                    question.id,
                    answer.id
                );
                for language in &answer.languages {
                    assert!(
                        candidates.contains(language),
                        "{} offered in {} but not a candidate for {}",
                        language,
                        question.id,
                        personality
                    );
                }
            }
        }
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let engine = engine();

    for personality in PersonalityType::all() {
        let run = || {
            let session = answer_personality(
                &engine,
                engine.start(),
                &personality_answers_for(personality),
            );
            let answers = first_answers(&session.questions);
            answer_language(&engine, session, &answers)
        };
        let first = run();
        let second = run();

        assert_eq!(first.phase, Phase::Completed);
        assert_eq!(first.personality, Some(personality));
        assert_eq!(first.candidates, second.candidates);
        assert_eq!(first.questions, second.questions);
        assert_eq!(first.scores, second.scores);
        assert_eq!(first.result, second.result);
    }
}

#[test]
fn test_scores_never_decrease_while_folding() {
    let engine = engine();
    let personality = t("INTP");
    let candidates = engine.select(personality).into_candidates();
    let questions = engine.questions_for(&candidates, personality);

    let mut answers = BTreeMap::new();
    let mut previous = seed_scores(&candidates);
    for (index, question) in questions.iter().enumerate() {
        let answer = &question.answers[index % question.answers.len()];
        answers.insert(question.id.clone(), answer.id.clone());

        let mut scores = seed_scores(&candidates);
        fold_answers(&mut scores, &questions, &answers, &engine.config().weights);

        for (language, &before) in &previous {
            assert!(
                scores[language] >= before,
                "{} dropped from {}",
                language,
                before
            );
        }
        previous = scores;
    }
    assert!(previous.values().any(|&s| s > 0));
}

#[test]
fn test_all_extravert_sensing_thinking_judging_answers_give_estj() {
    let engine = engine();
    let session = answer_personality(
        &engine,
        engine.start(),
        &[
            ("ei1".to_string(), "ei1e".to_string()),
            ("sn1".to_string(), "sn1s".to_string()),
            ("sn2".to_string(), "sn2s".to_string()),
            ("tf1".to_string(), "tf1t".to_string()),
            ("jp1".to_string(), "jp1j".to_string()),
        ],
    );
    assert_eq!(session.personality, Some(t("ESTJ")));
    assert_eq!(session.phase, Phase::Language);
}

#[test]
fn test_unique_positive_score_wins_regardless_of_type() {
    let engine = engine();
    let candidates = ids(&["go", "rust", "java"]);
    let questions = vec![AdaptiveQuestion {
        id: "use_case".to_string(),
        prompt: "What will you build?".to_string(),
        category: QuestionCategory::Domain,
        answers: vec![
            AdaptiveAnswer {
                id: "use_systems".to_string(),
                prompt: "Systems software where every cycle counts".to_string(),
                languages: ids(&["rust"]),
            },
            AdaptiveAnswer {
                id: "use_services".to_string(),
                prompt: "Network services".to_string(),
                languages: ids(&["go", "java"]),
            },
        ],
        quality: 0.0,
    }];
    let answers: BTreeMap<String, String> =
        [("use_case".to_string(), "use_systems".to_string())].into();

    for personality in PersonalityType::all() {
        let scores = engine.score(&candidates, &questions, &answers);
        let resolution = engine.resolve(&scores, &candidates, personality);
        assert_eq!(resolution.language.id, "rust", "for {}", personality);
        assert_eq!(resolution.reason, ResolutionReason::TopScore);
    }
}

#[test]
fn test_singleton_candidate_set_completes_without_questions() {
    let all_types: Vec<String> = PersonalityType::all()
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect();
    let catalog = Catalog::from_toml_str(&format!(
        "[[language]]\nid = \"python\"\nname = \"Python\"\ndescription = \"Readable and versatile\"\naffinities = [{}]\n",
        all_types.join(", ")
    ))
    .unwrap();
    let engine = QuizEngine::new(
        catalog,
        TemplateBank::builtin().unwrap(),
        EngineConfig::default(),
    )
    .unwrap();

    assert!(engine.questions_for(&ids(&["python"]), t("ISFJ")).is_empty());

    let session = answer_personality(&engine, engine.start(), &personality_answers_for(t("ISFJ")));
    assert_eq!(session.phase, Phase::Completed);
    assert!(session.completed);
    assert!(session.questions.is_empty());
    assert_eq!(session.candidates, ids(&["python"]));
    let result = session.result.expect("completed session has a result");
    assert_eq!(result.id, "python");
    assert_eq!(
        session.resolution,
        Some(ResolutionReason::CandidateFallback)
    );
    assert!(!session.placeholder);
}

#[test]
fn test_seeded_random_sessions_always_complete() {
    let engine = engine();

    for seed in 0..200u64 {
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
        assert_eq!(session.phase, Phase::Language, "seed {}", seed);

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

        assert!(session.completed, "seed {} did not complete", seed);
        let result = session
            .result
            .as_ref()
            .expect("completed session has a result");
        assert!(!session.placeholder);
        assert!(engine.catalog().contains(&result.id));
        assert!(
            session.candidates.contains(&result.id),
            "seed {}: {} not a candidate",
            seed,
            result.id
        );
        assert_eq!(session.language_answers.len(), session.questions.len());
    }
}
