//! End-to-end session flows through the public facade.

use std::collections::HashSet;
use std::sync::Arc;

use eco_quiz::backend::{MemoryBackend, Report, SessionController};
use eco_quiz::core::{Randomizer, Session, SessionEvent};
use eco_quiz::types::{
    AnswerRecord, Phase, Question, QuizAction, QuizOption, SessionKind, ANSWER_REVEAL_MS,
    INFO_PHASE_MS, QUESTION_PHASE_MS, TICK_MS,
};

fn paper_pool(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                format!("paper-{i}"),
                "paper",
                format!("Paper question {i}"),
                vec![
                    QuizOption::new("A", "Blue bin"),
                    QuizOption::new("B", "Yellow bin"),
                    QuizOption::new("C", "General waste"),
                    QuizOption::new("D", "Compost"),
                ],
                ["A", "B", "C", "D"][i % 4],
            )
            .unwrap()
        })
        .collect()
}

fn challenge() -> SessionKind {
    SessionKind::Challenge {
        category: "paper".into(),
    }
}

/// Drive the session in front-end sized ticks, answering correctly as soon
/// as the countdown shows `answer_at`.
fn play(session: &mut Session, answer_at: u8) {
    while !session.ended() {
        if session.phase() == Phase::ShowOptions
            && !session.current_answered()
            && session.countdown() == answer_at
        {
            let correct = session.current_question().unwrap().correct;
            assert!(session.apply_action(QuizAction::Select(correct)));
        }
        session.tick(TICK_MS);
    }
}

#[tokio::test]
async fn full_paper_challenge_scores_1750() {
    let backend = Arc::new(MemoryBackend::with_questions(paper_pool(50)));
    let mut ctl = SessionController::new(backend.clone(), Randomizer::new(2024));

    let session = ctl.start(challenge()).await.unwrap();
    assert_eq!(session.questions().len(), 10);
    let ids: HashSet<_> = session.questions().iter().map(|q| q.id.clone()).collect();
    assert_eq!(ids.len(), 10, "questions must be unique");

    // Answer right after the first countdown tick.
    play(session, 7);

    let result = session.result().unwrap();
    assert!(result.completed);
    assert_eq!(result.score, 1750);
    assert_eq!(result.correct, 10);
    assert_eq!(result.reward.stars, 3);
    assert_eq!(result.reward.currency, 80);
    assert_eq!(session.phase(), Phase::GameEnded);

    ctl.report().await.unwrap();
    assert_eq!(
        backend.reports().await,
        vec![Report::QuestionStats {
            category: "paper".into(),
            total_answered: 10,
            correct_count: 10,
        }]
    );
}

#[test]
fn unanswered_session_times_out_with_zero_reward() {
    let mut randomizer = Randomizer::new(9);
    let questions = randomizer.randomize(&paper_pool(12), 10);
    let mut session = Session::new(challenge(), questions);
    session.start();

    while !session.ended() {
        session.tick(TICK_MS);
    }

    let result = session.result().unwrap();
    assert!(result.completed);
    assert_eq!(result.score, 0);
    assert_eq!(result.answered, 0);
    assert_eq!(result.reward.stars, 0);
    assert_eq!(result.reward.currency, 0);
    for i in 0..10 {
        assert_eq!(session.answer_for(i), Some(AnswerRecord::TimedOut));
    }
}

#[test]
fn phases_follow_the_documented_order() {
    let mut session = Session::new(challenge(), paper_pool(2));
    session.start();

    // ShowInfo then ShowQuestion at exactly the configured delays.
    assert_eq!(session.phase(), Phase::ShowInfo);
    session.tick(INFO_PHASE_MS - 1);
    assert_eq!(session.phase(), Phase::ShowInfo);
    session.tick(1);
    assert_eq!(session.phase(), Phase::ShowQuestion);
    session.tick(QUESTION_PHASE_MS);
    assert_eq!(session.phase(), Phase::ShowOptions);

    let correct = session.current_question().unwrap().correct;
    assert!(session.select(correct));
    assert_eq!(session.score(), 200);
    session.tick(ANSWER_REVEAL_MS);
    assert_eq!(session.phase(), Phase::Transitioning);

    while !session.ended() {
        session.tick(TICK_MS);
    }

    let phases: Vec<Phase> = session
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::PhaseEntered { phase, .. } => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            Phase::ShowInfo,
            Phase::ShowQuestion,
            Phase::ShowOptions,
            Phase::Transitioning,
            Phase::ShowInfo,
            Phase::ShowQuestion,
            Phase::ShowOptions,
            Phase::GameEnded,
        ]
    );
}

#[test]
fn exit_flow_via_actions() {
    let mut session = Session::new(challenge(), paper_pool(3));
    session.start();
    session.tick(INFO_PHASE_MS + QUESTION_PHASE_MS);

    assert!(session.apply_action(QuizAction::Exit));
    let frozen = session.elapsed_ms();
    session.tick(60_000);
    assert_eq!(session.elapsed_ms(), frozen);
    assert!(!session.apply_action(QuizAction::Select(0)));

    assert!(session.apply_action(QuizAction::CancelExit));
    assert!(session.apply_action(QuizAction::Exit));
    assert!(session.apply_action(QuizAction::ConfirmExit));

    assert!(session.ended());
    let result = session.result().unwrap();
    assert!(!result.completed);
    assert!(!session.apply_action(QuizAction::Select(0)));
}

#[tokio::test]
async fn level_session_reports_progress_chapter_and_stats() {
    let pool: Vec<Question> = paper_pool(100);
    let backend = Arc::new(MemoryBackend::with_questions(pool));
    let mut ctl = SessionController::new(backend.clone(), Randomizer::new(11));
    let kind = SessionKind::Level {
        level_id: "paper-6".into(),
        chapter_sequence: 2,
        level_sequence: 6,
        category: "paper".into(),
    };

    let session = ctl.start(kind).await.unwrap();
    // Level 6 is the first level of chapter 2 and reuses the first window.
    for q in session.questions() {
        let n: usize = q.id.trim_start_matches("paper-").parse().unwrap();
        assert!(n < 20, "{} outside level window", q.id);
    }
    play(session, 8);
    assert_eq!(session.score(), 2000);

    let outcome = ctl.report().await.unwrap();
    assert_eq!(outcome.level_progress, Some(true));
    assert_eq!(outcome.chapter, Some(true));
    assert!(outcome.stats);

    let reports = backend.reports().await;
    assert_eq!(reports.len(), 3);
    assert_eq!(
        reports[1],
        Report::ChapterCompleted {
            chapter_sequence: 2,
            score: 2000,
            money: 100,
        }
    );
}
