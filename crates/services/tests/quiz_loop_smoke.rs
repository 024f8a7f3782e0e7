use quiz_core::QuizConfigDraft;
use quiz_core::leaderboard::MergeOutcome;
use quiz_core::model::Username;
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, CompletionOutcome, TickOutcome, parse_question_bank};

const BANK: &str = r#"[
    {"id": 1, "question": "2 + 2?", "options": ["3", "4"], "correctAnswer": 1,
     "explanation": "Basic arithmetic.", "category": "Math", "difficulty": "easy"},
    {"id": 2, "question": "Capital of France?", "options": ["Paris", "Rome", "Oslo"],
     "correctAnswer": 0, "category": "Geography", "difficulty": "easy"}
]"#;

fn services(time_limit: u32) -> AppServices {
    let config = QuizConfigDraft {
        time_limit_secs: Some(time_limit),
        ..QuizConfigDraft::new()
    }
    .validate()
    .unwrap();
    AppServices::in_memory(Clock::fixed(fixed_now()), config)
}

#[tokio::test(start_paused = true)]
async fn timeout_then_correct_answer_lands_on_leaderboard() {
    let app = services(5);
    let questions = parse_question_bank(BANK).unwrap();
    let player = app.profiles().save(" Noor ").await.unwrap();

    let quiz_loop = app.quiz_loop();
    let mut quiz = quiz_loop.start_quiz(questions);
    while quiz.run_tick().await != TickOutcome::TimedOut {}
    quiz.next_question();
    quiz.select_answer(0);
    quiz.next_question();

    let outcome = quiz_loop
        .record_finished(quiz.session(), &player)
        .await
        .unwrap();
    let CompletionOutcome::Recorded(recorded) = outcome else {
        panic!("expected the run to be recorded");
    };
    assert!(matches!(recorded.merge, MergeOutcome::Inserted { .. }));

    let board = app.leaderboard().ranked().await;
    let entry = board.find(&Username::parse("NOOR").unwrap()).unwrap();
    assert_eq!(entry.score(), 1);
    assert_eq!(entry.total_questions(), 2);
    assert_eq!(entry.percentage(), 50);
    assert_eq!(app.profiles().load().await, Some(player));
}

#[tokio::test]
async fn replaying_with_a_lower_score_keeps_the_best() {
    let app = services(30);
    let questions = parse_question_bank(BANK).unwrap();
    let player = Username::parse("Noor").unwrap();
    let quiz_loop = app.quiz_loop();

    let mut first = quiz_loop.start_quiz(questions.clone());
    first.select_answer(1);
    first.next_question();
    first.select_answer(0);
    first.next_question();
    quiz_loop.record_finished(first.session(), &player).await.unwrap();

    let mut second = quiz_loop.start_quiz(questions);
    second.select_answer(1);
    second.next_question();
    second.select_answer(2);
    second.next_question();
    let outcome = quiz_loop
        .record_finished(second.session(), &player)
        .await
        .unwrap();

    let CompletionOutcome::Recorded(recorded) = outcome else {
        panic!("expected the run to be recorded");
    };
    assert!(!recorded.is_new_best());
    assert_eq!(recorded.merge.previous_best(), Some(2));
    assert_eq!(app.leaderboard().ranked().await.len(), 1);
}
