//! Line-based terminal front end for a timed quiz.

use quiz_core::leaderboard::{Leaderboard, MergeOutcome};
use quiz_core::model::{Answer, Question, Username};
use services::{
    AnswerOutcome, AppServices, CompletionOutcome, QuizView, TickOutcome, TimedQuiz, TimerUrgency,
};
use tokio::io::{AsyncBufRead, Lines};

type BoxError = Box<dyn std::error::Error>;

/// Run quizzes in the terminal, recording each finished run, until the player
/// declines to play again.
///
/// End of input abandons the current run without recording anything.
pub async fn play<R>(
    app: &AppServices,
    questions: Vec<Question>,
    name: Option<&str>,
    lines: &mut Lines<R>,
) -> Result<(), BoxError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(player) = choose_player(app, name, lines).await? else {
        return Ok(());
    };

    let mut quiz = app.quiz_loop().start_quiz(questions);
    loop {
        if !play_round(&mut quiz, lines).await? {
            println!("Quiz abandoned.");
            return Ok(());
        }
        finish_round(app, &quiz, &player).await?;

        println!();
        println!("Play again? [y/N]");
        let again = lines
            .next_line()
            .await?
            .is_some_and(|line| wants_replay(&line));
        if !again {
            return Ok(());
        }
        quiz.start();
    }
}

/// Play every question of the current run. Returns false if input ended first.
async fn play_round<R>(quiz: &mut TimedQuiz, lines: &mut Lines<R>) -> Result<bool, BoxError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(view) = quiz.session().view() {
        print_question(&view);
        if !await_resolution(quiz, lines).await? {
            return Ok(false);
        }
        if let Some(view) = quiz.session().view() {
            print_feedback(&view);
            let prompt = if view.is_last_question {
                "Press Enter to finish the quiz."
            } else {
                "Press Enter for the next question."
            };
            println!("{prompt}");
        }
        if lines.next_line().await?.is_none() {
            return Ok(false);
        }
        quiz.next_question();
    }
    Ok(true)
}

async fn finish_round(
    app: &AppServices,
    quiz: &TimedQuiz,
    player: &Username,
) -> Result<(), BoxError> {
    let Some(result) = quiz.session().result() else {
        return Ok(());
    };
    println!();
    println!(
        "Quiz complete! You scored {}/{} ({}%).",
        result.score,
        result.total_questions,
        result.percentage()
    );
    if result.timeouts() > 0 {
        println!("Ran out of time on {} question(s).", result.timeouts());
    }

    match app.quiz_loop().record_finished(quiz.session(), player).await? {
        CompletionOutcome::Skipped => {
            println!("Answer at least one question correctly to reach the leaderboard.");
        }
        CompletionOutcome::Recorded(recorded) => {
            match recorded.merge {
                MergeOutcome::Inserted { .. } => println!("Score saved to the leaderboard."),
                MergeOutcome::Improved { previous, .. } => {
                    println!("New personal best! Previous best was {previous}.");
                }
                MergeOutcome::Kept { best, .. } => {
                    println!("Your best is still {best}. Keep playing to beat your record!");
                }
            }
            if !recorded.saved {
                println!("(The leaderboard could not be saved this time.)");
            }
            println!();
            print_board(&recorded.board, app.config().display_limit(), Some(player));
        }
    }
    Ok(())
}

fn wants_replay(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn choose_player<R>(
    app: &AppServices,
    name: Option<&str>,
    lines: &mut Lines<R>,
) -> Result<Option<Username>, BoxError>
where
    R: AsyncBufRead + Unpin,
{
    let profiles = app.profiles();
    if let Some(name) = name {
        return Ok(Some(profiles.save(name).await?));
    }

    let remembered = profiles.load().await;
    match &remembered {
        Some(username) => println!("Welcome back, {username}! Press Enter to continue or type a new name."),
        None => println!("Enter your name:"),
    }

    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            if let Some(username) = remembered.clone() {
                return Ok(Some(username));
            }
        }
        match profiles.save(&line).await {
            Ok(username) => return Ok(Some(username)),
            Err(err) => println!("{err}. Enter your name:"),
        }
    }
}

/// Wait until the current question is answered or times out.
///
/// Returns false if input ended first.
async fn await_resolution<R>(quiz: &mut TimedQuiz, lines: &mut Lines<R>) -> Result<bool, BoxError>
where
    R: AsyncBufRead + Unpin,
{
    let mut shown = TimerUrgency::Calm;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(false);
                };
                let options = quiz.session().current_question().map_or(0, |q| q.options().len());
                match parse_choice(&line, options) {
                    Some(index) => {
                        if let AnswerOutcome::Recorded { .. } = quiz.select_answer(index) {
                            return Ok(true);
                        }
                    }
                    None => println!("Pick an option from 1 to {options}."),
                }
            }
            Some(tick) = quiz.next_tick() => {
                match quiz.apply_tick(tick) {
                    TickOutcome::Counted { remaining } => {
                        let urgency = TimerUrgency::classify(remaining, quiz.session().time_limit());
                        if urgency != shown || urgency == TimerUrgency::Critical {
                            println!("  {remaining}s left");
                            shown = urgency;
                        }
                    }
                    TickOutcome::TimedOut => {
                        println!("Time's up!");
                        return Ok(true);
                    }
                    TickOutcome::Ignored => {}
                }
            }
        }
    }
}

/// Map a 1-based menu choice to an option index.
fn parse_choice(line: &str, options: usize) -> Option<usize> {
    let choice: usize = line.trim().parse().ok()?;
    (1..=options).contains(&choice).then(|| choice - 1)
}

fn print_question(view: &QuizView<'_>) {
    let question = view.question;
    println!();
    println!(
        "Question {} of {}  |  Score: {}  |  {:.0}%",
        view.number, view.total, view.score, view.progress
    );
    println!(
        "[{} / {}] {}",
        question.category(),
        question.difficulty().as_str(),
        question.prompt()
    );
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    println!("You have {}s.", view.time_remaining);
}

fn print_feedback(view: &QuizView<'_>) {
    let question = view.question;
    let correct = question
        .option(question.correct_index())
        .unwrap_or_default();
    match (view.selected, view.was_correct()) {
        (Some(Answer::TimedOut), _) => println!("The answer was: {correct}"),
        (_, Some(true)) => println!("Correct!"),
        _ => println!("Wrong. The answer was: {correct}"),
    }
    if let Some(explanation) = view.explanation() {
        println!("{explanation}");
    }
}

/// Print the top of the leaderboard, marking `highlight` as "You".
pub fn print_board(board: &Leaderboard, limit: usize, highlight: Option<&Username>) {
    if board.is_empty() {
        println!("No scores yet. Be the first!");
        return;
    }
    println!("Leaderboard");
    for (i, entry) in board.top(limit).iter().enumerate() {
        let you = highlight.is_some_and(|name| name.same_player(entry.username()));
        println!(
            "{:>3}. {:<20} {:>3}/{:<3} {:>3}%  {}{}",
            i + 1,
            entry.username().as_str(),
            entry.score(),
            entry.total_questions(),
            entry.percentage(),
            entry.date().format("%Y-%m-%d"),
            if you { "  (You)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_one_based() {
        assert_eq!(parse_choice("1", 4), Some(0));
        assert_eq!(parse_choice(" 4 ", 4), Some(3));
        assert_eq!(parse_choice("0", 4), None);
        assert_eq!(parse_choice("5", 4), None);
        assert_eq!(parse_choice("b", 4), None);
    }

    #[test]
    fn replay_needs_an_explicit_yes() {
        assert!(wants_replay("y"));
        assert!(wants_replay(" YES "));
        assert!(!wants_replay(""));
        assert!(!wants_replay("n"));
        assert!(!wants_replay("maybe"));
    }
}
