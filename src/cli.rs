//! The "pages" layer: renders state produced by the services and routes user
//! input into them. List-fetch failures degrade to empty states with a log
//! line; operation failures print a blocking message and leave the flow
//! where it was.

use std::io::{self, BufRead, Write};

use crate::app_state::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionKind, Quiz, Role};
use crate::models::dto::{NewQuizForm, RegisterRequest};
use crate::services::{AttemptPhase, QuestionWizard, WizardStep};
use crate::session::{guard, GuardDecision};

pub fn usage() {
    println!("quizdeck-client <command>");
    println!();
    println!("  login <username> <password>       log in");
    println!("  register <username> <email> <password> <student|teacher>");
    println!("  logout                            log out");
    println!("  whoami                            show the current session");
    println!("  dashboard                         role-specific dashboard");
    println!("  take <quiz-id>                    take a quiz (student)");
    println!("  attempts <quiz-id>                list attempts (teacher)");
    println!("  create-quiz <title> <minutes> [max-attempts]");
    println!("  delete-quiz <quiz-id>");
    println!("  author <quiz-id>                  manage questions (teacher)");
}

fn expect_arg<'a>(args: &'a [String], index: usize, name: &str) -> AppResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| AppError::ValidationError(format!("Missing argument: {}", name)))
}

/// Gates a page on the session and a required role, printing the redirect
/// the browser app would perform.
fn gate(state: &AppState, required: Option<Role>) -> bool {
    match guard(&state.session, required) {
        GuardDecision::Granted(_) => true,
        GuardDecision::LoginRequired => {
            println!("Please log in first.");
            false
        }
        GuardDecision::WrongRole(actual) => {
            println!("This page is not for your role; try the {} dashboard.", actual);
            false
        }
    }
}

fn prompt(label: &str) -> AppResult<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

pub async fn login(state: &AppState, args: &[String]) -> AppResult<()> {
    let username = expect_arg(args, 0, "username")?;
    let password = expect_arg(args, 1, "password")?;

    match state.auth.login(username, password).await {
        Ok(identity) => {
            println!("Welcome, {} ({})", identity.username, identity.role);
            Ok(())
        }
        Err(err) => {
            // Inline message, mirror of the login form's error box.
            println!("{}", err);
            Ok(())
        }
    }
}

pub async fn register(state: &AppState, args: &[String]) -> AppResult<()> {
    let role = match expect_arg(args, 3, "role")? {
        "student" => Role::Student,
        "teacher" => Role::Teacher,
        other => {
            return Err(AppError::ValidationError(format!(
                "Unknown role: {} (expected student or teacher)",
                other
            )))
        }
    };

    let request = RegisterRequest {
        username: expect_arg(args, 0, "username")?.to_string(),
        email: expect_arg(args, 1, "email")?.to_string(),
        password: expect_arg(args, 2, "password")?.to_string(),
        role,
    };

    match state.auth.register(request).await {
        Ok(()) => {
            println!("Registered. You can log in now.");
            Ok(())
        }
        Err(err) => {
            println!("{}", err);
            Ok(())
        }
    }
}

pub fn whoami(state: &AppState) {
    match state.session.identity() {
        Some(identity) => println!("{} ({})", identity.username, identity.role),
        None => println!("Not logged in."),
    }
}

pub async fn dashboard(state: &AppState) -> AppResult<()> {
    let identity = match guard(&state.session, None) {
        GuardDecision::Granted(identity) => identity,
        _ => {
            println!("Please log in first.");
            return Ok(());
        }
    };

    match identity.role {
        Role::Student => {
            let quizzes = state.student.assigned_quizzes().await.unwrap_or_else(|err| {
                log::error!("Failed to load assigned quizzes: {}", err);
                Vec::new()
            });

            println!("Your assigned quizzes");
            if quizzes.is_empty() {
                println!("No quizzes assigned yet. Check back later.");
                return Ok(());
            }
            for quiz in &quizzes {
                println!("  {}  {}  {}", quiz.id, quiz.title, time_limit_label(quiz));
            }
        }
        Role::Teacher => {
            let quizzes = state.teacher.quizzes().await.unwrap_or_else(|err| {
                log::error!("Failed to load quizzes: {}", err);
                Vec::new()
            });
            let summary = state.teacher.summary().await.unwrap_or_else(|err| {
                log::error!("Failed to load quiz summary: {}", err);
                Vec::new()
            });

            println!("Your quizzes");
            if quizzes.is_empty() {
                println!("No quizzes yet.");
                return Ok(());
            }
            for quiz in &quizzes {
                let attempts = summary
                    .iter()
                    .find(|s| s.quiz_id == quiz.id)
                    .map(|s| s.attempts)
                    .unwrap_or(0);
                println!(
                    "  {}  {}  {}  attempts: {}",
                    quiz.id,
                    quiz.title,
                    time_limit_label(quiz),
                    attempts
                );
            }
        }
    }
    Ok(())
}

fn time_limit_label(quiz: &Quiz) -> String {
    match quiz.time_limit_minutes() {
        Some(minutes) => format!("{} min", minutes),
        None => "no time limit".to_string(),
    }
}

pub async fn list_attempts(state: &AppState, args: &[String]) -> AppResult<()> {
    if !gate(state, Some(Role::Teacher)) {
        return Ok(());
    }
    let quiz_id = expect_arg(args, 0, "quiz-id")?;

    let attempts = state.teacher.attempts(quiz_id).await.unwrap_or_else(|err| {
        log::error!("Failed to load attempts for quiz {}: {}", quiz_id, err);
        Vec::new()
    });

    if attempts.is_empty() {
        println!("No attempts yet.");
        return Ok(());
    }
    for attempt in &attempts {
        let student = attempt.student_name.as_deref().unwrap_or(&attempt.student);
        let score = attempt
            .score
            .map(|s| format!("{:.0}%", s))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {}  score: {}  correct: {}  wrong: {}",
            attempt.id, student, score, attempt.total_correct, attempt.total_wrong
        );
    }
    Ok(())
}

pub async fn create_quiz(state: &AppState, args: &[String]) -> AppResult<()> {
    if !gate(state, Some(Role::Teacher)) {
        return Ok(());
    }
    let title = expect_arg(args, 0, "title")?;
    let minutes: u32 = expect_arg(args, 1, "minutes")?
        .parse()
        .map_err(|_| AppError::ValidationError("minutes must be a number".to_string()))?;
    let max_attempts = match args.get(2) {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
            AppError::ValidationError("max-attempts must be a number".to_string())
        })?),
        None => None,
    };

    match state
        .teacher
        .create_quiz(NewQuizForm {
            title: title.to_string(),
            description: String::new(),
            time_limit_minutes: minutes,
            max_attempts,
            shuffle_questions: false,
        })
        .await
    {
        Ok(quiz) => {
            println!("Created quiz {} ({})", quiz.id, quiz.title);
            Ok(())
        }
        Err(err) => {
            println!("Failed to create quiz: {}", err);
            Ok(())
        }
    }
}

pub async fn delete_quiz(state: &AppState, args: &[String]) -> AppResult<()> {
    if !gate(state, Some(Role::Teacher)) {
        return Ok(());
    }
    let quiz_id = expect_arg(args, 0, "quiz-id")?;

    match state.teacher.delete_quiz(quiz_id).await {
        Ok(()) => println!("Deleted quiz {}", quiz_id),
        Err(err) => println!("Failed to delete quiz: {}", err),
    }
    Ok(())
}

/// The quiz-taking page: pre-start screen, question-by-question answering
/// with free navigation, then the finish/review screen.
pub async fn take_quiz(state: &AppState, args: &[String]) -> AppResult<()> {
    if !gate(state, Some(Role::Student)) {
        return Ok(());
    }
    let quiz_id = expect_arg(args, 0, "quiz-id")?;

    let quiz = state.student.quiz(quiz_id).await?;
    println!("{}", quiz.title);
    if !quiz.description.is_empty() {
        println!("{}", quiz.description);
    }
    println!("Time limit: {}", time_limit_label(&quiz));

    let answer = prompt("Start quiz? [y/N] ")?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(());
    }

    let mut controller = state.attempt_controller(quiz);
    if let Err(err) = controller.start().await {
        println!("Failed to start attempt: {}", err);
        return Ok(());
    }

    loop {
        let Some(question) = controller.current_question() else {
            println!("No questions in this quiz.");
            return Ok(());
        };

        println!();
        println!(
            "Question {} / {}: {}",
            controller.cursor() + 1,
            controller.questions().len(),
            question.text
        );
        for (index, choice) in question.choices.iter().enumerate() {
            println!("  {}) {}", index + 1, choice.text);
        }
        let commands = match question.kind {
            QuestionKind::ShortAnswer => "answer = a <text>",
            _ => "answer = 1..n",
        };
        println!("[{} | n = next | p = previous | f = finish | q = quit]", commands);

        let input = prompt("> ")?;
        match input.as_str() {
            "n" => controller.next(),
            "p" => controller.previous(),
            "q" => return Ok(()),
            "f" => {
                if let Err(err) = controller.finish().await {
                    println!("Failed to finish attempt: {}", err);
                    continue;
                }
                break;
            }
            other => {
                let outcome = match question.kind {
                    QuestionKind::ShortAnswer => {
                        let text = other.strip_prefix("a ").unwrap_or(other);
                        controller.answer_text(text).await
                    }
                    _ => match other.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                        Some(index) if index < question.choices.len() => {
                            let choice_id = question.choices[index].id.clone();
                            controller.answer_choice(&choice_id).await
                        }
                        _ => {
                            println!("Pick a choice between 1 and {}.", question.choices.len());
                            continue;
                        }
                    },
                };
                match outcome {
                    Ok(()) => println!("Answer saved."),
                    Err(err) => println!("Failed to submit answer: {}", err),
                }
            }
        }
    }

    if let AttemptPhase::Finished { result, review } = controller.phase() {
        println!();
        println!("Quiz finished!");
        println!(
            "Score: {:.0}%  Correct: {}  Wrong: {}",
            result.score, result.total_correct, result.total_wrong
        );
        match review {
            Some(wrong) if wrong.is_empty() => {
                println!("Amazing! You answered everything correctly.");
            }
            Some(wrong) => {
                println!("Review wrong answers:");
                for entry in wrong {
                    let question = entry.question_text.as_deref().unwrap_or("Question");
                    let answer = entry
                        .selected_choice_text
                        .as_deref()
                        .or(entry.short_answer_text.as_deref())
                        .unwrap_or("-");
                    println!("  {}", question);
                    println!("    Your answer: {}", answer);
                }
            }
            None => println!("Review is unavailable right now."),
        }
    }
    Ok(())
}

/// The manage-questions page: existing questions plus the authoring wizard.
pub async fn author_questions(state: &AppState, args: &[String]) -> AppResult<()> {
    if !gate(state, Some(Role::Teacher)) {
        return Ok(());
    }
    let quiz_id = expect_arg(args, 0, "quiz-id")?;

    let mut wizard = state.question_wizard(quiz_id);
    wizard.load_questions().await;

    loop {
        println!();
        print_questions(wizard.questions());
        println!("[a = add question | d <id> = delete | q = done]");

        let input = prompt("> ")?;
        match input.as_str() {
            "q" => return Ok(()),
            "a" => {
                if let Err(err) = run_wizard(&mut wizard).await {
                    println!("Failed to save question: {}", err);
                }
            }
            other => {
                if let Some(id) = other.strip_prefix("d ") {
                    if let Err(err) = wizard.delete_question(id.trim()).await {
                        println!("Failed to delete question: {}", err);
                    }
                } else {
                    println!("Unknown command.");
                }
            }
        }
    }
}

fn print_questions(questions: &[Question]) {
    println!("Existing questions");
    if questions.is_empty() {
        println!("  No questions yet. Use the wizard to add questions.");
        return;
    }
    for question in questions {
        println!("  {}  {}", question.id, question.text);
    }
}

async fn run_wizard(wizard: &mut QuestionWizard) -> AppResult<()> {
    // Step 1: type.
    let kind = loop {
        match prompt("Type [mcq/tf/short]: ")?.as_str() {
            "mcq" => break QuestionKind::MultipleChoice,
            "tf" => break QuestionKind::TrueFalse,
            "short" => break QuestionKind::ShortAnswer,
            _ => println!("Expected mcq, tf or short."),
        }
    };
    wizard.choose_kind(kind)?;
    wizard.advance();

    // Step 2: text.
    wizard.set_text(prompt("Question text: ")?);
    wizard.advance();

    // Step 3: type-specific options (skipped for short answer).
    if wizard.step() == WizardStep::Options {
        match kind {
            QuestionKind::MultipleChoice => {
                let mut index = 0;
                loop {
                    let text = prompt(&format!("Choice {} (empty to stop): ", index + 1))?;
                    if text.is_empty() && index >= 2 {
                        break;
                    }
                    let correct = prompt("Correct? [y/N] ")?.eq_ignore_ascii_case("y");
                    if index >= wizard.choice_entries().map(|e| e.len()).unwrap_or(0) {
                        wizard.add_choice_entry()?;
                    }
                    wizard.set_choice_entry(index, text, correct)?;
                    index += 1;
                }
            }
            QuestionKind::TrueFalse => {
                let answer = prompt("Correct answer [true/false]: ")?;
                wizard.set_true_false(answer.eq_ignore_ascii_case("true"))?;
            }
            QuestionKind::ShortAnswer => {}
        }
        wizard.advance();
    }

    // Step 4: confirm.
    println!("Save \"{}\" ({:?})?", wizard.text(), wizard.kind());
    if prompt("[y/N] ")?.eq_ignore_ascii_case("y") {
        wizard.save().await?;
        println!("Question saved.");
    } else {
        wizard.back();
    }
    Ok(())
}
