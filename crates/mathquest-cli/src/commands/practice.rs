//! The `mathquest practice` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use rand::Rng;

use mathquest_core::engine::Engine;
use mathquest_core::error::EngineError;
use mathquest_core::feedback::{encouragement, Moment};
use mathquest_core::plan::SessionRequest;
use mathquest_core::session::Session;

pub fn execute(
    topics: String,
    questions: Option<usize>,
    seed: Option<u64>,
    transcript: Option<PathBuf>,
    report_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::config(config_path.as_deref())?;
    let topics = super::topics(Some(&topics))?;
    let question_count = questions.unwrap_or(config.default_questions);

    let mut engine = Engine::open(config);
    let mut rng = super::rng(seed);
    let request = SessionRequest::new(topics, question_count);
    let mut session = engine.start_session(&request, &mut rng)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&engine, &mut session, &mut rng, stdin.lock(), stdout.lock())?;

    let report = engine.finish_session(session)?;
    let mut out = io::stdout().lock();
    writeln!(out, "\n{}", report.summary_text())?;
    writeln!(out, "{}", encouragement(Moment::Finished(report.grade), &mut rng))?;

    let changes: Vec<_> = report.changes().collect();
    if !changes.is_empty() {
        writeln!(out)?;
        for change in changes {
            writeln!(
                out,
                "  {:<20} {:.3} -> {:.3} ({:+.3})",
                change.topic.to_string(),
                change.old_score,
                change.new_score,
                change.delta
            )?;
        }
    }

    if let Some(path) = transcript {
        report.save_text(&path)?;
        writeln!(out, "\nTranscript written to {}", path.display())?;
    }
    if let Some(path) = report_path {
        report.save_json(&path)?;
        writeln!(out, "Report written to {}", path.display())?;
    }
    Ok(())
}

/// Ask every question in the session, reading answers from `input`.
///
/// Stops early on end of input or `quit`. Questions closed so far still count.
fn run_session<R, I, W>(
    engine: &Engine,
    session: &mut Session,
    rng: &mut R,
    mut input: I,
    mut out: W,
) -> Result<()>
where
    R: Rng + ?Sized,
    I: BufRead,
    W: Write,
{
    let total = session.plan().len();
    writeln!(
        out,
        "Starting a {total}-question session. Type `quit` to stop early."
    )?;

    loop {
        let number = session.question_number();
        let problem = match session.next_problem(engine.generator(), rng) {
            Ok(Some(problem)) => problem.clone(),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("skipping question {number}: {e}");
                continue;
            }
        };

        writeln!(
            out,
            "\nQuestion {number}/{total} [{} / {}]",
            problem.topic(),
            problem.level()
        )?;
        writeln!(out, "{}", problem.render())?;

        loop {
            write!(out, "Answer ({}): ", problem.answer_kind().hint())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            let answer = line.trim();
            if answer.eq_ignore_ascii_case("quit") || answer.eq_ignore_ascii_case("q") {
                return Ok(());
            }

            let result = match session.submit(answer) {
                Ok(result) => result,
                Err(e @ EngineError::InputShape { .. }) => {
                    writeln!(out, "  {e}")?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if result.correct {
                writeln!(out, "  {}", encouragement(Moment::Correct, rng))?;
            } else if !result.closed {
                writeln!(
                    out,
                    "  {} ({} attempt{} left)",
                    encouragement(Moment::TryAgain, rng),
                    result.attempts_left,
                    if result.attempts_left == 1 { "" } else { "s" }
                )?;
                continue;
            } else {
                writeln!(out, "  {}", encouragement(Moment::Failed, rng))?;
                if let Some(answer) = &result.answer {
                    writeln!(out, "  The answer was {answer}.")?;
                }
            }
            if let Some(explanation) = &result.explanation {
                writeln!(out, "  {explanation}")?;
            }
            break;
        }
    }
    Ok(())
}
