//! Interactive terminal loop: show a face, reveal the other, take a judgment.

use std::io::{BufRead, Write};

use services::{SessionLoopService, StudySession};

/// How the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Finished,
    Quit,
}

enum Judgment {
    Correct,
    Incorrect,
    Quit,
}

/// Drive `session` until it ends or the learner quits (`q` or end of input).
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run<R: BufRead, W: Write>(
    loop_svc: &SessionLoopService,
    session: &mut StudySession,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<Exit> {
    let mut line = String::new();

    while !session.is_complete() {
        let progress = session.progress();
        let (Some(shown), Some(hidden)) = (session.shown_face(), session.scoring_face()) else {
            break;
        };
        let (shown, hidden) = (shown.to_owned(), hidden.to_owned());

        writeln!(output)?;
        write!(
            output,
            "[cycle {}/{}] card {}/{}",
            progress.cycle, progress.max_cycles, progress.position, progress.cycle_len
        )?;
        if progress.outstanding > 0 {
            write!(output, " ({} to practice)", progress.outstanding)?;
        }
        writeln!(output)?;
        writeln!(output, "  {shown}")?;
        write!(output, "Press Enter to reveal, q to quit: ")?;
        output.flush()?;

        if read_line(input, &mut line)?.is_none_or(|l| l.eq_ignore_ascii_case("q")) {
            return Ok(Exit::Quit);
        }
        writeln!(output, "  {hidden}")?;

        let correct = match ask_judgment(input, output, &mut line)? {
            Judgment::Correct => true,
            Judgment::Incorrect => false,
            Judgment::Quit => return Ok(Exit::Quit),
        };
        let result = loop_svc.answer_current(session, correct)?;
        if result.decision.should_advance {
            writeln!(
                output,
                "\nCycle {} starts: {} card(s) to retry.",
                result.cycle,
                session.progress().cycle_len
            )?;
        }
    }

    Ok(Exit::Finished)
}

fn ask_judgment<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    line: &mut String,
) -> anyhow::Result<Judgment> {
    loop {
        write!(output, "Did you get it right? [y/n/q]: ")?;
        output.flush()?;
        let Some(answer) = read_line(input, line)? else {
            return Ok(Judgment::Quit);
        };
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(Judgment::Correct),
            "n" | "no" => return Ok(Judgment::Incorrect),
            "q" => return Ok(Judgment::Quit),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}

/// Reads one trimmed line; `None` at end of input.
fn read_line<'a, R: BufRead>(
    input: &mut R,
    line: &'a mut String,
) -> anyhow::Result<Option<&'a str>> {
    line.clear();
    if input.read_line(line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim()))
}
