use std::io::Write;

use services::SessionReport;
use study_core::model::DeckSummary;
use study_core::{EndReason, Score};

pub fn deck_list<W: Write>(out: &mut W, decks: &[DeckSummary]) -> std::io::Result<()> {
    if decks.is_empty() {
        writeln!(out, "No decks found.")?;
        return Ok(());
    }
    for deck in decks {
        write!(out, "{:<24} {:>4} cards  {}", deck.id.as_str(), deck.card_count, deck.title)?;
        if let Some(description) = &deck.description {
            write!(out, " ({description})")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn score_line(score: &Score) -> String {
    format!("{}/{} ({}%)", score.correct, score.total, score.percent)
}

pub fn report<W: Write>(out: &mut W, report: &SessionReport) -> std::io::Result<()> {
    writeln!(out)?;
    let ending = match report.end_reason {
        Some(EndReason::AllCorrect) => "every card answered correctly",
        Some(EndReason::CeilingReached) => "cycle limit reached",
        None => "stopped early",
    };
    writeln!(
        out,
        "Deck {}: {ending} after {} cycle(s).",
        report.deck_id, report.cycles_run
    )?;
    writeln!(
        out,
        "Right on first try: {}",
        score_line(&report.scores.right_on_first_try)
    )?;
    writeln!(out, "Overall:            {}", score_line(&report.scores.overall))?;

    let b = &report.breakdown;
    writeln!(
        out,
        "Correct first time {}, correct on retry {}, missed {}, unattempted {}",
        b.correct_first_time, b.correct_on_retry, b.missed, b.unattempted
    )?;

    if !report.is_finished() {
        writeln!(out, "Cards not reached in the first cycle count as unattempted.")?;
    }

    let mut missed = report.missed().peekable();
    if missed.peek().is_some() {
        writeln!(out, "Still to practice:")?;
        for card in missed {
            writeln!(out, "  {} -> {}", card.front, card.back)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::CardResult;
    use study_core::model::{CardUid, DeckId};
    use study_core::{Breakdown, Outcome, Scores};

    #[test]
    fn report_lists_missed_cards() {
        let report = SessionReport {
            deck_id: DeckId::new("verbs").unwrap(),
            cycles_run: 3,
            end_reason: Some(EndReason::CeilingReached),
            scores: Scores {
                right_on_first_try: Score::new(1, 2),
                overall: Score::new(1, 2),
            },
            breakdown: Breakdown {
                correct_first_time: 1,
                missed: 1,
                ..Breakdown::default()
            },
            outcomes: vec![CardResult {
                uid: CardUid::new("verbs:2").unwrap(),
                front: "ir".into(),
                back: "to go".into(),
                outcome: Outcome::Missed,
            }],
        };

        let mut out = Vec::new();
        super::report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Deck verbs: cycle limit reached after 3 cycle(s)."));
        assert!(text.contains("Right on first try: 1/2 (50%)"));
        assert!(text.contains("  ir -> to go"));
    }

    #[test]
    fn unfinished_report_mentions_unattempted_cards() {
        let report = SessionReport {
            deck_id: DeckId::new("verbs").unwrap(),
            cycles_run: 1,
            end_reason: None,
            scores: Scores {
                right_on_first_try: Score::new(1, 1),
                overall: Score::new(1, 1),
            },
            breakdown: Breakdown {
                correct_first_time: 1,
                unattempted: 2,
                ..Breakdown::default()
            },
            outcomes: Vec::new(),
        };

        let mut out = Vec::new();
        super::report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Deck verbs: stopped early after 1 cycle(s)."));
        assert!(text.contains("count as unattempted"));
        assert!(!text.contains("Still to practice"));
    }

    #[test]
    fn empty_deck_list_says_so() {
        let mut out = Vec::new();
        deck_list(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No decks found.\n");
    }
}
