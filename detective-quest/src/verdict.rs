use crate::clue_index::{ClueEntry, ClueIndex};
use crate::suspect_map::SuspectMap;
use crate::terminal::Terminal;
use serde::Serialize;
use std::io;
use tracing::info;

pub const DEFAULT_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing was collected, so nobody could be accused.
    NoClues,
    /// Input ended before a name was given.
    NoAccusation,
    Upheld { accused: String, tally: u32 },
    Rejected { accused: String, tally: u32 },
}

impl Verdict {
    pub fn decide(accused: &str, tally: u32, threshold: u32) -> Self {
        let accused = accused.to_string();
        if tally >= threshold {
            Verdict::Upheld { accused, tally }
        } else {
            Verdict::Rejected { accused, tally }
        }
    }

    pub fn is_upheld(&self) -> bool {
        matches!(self, Verdict::Upheld { .. })
    }
}

/// Total sightings of clues that point at `accused`.
pub fn tally(clues: &ClueIndex, suspects: &SuspectMap, accused: &str) -> u32 {
    clues
        .in_order()
        .filter(|entry| suspects.lookup(entry.text()) == Some(accused))
        .map(ClueEntry::count)
        .sum()
}

/// `"text"` for a single sighting, `"text (found N times)"` otherwise.
pub fn format_clue(entry: &ClueEntry) -> String {
    if entry.count() > 1 {
        format!("{} (found {} times)", entry.text(), entry.count())
    } else {
        entry.text().to_string()
    }
}

pub fn report_clues<T: Terminal + ?Sized>(
    terminal: &mut T,
    clues: &ClueIndex,
    suspects: &SuspectMap,
) -> io::Result<()> {
    terminal.say("")?;
    terminal.say("===== Collected clues (alphabetical) =====")?;
    if clues.is_empty() {
        return terminal.say("You did not collect any clues.");
    }
    for entry in clues {
        let suspect = suspects.lookup(entry.text()).unwrap_or("no known suspect");
        terminal.say(&format!("- {}  [{}]", format_clue(entry), suspect))?;
    }
    Ok(())
}

/// Lists the evidence, asks for a name and judges the accusation.
pub fn hold_trial<T: Terminal + ?Sized>(
    terminal: &mut T,
    clues: &ClueIndex,
    suspects: &SuspectMap,
    threshold: u32,
) -> io::Result<Verdict> {
    report_clues(terminal, clues, suspects)?;
    if clues.is_empty() {
        terminal.say("No clues collected: there is nothing to accuse anyone with.")?;
        info!("verdict skipped, no clues");
        return Ok(Verdict::NoClues);
    }

    terminal.say("")?;
    terminal.say(&format!("Suspects: {}", suspects.suspects().join(", ")))?;
    let Some(answer) = terminal.ask("Who do you accuse? ")? else {
        terminal.say("No accusation was made.")?;
        info!("verdict skipped, input closed");
        return Ok(Verdict::NoAccusation);
    };
    let accused = answer.trim();

    let tally = tally(clues, suspects, accused);
    let verdict = Verdict::decide(accused, tally, threshold);
    info!(accused, tally, threshold, upheld = verdict.is_upheld(), "verdict");

    terminal.say(&format!(
        "Clues pointing to {}: {} (at least {} needed)",
        accused, tally, threshold
    ))?;
    if verdict.is_upheld() {
        terminal.say(&format!("Accusation upheld: {} is the culprit!", accused))?;
    } else {
        terminal.say(&format!(
            "Accusation rejected: not enough evidence against {}.",
            accused
        ))?;
    }
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted_terminal::ScriptedTerminal;

    fn suspects() -> SuspectMap {
        let mut map = SuspectMap::with_capacity(101).unwrap();
        map.insert("Pegadas de lama recentes", "Jardineiro");
        map.insert("Luvas enterradas", "Jardineiro");
        map.insert("Chave enferrujada", "Zelador");
        map
    }

    #[test]
    fn tally_sums_counts() {
        let suspects = suspects();
        let mut clues = ClueIndex::new();
        clues.insert("Pegadas de lama recentes");
        clues.insert("Pegadas de lama recentes");
        clues.insert("Chave enferrujada");
        clues.insert("Perfume importado");

        assert_eq!(tally(&clues, &suspects, "Jardineiro"), 2);
        assert_eq!(tally(&clues, &suspects, "Zelador"), 1);
        assert_eq!(tally(&clues, &suspects, "jardineiro"), 0);
        assert_eq!(tally(&clues, &suspects, ""), 0);
    }

    #[test]
    fn threshold_boundary() {
        assert!(!Verdict::decide("X", 1, 2).is_upheld());
        assert!(Verdict::decide("X", 2, 2).is_upheld());
        assert!(Verdict::decide("X", 1, 1).is_upheld());
        assert_eq!(
            Verdict::decide("X", 0, 2),
            Verdict::Rejected {
                accused: "X".into(),
                tally: 0
            }
        );
    }

    #[test]
    fn formatting_rule() {
        let mut clues = ClueIndex::new();
        clues.insert("once");
        clues.insert("twice");
        clues.insert("twice");
        let lines: Vec<String> = clues.in_order().map(format_clue).collect();
        assert_eq!(lines, vec!["once", "twice (found 2 times)"]);
    }

    #[test]
    fn no_clues_skips_accusation() {
        let mut terminal = ScriptedTerminal::new(["Jardineiro"]);
        let verdict = hold_trial(&mut terminal, &ClueIndex::new(), &suspects(), 2).unwrap();
        assert_eq!(verdict, Verdict::NoClues);
        assert_eq!(terminal.unused_answers(), 1);
        assert!(terminal.mentions("You did not collect any clues."));
    }

    #[test]
    fn accused_name_is_trimmed() {
        let mut clues = ClueIndex::new();
        clues.insert("Pegadas de lama recentes");
        clues.insert("Luvas enterradas");

        let mut terminal = ScriptedTerminal::new(["  Jardineiro "]);
        let verdict = hold_trial(&mut terminal, &clues, &suspects(), 2).unwrap();
        assert_eq!(
            verdict,
            Verdict::Upheld {
                accused: "Jardineiro".into(),
                tally: 2
            }
        );
        assert!(terminal.mentions("Suspects: Jardineiro, Zelador"));
        assert!(terminal.mentions("- Luvas enterradas  [Jardineiro]"));
    }

    #[test]
    fn closed_input_means_no_accusation() {
        let mut clues = ClueIndex::new();
        clues.insert("Chave enferrujada");
        let mut terminal = ScriptedTerminal::default();
        let verdict = hold_trial(&mut terminal, &clues, &suspects(), 2).unwrap();
        assert_eq!(verdict, Verdict::NoAccusation);
    }
}
