// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::collection::Collection;
use crate::drill::Session;
use crate::error::Fallible;
use crate::store::CardStore;
use crate::types::quality::Grade;
use crate::types::timestamp::Timestamp;

pub fn drill(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, Timestamp::now())?;
    println!("Drilling in {}.", coll.directory.display());
    let mut session = Session::new(coll.db, coll.cards, Timestamp::now());
    run(&mut session, &mut stdin().lock(), &mut stdout(), Timestamp::now)
}

/// What the learner typed at the grade prompt.
enum Answer {
    Grade(Grade),
    Note,
    Quit,
}

/// The terminal loop. `clock` is asked for the time whenever a card is
/// picked or graded.
pub fn run<S: CardStore>(
    session: &mut Session<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
    clock: impl Fn() -> Timestamp,
) -> Fallible<()> {
    loop {
        let now = clock();
        session.refresh(now);
        let Some(card) = session.current() else {
            break;
        };
        let summary = session.summary(now);
        writeln!(
            out,
            "[new {} | reviewing {} | tomorrow {}]",
            summary.new_count, summary.reviewing_count, summary.due_tomorrow_count
        )?;
        writeln!(out, "#{} {}", card.number, card.name)?;
        writeln!(out, "{}", card.transliteration)?;
        writeln!(out, "[press enter to reveal]")?;
        if read_line(input)?.is_none() {
            return Ok(());
        }
        writeln!(out, "{}", card.meaning)?;
        if !card.note.is_empty() {
            writeln!(out, "Note: {}", card.note)?;
        }
        loop {
            match read_answer(input, out)? {
                Some(Answer::Grade(grade)) => {
                    log::debug!("Graded {}.", grade.as_str());
                    session.grade(grade.quality(), clock())?;
                    break;
                }
                Some(Answer::Note) => {
                    writeln!(out, "Note:")?;
                    let note = read_line(input)?.unwrap_or_default();
                    session.set_note(&note)?;
                    writeln!(out, "Saved.")?;
                }
                Some(Answer::Quit) | None => return Ok(()),
            }
        }
    }
    let summary = session.summary(clock());
    writeln!(out, "No cards due. Reviewed {} this session.", session.reviewed())?;
    if let Some(next) = summary.next_upcoming {
        writeln!(out, "Next review: {next}.")?;
    }
    Ok(())
}

/// Read one line without its terminator. `None` on end of input.
fn read_line(input: &mut impl BufRead) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn read_answer(input: &mut impl BufRead, out: &mut impl Write) -> Fallible<Option<Answer>> {
    loop {
        writeln!(
            out,
            "Grade: (1 = Very hard, 2 = Hard, 3 = Good, 4 = Easy, n = Note, q = Quit)"
        )?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if let Some(grade) = Grade::from_key(&line) {
            return Ok(Some(Answer::Grade(grade)));
        }
        match line.trim() {
            "n" => return Ok(Some(Answer::Note)),
            "q" => return Ok(Some(Answer::Quit)),
            _ => writeln!(out, "Invalid input. Please enter a number between 1 and 4.")?,
        }
    }
}
