/*
console.rs

Copyright 2025 Hervé Quatremain

This file is part of Kanjimerge.

Kanjimerge is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Kanjimerge is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Kanjimerge. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Interactive session in the terminal.
//!
//! The board is printed as a grid of numbered cells.
//! The player types a cell number to activate it, or one of the commands listed by `help`.

use log::{error, warn};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use kanjimerge::badges::{self, STAGES_PER_BADGE};
use kanjimerge::config::DifficultyMode;
use kanjimerge::game::Game;
use kanjimerge::kanji::catalog::SentencePart;
use kanjimerge::kanji::decomposer::fully_decompose;
use kanjimerge::library::Library;
use kanjimerge::progress::Progress;
use kanjimerge::saver::progress::{SaverProgress, default_data_dir};
use kanjimerge::stage::{BoardEvent, Mode, SplitRejection, StageSession};

const HELP: &str = "<cell>  activate the cell
n       next stage
r       restart the stage
new     start a new play-through
badges  list the unlocked badges
easy    switch to Easy mode
normal  switch to Normal mode
q       save and quit";

/// Restore the saved progress. A corrupt save is deleted.
fn restore(saver: Option<&SaverProgress>) -> Progress {
    let Some(saver) = saver else {
        return Progress::new();
    };
    match saver.get_progress() {
        Ok(Some(p)) => p,
        Ok(None) => Progress::new(),
        Err(e) => {
            warn!("{e}: starting over");
            saver.delete_save();
            Progress::new()
        }
    }
}

fn save(saver: Option<&SaverProgress>, progress: &Progress) {
    if let Some(saver) = saver {
        if let Err(e) = saver.save_progress(progress) {
            error!("{e}");
        }
    }
}

/// Return the text to display for a part. Intermediate nodes show their leaves.
fn label(library: &Library, glyph: &str) -> String {
    if library.dictionary.is_intermediate(glyph) {
        fully_decompose(&library.dictionary, glyph).concat()
    } else {
        glyph.to_string()
    }
}

/// Print the sentence, with the target word showing the filled components only.
fn print_goal(session: &StageSession) {
    let goal = session.goal();
    let target = goal.target();
    let word: String = target
        .components
        .iter()
        .enumerate()
        .map(|(i, c)| if goal.is_filled(i) { c.as_str() } else { "□" })
        .collect();
    let sentence: String = target
        .sentence_parts()
        .into_iter()
        .map(|p| match p {
            SentencePart::Text(t) => t,
            SentencePart::Slot => format!("[{word}]"),
        })
        .collect();

    println!();
    println!("Stage {}  {sentence}", session.stage() + 1);
    if let Some(meaning) = &target.meaning {
        println!("        {} ({meaning})", target.reading);
    }
}

/// Print the board. Selected cells are marked with `*`, and rejected cells with `!`.
fn print_board(session: &StageSession, library: &Library) {
    let board = session.board();
    let width: usize = (board.size() as f64).sqrt().ceil().max(1.0) as usize;
    let selected: Option<usize> = session.selected().map(|p| p.cell);
    let pending: Option<usize> = match session.mode() {
        Mode::PendingMerge(p) => board.cell_of(p.target),
        _ => None,
    };

    for row in (0..board.size()).collect::<Vec<usize>>().chunks(width) {
        let line: Vec<String> = row
            .iter()
            .map(|&cell| {
                let mark: char = if session.feedback().cells().contains(&cell) {
                    '!'
                } else if Some(cell) == selected || Some(cell) == pending {
                    '*'
                } else {
                    ' '
                };
                match board.get(cell) {
                    Some(p) => format!("{cell:>2}{mark}{}", label(library, &p.glyph)),
                    None => format!("{cell:>2}{mark}・"),
                }
            })
            .collect();
        println!("  {}", line.join("  "));
    }
}

fn print_event(event: &BoardEvent, library: &Library) {
    match event {
        BoardEvent::PartSelected { glyph, .. } => println!("{glyph} selected"),
        BoardEvent::PartMoved { from, to, glyph } => println!("{glyph} moved from {from} to {to}"),
        BoardEvent::MergeProposed { preview, target_cell, .. } => println!(
            "→ {}? Activate {target_cell} again to confirm",
            label(library, preview)
        ),
        BoardEvent::MergeCancelled { preview } => {
            println!("{} cancelled", label(library, preview))
        }
        BoardEvent::MergeConfirmed { glyph, .. } => println!("{}!", label(library, glyph)),
        BoardEvent::MergeRejected { left, right, .. } => {
            println!("{left} and {right} do not combine")
        }
        BoardEvent::SplitSucceeded { glyph, left, right } => {
            println!(
                "{} → {} + {}",
                label(library, glyph),
                label(library, &left.1),
                label(library, &right.1)
            )
        }
        BoardEvent::SplitRejected { glyph, reason, .. } => match reason {
            SplitRejection::Indivisible => println!("{glyph} cannot be split"),
            SplitRejection::NoFreeCell => println!("No room to split {glyph}"),
        },
        BoardEvent::GoalSlotFilled { glyph, .. } => println!("{glyph} found"),
        BoardEvent::StageCleared { .. } => println!("Stage cleared! Type n for the next stage"),
        BoardEvent::BadgeUnlocked { index, glyph } => {
            println!("Badge {} unlocked: {glyph}", index + 1)
        }
    }
}

fn print_badges(progress: &Progress) {
    let unlocked: String = badges::unlocked(progress.badges)
        .iter()
        .map(|b| b.glyph)
        .collect();
    println!(
        "Badges {}/{}  [{unlocked}]  next in {} stages",
        progress.badges,
        badges::Badge::count(),
        STAGES_PER_BADGE - progress.gauge
    );
    let message: String = badges::message(progress.badges);
    if !message.is_empty() {
        println!("  {message}");
    }
}

/// Run the interactive session until the player quits or the input ends.
pub fn run(library: Library) -> io::Result<()> {
    let saver: Option<SaverProgress> = default_data_dir().map(SaverProgress::new);
    if saver.is_none() {
        warn!("No data directory: the progress is not saved");
    }
    let progress: Progress = restore(saver.as_ref());
    let mut game: Game = Game::new(Arc::new(library), progress);
    game.start();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if let Some(session) = game.session() {
            print_goal(session);
            print_board(session, game.library());
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line: String = line?;
        match line.trim() {
            "q" | "quit" => break,
            "help" | "?" => println!("{HELP}"),
            "n" => game.advance(),
            "r" => game.restart_stage(),
            "new" => game.reset(),
            "badges" => print_badges(game.progress()),
            "easy" => game.set_difficulty_mode(DifficultyMode::Easy),
            "normal" => game.set_difficulty_mode(DifficultyMode::Normal),
            "" => (),
            input => match input.parse::<usize>() {
                Ok(cell) => {
                    let events: Vec<BoardEvent> = game.activate(cell);
                    events.iter().for_each(|e| print_event(e, game.library()));
                    if events
                        .iter()
                        .any(|e| matches!(e, BoardEvent::StageCleared { .. }))
                    {
                        save(saver.as_ref(), game.progress());
                    }
                }
                Err(_) => println!("Unknown command {input:?}. Type help for the commands."),
            },
        }
        game.poll_feedback(Instant::now());
    }
    save(saver.as_ref(), game.progress());
    Ok(())
}
