/*
cli_options.rs

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

//! Process command-line options.
//!
//! Most options are intended for developers authoring the catalog and the dictionary.
//! Without any of those options, Kanjimerge starts an interactive session in the terminal.
//!
//! # Examples
//!
//! List the catalog entries:
//!
//! ```text
//! $ kanjimerge --ls
//! tutorial-01  二  1  二
//! tutorial-02  三  1  三
//! ...
//! ```
//!
//! Decompose a character:
//!
//! ```text
//! $ kanjimerge --decompose 森
//! 森: 木 木 木
//! split: 木 + 林
//! ```
//!
//! Generate three Easy playlists and print some statistics:
//!
//! ```text
//! $ kanjimerge --playlist --mode easy --count 3 --summary
//! ```

use clap::Parser;
use log::debug;
use rand::rngs::ThreadRng;
use std::collections::{BTreeMap, HashSet};
use std::env;
use std::path::PathBuf;

use kanjimerge::config::{COPYRIGHT_NOTICE, DifficultyMode, MAX_DIFFICULTY, MIN_DIFFICULTY, Settings};
use kanjimerge::generator::curve::DifficultyCurve;
use kanjimerge::generator::playlist::{Playlist, PlaylistGenerator};
use kanjimerge::kanji::checks::{Report, check_catalog};
use kanjimerge::kanji::decomposer::{constituents_of, fully_decompose};
use kanjimerge::library::Library;

/// Kanji merging puzzle, and tools for the content authors.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the catalog entries
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Print the decomposition of a character
    #[arg(long, value_name = "CHAR")]
    decompose: Option<String>,

    /// Generate a playlist and print it
    #[arg(short, long, default_value_t = false, group = "generate")]
    playlist: bool,

    /// Difficulty mode for the generated playlists
    #[arg(value_enum, short, long, default_value_t = DifficultyMode::Normal, requires = "generate")]
    mode: DifficultyMode,

    /// Number of playlists to generate
    #[arg(short, long, default_value_t = 1, requires = "generate")]
    count: usize,

    /// Print some statistics after generating the playlists
    #[arg(short, long, default_value_t = false, requires = "generate")]
    summary: bool,

    /// Verify that every catalog entry can be built from the dictionary
    #[arg(long, default_value_t = false)]
    check: bool,

    /// JSON file that overrides the default settings
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Directory with the data files to use instead of the embedded data
    #[arg(long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// What to do after processing the command-line options.
pub enum Outcome {
    /// Exit with the given status code.
    Exit(u8),

    /// Start the interactive session with the loaded data.
    Play(Library),
}

/// Parse and process command-line options.
pub fn parse() -> Outcome {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let settings: Settings = match &args.settings {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {e}");
                return Outcome::Exit(1);
            }
        },
        None => Settings::default(),
    };
    let loaded = match &args.data {
        Some(dir) => Library::from_dir(dir, settings),
        None => Library::embedded(settings),
    };
    let library: Library = match loaded {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {e}");
            return Outcome::Exit(1);
        }
    };

    //
    // List the catalog entries
    //
    if args.ls {
        for entry in library.catalog.entries() {
            println!(
                "{:<12} {}  {:>2}  {}",
                entry.id,
                entry.form,
                entry.difficulty,
                entry.components.join(" ")
            );
        }
        return Outcome::Exit(0);
    }

    //
    // Decompose a character
    //
    if let Some(glyph) = &args.decompose {
        let atoms: Vec<String> = fully_decompose(&library.dictionary, glyph);
        println!("{glyph}: {}", atoms.join(" "));
        match constituents_of(&library.dictionary, glyph) {
            Some((left, right)) => println!("split: {left} + {right}"),
            None => println!("split: none"),
        }
        return Outcome::Exit(0);
    }

    //
    // Verify the data
    //
    if args.check {
        let report: Report = check_catalog(&library.dictionary, &library.catalog);
        print_report(&report);
        return Outcome::Exit(if report.errors() > 0 { 1 } else { 0 });
    }

    //
    // Generate playlists
    //
    if args.playlist {
        generate(&library, args.mode, args.count, args.summary);
        return Outcome::Exit(0);
    }

    Outcome::Play(library)
}

/// Print the result of the data checks.
fn print_report(report: &Report) {
    for (glyph, (status, entries)) in &report.findings {
        let used_by: Vec<&str> = entries.iter().map(String::as_str).collect();
        let kind: &str = if status.is_error() { "ERROR" } else { "WARNING" };
        println!("{kind}: {glyph}: {status:?} (used by {})", used_by.join(", "));
    }
    for c in &report.collisions {
        println!(
            "COLLISION: {} + {} gives {} (also {})",
            c.pair.0,
            c.pair.1,
            c.selected,
            c.shadowed.join(", ")
        );
    }
    println!(
        "{} characters checked: {} errors, {} warnings, {} collisions",
        report.checked,
        report.errors(),
        report.warnings(),
        report.collisions.len()
    );
}

/// Generate playlists, print them, and optionally print some statistics.
fn generate(library: &Library, mode: DifficultyMode, count: usize, summary: bool) {
    let settings: &Settings = &library.settings;
    let generator: PlaylistGenerator = PlaylistGenerator::new(&library.catalog, settings, mode);
    let curve: DifficultyCurve = DifficultyCurve::new(settings, mode);
    let mut rng: ThreadRng = rand::rng();

    // Difficulty => number of stages
    let mut buckets: BTreeMap<u8, usize> = BTreeMap::new();
    let mut gap: usize = 0;
    let mut curved: usize = 0;
    let mut repeats: usize = 0;

    for i in 0..count {
        debug!("Iteration {i}");
        let playlist: Playlist = generator.generate(&mut rng);
        let lead: usize = playlist
            .ids()
            .iter()
            .take_while(|id| mode == DifficultyMode::Normal && settings.tutorial_ids.contains(*id))
            .count();
        let span: usize = playlist.len() - lead;
        let mut seen: HashSet<&str> = HashSet::new();

        println!("# Playlist {}", i + 1);
        for (ordinal, id) in playlist.ids().iter().enumerate() {
            if !seen.insert(id.as_str()) {
                repeats += 1;
            }
            let Some(entry) = library.resolve(id) else {
                println!("{ordinal:>3}  {id:<12} ?");
                continue;
            };
            *buckets.entry(entry.difficulty).or_default() += 1;
            if ordinal < lead {
                println!("{ordinal:>3}  {id:<12} {}  tutorial", entry.form);
                continue;
            }
            let target: u8 = curve.target(ordinal - lead, span);
            gap += target.abs_diff(entry.difficulty) as usize;
            curved += 1;
            println!(
                "{ordinal:>3}  {id:<12} {}  target {target:>2}  actual {:>2}",
                entry.form, entry.difficulty
            );
        }
    }

    if summary {
        println!();
        println!("Playlists: {count}");
        for d in MIN_DIFFICULTY..=MAX_DIFFICULTY {
            println!(
                "Difficulty {d:>2}: {} stages",
                buckets.get(&d).copied().unwrap_or(0)
            );
        }
        if curved > 0 {
            println!(
                "Average distance to the target: {:.2}",
                gap as f64 / curved as f64
            );
        }
        println!("Repeated entries: {repeats}");
    }
}
