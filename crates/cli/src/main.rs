// Copyright (c) 2024 Mike Tsao

//! `note-sequencer` writes note names to numbered MIDI files and reads MIDI
//! files back.

use clap::{Parser, Subcommand};
use note_sequencer::{
    prelude::*,
    util::{next_available_path, read_note_events},
};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,

    /// JSON settings file. Command-line options override its values.
    #[clap(short = 'c', long, global = true, value_parser)]
    config: Option<PathBuf>,

    /// Enable debug mode
    #[clap(short = 'd', long, global = true, value_parser)]
    debug: bool,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write note names (e.g. C4 D4 F#6) to the next free numbered MIDI file
    Create {
        /// Note names, in playing order
        notes: Vec<String>,

        #[clap(flatten)]
        output: OutputArgs,

        /// Length of each note, in ticks
        #[clap(short = 'q', long, value_parser)]
        quarter_duration: Option<u32>,
    },
    /// Show the path the next `create` would write to
    Next {
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// List the note events in a MIDI file
    Inspect {
        /// MIDI file to read
        file: PathBuf,
    },
    /// Print every note name and its MIDI pitch number
    Table,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Filename prefix
    #[clap(short = 'b', long, value_parser)]
    base_name: Option<String>,

    /// Filename suffix, including the dot
    #[clap(short = 'e', long, value_parser)]
    extension: Option<String>,

    /// Directory for new files
    #[clap(short = 'o', long, value_parser)]
    output_dir: Option<PathBuf>,
}
impl OutputArgs {
    fn apply(&self, settings: &mut SequenceSettings) {
        if let Some(base_name) = &self.base_name {
            settings.base_name = base_name.clone();
        }
        if let Some(extension) = &self.extension {
            settings.extension = extension.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_settings(config: &Option<PathBuf>) -> anyhow::Result<Settings> {
    match config {
        Some(path) => {
            let settings = Settings::load(path)?;
            log::debug!("loaded settings from {}", path.display());
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if args.version {
        println!("{}", note_sequencer::app_version());
        return Ok(());
    }

    let mut settings = load_settings(&args.config)?;
    match args.command {
        Some(Command::Create {
            notes,
            output,
            quarter_duration,
        }) => {
            output.apply(&mut settings.sequence);
            if let Some(quarter_duration) = quarter_duration {
                settings.sequence.quarter_duration = quarter_duration;
            }
            let path = create_sequence(notes.as_slice(), &settings.sequence)?;
            println!("{}", path.display());
        }
        Some(Command::Next { output }) => {
            output.apply(&mut settings.sequence);
            let s = &settings.sequence;
            println!(
                "{}",
                next_available_path(&s.output_dir, &s.base_name, &s.extension).display()
            );
        }
        Some(Command::Inspect { file }) => {
            let table = PitchTable::global();
            let events = read_note_events(&file)?;
            for event in events.iter() {
                println!(
                    "{:>8} {:<3} ch{:<2} {:<4} ({:>3}) vel {}",
                    event.delta,
                    if event.is_on() { "on" } else { "off" },
                    event.channel.0,
                    table.name(event.key).unwrap_or("?"),
                    event.key,
                    event.vel
                );
            }
            eprintln!("{} note event(s) in {}", events.len(), file.display());
        }
        Some(Command::Table) => {
            for (name, pitch) in PitchTable::global().iter() {
                println!("{name}\t{pitch}");
            }
        }
        None => {
            eprintln!("Nothing to do. Try --help.");
        }
    }
    Ok(())
}
