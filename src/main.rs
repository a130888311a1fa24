//! Digisonic — headless player for toca/espera melody programs.
//!
//! Plays a program on a [`ManualClock`] driven in real time, printing each
//! note and highlighted line as it fires.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{debug, error, info, warn};

use digisonic::config::AppConfig;
use digisonic::dsl::{split_lines, LineParser, STARTER_PROGRAM};
use digisonic::event::{beat_duration, EventKind, ManualClock, Scheduler, TimelineEvent};
use digisonic::host::{EditorWidget, KeyboardState, TextBuffer};
use digisonic::midi::{MidiConfig, MidiInput};
use digisonic::pitch::convert_midi_to_pt_note;
use digisonic::report::ErrorReporter;
use digisonic::transport::{Collaborators, PlayOutcome, PlayState, TransportController};

const TICK: Duration = Duration::from_millis(10);
const RELOAD_EVERY: Duration = Duration::from_millis(250);

type Controller = TransportController<ManualClock, KeyboardState, TextBuffer>;

#[derive(Parser, Debug)]
#[command(name = "digisonic", version, about = "Play toca/espera melody programs")]
struct Cli {
    /// Program file. Plays the starter melody when omitted.
    file: Option<PathBuf>,

    /// Tempo in quarter-note beats per minute.
    #[arg(long)]
    bpm: Option<f64>,

    /// Loop the program.
    #[arg(long = "loop")]
    looping: bool,

    /// Stop after this many passes when looping (0 = until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    loops: u32,

    /// Don't trigger the sampler.
    #[arg(long)]
    mute: bool,

    /// Only schedule the program and print its timeline.
    #[arg(long)]
    check: bool,

    /// List MIDI input devices and exit.
    #[arg(long)]
    list_midi: bool,

    /// Listen for notes on a MIDI device while playing.
    #[arg(long)]
    midi: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if cli.list_midi {
        match MidiInput::enable() {
            Ok(devices) => devices.iter().for_each(|d| println!("{d}")),
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut config = AppConfig::load();
    if let Some(bpm) = cli.bpm {
        config.bpm = bpm;
    }
    config.looping |= cli.looping;
    config.muted |= cli.mute;
    if beat_duration(config.bpm).is_zero() {
        error!("unplayable tempo: {} BPM", config.bpm);
        std::process::exit(1);
    }

    let source = match &cli.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                error!("reading {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => STARTER_PROGRAM.to_string(),
    };

    let reporter = ErrorReporter::new(config.locale).with_range(config.piano);
    let mut controller = TransportController::new(
        Scheduler::new(LineParser::new(config.piano), beat_duration(config.bpm)),
        reporter,
        Collaborators {
            clock: ManualClock::new(config.bpm),
            piano: KeyboardState::new(config.piano),
            editor: TextBuffer::new(&source),
        },
    );

    if cli.check {
        std::process::exit(check(&controller, reporter));
    }

    controller.set_tempo(config.bpm);
    controller.set_looping(config.looping);
    controller.set_muted(config.muted);
    controller.on_instrument_ready();

    match controller.set_playing(true) {
        PlayOutcome::Started { events, loop_end } => {
            if loop_end.is_zero() && config.looping {
                warn!("program has no espera; playing once");
                controller.set_looping(false);
            }
            println!(
                "digisonic v{} — {events} events, {:.2}s at {} BPM",
                env!("CARGO_PKG_VERSION"),
                loop_end.as_secs_f64(),
                config.bpm
            );
        }
        PlayOutcome::Rejected(_) => {
            report_decoration(&controller);
            std::process::exit(1);
        }
        other => {
            error!("could not start playback: {other:?}");
            std::process::exit(1);
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        warn!("Ctrl-C handler unavailable: {e}");
    }

    let (midi_tx, midi_rx) = mpsc::channel();
    let _midi = if cli.midi {
        let midi_config = MidiConfig::load().unwrap_or_default();
        match MidiInput::start(&midi_config, midi_tx) {
            Ok(input) => {
                println!("listening for MIDI on {}", input.port_name());
                Some(input)
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    } else {
        None
    };

    let watch = watches_file(&cli, &config);
    play_loop(&mut controller, &cli, watch, source, &running, &midi_rx);

    controller.set_playing(false);
    if controller.editor().decoration().is_some() {
        report_decoration(&controller);
        std::process::exit(1);
    }
    println!("done.");
}

/// Drive the clock in real time until playback stops or Ctrl-C.
fn play_loop(
    controller: &mut Controller,
    cli: &Cli,
    watch: bool,
    mut source: String,
    running: &AtomicBool,
    midi_rx: &mpsc::Receiver<u8>,
) {
    let mut passes = 0u32;
    let mut last_tick = Instant::now();
    let mut last_reload = Instant::now();

    while running.load(Ordering::SeqCst) && controller.state() == PlayState::Playing {
        let nap = controller
            .clock()
            .until_next_event()
            .map_or(TICK, |next| next.min(TICK));
        thread::sleep(nap);

        while let Ok(note) = midi_rx.try_recv() {
            if controller.midi_note_received(note) {
                println!("          midi in   {}", convert_midi_to_pt_note(note as i32));
            }
        }

        if watch && last_reload.elapsed() >= RELOAD_EVERY {
            last_reload = Instant::now();
            if let Some(path) = &cli.file {
                reload_if_changed(controller, path, &mut source);
            }
        }

        let now = Instant::now();
        let fired = controller.clock_mut().advance(now - last_tick);
        last_tick = now;

        for event in fired {
            if event.is_loop_boundary() {
                passes += 1;
                if cli.loops > 0 && passes >= cli.loops {
                    controller.set_looping(false);
                }
            }
            print_event(controller, &event);
            controller.handle_event(&event);
        }

        for note in controller.clock_mut().take_triggered() {
            debug!("sampler: {} ({}) at {:?}", note.note, note.length, note.at);
        }
    }
}

/// File edits are picked up only while looping a program read from disk,
/// whether looping came from the command line or the config file.
fn watches_file(cli: &Cli, config: &AppConfig) -> bool {
    config.looping && cli.file.is_some()
}

/// Pick up edits to the program file at the next loop boundary.
fn reload_if_changed(controller: &mut Controller, path: &Path, source: &mut String) {
    let Ok(text) = std::fs::read_to_string(path) else {
        return;
    };
    if text != *source {
        info!("{} changed, re-evaluating at loop end", path.display());
        controller.editor_mut().set_text(&text);
        controller.request_reevaluate();
        *source = text;
    }
}

fn print_event(controller: &Controller, event: &TimelineEvent) {
    let t = event.time.as_secs_f64();
    match &event.kind {
        EventKind::NoteOn { midi, .. } => {
            println!("{t:>8.3}s  toca     {}", convert_midi_to_pt_note(*midi as i32));
        }
        EventKind::LineHighlight { line } => {
            let lines = controller.editor().lines();
            let text = lines.get(*line).map(String::as_str).unwrap_or_default();
            println!("{t:>8.3}s  line {:<3} {}", line + 1, text.trim());
        }
        EventKind::LoopBoundaryReached => println!("{t:>8.3}s  --"),
        EventKind::NoteOff { .. } => {}
    }
}

/// Schedule without playing; print the timeline or the error. Returns the exit code.
fn check(controller: &Controller, reporter: ErrorReporter) -> i32 {
    let lines = split_lines(&controller.editor().text());
    match controller.scheduler().schedule(&lines) {
        Ok(schedule) => {
            for event in &schedule.events {
                println!(
                    "{:>8.3}s  beat {:<7.3} {:?}",
                    event.time.as_secs_f64(),
                    event.beat.as_beats_f64(),
                    event.kind
                );
            }
            0
        }
        Err(e) => {
            let decoration = reporter.report(&e);
            eprintln!("line {}: {}", decoration.line + 1, decoration.message);
            1
        }
    }
}

fn report_decoration(controller: &Controller) {
    if let Some(decoration) = controller.editor().decoration() {
        eprintln!("line {}: {}", decoration.line + 1, decoration.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_looping_enables_file_watch() {
        let cli = Cli::parse_from(["digisonic", "melody.txt"]);
        let mut config = AppConfig::default();
        assert!(!watches_file(&cli, &config));
        config.looping = true;
        assert!(watches_file(&cli, &config));
    }

    #[test]
    fn starter_program_is_never_watched() {
        let cli = Cli::parse_from(["digisonic", "--loop"]);
        let config = AppConfig {
            looping: true,
            ..AppConfig::default()
        };
        assert!(!watches_file(&cli, &config));
    }
}
