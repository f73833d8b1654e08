mod editor;
mod options;
mod session;

use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyEvent};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};

use editor::{EditorAction, LineEditor};
use options::{EmulatorOptions, USAGE};
use session::{HostClock, Session};

/// Keystroke wait between sequencer polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn main() -> io::Result<()> {
    let options = EmulatorOptions::parse(env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("{USAGE}");
        process::exit(2);
    });

    let mut session = Session::new(HostClock::new(), &options)?;
    let mut editor = LineEditor::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _raw = RawMode::enable()?;

    let mut prompt = session.prompt();
    let banner = [format!(
        "Regatta Starter Emulator ready ({}). Type `help` for commands or `exit` to quit.",
        options.schedule.title
    )];
    redraw(&mut out, &banner, &prompt, editor.buffer())?;

    loop {
        let mut output = Vec::new();
        let mut dirty = false;

        if let Some(key) = next_key()? {
            match editor.handle_key(key) {
                EditorAction::None => {}
                EditorAction::Redraw => dirty = true,
                EditorAction::Quit => break,
                EditorAction::Submit(line) => {
                    let trimmed = line.trim();
                    output.push(format!("{prompt}{trimmed}"));
                    if should_terminate(trimmed) {
                        output.push("Session closed.".to_string());
                        redraw(&mut out, &output, "", "")?;
                        return Ok(());
                    }
                    if !trimmed.is_empty() {
                        output.extend(session.handle_line(trimmed));
                    }
                }
            }
        }

        output.extend(session.tick());

        let next_prompt = session.prompt();
        if dirty || !output.is_empty() || next_prompt != prompt {
            prompt = next_prompt;
            redraw(&mut out, &output, &prompt, editor.buffer())?;
        }
    }

    redraw(&mut out, &[String::new()], "", "")
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

/// Waits up to [`POLL_INTERVAL`] for a key event.
fn next_key() -> io::Result<Option<KeyEvent>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Replaces the prompt line with `lines`, then redraws the prompt and pending input.
fn redraw<W>(out: &mut W, lines: &[String], prompt: &str, buffer: &str) -> io::Result<()>
where
    W: Write,
{
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for line in lines {
        // Raw mode does not translate `\n`.
        queue!(out, Print(line), Print("\r\n"))?;
    }
    queue!(out, Print(prompt), Print(buffer))?;
    out.flush()
}

/// Keeps the terminal in raw mode for the lifetime of the session.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
