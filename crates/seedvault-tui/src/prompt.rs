//! Hidden line input for the import command

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use zeroize::Zeroizing;

/// Read a line from the terminal without echoing it
///
/// Typed characters are shown as `*`. Returns `Interrupted` on Ctrl-C or
/// Esc.
pub fn read_hidden(prompt: &str) -> io::Result<Zeroizing<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    enable_raw_mode()?;
    let result = read_keys(&mut stderr, event::read);
    disable_raw_mode()?;

    writeln!(stderr)?;
    result
}

fn read_keys<W, F>(out: &mut W, mut next: F) -> io::Result<Zeroizing<String>>
where
    W: Write,
    F: FnMut() -> io::Result<Event>,
{
    let mut input = Zeroizing::new(String::new());

    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = next()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => return Ok(input),
            KeyCode::Esc => return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled")),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
            }
            KeyCode::Backspace => {
                if input.pop().is_some() {
                    write!(out, "\x08 \x08")?;
                    out.flush()?;
                }
            }
            KeyCode::Char(c) => {
                input.push(c);
                write!(out, "*")?;
                out.flush()?;
            }
            _ => {}
        }
    }
}
