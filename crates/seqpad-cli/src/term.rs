//! Terminal frontend for the interactive editor
//!
//! Alternate-screen, raw-mode UI built on crossterm: editor pane on the
//! left, rendered preview on the right, status line at the bottom. File
//! dialogs are one-line prompts on the status row.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use crossterm::{
    cursor::{MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::warn;

use seqpad::diagram::RenderedImage;
use seqpad::editor::{Command, EditorShell, EditorState, FileChoice, Frontend};

/// Editable text with a cursor, kept separate from the terminal so the
/// editing rules are testable headlessly
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn byte_at(&self, line: &str) -> usize {
        line.char_indices()
            .nth(self.col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(&self.lines[self.row]);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn newline(&mut self) {
        let at = self.byte_at(&self.lines[self.row]);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_at(&self.lines[self.row]);
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].chars().count();
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].chars().count();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.lines[self.row].chars().count() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.lines[self.row].chars().count());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.lines[self.row].chars().count());
        }
    }
}

/// Crossterm implementation of the editor [`Frontend`]
pub struct TermFrontend {
    buffer: TextBuffer,
    tint: Option<(u8, u8, u8)>,
    status: String,
    title: String,
    preview: Vec<String>,
    info: Option<(String, String)>,
}

impl TermFrontend {
    fn new() -> Self {
        Self {
            buffer: TextBuffer::from_text(""),
            tint: None,
            status: String::new(),
            title: String::new(),
            preview: Vec::new(),
            info: None,
        }
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    fn dismiss_info(&mut self) -> bool {
        self.info.take().is_some()
    }

    /// One-line prompt on the status row; Esc cancels
    fn prompt(&mut self, question: &str, initial: &str) -> Option<String> {
        match self.prompt_inner(question, initial) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "prompt failed");
                None
            }
        }
    }

    fn prompt_inner(&mut self, question: &str, initial: &str) -> Result<Option<String>> {
        let mut reply = initial.to_string();
        loop {
            let (_, height) = terminal::size()?;
            let mut stdout = io::stdout();
            queue!(
                stdout,
                MoveTo(0, height.saturating_sub(1)),
                Clear(ClearType::CurrentLine),
                Print(format!("{question}{reply}")),
            )?;
            stdout.flush()?;

            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                match code {
                    KeyCode::Enter => {
                        return Ok(if reply.is_empty() { None } else { Some(reply) });
                    }
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Backspace => {
                        reply.pop();
                    }
                    KeyCode::Char(c) => reply.push(c),
                    _ => {}
                }
            }
        }
    }

    fn draw(&self) -> Result<()> {
        let (width, height) = terminal::size()?;
        let split = width / 2;
        let body_rows = height.saturating_sub(2);
        let mut stdout = io::stdout();

        queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(
            stdout,
            Print(clip(
                &format!(
                    "{}  ^E evaluate  ^S save  ^W save-as  ^O open  F1 help  ^Q quit",
                    self.title
                ),
                width as usize
            ))
        )?;

        let pane = split.saturating_sub(1) as usize;
        for i in 0..body_rows as usize {
            let y = (i + 1) as u16;
            queue!(stdout, MoveTo(0, y))?;
            if let Some((r, g, b)) = self.tint {
                queue!(stdout, SetBackgroundColor(Color::Rgb { r, g, b }))?;
            }
            let line = self.buffer.lines().get(i).map(String::as_str).unwrap_or("");
            queue!(stdout, Print(format!("{:<pane$}", clip(line, pane))))?;
            queue!(stdout, ResetColor)?;

            queue!(
                stdout,
                MoveTo(split, y),
                SetForegroundColor(Color::DarkGrey),
                Print('│'),
                ResetColor
            )?;

            let right = self.right_pane_line(i);
            queue!(
                stdout,
                MoveTo(split + 2, y),
                Print(clip(right, width.saturating_sub(split + 2) as usize))
            )?;
        }

        queue!(
            stdout,
            MoveTo(0, height.saturating_sub(1)),
            Clear(ClearType::CurrentLine),
            Print(clip(&self.status, width as usize))
        )?;

        let (row, col) = self.buffer.cursor();
        queue!(
            stdout,
            MoveTo((col as u16).min(split.saturating_sub(1)), row as u16 + 1),
            Show
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn right_pane_line(&self, i: usize) -> &str {
        if let Some((title, body)) = &self.info {
            return match i {
                0 => title.as_str(),
                1 => "",
                n => body.split('\n').nth(n - 2).unwrap_or(""),
            };
        }
        self.preview.get(i).map(String::as_str).unwrap_or("")
    }
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

impl Frontend for TermFrontend {
    fn editor_text(&self) -> String {
        self.buffer.text()
    }

    fn set_editor_text(&mut self, text: &str) {
        self.buffer = TextBuffer::from_text(text);
    }

    fn set_editor_tint(&mut self, tint: Option<(u8, u8, u8)>) {
        self.tint = tint;
    }

    fn show_image(&mut self, image: &RenderedImage) {
        self.preview = match image.as_text() {
            Some(text) => text.lines().map(str::to_string).collect(),
            None => vec![format!("[{} image, {} bytes]", image.format(), image.len())],
        };
    }

    fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn ask_open_path(&mut self) -> Option<PathBuf> {
        self.prompt("Open file: ", "").map(PathBuf::from)
    }

    fn ask_save_path(&mut self, suggested_name: &str) -> Option<FileChoice> {
        let reply = self.prompt("Save as: ", suggested_name)?;
        let path = PathBuf::from(reply);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())?;
        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| parent.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Some(FileChoice {
            directory,
            file_name,
        })
    }

    fn show_info(&mut self, title: &str, body: &str) {
        self.info = Some((title.to_string(), body.to_string()));
    }
}

/// Restores the terminal even on early return or panic
struct TermGuard;

impl TermGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Map a key press to an editor command, if it is one
fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('e') => Some(Command::Evaluate),
            KeyCode::Char('s') => Some(Command::Save),
            KeyCode::Char('w') => Some(Command::SaveAs),
            KeyCode::Char('o') => Some(Command::Open),
            KeyCode::Char('q') => Some(Command::Exit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::F(1) => Some(Command::Help),
        KeyCode::F(2) => Some(Command::About),
        _ => None,
    }
}

/// Run the interactive editor until the user quits
pub fn run_editor(state: EditorState) -> Result<()> {
    let _guard = TermGuard::enter()?;
    let mut shell = EditorShell::new(state, TermFrontend::new());

    while shell.is_running() {
        shell.frontend().draw()?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if shell.frontend_mut().dismiss_info() {
            continue;
        }

        if let Some(command) = command_for(&key) {
            shell.dispatch(command)?;
            continue;
        }

        let buffer = shell.frontend_mut().buffer_mut();
        match key.code {
            KeyCode::Char(c) => buffer.insert_char(c),
            KeyCode::Enter => buffer.newline(),
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Tab => {
                buffer.insert_char(' ');
                buffer.insert_char(' ');
            }
            KeyCode::Left => buffer.move_left(),
            KeyCode::Right => buffer.move_right(),
            KeyCode::Up => buffer.move_up(),
            KeyCode::Down => buffer.move_down(),
            _ => {}
        }
    }

    Ok(())
}
