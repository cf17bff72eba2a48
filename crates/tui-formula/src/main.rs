//! TUI formula editor demo
//!
//! A terminal frontend over the headless `formula-core` kernel, built
//! with crossterm and ratatui. The kernel owns the formula tree and the
//! cursor; this demo feeds it keystrokes and shows the live markup.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-formula
//! ```
//!
//! # Key bindings
//!
//! - Printable characters: structural typing (`^` `_` `/` `(` build
//!   structure, `\` opens the command composer, `$` toggles text mode)
//! - Arrow keys: move the cursor through the tree
//! - Shift+arrows: select
//! - Home/End, Ctrl+Home/Ctrl+End: block / document boundaries
//! - Tab / Shift+Tab: next / previous argument block
//! - Backspace/Delete: structural deletion
//! - Ctrl+A: select all
//! - Ctrl+O: load markup (type, then Enter)
//! - Ctrl+N: clear the document
//! - Ctrl+X: quit

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use formula_core::{Document, Key, KeyEvent, NodeId};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::{self, stdout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    LoadMarkup,
}

struct App {
    doc: Document,
    input_mode: InputMode,
    prompt: String,
    status: String,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        let mut doc = Document::new();
        doc.set_markup("\\frac{1}{2}+\\sqrt{x^2+1}");
        Self {
            doc,
            input_mode: InputMode::Normal,
            prompt: String::new(),
            status: "Ready".to_string(),
            should_quit: false,
        }
    }

    fn handle_key_event(&mut self, key: crossterm::event::KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.input_mode == InputMode::LoadMarkup {
            self.handle_prompt_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('x') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::Char('a') if ctrl => {
                self.doc.select_all();
                self.status = "Selected all".to_string();
            }
            KeyCode::Char('n') if ctrl => {
                self.doc.set_markup("");
                self.status = "Cleared".to_string();
            }
            KeyCode::Char('o') if ctrl => {
                self.input_mode = InputMode::LoadMarkup;
                self.prompt.clear();
            }
            KeyCode::Char(c) if !ctrl => {
                self.doc.typed_char(c);
                self.status.clear();
            }
            code => {
                if let Some(ev) = translate_key(code, shift, ctrl) {
                    let consumed = self.doc.keystroke(ev);
                    self.status = if consumed {
                        String::new()
                    } else {
                        format!("{code:?} not handled at this position")
                    };
                }
            }
        }
    }

    fn handle_prompt_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.doc.set_markup(&self.prompt.clone());
                self.status = format!("Loaded {} chars of markup", self.prompt.len());
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.status.clear();
            }
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Char(c) => {
                self.prompt.push(c);
            }
            _ => {}
        }
    }

    /// Human-readable path from the root to the cursor's block.
    fn cursor_path(&self) -> String {
        let tree = self.doc.tree();
        let pos = self.doc.cursor_position();
        let mut parts: Vec<String> = Vec::new();
        let mut block = pos.parent;
        while let Some(cmd) = tree.parent(block) {
            let slot = tree
                .children(cmd)
                .position(|b| b == block)
                .unwrap_or_default();
            let label = tree
                .command(cmd)
                .map(|data| data.token.trim().to_string())
                .unwrap_or_default();
            parts.push(format!("{label}[{slot}]"));
            block = tree.parent(cmd).unwrap_or(self.doc.root());
        }
        parts.push("root".to_string());
        parts.reverse();
        parts.join(" > ")
    }

    fn gap_description(&self) -> String {
        let pos = self.doc.cursor_position();
        let describe = |node: Option<NodeId>| match node {
            Some(id) => self.doc.node_markup(id),
            None => "(edge)".to_string(),
        };
        format!(
            "between {} and {}",
            describe(pos.prev),
            describe(pos.next)
        )
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        // formula pane
        let markup = self.doc.get_markup();
        let formula = Paragraph::new(markup)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Formula "));
        f.render_widget(formula, chunks[0]);

        // cursor pane
        let mut cursor_lines = vec![
            Line::from(vec![
                Span::styled("path: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.cursor_path()),
            ]),
            Line::from(vec![
                Span::styled("gap:  ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.gap_description()),
            ]),
        ];
        if let Some(sel) = self.doc.selection_markup() {
            cursor_lines.push(Line::from(vec![
                Span::styled("sel:  ", Style::default().fg(Color::DarkGray)),
                Span::styled(sel, Style::default().add_modifier(Modifier::REVERSED)),
            ]));
        }
        let cursor = Paragraph::new(cursor_lines)
            .block(Block::default().borders(Borders::ALL).title(" Cursor "));
        f.render_widget(cursor, chunks[1]);

        // status / prompt pane
        let (title, text) = match self.input_mode {
            InputMode::LoadMarkup => (" Load markup (Enter to apply, Esc to cancel) ", {
                format!("{}_", self.prompt)
            }),
            InputMode::Normal => (" Status ", self.status.clone()),
        };
        let status = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(status, chunks[2]);

        // help bar
        let help = Paragraph::new(
            "type to edit | \\name: compose | $: text | Ctrl+A: select all | \
             Ctrl+O: load | Ctrl+N: clear | Ctrl+X: quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[3]);
    }
}

fn translate_key(code: KeyCode, shift: bool, ctrl: bool) -> Option<KeyEvent> {
    let key = match code {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => return Some(KeyEvent::shifted(Key::Tab)),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some(KeyEvent { key, shift, ctrl })
}

fn main() -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    app.handle_key_event(key);
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
