use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use promptforge_core::{EnhancementResult, SessionState};
use promptforge_service::Enhancer;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::components::copy_button::CopyButton;
use crate::components::text_panel::TextPanel;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const INPUT_PLACEHOLDER: &str =
    "e.g., 'write a story about a time traveling cat' or 'explain quantum entanglement simply'";

/// Which panel receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing the raw idea
    Input,
    /// Reading / copying the result
    Output,
}

pub struct App {
    enhancer: Arc<Enhancer>,
    rt: Runtime,
    results_tx: UnboundedSender<(u64, EnhancementResult)>,
    results_rx: UnboundedReceiver<(u64, EnhancementResult)>,
    session: SessionState,
    focus: Focus,
    output_scroll: u16,
    copy_button: CopyButton,
    clipboard: Box<dyn Clipboard>,
    spinner_frame: usize,
}

impl App {
    pub fn new(enhancer: Arc<Enhancer>, clipboard: Box<dyn Clipboard>) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Ok(Self {
            enhancer,
            rt,
            results_tx,
            results_rx,
            session: SessionState::new(),
            focus: Focus::Input,
            output_scroll: 0,
            copy_button: CopyButton::new(),
            clipboard,
            spinner_frame: 0,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn copy_button(&self) -> &CopyButton {
        &self.copy_button
    }

    pub fn output_scroll(&self) -> u16 {
        self.output_scroll
    }

    pub fn is_input_mode(&self) -> bool {
        self.focus == Focus::Input
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.session.is_loading() || self.copy_button.is_copied()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            self.toggle_focus();
            return;
        }
        // Ctrl+Y copies from either panel
        if key.code == KeyCode::Char('y') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.copy_output(Instant::now());
            return;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Output => self.handle_output_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.session.insert_char('\n');
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Esc => self.focus = Focus::Output,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.insert_char(c);
            }
            _ => {}
        }
    }

    fn handle_output_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') => self.copy_output(Instant::now()),
            KeyCode::Char('i') => self.focus = Focus::Input,
            KeyCode::Enter => self.submit(),
            KeyCode::Char('j') | KeyCode::Down => {
                self.output_scroll = self.output_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.output_scroll = self.output_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(10),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(10),
            KeyCode::Char('g') => self.output_scroll = 0,
            _ => {}
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Output,
            Focus::Output => Focus::Input,
        };
    }

    /// Start an enhancement if the submit action is enabled.
    /// Blank input only shows the empty-input message.
    pub fn submit(&mut self) {
        let Some(request) = self.session.begin_submit() else {
            debug!("submit ignored (phase={})", self.session.phase());
            return;
        };

        info!("submitting request {}", request.seq);
        self.output_scroll = 0;

        let enhancer = Arc::clone(&self.enhancer);
        let tx = self.results_tx.clone();
        self.rt.spawn(async move {
            let result = enhancer.enhance(&request.raw_message).await;
            // Receiver only disappears when the app is shutting down.
            let _ = tx.send((request.seq, result));
        });
    }

    /// Copy the current result. Failures are logged, never shown.
    /// Disabled while the "Copied!" acknowledgment is showing.
    pub fn copy_output(&mut self, now: Instant) {
        if !self.session.has_output() || self.session.is_loading() {
            return;
        }
        if self.copy_button.is_copied() {
            return;
        }
        match self.clipboard.write_text(self.session.enhanced_output()) {
            Ok(()) => self.copy_button.mark_copied(now),
            Err(e) => warn!("failed to copy to clipboard: {e}"),
        }
    }

    /// Apply finished requests and expire transient UI state.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        while let Ok((seq, result)) = self.results_rx.try_recv() {
            if let Err(ref e) = result {
                if e.is_fatal_until_restart() {
                    warn!("request {seq} failed on credentials; restart with a valid key: {e}");
                }
            }
            if self.session.settle(seq, result) {
                info!("request {seq} settled: {}", self.session.phase());
                if self.session.has_output() {
                    self.focus = Focus::Output;
                }
            } else {
                debug!("dropped stale result for request {seq}");
            }
        }
        self.copy_button.expire(now);
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Percentage(30),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        TextPanel::new(" 💡 Your Idea, Simply Stated ", self.session.raw_input(), Color::Cyan)
            .placeholder(INPUT_PLACEHOLDER)
            .focused(self.focus == Focus::Input)
            .render(frame, layout[1]);
        self.render_action_line(frame, layout[2]);
        self.render_result_area(frame, layout[3]);
        self.render_footer(frame, layout[4]);
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" promptforge ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(
                "AI Prompt Enhancer",
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" ({})", self.enhancer.settings().model),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(title, area);
    }

    fn render_action_line(&self, frame: &mut Frame, area: Rect) {
        let line = if self.session.is_loading() {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            Line::from(Span::styled(
                format!(" {spinner} Crafting..."),
                Style::default().fg(Color::Yellow),
            ))
        } else if self.session.can_submit() {
            Line::from(Span::styled(
                " [Enter] Enhance Prompt ",
                Style::default().fg(Color::Cyan).bold(),
            ))
        } else {
            Line::from(Span::styled(
                " [Enter] Enhance Prompt ",
                Style::default().fg(Color::DarkGray),
            ))
        };
        frame.render_widget(line.right_aligned(), area);
    }

    fn render_result_area(&self, frame: &mut Frame, area: Rect) {
        let mut constraints = Vec::new();
        if self.session.error_message().is_some() {
            constraints.push(Constraint::Length(4));
        }
        if self.session.is_loading() {
            constraints.push(Constraint::Length(3));
        } else if self.session.has_output() {
            constraints.push(Constraint::Min(0));
        }
        if constraints.is_empty() {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);
        let mut slot = chunks.iter().copied();

        if let Some(message) = self.session.error_message() {
            if let Some(rect) = slot.next() {
                self.render_error_banner(frame, message, rect);
            }
        }

        if self.session.is_loading() {
            if let Some(rect) = slot.next() {
                let paragraph = Paragraph::new(Line::from(Span::styled(
                    "Generating your optimized prompt...",
                    Style::default().fg(Color::Gray),
                )))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::NONE));
                frame.render_widget(paragraph, rect);
            }
        } else if self.session.has_output() {
            if let Some(rect) = slot.next() {
                TextPanel::new(
                    " ✨ Your Powerful AI Prompt ",
                    self.session.enhanced_output(),
                    Color::Green,
                )
                .focused(self.focus == Focus::Output)
                .scroll(self.output_scroll)
                .badge(self.copy_button.label())
                .render(frame, rect);
            }
        }
    }

    fn render_error_banner(&self, frame: &mut Frame, message: &str, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" Error: ", Style::default().fg(Color::Red).bold()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::LightRed)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.focus {
            Focus::Input => {
                " Enter: enhance  Alt+Enter: newline  Ctrl+Y: copy  Tab: result  Ctrl+C: quit"
            }
            Focus::Output => " c: copy  ↑/↓: scroll  i/Tab: edit idea  q: quit",
        };
        let line = Line::from(vec![
            Span::styled(hints, Style::default().fg(Color::DarkGray)),
            Span::styled("  | Powered by Gemini", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(line, area);
    }
}
