use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Bordered, wrapping text area used for both the idea input and the result.
pub struct TextPanel<'a> {
    title: &'a str,
    content: &'a str,
    placeholder: Option<&'a str>,
    accent: Color,
    focused: bool,
    scroll: u16,
    badge: Option<Line<'a>>,
}

impl<'a> TextPanel<'a> {
    pub fn new(title: &'a str, content: &'a str, accent: Color) -> Self {
        Self {
            title,
            content,
            placeholder: None,
            accent,
            focused: false,
            scroll: 0,
            badge: None,
        }
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = Some(text);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    /// Right-aligned widget in the top border (e.g. the copy control).
    pub fn badge(mut self, badge: Line<'a>) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                self.title,
                Style::default().fg(self.accent).bold(),
            ));
        if let Some(badge) = self.badge {
            block = block.title(badge.right_aligned());
        }

        let text = match self.placeholder {
            Some(placeholder) if self.content.is_empty() => Text::from(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray).italic(),
            )),
            _ => Text::from(self.content),
        };

        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
