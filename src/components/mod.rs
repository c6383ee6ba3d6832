pub mod stake;
pub mod transfer;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use tx_composer::domain::form::{Effect, Field, TxForm};

use crate::{action::Action, tui::Frame};

/// A component is a reusable UI element that can handle events and render itself.
pub trait Component {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()>;
    fn draw(&mut self, f: &mut Frame, area: Rect);
}

/// Focusable rows of a transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Token,
    Recipient,
    Amount,
    Confirm,
}

impl FormFocus {
    pub fn field(self) -> Option<Field> {
        match self {
            FormFocus::Recipient => Some(Field::Recipient),
            FormFocus::Amount => Some(Field::Amount),
            FormFocus::Token | FormFocus::Confirm => None,
        }
    }

    fn next(self, has_recipient: bool) -> Self {
        match self {
            FormFocus::Token if has_recipient => FormFocus::Recipient,
            FormFocus::Token | FormFocus::Recipient => FormFocus::Amount,
            FormFocus::Amount => FormFocus::Confirm,
            FormFocus::Confirm => FormFocus::Token,
        }
    }

    fn prev(self, has_recipient: bool) -> Self {
        match self {
            FormFocus::Token => FormFocus::Confirm,
            FormFocus::Recipient => FormFocus::Token,
            FormFocus::Amount if has_recipient => FormFocus::Recipient,
            FormFocus::Amount => FormFocus::Token,
            FormFocus::Confirm => FormFocus::Amount,
        }
    }
}

/// Focus and edit state shared by the form components.
#[derive(Debug, Clone)]
pub struct FormCursor {
    pub focused: FormFocus,
    pub is_editing: bool,
    pub error_message: Option<String>,
}

impl Default for FormCursor {
    fn default() -> Self {
        Self {
            focused: FormFocus::Recipient,
            is_editing: false,
            error_message: None,
        }
    }
}

impl FormCursor {
    /// Handle focus movement. Returns whether the key was consumed.
    pub fn navigate(&mut self, key: KeyEvent, has_recipient: bool) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.is_editing = false;
                self.focused = self.focused.next(has_recipient);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.is_editing = false;
                self.focused = self.focused.prev(has_recipient);
            }
            KeyCode::Esc if self.is_editing => {
                self.is_editing = false;
            }
            KeyCode::Char('j') if !self.is_editing => {
                self.focused = self.focused.next(has_recipient);
            }
            KeyCode::Char('k') if !self.is_editing => {
                self.focused = self.focused.prev(has_recipient);
            }
            _ => return false,
        }
        true
    }

    /// Move off a field that is no longer shown.
    pub fn ensure_visible(&mut self, has_recipient: bool) {
        if !has_recipient && self.focused == FormFocus::Recipient {
            self.focused = FormFocus::Amount;
            self.is_editing = false;
        }
    }

    /// Apply a typing key to the focused text field.
    pub fn edit(&self, form: &mut dyn TxForm, key: KeyEvent) -> Vec<Effect> {
        let Some(field) = self.focused.field() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Char(c) => {
                let value = format!("{}{}", field_value(form, field), c);
                form.update(field, &value)
            }
            KeyCode::Backspace => {
                let mut value = field_value(form, field).to_string();
                value.pop();
                form.update(field, &value)
            }
            _ => Vec::new(),
        }
    }

    /// Append pasted text to the focused text field.
    pub fn paste(&self, form: &mut dyn TxForm, text: &str) -> Vec<Effect> {
        let Some(field) = self.focused.field() else {
            return Vec::new();
        };
        let value = format!("{}{}", field_value(form, field), text.trim());
        form.update(field, &value)
    }

    /// Submit the form, keeping the first error to show if it is blocked.
    pub fn submit(&mut self, form: &dyn TxForm) {
        if form.submit() {
            self.error_message = None;
            return;
        }
        self.error_message = Some(
            form.recipient_error()
                .or_else(|| form.amount_error())
                .map(|e| e.to_string())
                .or_else(|| form.network_error().map(str::to_string))
                .unwrap_or_else(|| "Fill in every field".to_string()),
        );
    }
}

fn field_value(form: &dyn TxForm, field: Field) -> &str {
    match field {
        Field::Recipient => form.recipient(),
        Field::Amount => form.amount(),
        Field::TokenType => "",
    }
}

/// Queue effects for the app to run.
pub fn dispatch(action_tx: &UnboundedSender<Action>, effects: Vec<Effect>) -> Result<()> {
    for effect in effects {
        action_tx.send(Action::Dispatch(effect))?;
    }
    Ok(())
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn field_title(title: &str, focused: bool) -> String {
    if focused {
        format!("> {title}")
    } else {
        format!("  {title}")
    }
}

/// Text input box with an optional suffix and an error line.
pub fn input_widget<'a>(
    title: &str,
    value: &str,
    placeholder: &str,
    suffix: &str,
    focused: bool,
    is_editing: bool,
    error: Option<String>,
) -> Paragraph<'a> {
    let value_style = match (focused, is_editing) {
        (true, true) => Style::default().fg(Color::Yellow),
        (true, false) => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    };

    let mut display = if value.is_empty() && !(focused && is_editing) {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(value.to_string(), value_style)
    };
    if focused && is_editing {
        display = Span::styled(format!("{}│", display.content), value_style);
    }

    let mut value_line = vec![display];
    if !suffix.is_empty() {
        value_line.push(Span::raw(format!(" {suffix}")));
    }

    let mut lines = vec![Line::from(value_line)];
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(err, Style::default().fg(Color::Red))));
    }

    Paragraph::new(lines).block(
        Block::default()
            .title(field_title(title, focused))
            .borders(Borders::ALL)
            .border_style(border_style(focused)),
    )
}

/// Submit button; dimmed while the form is not valid.
pub fn confirm_widget<'a>(label: &str, focused: bool, enabled: bool) -> Paragraph<'a> {
    let style = match (focused, enabled) {
        (true, true) => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::Black).bg(Color::DarkGray),
        (false, true) => Style::default().fg(Color::Green),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    Paragraph::new(Line::from(Span::styled(format!("  [ {label} ]  "), style))).block(
        Block::default()
            .title(field_title("Confirm", focused))
            .borders(Borders::ALL)
            .border_style(border_style(focused)),
    )
}

/// Help box with the error line, if any, above the key hints.
pub fn help_widget<'a>(error: Option<&str>, hints: &str) -> Paragraph<'a> {
    let mut lines = Vec::new();
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(lines).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
}
