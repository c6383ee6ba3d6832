//! Stake component for THETA deposits to validator or guardian nodes.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use tx_composer::domain::{
    amount::format_with_commas,
    form::TxForm,
    purpose::Purpose,
    stake_form::StakeForm,
    token::{TokenType, WalletContext},
};

use super::{
    Component, FormCursor, FormFocus, confirm_widget, dispatch, field_title, help_widget,
    input_widget,
};
use crate::{action::Action, tui::Frame};

pub struct StakeComponent {
    action_tx: UnboundedSender<Action>,
    pub form: StakeForm,
    pub cursor: FormCursor,
}

impl StakeComponent {
    pub fn new(action_tx: UnboundedSender<Action>, form: StakeForm) -> Self {
        let mut cursor = FormCursor::default();
        cursor.ensure_visible(form.holder_input_visible());
        Self {
            action_tx,
            form,
            cursor,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.cursor.is_editing
    }

    /// Swap in freshly loaded wallet data.
    pub fn set_wallet(&mut self, wallet: WalletContext) -> Result<()> {
        let effects = self.form.set_wallet(wallet);
        dispatch(&self.action_tx, effects)
    }

    pub fn paste(&mut self, text: &str) -> Result<()> {
        let effects = self.cursor.paste(&mut self.form, text);
        dispatch(&self.action_tx, effects)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.cursor = FormCursor::default();
        self.cursor.ensure_visible(self.form.holder_input_visible());
        let effects = self.form.switch_token(self.form.token_type());
        dispatch(&self.action_tx, effects)
    }

    fn summary_line(&self) -> Line<'static> {
        let purpose = match self.form.purpose() {
            Purpose::StakeForValidator => "Validator Node",
            Purpose::StakeForGuardian => "Guardian Node",
        };
        let fee = self
            .form
            .fee()
            .map(|fee| format!("{fee} {}", TokenType::ThetaFuel.symbol()))
            .unwrap_or_else(|| "-".to_string());
        Line::from(vec![
            Span::styled("Stake For: ", Style::default().fg(Color::DarkGray)),
            Span::styled(purpose, Style::default().fg(Color::Yellow)),
            Span::raw("  |  "),
            Span::styled("Minimum: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "{} {}",
                format_with_commas(&self.form.minimum_stake().normalize().to_string()),
                TokenType::Theta.symbol()
            )),
            Span::raw("  |  "),
            Span::styled("Fee: ", Style::default().fg(Color::DarkGray)),
            Span::raw(fee),
        ])
    }
}

impl Component for StakeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        self.cursor.error_message = None;
        let has_holder = self.form.holder_input_visible();

        if self.cursor.navigate(key, has_holder) {
            return Ok(());
        }

        let on_input_field = self.cursor.focused.field().is_some();
        let effects = if self.cursor.is_editing && on_input_field {
            match key.code {
                KeyCode::Enter => {
                    self.cursor.is_editing = false;
                    Vec::new()
                }
                _ => self.cursor.edit(&mut self.form, key),
            }
        } else {
            match key.code {
                KeyCode::Enter => match self.cursor.focused {
                    FormFocus::Confirm => {
                        self.cursor.submit(&self.form);
                        Vec::new()
                    }
                    FormFocus::Token => self.form.next_token(),
                    FormFocus::Recipient | FormFocus::Amount => {
                        self.cursor.is_editing = true;
                        Vec::new()
                    }
                },
                KeyCode::Char('e') if on_input_field => {
                    self.cursor.is_editing = true;
                    Vec::new()
                }
                KeyCode::Char('b') if self.form.can_use_entire_balance() => {
                    self.form.use_entire_balance()
                }
                KeyCode::Char('c') => return self.clear(),
                _ => Vec::new(),
            }
        };

        dispatch(&self.action_tx, effects)
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(4), // Wallet and stake summary
            Constraint::Length(3), // Token
            Constraint::Length(4), // Holder
            Constraint::Length(4), // Amount
            Constraint::Length(3), // Confirm
            Constraint::Min(0),    // Help
        ])
        .split(area);

        let focused = self.cursor.focused;
        let token = self.form.token_type();
        let purpose = self.form.purpose();
        let wallet = self.form.wallet();

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("From: ", Style::default().fg(Color::DarkGray)),
                Span::raw(wallet.address.clone()),
                Span::raw("  |  "),
                Span::styled("Balance: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} {}", format_with_commas(wallet.balances.of(token)), token.symbol()),
                    Style::default().fg(Color::Green),
                ),
            ]),
            self.summary_line(),
        ])
        .block(
            Block::default()
                .title("Deposit Stake")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(header, chunks[0]);

        let token_widget = Paragraph::new(Line::from(Span::raw(token.title()))).block(
            Block::default()
                .title(field_title("Token", focused == FormFocus::Token))
                .borders(Borders::ALL)
                .border_style(super::border_style(focused == FormFocus::Token)),
        );
        f.render_widget(token_widget, chunks[1]);

        if self.form.holder_input_visible() {
            let holder_widget = input_widget(
                purpose.holder_title(),
                self.form.recipient(),
                purpose.holder_placeholder(),
                "",
                focused == FormFocus::Recipient,
                self.cursor.is_editing,
                self.form.recipient_error().map(|e| e.to_string()),
            );
            f.render_widget(holder_widget, chunks[2]);
        } else {
            let mut lines = vec![Line::from(vec![
                Span::styled("Guardian Node: ", Style::default().fg(Color::DarkGray)),
                Span::raw(shorten(self.form.holder_summary())),
            ])];
            if let Some(err) = self.form.recipient_error() {
                lines.push(Line::from(Span::styled(
                    err.to_string(),
                    Style::default().fg(Color::Red),
                )));
            }
            let delegate_widget = Paragraph::new(lines).block(
                Block::default()
                    .title("  Holder")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(delegate_widget, chunks[2]);
        }

        let amount_title = if self.form.can_use_entire_balance() {
            "Amount  [b] Entire balance"
        } else {
            "Amount"
        };
        let amount_widget = input_widget(
            amount_title,
            self.form.amount(),
            "Enter amount to stake",
            token.symbol(),
            focused == FormFocus::Amount,
            self.cursor.is_editing,
            self.form.amount_error().map(|e| e.to_string()),
        );
        f.render_widget(amount_widget, chunks[3]);

        f.render_widget(
            confirm_widget(
                "Deposit Stake",
                focused == FormFocus::Confirm,
                self.form.is_valid(),
            ),
            chunks[4],
        );

        let hints = if self.cursor.is_editing {
            "[Esc/Enter] Stop editing  [Tab/↓] Next field  [Shift+Tab/↑] Prev field"
        } else {
            "[Enter/e] Edit  [Tab/↓] Next  [b] Entire balance  [c] Clear"
        };
        f.render_widget(
            help_widget(self.cursor.error_message.as_deref(), hints),
            chunks[5],
        );
    }
}

/// Keep long holder summaries on one line.
fn shorten(summary: &str) -> String {
    const EDGE: usize = 10;
    if summary.len() <= EDGE * 2 + 3 || !summary.is_ascii() {
        return summary.to_string();
    }
    format!("{}...{}", &summary[..EDGE], &summary[summary.len() - EDGE..])
}
