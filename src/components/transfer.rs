//! Transfer component for sending ETH or ERC20 THETA.

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
    form::{FeeUpdate, TxForm},
    token::WalletContext,
    transfer_form::TransferForm,
};

use super::{
    Component, FormCursor, FormFocus, border_style, confirm_widget, dispatch, field_title,
    help_widget, input_widget,
};
use crate::{action::Action, tui::Frame};

pub struct TransferComponent {
    action_tx: UnboundedSender<Action>,
    pub form: TransferForm,
    pub cursor: FormCursor,
}

impl TransferComponent {
    pub fn new(action_tx: UnboundedSender<Action>, form: TransferForm) -> Self {
        Self {
            action_tx,
            form,
            cursor: FormCursor::default(),
        }
    }

    /// Start the initial gas price lookup.
    pub fn mount(&mut self) -> Result<()> {
        dispatch(&self.action_tx, self.form.mount())
    }

    pub fn is_editing(&self) -> bool {
        self.cursor.is_editing
    }

    /// Swap in freshly loaded wallet data.
    pub fn set_wallet(&mut self, wallet: WalletContext) -> Result<()> {
        let effects = self.form.set_wallet(wallet);
        dispatch(&self.action_tx, effects)
    }

    /// Feed a finished fee lookup into the form.
    pub fn apply(&mut self, update: FeeUpdate) -> Result<()> {
        let effects = self.form.apply(update);
        dispatch(&self.action_tx, effects)
    }

    pub fn paste(&mut self, text: &str) -> Result<()> {
        let effects = self.cursor.paste(&mut self.form, text);
        dispatch(&self.action_tx, effects)
    }

    /// Reset every field by reselecting the current token.
    pub fn clear(&mut self) -> Result<()> {
        self.cursor = FormCursor::default();
        let effects = self.form.switch_token(self.form.token_type());
        dispatch(&self.action_tx, effects)
    }

    fn fee_lines(&self) -> Vec<Line<'static>> {
        let symbol = "ETH";
        let fee = match (self.form.fee(), self.form.gas_price()) {
            (Some(fee), _) => Span::styled(format!("{fee} {symbol}"), Style::default().fg(Color::Green)),
            (None, None) => Span::styled("Fetching gas price...", Style::default().fg(Color::DarkGray)),
            (None, Some(_)) => Span::styled("-", Style::default().fg(Color::DarkGray)),
        };
        let mut lines = vec![Line::from(vec![
            Span::styled("Transaction Fee: ", Style::default().fg(Color::DarkGray)),
            fee,
        ])];

        if let Some(err) = self.form.network_error() {
            lines.push(Line::from(Span::styled(
                format!("Network error: {err}"),
                Style::default().fg(Color::Red),
            )));
        }

        if self.form.show_fee_details {
            let price = self
                .form
                .gas_price()
                .map(|p| format!("{p} Gwei"))
                .unwrap_or_else(|| "-".to_string());
            let limit = self
                .form
                .gas_limit()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled("Gas Price: ", Style::default().fg(Color::DarkGray)),
                Span::raw(price),
                Span::raw("  |  "),
                Span::styled("Gas Limit: ", Style::default().fg(Color::DarkGray)),
                Span::raw(limit),
            ]));
        }
        lines
    }
}

impl Component for TransferComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        self.cursor.error_message = None;

        if self.cursor.navigate(key, true) {
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
                KeyCode::Left | KeyCode::Right if self.cursor.focused == FormFocus::Token => {
                    self.form.next_token()
                }
                KeyCode::Char('e') if on_input_field => {
                    self.cursor.is_editing = true;
                    Vec::new()
                }
                KeyCode::Char('t') => self.form.next_token(),
                KeyCode::Char('b') if self.form.can_use_entire_balance() => {
                    self.form.use_entire_balance()
                }
                KeyCode::Char('g') => {
                    self.form.toggle_fee_details();
                    Vec::new()
                }
                KeyCode::Char('c') => return self.clear(),
                _ => Vec::new(),
            }
        };

        dispatch(&self.action_tx, effects)
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let fee_lines = self.fee_lines();
        let chunks = Layout::vertical([
            Constraint::Length(3),                          // Wallet
            Constraint::Length(3),                          // Token
            Constraint::Length(4),                          // Recipient
            Constraint::Length(4),                          // Amount
            Constraint::Length(fee_lines.len() as u16 + 2), // Fee
            Constraint::Length(3),                          // Confirm
            Constraint::Min(0),                             // Help
        ])
        .split(area);

        let focused = self.cursor.focused;
        let token = self.form.token_type();
        let wallet = self.form.wallet();

        let wallet_widget = Paragraph::new(Line::from(vec![
            Span::styled("From: ", Style::default().fg(Color::DarkGray)),
            Span::raw(if wallet.address.is_empty() {
                "(no wallet loaded)".to_string()
            } else {
                wallet.address.clone()
            }),
            Span::raw("  |  "),
            Span::styled("Balance: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} {}", format_with_commas(wallet.balances.of(token)), token.symbol()),
                Style::default().fg(Color::Green),
            ),
        ]))
        .block(
            Block::default()
                .title("Send From")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(wallet_widget, chunks[0]);

        let token_widget = Paragraph::new(Line::from(vec![
            Span::styled(token.title(), border_style(focused == FormFocus::Token)),
            Span::styled("  [←/→] change", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .title(field_title("Token", focused == FormFocus::Token))
                .borders(Borders::ALL)
                .border_style(border_style(focused == FormFocus::Token)),
        );
        f.render_widget(token_widget, chunks[1]);

        let recipient_widget = input_widget(
            "Recipient Address",
            self.form.recipient(),
            "Enter recipient address",
            "",
            focused == FormFocus::Recipient,
            self.cursor.is_editing,
            self.form.recipient_error().map(|e| e.to_string()),
        );
        f.render_widget(recipient_widget, chunks[2]);

        let amount_title = if self.form.is_awaiting_entire_balance() {
            "Amount (calculating entire balance...)"
        } else if self.form.can_use_entire_balance() {
            "Amount  [b] Entire balance"
        } else {
            "Amount"
        };
        let amount_widget = input_widget(
            amount_title,
            self.form.amount(),
            "Enter amount",
            token.symbol(),
            focused == FormFocus::Amount,
            self.cursor.is_editing,
            self.form.amount_error().map(|e| e.to_string()),
        );
        f.render_widget(amount_widget, chunks[3]);

        let fee_widget = Paragraph::new(fee_lines).block(
            Block::default()
                .title("Fee  [g] Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(fee_widget, chunks[4]);

        f.render_widget(
            confirm_widget("Send", focused == FormFocus::Confirm, self.form.is_valid()),
            chunks[5],
        );

        let hints = if self.cursor.is_editing {
            "[Esc/Enter] Stop editing  [Tab/↓] Next field  [Shift+Tab/↑] Prev field"
        } else {
            "[Enter/e] Edit  [Tab/↓] Next  [t] Token  [b] Entire balance  [g] Fee details  [c] Clear"
        };
        f.render_widget(
            help_widget(self.cursor.error_message.as_deref(), hints),
            chunks[6],
        );
    }
}
