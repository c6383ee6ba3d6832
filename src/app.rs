use std::{path::PathBuf, str::FromStr, sync::Arc};

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use tx_composer::{
    config::Config,
    domain::{
        amount::format_with_commas,
        chain::{AddressRules, FeeOracle},
        descriptor::{Confirmation, ConfirmationKind, SubmissionGate},
        form::FeeUpdate,
        purpose::{GuardianNodeDelegate, Purpose},
        stake_form::StakeForm,
        transfer_form::TransferForm,
    },
    infra::{
        fee_tasks,
        rpc::{ChainRules, RpcClient},
        simulated::SimulatedNetwork,
        wallet::{default_wallet_path, load_wallet},
    },
};

use crate::{
    action::{Action, ActionNotifier},
    cli::Args,
    components::{Component, stake::StakeComponent, transfer::TransferComponent},
    tui::{Event, Frame, Tui},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transfer,
    Stake,
}

impl Tab {
    pub fn all() -> [Tab; 2] {
        [Tab::Transfer, Tab::Stake]
    }

    pub fn title(&self) -> Line<'static> {
        let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        match self {
            Tab::Transfer => Line::from(vec![Span::styled("1", key), Span::raw(" Transfer")]),
            Tab::Stake => Line::from(vec![Span::styled("2", key), Span::raw(" Stake")]),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Transfer => 0,
            Tab::Stake => 1,
        }
    }

    pub fn from_index(index: usize) -> Tab {
        match index {
            1 => Tab::Stake,
            _ => Tab::Transfer,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub should_suspend: bool,
    pub config: Config,
    pub active_tab: Tab,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    pub fee_tx: UnboundedSender<FeeUpdate>,
    pub fee_rx: UnboundedReceiver<FeeUpdate>,
    pub oracle: Arc<dyn FeeOracle>,
    pub tui: Tui,
    pub transfer_component: TransferComponent,
    pub stake_component: StakeComponent,
    pub wallet_path: PathBuf,
    pub confirmation: Option<Confirmation>,
    pub show_help: bool,
    pub pending_effects: usize,
    pub status_message: String,
}

impl App {
    pub fn new(args: &Args) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (fee_tx, fee_rx) = mpsc::unbounded_channel();
        let config = Config::new(&args.network, args.rpc_url.as_deref());

        let wallet_path = args
            .wallet
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_wallet_path);
        let wallet = load_wallet(&wallet_path)?;

        let purpose = Purpose::from_str(&args.purpose)
            .map_err(|_| eyre!("Unknown stake purpose: {}", args.purpose))?;

        let oracle: Arc<dyn FeeOracle> = if config.is_offline() {
            info!("Offline network, using simulated fees");
            Arc::new(SimulatedNetwork::default())
        } else {
            info!("Using Ethereum RPC at {}", config.network.rpc_url);
            Arc::new(RpcClient::new(config.clone()))
        };

        let rules: Arc<dyn AddressRules> = Arc::new(ChainRules);
        let gate = SubmissionGate::new(Arc::new(ActionNotifier::new(action_tx.clone())));

        let transfer_form = TransferForm::new(wallet.clone(), rules.clone(), gate.clone());
        let mut stake_form = StakeForm::new(
            purpose,
            None,
            config.staking.clone(),
            wallet,
            rules,
            gate,
        );
        if let Some(summary) = &args.guardian_summary {
            stake_form.set_guardian_node_delegate(Some(GuardianNodeDelegate {
                node_summary: summary.clone(),
            }));
        }

        let transfer_component = TransferComponent::new(action_tx.clone(), transfer_form);
        let stake_component = StakeComponent::new(action_tx.clone(), stake_form);

        let tui = Tui::new(args.tick_rate, args.frame_rate)?;

        Ok(Self {
            should_quit: false,
            should_suspend: false,
            config,
            active_tab: Tab::Transfer,
            action_tx,
            action_rx,
            fee_tx,
            fee_rx,
            oracle,
            tui,
            transfer_component,
            stake_component,
            wallet_path,
            confirmation: None,
            show_help: false,
            pending_effects: 0,
            status_message: String::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        self.status_message = format!("Network: {}", self.config.network.name);
        self.transfer_component.mount()?;

        loop {
            match self.tui.next().await {
                Some(event) => self.handle_event(event)?,
                None => self.should_quit = true,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action)?;
            }

            while let Ok(update) = self.fee_rx.try_recv() {
                self.pending_effects = self.pending_effects.saturating_sub(1);
                self.transfer_component.apply(update)?;
            }

            if self.should_suspend {
                self.tui.suspend()?;
                self.should_suspend = false;
                self.tui.resume()?;
            }

            if self.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => {
                self.action_tx.send(Action::Tick)?;
            }
            Event::Render => {
                self.action_tx.send(Action::Render)?;
            }
            Event::Key(key_event) => {
                self.handle_key_event(key_event)?;
            }
            Event::Resize(w, h) => {
                self.action_tx.send(Action::Resize(w, h))?;
            }
            Event::Init => {
                info!("Application initialized");
            }
            Event::Closed => {
                self.should_quit = true;
            }
            Event::Paste(text) => {
                self.handle_paste(&text)?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.action_tx.send(Action::Quit)?;
            return Ok(());
        }

        if self.confirmation.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.action_tx.send(Action::DismissConfirmation)?;
            }
            return Ok(());
        }

        if self.show_help {
            self.show_help = false;
            return Ok(());
        }

        let is_editing = match self.active_tab {
            Tab::Transfer => self.transfer_component.is_editing(),
            Tab::Stake => self.stake_component.is_editing(),
        };

        if is_editing {
            return self.forward_key(key);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Quit)?;
            }
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.action_tx.send(Action::Suspend)?;
            }
            KeyCode::Char('?') => {
                self.action_tx.send(Action::Help)?;
            }
            KeyCode::Char('r') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::ReloadWallet)?;
            }
            KeyCode::Char('1') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::TabTransfer)?;
            }
            KeyCode::Char('2') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::TabStake)?;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let tabs = Tab::all();
                let next_index = (self.active_tab.index() + 1) % tabs.len();
                self.active_tab = Tab::from_index(next_index);
            }
            _ => self.forward_key(key)?,
        }
        Ok(())
    }

    fn forward_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.active_tab {
            Tab::Transfer => self.transfer_component.handle_key_event(key),
            Tab::Stake => self.stake_component.handle_key_event(key),
        }
    }

    fn handle_paste(&mut self, text: &str) -> Result<()> {
        if self.confirmation.is_some() {
            return Ok(());
        }
        match self.active_tab {
            Tab::Transfer => self.transfer_component.paste(text),
            Tab::Stake => self.stake_component.paste(text),
        }
    }

    fn handle_action(&mut self, action: Action) -> Result<()> {
        if !matches!(action, Action::Tick | Action::Render) {
            debug!("Handling action: {:?}", action);
        }
        match action {
            Action::Tick => {}
            Action::Render => {
                self.draw_ui()?;
            }
            Action::Resize(w, h) => {
                self.tui.resize(Rect::new(0, 0, w, h))?;
                self.draw_ui()?;
            }
            Action::Suspend => {
                self.should_suspend = true;
            }
            Action::Resume => {
                self.should_suspend = false;
            }
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ClearScreen => {
                self.tui.terminal.clear()?;
            }
            Action::Error(msg) => {
                self.status_message = format!("Error: {msg}");
            }
            Action::Help => {
                self.show_help = !self.show_help;
            }
            Action::ReloadWallet => match load_wallet(&self.wallet_path) {
                Ok(wallet) => {
                    info!("Reloaded wallet from {}", self.wallet_path.display());
                    self.transfer_component.set_wallet(wallet.clone())?;
                    self.stake_component.set_wallet(wallet)?;
                    self.status_message = "Wallet reloaded".to_string();
                }
                Err(e) => {
                    warn!("Wallet reload failed: {:#}", e);
                    self.status_message = format!("Error: {e}");
                }
            },
            Action::TabTransfer => {
                self.active_tab = Tab::Transfer;
            }
            Action::TabStake => {
                self.active_tab = Tab::Stake;
            }
            Action::Dispatch(effect) => {
                self.pending_effects += 1;
                fee_tasks::spawn(effect, self.oracle.clone(), self.fee_tx.clone());
            }
            Action::ShowConfirmation(confirmation) => {
                self.status_message = format!(
                    "Ready to {}: {} {}",
                    confirmation.kind,
                    confirmation.transaction.amount,
                    confirmation.transaction.token_type.symbol()
                );
                self.confirmation = Some(*confirmation);
            }
            Action::DismissConfirmation => {
                self.confirmation = None;
                self.status_message = format!("Network: {}", self.config.network.name);
            }
        }
        Ok(())
    }

    fn draw_ui(&mut self) -> Result<()> {
        let active_tab = self.active_tab;
        let network_name = self.config.network.name.clone();
        let status = if self.pending_effects > 0 {
            format!("{} (fetching fees...)", self.status_message)
        } else {
            self.status_message.clone()
        };
        let show_help = self.show_help;
        let confirmation = self.confirmation.clone();
        let transfer = &mut self.transfer_component;
        let stake = &mut self.stake_component;

        self.tui.draw(|f| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status
            ])
            .split(f.area());

            let header = Paragraph::new(Line::from(vec![
                Span::styled(
                    "Tx Composer",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[{network_name}]"),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(header, chunks[0]);

            let tabs = Tabs::new(Tab::all().iter().map(|t| t.title()).collect::<Vec<_>>())
                .select(active_tab.index())
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
            f.render_widget(tabs, chunks[1]);

            match active_tab {
                Tab::Transfer => transfer.draw(f, chunks[2]),
                Tab::Stake => stake.draw(f, chunks[2]),
            }

            draw_status(f, chunks[3], &status);

            if let Some(confirmation) = &confirmation {
                draw_confirmation(f, confirmation);
            } else if show_help {
                draw_help(f);
            }
        })?;
        Ok(())
    }
}

fn draw_status(f: &mut Frame, area: Rect, status: &str) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(status.to_string(), Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::styled(
            "[q]Quit [?]Help [Tab]Switch",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(status, area);
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn confirmation_lines(confirmation: &Confirmation) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(format!("{text:<12}"), Style::default().fg(Color::DarkGray));
    let tx = &confirmation.transaction;

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![label("Token"), Span::raw(tx.token_type.title())]),
        Line::from(vec![label("From"), Span::raw(tx.from.clone())]),
        Line::from(vec![label("To"), Span::raw(tx.to.clone())]),
        Line::from(vec![
            label("Amount"),
            Span::styled(
                format!("{} {}", format_with_commas(&tx.amount), tx.token_type.symbol()),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let fee_symbol = match confirmation.kind {
        ConfirmationKind::Send => "ETH",
        ConfirmationKind::DepositStake => "TFuel",
    };
    lines.push(Line::from(vec![
        label("Fee"),
        Span::raw(
            tx.fee
                .map(|fee| format!("{fee} {fee_symbol}"))
                .unwrap_or_else(|| "unknown".to_string()),
        ),
    ]));
    if let (Some(price), Some(limit)) = (tx.gas_price, tx.gas_limit) {
        lines.push(Line::from(vec![
            label("Gas"),
            Span::raw(format!("{limit} @ {price} Gwei")),
        ]));
    }
    if let Some(purpose) = tx.purpose {
        lines.push(Line::from(vec![label("Purpose"), Span::raw(purpose.to_string())]));
    }
    if let Some(chain_id) = &confirmation.extras.chain_id {
        lines.push(Line::from(vec![label("Chain"), Span::raw(chain_id.clone())]));
    }
    if confirmation.extras.guardian_node_delegate.is_some() {
        lines.push(Line::from(vec![label("Delegate"), Span::raw("supplied node")]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Esc/Enter] Close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn draw_confirmation(f: &mut Frame, confirmation: &Confirmation) {
    let lines = confirmation_lines(confirmation);
    let title = match confirmation.kind {
        ConfirmationKind::Send => " Confirm Send ",
        ConfirmationKind::DepositStake => " Confirm Stake Deposit ",
    };
    let area = popup_area(f.area(), 72, lines.len() as u16 + 2);

    f.render_widget(Clear, area);
    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(popup, area);
}

fn draw_help(f: &mut Frame) {
    let lines = vec![
        Line::from(""),
        Line::from("  1 / 2 / Tab     Switch between Transfer and Stake"),
        Line::from("  j / k / ↑ / ↓   Move between fields"),
        Line::from("  Enter / e       Edit the focused field"),
        Line::from("  Esc             Stop editing"),
        Line::from("  t               Next token (Transfer)"),
        Line::from("  b               Use entire balance"),
        Line::from("  g               Toggle fee details (Transfer)"),
        Line::from("  c               Clear the form"),
        Line::from("  r               Reload the wallet file"),
        Line::from("  q               Quit"),
        Line::from(""),
    ];
    let area = popup_area(f.area(), 60, lines.len() as u16 + 2);

    f.render_widget(Clear, area);
    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(popup, area);
}
