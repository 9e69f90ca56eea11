//! Full-screen tabbed UI
//!
//! One tab per tool. Each tab owns its own form state; switching tabs never
//! touches another tab's input or result.

use crate::clipboard::{Clipboard, CopyControl, Osc52Clipboard};
use crate::config::Config;
use crate::error::Result;
use crate::form::{AsyncForm, FormPhase};
use crate::tools::dns::{self, DnsCheckState};
use crate::tools::placeholder::{self, Placeholder};
use crate::tools::status::{self, SERVICE_LINKS};
use crate::tools::tenant::{TENANT_LOOKUP_ERROR, TenantLookup};
use crate::tools::upn::{self, UpnInput};
use crate::tui::tasks::{self, TaskReceiver, TaskRequest, TaskResponse, TaskSender};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io;

const ACCENT: Color = Color::Rgb(0, 120, 212);

/// A finished DNS check and the normalized domain it was run against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsReport {
    pub domain: String,
    pub state: DnsCheckState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    TenantLookup,
    UpnGenerator,
    ServiceStatus,
    DnsCheck,
    LicenseCheck,
    GroupTool,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::TenantLookup,
        Tab::UpnGenerator,
        Tab::ServiceStatus,
        Tab::DnsCheck,
        Tab::LicenseCheck,
        Tab::GroupTool,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::TenantLookup => "Tenant Lookup",
            Tab::UpnGenerator => "UPN Generator",
            Tab::ServiceStatus => "Service Status",
            Tab::DnsCheck => "DNS Check",
            Tab::LicenseCheck => "License Check",
            Tab::GroupTool => "Group Tool",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpnField {
    First,
    Last,
    Domain,
}

impl UpnField {
    fn next(self) -> Self {
        match self {
            UpnField::First => UpnField::Last,
            UpnField::Last => UpnField::Domain,
            UpnField::Domain => UpnField::First,
        }
    }

    fn previous(self) -> Self {
        match self {
            UpnField::First => UpnField::Domain,
            UpnField::Last => UpnField::First,
            UpnField::Domain => UpnField::Last,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Application state
pub struct App {
    pub tab: Tab,
    pub tenant: AsyncForm<String, TenantLookup>,
    pub tenant_copy: CopyControl,
    pub upn: AsyncForm<UpnInput, String>,
    pub upn_field: UpnField,
    pub upn_copy: CopyControl,
    pub dns: AsyncForm<String, DnsReport>,
    pub status_state: ListState,
    pub status_message: Option<(String, StatusLevel)>,
    pub should_quit: bool,
    pub config: Config,
    clipboard: Box<dyn Clipboard>,
    task_sender: Option<TaskSender>,
    task_receiver: Option<TaskReceiver>,
}

impl App {
    /// App with a running background worker and the terminal clipboard
    pub fn new(config: Config) -> Self {
        let (sender, receiver) = tasks::spawn_task_worker(config.clone());
        Self::with_parts(config, sender, receiver, Box::new(Osc52Clipboard))
    }

    pub fn with_parts(
        config: Config,
        sender: TaskSender,
        receiver: TaskReceiver,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let mut status_state = ListState::default();
        status_state.select(Some(0));

        Self {
            tab: Tab::TenantLookup,
            tenant: AsyncForm::default(),
            tenant_copy: CopyControl::new(),
            upn: AsyncForm::default(),
            upn_field: UpnField::First,
            upn_copy: CopyControl::new(),
            dns: AsyncForm::default(),
            status_state,
            status_message: None,
            should_quit: false,
            config,
            clipboard,
            task_sender: Some(sender),
            task_receiver: Some(receiver),
        }
    }

    pub fn shutdown_worker(&mut self) {
        if let Some(sender) = self.task_sender.take() {
            sender.shutdown();
        }
        self.task_receiver = None;
    }

    fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some((message.into(), level));
    }

    /// DNS tab contents as a tagged state
    pub fn dns_view(&self) -> DnsCheckState {
        match self.dns.phase() {
            FormPhase::Idle | FormPhase::Loading => DnsCheckState::Empty,
            FormPhase::Ready(report) => report.state.clone(),
            FormPhase::Failed(message) => DnsCheckState::Error {
                message: message.clone(),
            },
        }
    }

    /// Apply any responses the worker has produced
    pub fn process_task_responses(&mut self) {
        let responses = match &self.task_receiver {
            Some(receiver) => receiver.drain(),
            None => return,
        };

        for response in responses {
            self.apply_response(response);
        }
    }

    pub fn apply_response(&mut self, response: TaskResponse) {
        match response {
            TaskResponse::Ready => {}
            TaskResponse::Unavailable { message } => {
                self.task_sender = None;
                // Anything already queued went down with the worker
                self.tenant.abandon(TENANT_LOOKUP_ERROR);
                self.dns.abandon(dns::DNS_CHECK_ERROR);
                self.set_status(format!("Lookups unavailable: {}", message), StatusLevel::Error);
            }
            TaskResponse::TenantLookedUp { ticket, outcome } => {
                let succeeded = outcome.is_ok();
                if self.tenant.complete(ticket, outcome) && succeeded && self.config.copy_on_success
                {
                    self.copy_tenant_id();
                }
            }
            TaskResponse::DnsChecked {
                ticket,
                domain,
                state,
            } => {
                let outcome = state
                    .into_outcome()
                    .map(|state| DnsReport { domain, state });
                self.dns.complete(ticket, outcome);
            }
        }
    }

    fn dispatch(&mut self, request: TaskRequest) -> bool {
        let sent = self
            .task_sender
            .as_ref()
            .is_some_and(|sender| sender.send(request).is_ok());
        if !sent {
            self.set_status("Background worker is not running", StatusLevel::Error);
        }
        sent
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.status_message = None;

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.previous(),
            KeyCode::Char('y') if ctrl => self.copy_current(),
            KeyCode::Char('u') if ctrl => self.clear_current(),
            KeyCode::Enter => self.submit_current(),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Backspace => {
                if let Some(input) = self.active_input() {
                    input.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(input) = self.active_input() {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    fn active_input(&mut self) -> Option<&mut String> {
        match self.tab {
            Tab::TenantLookup => Some(&mut self.tenant.input),
            Tab::UpnGenerator => Some(match self.upn_field {
                UpnField::First => &mut self.upn.input.first,
                UpnField::Last => &mut self.upn.input.last,
                UpnField::Domain => &mut self.upn.input.domain,
            }),
            Tab::DnsCheck => Some(&mut self.dns.input),
            Tab::ServiceStatus | Tab::LicenseCheck | Tab::GroupTool => None,
        }
    }

    fn move_selection(&mut self, down: bool) {
        match self.tab {
            Tab::UpnGenerator => {
                self.upn_field = if down {
                    self.upn_field.next()
                } else {
                    self.upn_field.previous()
                };
            }
            Tab::ServiceStatus => {
                let current = self.status_state.selected().unwrap_or(0);
                let len = SERVICE_LINKS.len();
                let next = if down {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                };
                self.status_state.select(Some(next));
            }
            _ => {}
        }
    }

    fn submit_current(&mut self) {
        match self.tab {
            Tab::TenantLookup => {
                if let Some(ticket) = self.tenant.begin() {
                    let email = self.tenant.input.trim().to_string();
                    if !self.dispatch(TaskRequest::LookupTenant { ticket, email }) {
                        self.tenant
                            .complete(ticket, tasks::undeliverable_tenant_lookup());
                    }
                }
            }
            Tab::UpnGenerator => {
                if self.upn.can_submit() {
                    match upn::generate_upn(&self.upn.input) {
                        Ok(value) => {
                            self.upn.set_ready(value);
                            if self.config.copy_on_success {
                                self.copy_upn();
                            }
                        }
                        Err(e) => self.set_status(e.to_string(), StatusLevel::Warning),
                    }
                }
            }
            Tab::DnsCheck => {
                if let Some(ticket) = self.dns.begin() {
                    let domain = dns::normalize_domain(&self.dns.input);
                    if !self.dispatch(TaskRequest::CheckDns { ticket, domain }) {
                        self.dns
                            .complete(ticket, Err(dns::DNS_CHECK_ERROR.to_string()));
                    }
                }
            }
            Tab::ServiceStatus => {
                let idx = self.status_state.selected().unwrap_or(0);
                if let Some(link) = SERVICE_LINKS.get(idx) {
                    match status::open_link(link) {
                        Ok(()) => self.set_status(format!("Opened {}", link.label), StatusLevel::Info),
                        Err(e) => self.set_status(
                            format!("Could not open browser: {}", e),
                            StatusLevel::Warning,
                        ),
                    }
                }
            }
            Tab::LicenseCheck | Tab::GroupTool => {}
        }
    }

    fn clear_current(&mut self) {
        match self.tab {
            Tab::TenantLookup => {
                self.tenant.input.clear();
                self.tenant.reset();
            }
            Tab::UpnGenerator => {
                self.upn.input = UpnInput::default();
                self.upn_field = UpnField::First;
                self.upn.reset();
            }
            Tab::DnsCheck => {
                self.dns.input.clear();
                self.dns.reset();
            }
            Tab::ServiceStatus | Tab::LicenseCheck | Tab::GroupTool => {}
        }
    }

    fn copy_current(&mut self) {
        match self.tab {
            Tab::TenantLookup => self.copy_tenant_id(),
            Tab::UpnGenerator => self.copy_upn(),
            _ => {}
        }
    }

    fn copy_tenant_id(&mut self) {
        if let Some(lookup) = self.tenant.result() {
            if self.tenant_copy.copy(self.clipboard.as_ref(), &lookup.tenant_id) {
                self.set_status("Tenant ID copied to clipboard", StatusLevel::Success);
            } else {
                self.set_status("Failed to copy text", StatusLevel::Warning);
            }
        }
    }

    fn copy_upn(&mut self) {
        if let Some(value) = self.upn.result() {
            if self.upn_copy.copy(self.clipboard.as_ref(), value) {
                self.set_status("UPN copied to clipboard", StatusLevel::Success);
            } else {
                self.set_status("Failed to copy text", StatusLevel::Warning);
            }
        }
    }
}

pub fn run_tui(config: Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    let res = run_app(&mut terminal, &mut app);

    app.shutdown_worker();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.process_task_responses();

        terminal.draw(|f| ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Tool
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_tabs(f, app, chunks[1]);

    match app.tab {
        Tab::TenantLookup => render_tenant(f, app, chunks[2]),
        Tab::UpnGenerator => render_upn(f, app, chunks[2]),
        Tab::ServiceStatus => render_status(f, app, chunks[2]),
        Tab::DnsCheck => render_dns(f, app, chunks[2]),
        Tab::LicenseCheck => render_placeholder(f, &placeholder::LICENSE_LOOKUP, chunks[2]),
        Tab::GroupTool => render_placeholder(f, &placeholder::GROUP_MEMBERSHIP, chunks[2]),
    }

    render_status_bar(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " M365 ",
            Style::default()
                .bg(ACCENT)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " Microsoft 365 Tools ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            "A collection of useful tools for Microsoft 365 administrators",
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(50, 50, 50))),
    );

    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));

    f.render_widget(tabs, area);
}

fn card(title: &str, description: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", title),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("- {} ", description), Style::default().fg(Color::Gray)),
        ]))
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let value_style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "█" } else { "" };

    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(ACCENT)),
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::Gray)),
        Span::styled(value.to_string(), value_style),
        Span::styled(cursor.to_string(), Style::default().fg(ACCENT)),
    ])
}

fn button_line(label: &str, enabled: bool) -> Line<'static> {
    let style = if enabled {
        Style::default()
            .bg(ACCENT)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!(" {} ", label), style),
    ])
}

fn copy_hint(control: &CopyControl) -> Span<'static> {
    if control.is_copied() {
        Span::styled(
            format!("  {} Copied", control.icon()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled(
            format!("  {} Ctrl-Y to copy", control.icon()),
            Style::default().fg(Color::DarkGray),
        )
    }
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", message),
        Style::default().fg(Color::Red),
    ))
}

fn render_tenant(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.tenant;
    let button = if form.is_loading() { "Looking up..." } else { "Lookup" };

    let mut lines = vec![
        Line::raw(""),
        input_line("Email", &form.input, true),
        Line::raw(""),
        button_line(button, form.can_submit()),
        Line::raw(""),
    ];

    match form.phase() {
        FormPhase::Ready(lookup) => {
            lines.push(Line::styled("  Tenant ID:", Style::default().fg(Color::Gray)));
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}", lookup.tenant_id),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                copy_hint(&app.tenant_copy),
            ]));
        }
        FormPhase::Failed(message) => lines.push(error_line(message)),
        FormPhase::Idle | FormPhase::Loading => {}
    }

    let widget = Paragraph::new(lines)
        .block(card(
            "Tenant ID Lookup",
            "Find the Microsoft 365 tenant ID using an email address",
        ))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_upn(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.upn;

    let mut lines = vec![
        Line::raw(""),
        input_line("First name", &form.input.first, app.upn_field == UpnField::First),
        input_line("Last name", &form.input.last, app.upn_field == UpnField::Last),
        input_line("Domain", &form.input.domain, app.upn_field == UpnField::Domain),
        Line::raw(""),
        button_line("Generate", form.can_submit()),
        Line::raw(""),
    ];

    if let Some(value) = form.result() {
        lines.push(Line::styled("  Generated UPN:", Style::default().fg(Color::Gray)));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}", value),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            copy_hint(&app.upn_copy),
        ]));
    }

    let widget = Paragraph::new(lines).block(card(
        "UPN Generator",
        "Generate a user principal name from a name and domain",
    ));
    f.render_widget(widget, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = SERVICE_LINKS
        .iter()
        .map(|link| {
            ListItem::new(vec![
                Line::styled(
                    link.label,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format!("  {}", link.url),
                    Style::default().fg(ACCENT).add_modifier(Modifier::UNDERLINED),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(card("Service Status", "Check the status of Microsoft 365 services"))
        .highlight_symbol("▸ ")
        .highlight_style(Style::default().bg(Color::Rgb(30, 30, 30)));

    let mut state = app.status_state.clone();
    f.render_stateful_widget(list, area, &mut state);
}

fn render_dns(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.dns;
    let button = if form.is_loading() { "Checking..." } else { "Check" };

    let mut lines = vec![
        Line::raw(""),
        input_line("Domain", &form.input, true),
        Line::raw(""),
        button_line(button, form.can_submit()),
        Line::raw(""),
    ];

    let view = app.dns_view();
    match &view {
        DnsCheckState::Result { .. } => {
            let checked = form.result().map_or("", |report| report.domain.as_str());
            for (label, found) in view.rows() {
                let (symbol, color) = if found { ("✓", Color::Green) } else { ("✗", Color::Red) };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {} ", symbol), Style::default().fg(color)),
                    Span::styled(
                        format!("{:<6}", label),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(dns::found_label(found), Style::default().fg(color)),
                ]));
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!(
                    "  DKIM probed at {}",
                    dns::dkim_name(&app.config.dkim_selector, checked)
                ),
                Style::default().fg(Color::DarkGray),
            ));
        }
        DnsCheckState::Error { message } => lines.push(error_line(message)),
        DnsCheckState::Empty => {}
    }

    let widget = Paragraph::new(lines).block(card(
        "Domain DNS Checker",
        "Check MX, SPF and DKIM records for a domain",
    ));
    f.render_widget(widget, area);
}

fn render_placeholder(f: &mut Frame, tool: &Placeholder, area: Rect) {
    let widget = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(
            format!("  {}", placeholder::COMING_SOON),
            Style::default().fg(Color::Gray),
        ),
    ])
    .block(card(tool.title, tool.description));
    f.render_widget(widget, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (msg, style) = match &app.status_message {
        Some((msg, StatusLevel::Success)) => (msg.clone(), Style::default().fg(Color::Green)),
        Some((msg, StatusLevel::Warning)) => (msg.clone(), Style::default().fg(Color::Yellow)),
        Some((msg, StatusLevel::Error)) => (msg.clone(), Style::default().fg(Color::Red)),
        Some((msg, StatusLevel::Info)) => (msg.clone(), Style::default().fg(Color::Cyan)),
        None => (
            "Tab/Shift-Tab: Switch tool │ ↑↓: Field/Link │ Enter: Run │ Ctrl-Y: Copy │ Ctrl-U: Clear │ Esc: Quit".into(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let status = Paragraph::new(msg).style(style).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(status, area);
}
