use anyhow::{Result, bail};
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use devbills_client::transactions::DELETE_PROMPT;
use devbills_client::{Level, NotificationLog, TransactionsController, TransactionsView};
use devbills_core::{Period, selectable_years};

use crate::commands::{App, empty_message, row};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Quit,
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    Up,
    Down,
    AskDelete,
    ConfirmDelete,
    CancelDelete,
    Reload,
    ClearSearch,
    Type(char),
    Backspace,
    Ignore,
}

fn action_for(key: KeyEvent, confirming: bool, search_empty: bool) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('r') => Action::Reload,
            _ => Action::Ignore,
        };
    }

    if confirming {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::ConfirmDelete,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::CancelDelete,
            _ => Action::Ignore,
        };
    }

    match key.code {
        KeyCode::Left => Action::PrevMonth,
        KeyCode::Right => Action::NextMonth,
        KeyCode::PageUp => Action::PrevYear,
        KeyCode::PageDown => Action::NextYear,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Delete => Action::AskDelete,
        KeyCode::Esc if search_empty => Action::Quit,
        KeyCode::Esc => Action::ClearSearch,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::Type(c),
        _ => Action::Ignore,
    }
}

#[derive(Default)]
struct Ui {
    input: String,
    rows: ListState,
    /// Id awaiting a yes/no answer.
    confirming: Option<String>,
}

impl Ui {
    fn clamp(&mut self, len: usize) {
        let selected = match (self.rows.selected(), len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), n) => Some(i.min(n - 1)),
        };
        self.rows.select(selected);
    }
}

/// Same month one year over, if that year is among `years`.
fn step_year(period: Period, years: &[i32], forward: bool) -> Option<Period> {
    let i = years.iter().position(|&y| y == period.year())?;
    let j = if forward { i.checked_add(1)? } else { i.checked_sub(1)? };
    let year = *years.get(j)?;
    Period::new(period.month(), year).ok()
}

/// Id of the selected row, unless a delete for it is already running.
fn delete_target(view: &TransactionsView, selected: Option<usize>) -> Option<String> {
    let t = view.filtered.get(selected?)?;
    (!view.is_deleting(&t.id)).then(|| t.id.clone())
}

pub async fn run_browse(app: App) -> Result<()> {
    let log = NotificationLog::new();
    let controller = TransactionsController::with_debounce(
        app.gateway.clone(),
        Arc::new(log.clone()),
        app.period(None, None)?,
        app.config.search_debounce(),
    );
    tracing::info!(period = %controller.period(), "browser opened");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = browse_loop(&mut terminal, &app, &controller, &log).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn spawn<F, Fut>(controller: &TransactionsController, f: F)
where
    F: FnOnce(TransactionsController) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(f(controller.clone()));
}

async fn browse_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &App,
    controller: &TransactionsController,
    log: &NotificationLog,
) -> Result<()> {
    let ttl = app.config.toast_ttl();
    let years = selectable_years(controller.period().year());
    let mut ui = Ui::default();

    spawn(controller, |c| async move { c.open().await });

    loop {
        if !app.session.is_authenticated() {
            bail!("the API rejected the stored token (run: devbills auth login)");
        }

        let view = controller.snapshot();
        ui.clamp(view.filtered.len());
        terminal.draw(|f| draw(f, &view, &mut ui, log, ttl))?;

        // Drain pending input without blocking the runtime.
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let action = action_for(key, ui.confirming.is_some(), ui.input.is_empty());
            match action {
                Action::Quit => return Ok(()),
                Action::PrevMonth => spawn(controller, |c| async move { c.prev_month().await }),
                Action::NextMonth => spawn(controller, |c| async move { c.next_month().await }),
                Action::PrevYear | Action::NextYear => {
                    let forward = matches!(action, Action::NextYear);
                    if let Some(p) = step_year(controller.period(), &years, forward) {
                        spawn(controller, move |c| async move { c.set_period(p).await });
                    }
                }
                Action::Reload => spawn(controller, |c| async move { c.reload().await }),
                Action::Up => {
                    let i = ui.rows.selected().unwrap_or(0);
                    ui.rows.select(Some(i.saturating_sub(1)));
                }
                Action::Down => {
                    let i = ui.rows.selected().map_or(0, |i| i + 1);
                    ui.rows.select(Some(i));
                }
                Action::AskDelete => {
                    ui.confirming = delete_target(&controller.snapshot(), ui.rows.selected());
                }
                Action::ConfirmDelete => {
                    if let Some(id) = ui.confirming.take() {
                        // Already confirmed through the modal.
                        spawn(controller, |c| async move {
                            c.delete(&id, |_: &str| true).await;
                        });
                    }
                }
                Action::CancelDelete => ui.confirming = None,
                Action::ClearSearch => {
                    ui.input.clear();
                    controller.clear_search();
                }
                Action::Type(ch) => {
                    ui.input.push(ch);
                    controller.on_search_input(&ui.input);
                }
                Action::Backspace => {
                    ui.input.pop();
                    controller.on_search_input(&ui.input);
                }
                Action::Ignore => {}
            }
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn draw(
    f: &mut Frame,
    view: &TransactionsView,
    ui: &mut Ui,
    log: &NotificationLog,
    ttl: chrono::Duration,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let mut title = vec![
        Span::styled(
            "DevBills",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   ◀ "),
        Span::styled(view.period.label(), Style::default().fg(Color::Cyan)),
        Span::raw(" ▶"),
    ];
    if view.loading {
        title.push(Span::styled("   loading…", Style::default().fg(Color::Gray)));
    }
    let header = Paragraph::new(Line::from(title))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let search = Paragraph::new(ui.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("search"));
    f.render_widget(search, chunks[1]);

    draw_list(f, chunks[2], view, ui);

    let toast = log.active(Utc::now(), ttl).into_iter().next();
    let toast_line = match toast {
        Some(n) => {
            let color = match n.level {
                Level::Success => Color::Green,
                Level::Error => Color::Red,
            };
            Line::from(Span::styled(n.message, Style::default().fg(color)))
        }
        None => Line::raw(""),
    };
    f.render_widget(Paragraph::new(toast_line), chunks[3]);

    let help = "←/→ month  PgUp/PgDn year  ↑/↓ select  Del delete  Ctrl-R reload  Esc clear/quit  Ctrl-C quit";
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray))),
        chunks[4],
    );

    if ui.confirming.is_some() {
        draw_confirm(f);
    }
}

fn draw_list(f: &mut Frame, area: Rect, view: &TransactionsView, ui: &mut Ui) {
    let block = Block::default().borders(Borders::ALL).title("transactions");

    if let Some(err) = &view.error {
        let text = vec![
            Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))),
            Line::raw(""),
            Line::from(Span::styled(
                "Press Ctrl-R to try again.",
                Style::default().fg(Color::Gray),
            )),
        ];
        f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
        return;
    }

    if view.loading && !view.has_transactions() {
        f.render_widget(Paragraph::new("Loading…").block(block), area);
        return;
    }

    if let Some(message) = empty_message(view) {
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let items: Vec<ListItem> = view
        .filtered
        .iter()
        .map(|t| {
            let color = if t.is_income() { Color::Green } else { Color::Red };
            let mut spans = vec![Span::styled(row(t), Style::default().fg(color))];
            if view.is_deleting(&t.id) {
                spans.push(Span::styled("  deleting…", Style::default().fg(Color::Gray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, area, &mut ui.rows);
}

fn draw_confirm(f: &mut Frame) {
    let area = centered(f.area(), 56, 5);
    let text = vec![
        Line::raw(DELETE_PROMPT),
        Line::raw(""),
        Line::from(Span::styled("y = delete    n = keep", Style::default().fg(Color::Gray))),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("delete")),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
