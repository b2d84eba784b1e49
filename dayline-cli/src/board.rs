//! Full-screen view of today's schedule.
//!
//! Keys: j/k or arrows to move, c complete, s skip, r reload, q or Esc quit.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dayline_core::{DaySchedule, GoalId, ScheduleEntry};
use dayline_store::{Clock, ConfigRepository, GoalRepository, Planner};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::render::format_minutes;

pub fn run_board<R, C>(planner: &Planner<R, C>) -> Result<()>
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
{
    let schedule = planner.schedule()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = board_loop(&mut terminal, planner, BoardState::new(schedule));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

struct BoardState {
    schedule: DaySchedule,
    list: ListState,
    status: String,
}

impl BoardState {
    fn new(schedule: DaySchedule) -> Self {
        let mut list = ListState::default();
        if !schedule.tasks.is_empty() {
            list.select(Some(0));
        }
        Self {
            schedule,
            list,
            status: "c=complete  s=skip  r=reload  q=quit".to_string(),
        }
    }

    fn reload(&mut self, schedule: DaySchedule) {
        let keep = self.list.selected().unwrap_or(0);
        self.schedule = schedule;
        if self.schedule.tasks.is_empty() {
            self.list.select(None);
        } else {
            self.list.select(Some(keep.min(self.schedule.tasks.len() - 1)));
        }
    }

    fn down(&mut self) {
        let len = self.schedule.tasks.len();
        if len == 0 {
            return;
        }
        let i = self.list.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.list.select(Some(i));
    }

    fn up(&mut self) {
        if self.schedule.tasks.is_empty() {
            return;
        }
        let i = self.list.selected().map_or(0, |i| i.saturating_sub(1));
        self.list.select(Some(i));
    }

    fn selected_entry(&self) -> Option<&ScheduleEntry> {
        self.list.selected().and_then(|i| self.schedule.tasks.get(i))
    }

    /// Goal behind the highlighted row; `None` on fixed blocks.
    fn selected_goal(&self) -> Option<GoalId> {
        self.selected_entry().and_then(|e| e.goal_id)
    }
}

fn board_loop<R, C>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    planner: &Planner<R, C>,
    mut state: BoardState,
) -> Result<()>
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
{
    let today = planner.today();

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(f.area());

            let header = Paragraph::new(Line::from(vec![
                Span::styled(
                    today.format("%A %Y-%m-%d").to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "   {} - {}",
                    state.schedule.start_time(),
                    state.schedule.end_time()
                )),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("dayline"));
            f.render_widget(header, chunks[0]);

            let items: Vec<ListItem> = state
                .schedule
                .tasks
                .iter()
                .map(|e| {
                    let style = if e.is_fixed {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    let tag = match e.priority {
                        Some(p) => format!("[{}]", p.as_str()),
                        None => "[fixed]".to_string(),
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:>8} - {:>8}  ", e.start_time(), e.end_time()),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(format!("{} {}", e.description, tag), style),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("today"))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            f.render_stateful_widget(list, chunks[1], &mut state.list);

            let mut footer = vec![Span::raw(format!(
                "planned {} of {}",
                format_minutes(state.schedule.total_minutes),
                format_minutes(state.schedule.available_minutes)
            ))];
            if state.schedule.overcommitted {
                footer.push(Span::styled(
                    "  overcommitted",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            }
            footer.push(Span::styled(
                format!("  | {}", state.status),
                Style::default().fg(Color::Gray),
            ));
            let footer = Paragraph::new(Line::from(footer))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(footer, chunks[2]);
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('j') | KeyCode::Down => state.down(),
            KeyCode::Char('k') | KeyCode::Up => state.up(),
            KeyCode::Char('r') => {
                state.reload(planner.schedule()?);
                state.status = "reloaded".to_string();
            }
            KeyCode::Char(c @ ('c' | 's')) => {
                let Some(id) = state.selected_goal() else {
                    state.status = "fixed blocks cannot be completed or skipped".to_string();
                    continue;
                };
                let result = if c == 'c' {
                    planner.complete(id)
                } else {
                    planner.skip(id, None)
                };
                state.status = match result {
                    Ok(g) if c == 'c' => format!(
                        "completed: {} (streak {})",
                        g.description, g.metric.streak
                    ),
                    Ok(g) => format!("skipped: {}", g.description),
                    Err(e) => format!("error: {}", e),
                };
            }
            _ => {}
        }
    }

    Ok(())
}
