pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};

use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::runtime::Runtime;

use crate::api::TaskApi;
use crate::models::TimeBlock;
use crate::planner::Planner;
use app::{App, InputMode};
use ui::ui;

/// How often the loop wakes up without input, so feedback can expire.
const TICK: Duration = Duration::from_millis(250);

/// Runs the planner UI until the user quits. Store calls are driven on `rt`.
pub fn run_tui<A: TaskApi>(rt: &Runtime, planner: Planner<A>) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(planner);
    rt.block_on(app.reload());

    let res = run_app(&mut terminal, rt, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal UI failed");
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend, A: TaskApi>(terminal: &mut Terminal<B>, rt: &Runtime, app: &mut App<A>) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Tab => app.cycle_block(),
                KeyCode::Char('1') => app.select_block(TimeBlock::Morning),
                KeyCode::Char('2') => app.select_block(TimeBlock::Afternoon),
                KeyCode::Char('3') => app.select_block(TimeBlock::Evening),
                KeyCode::Char(' ') => rt.block_on(app.toggle_completed()),
                KeyCode::Char('p') => rt.block_on(app.toggle_priority()),
                KeyCode::Char('d') | KeyCode::Delete => rt.block_on(app.delete_selected()),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('e') => app.start_edit(),
                KeyCode::Left | KeyCode::Char('h') => shift_day(terminal, rt, app, -1)?,
                KeyCode::Right | KeyCode::Char('l') => shift_day(terminal, rt, app, 1)?,
                KeyCode::Char('[') => app.navigate_calendar(-1),
                KeyCode::Char(']') => app.navigate_calendar(1),
                KeyCode::Char('t') => rt.block_on(app.go_today()),
                KeyCode::Char('v') => app.toggle_view(),
                KeyCode::Char('r') => rt.block_on(app.reload()),
                _ => {}
            },
            InputMode::Adding | InputMode::Editing => match key.code {
                KeyCode::Enter => rt.block_on(app.handle_input()),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Char(c) => {
                    app.input_buffer.push(c);
                }
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                }
                _ => {}
            },
        }
    }
}

/// Moves the selected day, showing the routine indicator while a future
/// date is being seeded.
fn shift_day<B: Backend, A: TaskApi>(
    terminal: &mut Terminal<B>,
    rt: &Runtime,
    app: &mut App<A>,
    days: i64,
) -> io::Result<()> {
    let target = app.planner.state.selected_date + chrono::Duration::days(days);
    if target > Local::now().date_naive() {
        app.planner.state.generating_routine = true;
        terminal.draw(|f| ui(f, app))?;
    }
    rt.block_on(app.shift_day(days));
    Ok(())
}
