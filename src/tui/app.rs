use std::time::Instant;

use chrono::{Duration, Local};
use ratatui::widgets::TableState;

use crate::api::TaskApi;
use crate::calendar::{shift_month, shift_week};
use crate::models::TimeBlock;
use crate::planner::Planner;
use crate::state::CalendarView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

pub struct App<A> {
    pub planner: Planner<A>,
    /// Selection in the visible block's task list.
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    /// Task being renamed while in [`InputMode::Editing`].
    pub target_id: Option<u64>,
}

impl<A: TaskApi> App<A> {
    pub fn new(planner: Planner<A>) -> App<A> {
        let mut app = App {
            planner,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            target_id: None,
        };
        app.sync_selection();
        app
    }

    /// Number of rows in the visible task list.
    fn row_count(&self) -> usize {
        self.planner.state.visible_tasks().len()
    }

    /// Id of the highlighted task, if any.
    pub fn selected_task_id(&self) -> Option<u64> {
        let i = self.state.selected()?;
        self.planner.state.visible_tasks().get(i).map(|t| t.id)
    }

    /// Keeps the highlighted row inside the visible list.
    pub fn sync_selection(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Drops expired feedback; called on every tick of the event loop.
    pub fn tick(&mut self) {
        self.planner.state.clear_expired_feedback(Instant::now());
    }

    pub fn select_block(&mut self, block: TimeBlock) {
        self.planner.select_block(block);
        self.state.select(None);
        self.sync_selection();
    }

    pub fn cycle_block(&mut self) {
        let next = self.planner.state.selected_block.next();
        self.select_block(next);
    }

    pub fn toggle_view(&mut self) {
        let state = &mut self.planner.state;
        state.calendar_view = match state.calendar_view {
            CalendarView::Month => CalendarView::Week,
            CalendarView::Week => CalendarView::Month,
        };
    }

    /// Pages the calendar: months in the month view; in the week view the
    /// selection jumps by a week without seeding a routine.
    pub fn navigate_calendar(&mut self, delta: i32) {
        let state = &mut self.planner.state;
        match state.calendar_view {
            CalendarView::Month => state.calendar_month = shift_month(state.calendar_month, delta),
            CalendarView::Week => {
                state.selected_date = shift_week(state.selected_date, delta as i64);
                state.calendar_month = state.selected_date;
            }
        }
        self.sync_selection();
    }

    /// Moves the selected date by `days`, seeding a routine on future dates.
    pub async fn shift_day(&mut self, days: i64) {
        let date = self.planner.state.selected_date + Duration::days(days);
        self.planner.select_date(date).await;
        self.sync_selection();
    }

    pub async fn go_today(&mut self) {
        self.planner.select_date(Local::now().date_naive()).await;
        self.sync_selection();
    }

    pub async fn reload(&mut self) {
        // Failures are logged by the planner and leave the cache as it was.
        let _ = self.planner.refresh().await;
        self.sync_selection();
    }

    pub async fn toggle_completed(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.planner.toggle_completed(id).await;
        }
    }

    pub async fn toggle_priority(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.planner.toggle_priority(id).await;
        }
    }

    pub async fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.planner.delete(id).await;
            self.sync_selection();
        }
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
    }

    /// Opens the title editor pre-filled with the highlighted task's title.
    pub fn start_edit(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.planner.state.find(id) else {
            return;
        };
        self.input_buffer = task.title.clone();
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.target_id = None;
    }

    /// Submits the input box.
    ///
    /// An invalid new title keeps the box open so it can be corrected.
    pub async fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => {
                if self.planner.add_task(&self.input_buffer).await.is_some() {
                    self.cancel_input();
                    let last = self.row_count().checked_sub(1);
                    self.state.select(last);
                }
            }
            InputMode::Editing => {
                if let Some(id) = self.target_id {
                    self.planner.rename(id, &self.input_buffer).await;
                }
                self.cancel_input();
            }
            InputMode::Normal => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use chrono::NaiveDate;
    use tokio::sync::RwLock;

    fn app() -> App<RwLock<TaskStore>> {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        App::new(Planner::new(RwLock::new(TaskStore::new()), today))
    }

    #[tokio::test]
    async fn adding_selects_the_new_row() {
        let mut app = app();
        app.start_add();
        app.input_buffer = "First".into();
        app.handle_input().await;
        app.start_add();
        app.input_buffer = "Second".into();
        app.handle_input().await;

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state.selected(), Some(1));
    }

    #[tokio::test]
    async fn invalid_title_keeps_input_open() {
        let mut app = app();
        app.start_add();
        app.input_buffer = "x".into();
        app.handle_input().await;

        assert_eq!(app.input_mode, InputMode::Adding);
        assert!(app.planner.state.feedback.is_some());
    }

    #[tokio::test]
    async fn switching_blocks_resets_selection() {
        let mut app = app();
        app.start_add();
        app.input_buffer = "Morning task".into();
        app.handle_input().await;
        assert_eq!(app.state.selected(), Some(0));

        app.cycle_block();
        assert_eq!(app.planner.state.selected_block, TimeBlock::Afternoon);
        assert_eq!(app.state.selected(), None);
    }

    #[tokio::test]
    async fn edit_renames_highlighted_task() {
        let mut app = app();
        app.start_add();
        app.input_buffer = "Stretch".into();
        app.handle_input().await;

        app.start_edit();
        assert_eq!(app.input_buffer, "Stretch");
        app.input_buffer = "Yoga".into();
        app.handle_input().await;

        assert_eq!(app.planner.state.tasks[0].title, "Yoga");
    }

    #[test]
    fn week_navigation_moves_selection_by_seven_days() {
        let mut app = app();
        app.toggle_view();
        app.navigate_calendar(1);
        assert_eq!(
            app.planner.state.selected_date,
            NaiveDate::from_ymd_opt(2026, 10, 25).unwrap()
        );
        assert!(app.planner.state.tasks.is_empty());
    }
}
