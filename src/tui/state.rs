use crate::model::{Timetable, format_update_stamp};
use crate::options::{Level, PickerOption};
use crate::schedule::{self, DayFilter, Resolved};
use crate::selection::Selection;
use chrono::NaiveDate;
use ratatui::widgets::ListState;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Focus {
    Picker(Level),
    Day,
    Schedule,
}

pub struct AppState {
    pub timetable: Timetable,
    pub selection: Selection,
    pub day: DayFilter,
    pub active_focus: Focus,
    pub picker_states: [ListState; 4],
    pub day_state: ListState,
    pub scroll: u16,
    pub message: String,
    pub loading: bool,
    pub last_updated: Option<String>,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        let day = DayFilter::default_for(today);
        let mut day_state = ListState::default();
        day_state.select(DayFilter::CHOICES.iter().position(|d| *d == day));
        Self {
            timetable: Timetable::default(),
            selection: Selection::default(),
            day,
            active_focus: Focus::Picker(Level::Program),
            picker_states: Default::default(),
            day_state,
            scroll: 0,
            message: "Loading timetable data...".to_string(),
            loading: true,
            last_updated: None,
        }
    }

    pub fn apply_timetable(&mut self, timetable: Timetable) {
        self.last_updated = timetable
            .update_stamp()
            .map(|raw| format_update_stamp(raw).unwrap_or_else(|| "unknown".to_string()));
        self.timetable = timetable;
        self.selection.reconcile(&self.timetable);
        self.loading = false;
        self.scroll = 0;
        self.message = if self.timetable.is_empty() {
            "Timetable is empty.".to_string()
        } else {
            format!("Programs: {}", self.options(Level::Program).len())
        };
        self.sync_cursors();
        self.ensure_focus_visible();
    }

    /// A failed load leaves whatever was shown before; on first start that
    /// is an empty timetable.
    pub fn load_failed(&mut self, error: &str) {
        self.loading = false;
        self.message = format!("Error: {}", error);
        self.ensure_focus_visible();
    }

    pub fn begin_reload(&mut self) {
        self.loading = true;
        self.message = "Reloading...".to_string();
    }

    pub fn options(&self, level: Level) -> Vec<PickerOption> {
        self.selection.options(&self.timetable, level)
    }

    /// Pickers worth drawing: upstream chosen and something to choose from.
    pub fn visible_levels(&self) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .take_while(|level| {
                Level::ALL[..level.index()]
                    .iter()
                    .all(|up| self.selection.get(*up).is_some())
            })
            .filter(|level| !self.options(*level).is_empty())
            .collect()
    }

    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order: Vec<Focus> = self.visible_levels().into_iter().map(Focus::Picker).collect();
        order.push(Focus::Day);
        order.push(Focus::Schedule);
        order
    }

    pub fn toggle_focus(&mut self) {
        self.shift_focus(1);
    }

    pub fn toggle_focus_back(&mut self) {
        self.shift_focus(-1);
    }

    fn shift_focus(&mut self, delta: isize) {
        let order = self.focus_order();
        let len = order.len() as isize;
        let current = order.iter().position(|f| *f == self.active_focus).unwrap_or(0) as isize;
        self.active_focus = order[(current + delta).rem_euclid(len) as usize];
    }

    fn ensure_focus_visible(&mut self) {
        if !self.focus_order().contains(&self.active_focus) {
            self.active_focus = self.focus_order()[0];
        }
    }

    fn list_len(&self) -> usize {
        match self.active_focus {
            Focus::Picker(level) => self.options(level).len(),
            Focus::Day => DayFilter::CHOICES.len(),
            Focus::Schedule => 0,
        }
    }

    fn focused_list(&mut self) -> Option<&mut ListState> {
        match self.active_focus {
            Focus::Picker(level) => Some(&mut self.picker_states[level.index()]),
            Focus::Day => Some(&mut self.day_state),
            Focus::Schedule => None,
        }
    }

    pub fn next(&mut self) {
        if self.active_focus == Focus::Schedule {
            self.scroll = self.scroll.saturating_add(1);
            return;
        }
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(list) = self.focused_list() {
            let i = match list.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            list.select(Some(i));
        }
    }

    pub fn previous(&mut self) {
        if self.active_focus == Focus::Schedule {
            self.scroll = self.scroll.saturating_sub(1);
            return;
        }
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(list) = self.focused_list() {
            let i = match list.selected() {
                Some(0) | None => len - 1,
                Some(i) => (i - 1).min(len - 1),
            };
            list.select(Some(i));
        }
    }

    pub fn jump_forward(&mut self, step: usize) {
        if self.active_focus == Focus::Schedule {
            self.scroll = self.scroll.saturating_add(step as u16);
            return;
        }
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(list) = self.focused_list() {
            let current = list.selected().unwrap_or(0);
            list.select(Some((current + step).min(len - 1)));
        }
    }

    pub fn jump_backward(&mut self, step: usize) {
        if self.active_focus == Focus::Schedule {
            self.scroll = self.scroll.saturating_sub(step as u16);
            return;
        }
        if let Some(list) = self.focused_list() {
            let current = list.selected().unwrap_or(0);
            list.select(Some(current.saturating_sub(step)));
        }
    }

    /// Applies the entry under the cursor of the focused picker.
    pub fn confirm(&mut self) {
        match self.active_focus {
            Focus::Picker(level) => {
                let options = self.options(level);
                let idx = self.picker_states[level.index()].selected().unwrap_or(0);
                let Some(choice) = options.get(idx) else {
                    return;
                };
                match self.selection.select(&self.timetable, level, &choice.value) {
                    Ok(()) => {
                        self.message = format!("{}: {}", level, choice.label);
                        self.scroll = 0;
                        self.sync_cursors();
                        let next_open = self.visible_levels().into_iter().find(|l| {
                            l.index() > level.index() && self.selection.get(*l).is_none()
                        });
                        if let Some(next) = next_open {
                            self.active_focus = Focus::Picker(next);
                        } else if self.selection.is_complete() {
                            self.active_focus = Focus::Schedule;
                        }
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        self.message = format!("Error: {}", e);
                    }
                }
            }
            Focus::Day => {
                let idx = self.day_state.selected().unwrap_or(0);
                if let Some(day) = DayFilter::CHOICES.get(idx) {
                    self.day = *day;
                    self.scroll = 0;
                    self.message = format!("Viewing {}", day);
                }
            }
            Focus::Schedule => {}
        }
    }

    /// Points every picker cursor at its current value (or the top).
    fn sync_cursors(&mut self) {
        for level in Level::ALL {
            let options = self.options(level);
            let pos = self
                .selection
                .get(level)
                .and_then(|value| options.iter().position(|o| o.value == value))
                .unwrap_or(0);
            let state = &mut self.picker_states[level.index()];
            state.select(if options.is_empty() { None } else { Some(pos) });
        }
    }

    pub fn resolved(&self) -> Option<Resolved> {
        let path = self.selection.path()?;
        Some(schedule::resolve(&self.timetable, &path, self.day))
    }
}
