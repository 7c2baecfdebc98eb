use crate::model::Timetable;

#[derive(Debug)]
pub enum Action {
    Reload,
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    TimetableLoaded(Timetable),
    LoadFailed(String),
}
