use crate::model::Slot;
use crate::schedule::{DayFilter, Resolved, day_key};
use crate::tui::state::{AppState, Focus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(v_chunks[0]);

    draw_pickers(f, state, h_chunks[0]);
    draw_schedule(f, state, h_chunks[1]);
    draw_footer(f, state, v_chunks[1]);
}

fn draw_pickers(f: &mut Frame, state: &mut AppState, area: Rect) {
    let levels = state.visible_levels();
    let mut constraints: Vec<Constraint> = levels
        .iter()
        .map(|l| Constraint::Length(state.options(*l).len().min(6) as u16 + 2))
        .collect();
    constraints.push(Constraint::Length(DayFilter::CHOICES.len() as u16 + 2));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, level) in levels.iter().enumerate() {
        let current = state.selection.get(*level).map(str::to_string);
        let items: Vec<ListItem> = state
            .options(*level)
            .into_iter()
            .map(|opt| {
                let chosen = current.as_deref() == Some(opt.value.as_str());
                let marker = if chosen { "(•) " } else { "( ) " };
                let style = if chosen {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(format!("{}{}", marker, opt.label), style)))
            })
            .collect();
        let focused = state.active_focus == Focus::Picker(*level);
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", level))
                    .border_style(border_style(focused)),
            )
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::DarkGray),
            );
        f.render_stateful_widget(list, chunks[i], &mut state.picker_states[level.index()]);
    }

    let day_items: Vec<ListItem> = DayFilter::CHOICES
        .iter()
        .map(|d| {
            let marker = if *d == state.day { "(•) " } else { "( ) " };
            ListItem::new(Line::from(format!("{}{}", marker, d)))
        })
        .collect();
    let day_list = List::new(day_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" View Day ")
                .border_style(border_style(state.active_focus == Focus::Day)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(day_list, chunks[levels.len()], &mut state.day_state);
}

fn draw_schedule(f: &mut Frame, state: &AppState, area: Rect) {
    let updated = state.last_updated.as_deref().unwrap_or("unknown");
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Timetable: {} ", state.day))
        .title_bottom(Line::from(format!(" Last updated: {} ", updated)).alignment(Alignment::Right))
        .border_style(border_style(state.active_focus == Focus::Schedule));
    let body = Paragraph::new(schedule_lines(state))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0))
        .block(block);
    f.render_widget(body, area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let status_color = if state.message.starts_with("Error") {
        Color::Red
    } else {
        Color::Cyan
    };
    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help_text = "Tab:Next | Enter:Pick | j/k:Move | r:Reload | q:Quit";
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

/// Text of the timetable pane for the current state.
pub fn schedule_lines(state: &AppState) -> Vec<Line<'static>> {
    if state.loading {
        return vec![Line::from("Loading timetable data...")];
    }
    let Some(resolved) = state.resolved() else {
        return vec![Line::from(Span::styled(
            "Please select all fields to view timetable.",
            Style::default().fg(Color::Gray),
        ))];
    };

    let blocks = match resolved {
        Resolved::NoClasses(DayFilter::WholeWeek) => {
            return vec![Line::from("No classes scheduled for selected week.")];
        }
        Resolved::NoClasses(filter) => {
            return vec![Line::from(vec![
                Span::raw("No classes scheduled for "),
                Span::styled(filter.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ])];
        }
        Resolved::Days(blocks) => blocks,
    };

    let mut lines = Vec::new();
    for block in blocks {
        lines.push(Line::from(Span::styled(
            day_key(block.day),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for slot in &block.schedule.main {
            push_slot(&mut lines, slot, "");
        }
        for (name, slots) in &block.schedule.subsections {
            lines.push(Line::from(Span::styled(
                format!("  Subsection {}", name),
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )));
            for slot in slots {
                push_slot(&mut lines, slot, "  ");
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn push_slot(lines: &mut Vec<Line<'static>>, slot: &Slot, indent: &str) {
    lines.push(Line::from(Span::styled(
        format!("{}{}", indent, slot.time_label()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    for class in &slot.classes {
        lines.push(Line::from(Span::styled(
            format!("{}  {}", indent, class.name),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("{}    Venue: {}", indent, class.location)));
        if !class.kind.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{}    {}", indent, class.kind),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if !class.info.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{}    {}", indent, class.info.join(", ")),
                Style::default().fg(Color::Yellow),
            )));
        }
    }
}

