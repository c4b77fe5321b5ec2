use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Hit, Popup, WordListState, GRID_COLUMNS};
use crate::phrase::focus::{Focus, SlotFocus};
use crate::phrase::PHRASE_LEN;
use crate::theme::Theme;

const GRID_ROWS: usize = PHRASE_LEN / GRID_COLUMNS;
const SLOT_HEIGHT: u16 = 3;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme used for drawing. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

fn accent() -> Color { theme().accent }
fn danger() -> Color { theme().danger }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn inactive() -> Color { theme().inactive }
fn header() -> Color { theme().header }

/// Screen regions of the form. Shared by drawing and pointer hit testing so
/// both always agree on where things are.
#[derive(Debug, Clone)]
pub struct FormLayout {
    pub info: Rect,
    pub form: Rect,
    pub slots: [Rect; PHRASE_LEN],
    pub submit: Rect,
    pub footer: Rect,
}

pub fn form_layout(area: Rect) -> FormLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                                   // Info line
            Constraint::Length(SLOT_HEIGHT * GRID_ROWS as u16 + 2),  // Word grid with border
            Constraint::Length(3),                                   // Submit button
            Constraint::Min(0),
            Constraint::Length(1),                                   // Footer
        ])
        .split(area);

    let grid = chunks[1].inner(Margin { horizontal: 1, vertical: 1 });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(SLOT_HEIGHT); GRID_ROWS])
        .split(grid);

    let mut slots = [Rect::default(); PHRASE_LEN];
    for (r, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row);
        for (c, col) in cols.iter().enumerate() {
            slots[r * GRID_COLUMNS + c] = *col;
        }
    }

    let submit = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(chunks[2])[1];

    FormLayout {
        info: chunks[0],
        form: chunks[1],
        slots,
        submit,
        footer: chunks[4],
    }
}

/// Dropdown under a slot; flips above it when there is no room below
pub fn suggestion_area(slot: Rect, count: usize, bounds: Rect) -> Rect {
    let wanted = count as u16 + 2;
    let below = bounds.bottom().saturating_sub(slot.bottom());
    let above = slot.y.saturating_sub(bounds.y);

    if below >= wanted || below >= above {
        Rect::new(slot.x, slot.bottom(), slot.width, wanted.min(below))
    } else {
        let height = wanted.min(above);
        Rect::new(slot.x, slot.y - height, slot.width, height)
    }
}

/// The dropdown as it is drawn: its area and the window of suggestions that
/// fits inside the border. `None` when it is closed or too short to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dropdown {
    pub area: Rect,
    pub offset: usize,
    pub visible: usize,
}

pub fn open_dropdown(app: &App, layout: &FormLayout, bounds: Rect) -> Option<Dropdown> {
    let index = app.focus.active_slot()?;
    let highlighted = app.focus.highlighted()?;
    let count = app.focus.suggestions().len();

    let area = suggestion_area(layout.slots[index], count, bounds);
    if area.height < 3 {
        return None;
    }

    // Scroll just far enough to keep the highlighted row in view
    let visible = (area.height as usize - 2).min(count);
    let offset = (highlighted + 1).saturating_sub(visible);
    Some(Dropdown { area, offset, visible })
}

/// Map a pointer position to the control under it. The open dropdown is
/// on top, so it is tested first; a press on its border hits nothing.
pub fn hit_test(app: &App, area: Rect, column: u16, row: u16) -> Option<Hit> {
    hit_test_layout(app, &form_layout(area), area, column, row)
}

fn hit_test_layout(
    app: &App,
    layout: &FormLayout,
    bounds: Rect,
    column: u16,
    row: u16,
) -> Option<Hit> {
    let pos = Position::new(column, row);

    if let Some(dropdown) = open_dropdown(app, layout, bounds) {
        if dropdown.area.contains(pos) {
            let line = row.checked_sub(dropdown.area.y + 1)? as usize;
            return (line < dropdown.visible).then_some(Hit::Suggestion(dropdown.offset + line));
        }
    }

    if let Some(index) = layout.slots.iter().position(|r| r.contains(pos)) {
        return Some(Hit::Slot(index));
    }
    layout.submit.contains(pos).then_some(Hit::Submit)
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let layout = form_layout(area);

    draw_info_line(f, app, layout.info);
    draw_form(f, app, &layout);
    draw_submit(f, app, layout.submit);
    draw_footer(f, app, layout.footer);
    draw_suggestions(f, app, &layout, area);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Outcome => draw_outcome_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > loading > summary
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else if app.wordlist_state == WordListState::Loading {
        Line::from(vec![
            Span::styled("󰔟 ", Style::default().fg(accent())),
            Span::styled(
                format!("Loading word list ({})...", app.wordlist_source),
                Style::default().fg(text_dim()),
            ),
        ])
    } else if app.wordlist.is_empty() {
        Line::from(Span::styled(
            "⚠ No word list loaded, words are not checked",
            Style::default().fg(danger()),
        ))
    } else {
        let filled = (0..PHRASE_LEN).filter(|&i| !app.phrase.is_slot_empty(i)).count();
        let invalid = app.invalid.iter().filter(|b| **b).count();
        let invalid_color = if invalid > 0 { danger() } else { text_dim() };

        Line::from(vec![
            Span::styled(format!("{}/{} filled", filled, PHRASE_LEN), Style::default().fg(text_dim())),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(format!("{} invalid", invalid), Style::default().fg(invalid_color)),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(
                format!("{} words ({})", app.wordlist.len(), app.wordlist_source),
                Style::default().fg(text_dim()),
            ),
        ])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_form(f: &mut Frame, app: &App, layout: &FormLayout) {
    let block = Block::default()
        .title(Span::styled(
            " Verify Recovery Phrase ",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    f.render_widget(block, layout.form);

    for (index, area) in layout.slots.iter().enumerate() {
        draw_slot(f, app, index, *area);
    }
}

fn draw_slot(f: &mut Frame, app: &App, index: usize, area: Rect) {
    let state = app.focus.slot_state(index);
    let is_focused = state != SlotFocus::Unfocused;
    let is_invalid = app.invalid[index];
    let word = app.phrase.get(index);

    let border_color = if is_invalid {
        danger()
    } else if is_focused {
        accent()
    } else {
        inactive()
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", index + 1),
            Style::default().fg(if is_focused { accent() } else { header() }),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let content = if word.is_empty() && !is_focused {
        Line::from(Span::styled("word", Style::default().fg(text_dim())))
    } else {
        let word_color = if is_invalid { danger() } else { text() };
        let mut spans = vec![Span::styled(word, Style::default().fg(word_color))];
        if is_focused {
            spans.push(Span::styled("_", Style::default().fg(accent())));
        }
        if is_invalid {
            spans.push(Span::styled(" ✗", Style::default().fg(danger())));
        }
        Line::from(spans)
    };

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_suggestions(f: &mut Frame, app: &App, layout: &FormLayout, bounds: Rect) {
    let Some(dropdown) = open_dropdown(app, layout, bounds) else {
        return;
    };
    let highlighted = app.focus.highlighted().unwrap_or(0);

    let items: Vec<ListItem> = app
        .focus
        .suggestions()
        .iter()
        .enumerate()
        .skip(dropdown.offset)
        .take(dropdown.visible)
        .map(|(i, word)| {
            let style = if i == highlighted {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default().fg(text_dim())
            };
            ListItem::new(Line::from(Span::styled(format!(" {}", word), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    );

    f.render_widget(Clear, dropdown.area);
    f.render_widget(list, dropdown.area);
}

fn draw_submit(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Submit;
    let button_style = if is_focused {
        Style::default().bg(bg_selected())
    } else {
        Style::default()
    };

    let button = Paragraph::new(Line::from(Span::styled(
        "Verify",
        Style::default().fg(success()).add_modifier(Modifier::BOLD),
    )))
    .style(button_style)
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if is_focused { accent() } else { inactive() })),
    );

    f.render_widget(button, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match &app.focus {
        Focus::Slot { suggestions, .. } if !suggestions.is_empty() => vec![
            ("↑↓", "Pick"),
            ("Enter", "Accept"),
            ("Esc", "Hide"),
            ("Tab", "Next"),
            ("F2", "Verify"),
        ],
        Focus::Slot { .. } => vec![
            ("Tab", "Next"),
            ("S-Tab", "Prev"),
            ("Enter", "Next"),
            ("F2", "Verify"),
            ("F1", "Help"),
            ("^Q", "Quit"),
        ],
        Focus::Submit => vec![
            ("Enter", "Verify"),
            ("Tab", "Next"),
            ("F1", "Help"),
            ("^Q", "Quit"),
        ],
        Focus::None => vec![
            ("Tab", "Focus"),
            ("F2", "Verify"),
            ("F1", "Help"),
            ("^Q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 3 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_outcome_popup(f: &mut Frame, app: &App) {
    let Some(outcome) = &app.outcome else {
        return;
    };

    let popup_area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, popup_area);

    let color = if outcome.is_accepted() { success() } else { danger() };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            outcome.headline(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for detail in outcome.details() {
        lines.push(Line::from(Span::styled(detail, Style::default().fg(text()))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(" to close", Style::default().fg(text_dim())),
    ]));

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Result ", Style::default().fg(color)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(popup, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<11}", k), Style::default().fg(accent())),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("═══ Entering Words ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        key("type", "Fill the focused slot (suggestions appear as you type)"),
        key("Enter", "Accept highlighted suggestion, or go to next slot"),
        key("↑/↓", "Move through suggestions, or between rows"),
        key("Space", "Go to next slot"),
        key("Backspace", "Delete; on an empty slot go back"),
        key("Ctrl-U", "Clear the slot"),
        key("Esc", "Hide suggestions"),
        key("paste", "Fill consecutive slots from the focused one"),
        Line::from(""),
        Line::from(Span::styled("═══ Navigation ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        key("Tab", "Next slot / Verify button"),
        key("Shift-Tab", "Previous slot"),
        key("mouse", "Click a slot, a suggestion or Verify"),
        Line::from(""),
        Line::from(Span::styled("═══ Actions ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        key("F2", "Verify the phrase"),
        key("F1", "Toggle this help"),
        key("Ctrl-Q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Words turn red when they are not in the word list.",
            Style::default().fg(text_dim()),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 seedcheck Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::wordlist::WordList;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn ready_app() -> App {
        App::with_wordlist(AppConfig::default(), WordList::bundled(), "bundled".to_string())
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            text.push('\n');
        }
        text
    }

    fn center(r: Rect) -> (u16, u16) {
        (r.x + r.width / 2, r.y + r.height / 2)
    }

    #[test]
    fn test_layout_places_twelve_slots_in_grid() {
        let layout = form_layout(Rect::new(0, 0, 90, 30));
        assert_eq!(layout.slots[0].y, layout.slots[2].y);
        assert!(layout.slots[3].y > layout.slots[0].y);
        assert!(layout.slots[1].x > layout.slots[0].x);
        assert!(layout.slots.iter().all(|r| r.height == SLOT_HEIGHT));
    }

    #[test]
    fn test_render_shows_form_and_summary() {
        let mut app = ready_app();
        app.handle_paste("xyz123");
        app.status_message = None;
        let screen = render(&app, 90, 30);

        assert!(screen.contains("Verify Recovery Phrase"));
        assert!(screen.contains("1/12 filled"));
        assert!(screen.contains("1 invalid"));
        assert!(screen.contains("2048 words"));
    }

    #[test]
    fn test_render_shows_suggestions_for_focused_slot() {
        let mut app = ready_app();
        app.handle_paste("zo");
        app.handle_click(Hit::Slot(1));
        app.handle_click(Hit::Slot(0));

        let screen = render(&app, 90, 30);
        assert!(screen.contains(" zoo"));
    }

    #[test]
    fn test_render_outcome_popup() {
        let mut app = ready_app();
        app.submit();
        let screen = render(&app, 90, 30);
        assert!(screen.contains("Please check and fill in all words!"));
    }

    #[test]
    fn test_hit_test_slots_and_submit() {
        let app = ready_app();
        let area = Rect::new(0, 0, 90, 30);
        let layout = form_layout(area);

        let (x, y) = center(layout.slots[7]);
        assert_eq!(hit_test(&app, area, x, y), Some(Hit::Slot(7)));

        let (x, y) = center(layout.submit);
        assert_eq!(hit_test(&app, area, x, y), Some(Hit::Submit));

        assert_eq!(hit_test(&app, area, 0, 0), None);
    }

    #[test]
    fn test_hit_test_prefers_open_dropdown() {
        let mut app = ready_app();
        app.handle_click(Hit::Slot(0));
        app.phrase.set(0, "ab");
        app.handle_click(Hit::Slot(1));
        app.handle_click(Hit::Slot(0));
        assert_eq!(app.focus.suggestions().len(), 5);

        let area = Rect::new(0, 0, 90, 30);
        let layout = form_layout(area);
        let dropdown = suggestion_area(layout.slots[0], 5, area);

        // Second suggestion row sits over slot 3's box
        let hit = hit_test(&app, area, dropdown.x + 2, dropdown.y + 2);
        assert_eq!(hit, Some(Hit::Suggestion(1)));

        // Border absorbs the press
        assert_eq!(hit_test(&app, area, dropdown.x + 2, dropdown.y), None);
    }

    fn app_suggesting_ab() -> App {
        let mut app = ready_app();
        app.handle_click(Hit::Slot(0));
        app.phrase.set(0, "ab");
        app.handle_click(Hit::Slot(1));
        app.handle_click(Hit::Slot(0));
        app
    }

    fn cramped_layout(slot0: Rect, slot3: Rect) -> FormLayout {
        let mut slots = [Rect::default(); PHRASE_LEN];
        slots[0] = slot0;
        slots[3] = slot3;
        FormLayout {
            info: Rect::default(),
            form: Rect::default(),
            slots,
            submit: Rect::default(),
            footer: Rect::default(),
        }
    }

    #[test]
    fn test_undrawable_dropdown_does_not_swallow_presses() {
        let app = app_suggesting_ab();
        let layout = cramped_layout(Rect::new(0, 0, 20, 3), Rect::new(0, 3, 20, 3));
        let bounds = Rect::new(0, 0, 20, 5);

        assert_eq!(open_dropdown(&app, &layout, bounds), None);
        assert_eq!(hit_test_layout(&app, &layout, bounds, 5, 4), Some(Hit::Slot(3)));
    }

    #[test]
    fn test_clipped_dropdown_scrolls_to_highlight() {
        let mut app = app_suggesting_ab();
        for _ in 0..3 {
            app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(app.focus.highlighted(), Some(3));

        // Room for two rows below the slot, less above it
        let layout = cramped_layout(Rect::new(0, 2, 20, 3), Rect::default());
        let bounds = Rect::new(0, 0, 20, 9);
        let dropdown = open_dropdown(&app, &layout, bounds).unwrap();
        assert_eq!(dropdown.area.height, 4);
        assert_eq!(dropdown.visible, 2);
        assert_eq!(dropdown.offset, 2);

        // Rows map through the scroll offset
        let first_row = dropdown.area.y + 1;
        assert_eq!(hit_test_layout(&app, &layout, bounds, 5, first_row), Some(Hit::Suggestion(2)));
        assert_eq!(hit_test_layout(&app, &layout, bounds, 5, first_row + 1), Some(Hit::Suggestion(3)));
    }

    #[test]
    fn test_short_dropdown_keeps_first_rows_until_highlight_moves() {
        let app = app_suggesting_ab();
        let layout = cramped_layout(Rect::new(0, 2, 20, 3), Rect::default());
        let dropdown = open_dropdown(&app, &layout, Rect::new(0, 0, 20, 9)).unwrap();
        assert_eq!(dropdown.offset, 0);
        assert_eq!(dropdown.visible, 2);
    }

    #[test]
    fn test_suggestion_area_flips_above_near_bottom() {
        let bounds = Rect::new(0, 0, 40, 20);
        let slot = Rect::new(0, 15, 20, 3);
        let area = suggestion_area(slot, 5, bounds);
        assert_eq!(area.height, 7);
        assert_eq!(area.bottom(), slot.y);
    }
}
