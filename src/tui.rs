use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::catalog::{CatalogStore, VideoRecord};
use crate::errors::Result;
use crate::pager::{self, PageControl, PageState};
use crate::player;
use crate::query::{self, QueryParams};

#[derive(PartialEq)]
enum Mode {
    Normal,
    Search,
    Detail,
}

struct App {
    store: CatalogStore,
    categories: Vec<String>,
    tags: Vec<String>,
    query: QueryParams,
    filtered: Vec<VideoRecord>,
    page: PageState,
    list_state: ListState,
    mode: Mode,
    search_input: String,
    // 0 = no filter, 1.. = index into the vocabulary + 1.
    category_idx: usize,
    tag_idx: usize,
    status: String,
    status_time: Option<Instant>,
    detail_scroll: u16,
    player: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(store: CatalogStore, player: Option<String>) -> Self {
        let categories = store.categories();
        let tags = store.tags();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        let mut app = Self {
            store,
            categories,
            tags,
            query: QueryParams::default(),
            filtered: Vec::new(),
            page: PageState::default(),
            list_state,
            mode: Mode::Normal,
            search_input: String::new(),
            category_idx: 0,
            tag_idx: 0,
            status: String::new(),
            status_time: None,
            detail_scroll: 0,
            player,
            should_quit: false,
        };
        app.apply_filters();
        app
    }

    fn set_status(&mut self, msg: String) {
        self.status = msg;
        self.status_time = Some(Instant::now());
    }

    /// Re-run the filter-sort pipeline and reset to page 1. Called on
    /// every search, selector, or sort change; never on page navigation.
    fn apply_filters(&mut self) {
        self.query.search_term = self.search_input.clone();
        self.query.category = match self.category_idx {
            0 => None,
            i => self.categories.get(i - 1).cloned(),
        };
        self.query.tag = match self.tag_idx {
            0 => None,
            i => self.tags.get(i - 1).cloned(),
        };
        self.filtered = query::apply(self.store.records(), &self.query);
        self.page.reset();
        self.clamp_selection();
    }

    fn current_slice(&self) -> &[VideoRecord] {
        pager::page_slice(&self.filtered, &self.page)
    }

    fn selected_record(&self) -> Option<&VideoRecord> {
        self.list_state
            .selected()
            .and_then(|i| self.current_slice().get(i))
    }

    fn clamp_selection(&mut self) {
        let len = self.current_slice().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            match self.list_state.selected() {
                Some(i) if i < len => {}
                _ => self.list_state.select(Some(0)),
            }
        }
    }

    fn select_next(&mut self) {
        let len = self.current_slice().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if self.current_slice().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if !self.current_slice().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.current_slice().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    /// Jump to a page; re-slices only, the filtered list stays as is.
    fn set_page(&mut self, page: usize) {
        self.page.set_page(page);
        self.list_state.select(Some(0));
        self.clamp_selection();
    }

    fn next_page(&mut self) {
        let total = pager::total_pages(self.filtered.len(), self.page.page_size);
        if self.page.current_page < total {
            self.set_page(self.page.current_page + 1);
        }
    }

    fn prev_page(&mut self) {
        if self.page.current_page > 1 {
            self.set_page(self.page.current_page - 1);
        }
    }

    fn cycle_category(&mut self, back: bool) {
        let slots = self.categories.len() + 1;
        self.category_idx = if back {
            (self.category_idx + slots - 1) % slots
        } else {
            (self.category_idx + 1) % slots
        };
        self.apply_filters();
        let label = match self.category_idx {
            0 => "All".to_string(),
            i => self.categories[i - 1].clone(),
        };
        self.set_status(format!("Category: {label}"));
    }

    fn cycle_tag(&mut self, back: bool) {
        let slots = self.tags.len() + 1;
        self.tag_idx = if back {
            (self.tag_idx + slots - 1) % slots
        } else {
            (self.tag_idx + 1) % slots
        };
        self.apply_filters();
        let label = match self.tag_idx {
            0 => "All".to_string(),
            i => self.tags[i - 1].clone(),
        };
        self.set_status(format!("Tag: {label}"));
    }

    fn cycle_sort(&mut self) {
        self.query.sort = self.query.sort.next();
        self.apply_filters();
        self.set_status(format!("Sort: {}", self.query.sort.as_str()));
    }

    fn reset_filters(&mut self) {
        self.search_input.clear();
        self.category_idx = 0;
        self.tag_idx = 0;
        self.query = QueryParams::default();
        self.apply_filters();
        self.set_status("Filters reset".to_string());
    }

    fn open_selected(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        match record.local_path.clone() {
            Some(path) if !path.is_empty() => {
                match player::open_external(std::path::Path::new(&path), self.player.as_deref()) {
                    Ok(pid) => self.set_status(format!("Playing {path} (pid {pid})")),
                    Err(e) => self.set_status(format!("Open failed: {e}")),
                }
            }
            _ => self.set_status("No file path for this video".to_string()),
        }
    }

    fn copy_selected_path(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        match record.local_path.clone() {
            Some(path) if !path.is_empty() => match player::copy_path(&path) {
                Ok(()) => self.set_status(format!("Copied {path}")),
                Err(e) => self.set_status(format!("Copy failed: {e}")),
            },
            _ => self.set_status("No file path for this video".to_string()),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let truncated: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{truncated}…")
    } else {
        truncated
    }
}

// ── UI rendering ───────────────────────────────────────────────────

fn draw(frame: &mut Frame, app: &mut App) {
    let [title_area, body_area, page_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    // Title bar
    let fallback = if app.store.used_fallback() {
        " — built-in data"
    } else {
        ""
    };
    let title = format!(
        " vidcat — {} videos — {} matching — sort: {}{fallback} ",
        app.store.len(),
        app.filtered.len(),
        app.query.sort.as_str()
    );
    frame.render_widget(
        Paragraph::new(title).style(Style::new().fg(Color::Black).bg(Color::Cyan)),
        title_area,
    );

    // Body: current page of the filtered list
    let slice = app.current_slice();
    let list_title = if app.mode == Mode::Search {
        format!("Search: {}_", app.search_input)
    } else {
        let mut parts = Vec::new();
        if let Some(ref c) = app.query.category
            && !c.is_empty()
        {
            parts.push(format!("category: {c}"));
        }
        if let Some(ref t) = app.query.tag
            && !t.is_empty()
        {
            parts.push(format!("tag: {t}"));
        }
        if parts.is_empty() {
            "Videos".to_string()
        } else {
            format!("Videos ({})", parts.join(", "))
        }
    };

    if slice.is_empty() {
        let msg = Paragraph::new("No videos match your filters.")
            .block(Block::default().borders(Borders::ALL).title(list_title))
            .style(Style::new().fg(Color::DarkGray));
        frame.render_widget(msg, body_area);
    } else {
        let items: Vec<ListItem> = slice
            .iter()
            .map(|record| {
                let category = record.categories.first().map(String::as_str).unwrap_or("");
                let tags = if record.tags.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", record.tags.join(", "))
                };
                ListItem::new(format!(
                    "{:>10}  {:<42}  {}{}",
                    record.date,
                    truncate_chars(&record.title, 42),
                    category,
                    tags
                ))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(list_title))
            .highlight_style(
                Style::new()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, body_area, &mut app.list_state);
    }

    // Pagination bar
    frame.render_widget(
        Paragraph::new(pagination_line(app)).centered(),
        page_area,
    );

    // Detail modal on top
    if app.mode == Mode::Detail {
        draw_detail(frame, app);
    }

    // Auto-clear status after 3 seconds
    if let Some(t) = app.status_time
        && t.elapsed() > Duration::from_secs(3)
    {
        app.status.clear();
        app.status_time = None;
    }

    // Help bar
    let help_text = match app.mode {
        Mode::Normal => {
            if app.status.is_empty() {
                " [q]uit [/]search [Enter]details [h/l]page [c/C]ategory [t/T]ag [s]ort [r]eset"
                    .to_string()
            } else {
                format!(" {} ", app.status)
            }
        }
        Mode::Search => " Type to search (live) · [Enter] done · [Esc] cancel".to_string(),
        Mode::Detail => {
            if app.status.is_empty() {
                " [o]pen externally · [y] copy path · [J/K] scroll · [Esc] close".to_string()
            } else {
                format!(" {} ", app.status)
            }
        }
    };

    frame.render_widget(
        Paragraph::new(help_text).style(Style::new().fg(Color::Black).bg(Color::White)),
        help_area,
    );
}

fn pagination_line(app: &App) -> Line<'static> {
    let controls = pager::controls(app.filtered.len(), &app.page);
    if controls.is_empty() {
        return Line::raw("");
    }
    let mut spans = Vec::new();
    for control in controls {
        match control {
            PageControl::Prev(_) => spans.push(Span::raw("«  ")),
            PageControl::Page { number, active } => {
                if active {
                    spans.push(Span::styled(
                        format!("[{number}]"),
                        Style::new()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::raw(" "));
                } else {
                    spans.push(Span::raw(format!(" {number}  ")));
                }
            }
            PageControl::Ellipsis => spans.push(Span::raw("…  ")),
            PageControl::Next(_) => spans.push(Span::raw(" »")),
        }
    }
    Line::from(spans)
}

fn draw_detail(frame: &mut Frame, app: &App) {
    let Some(record) = app.selected_record() else {
        return;
    };

    let area = popup_area(frame.area(), 70, 80);
    frame.render_widget(Clear, area);

    let label = Style::new().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Date:       ", label),
            Span::raw(record.date.clone()),
        ]),
        Line::from(vec![
            Span::styled("Categories: ", label),
            Span::raw(if record.categories.is_empty() {
                "—".to_string()
            } else {
                record.categories.join(", ")
            }),
        ]),
        Line::from(vec![
            Span::styled("Tags:       ", label),
            Span::raw(if record.tags.is_empty() {
                "—".to_string()
            } else {
                record.tags.join(", ")
            }),
        ]),
        Line::from(vec![
            Span::styled("Path:       ", label),
            Span::raw(
                record
                    .local_path
                    .clone()
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| "not available".to_string()),
            ),
        ]),
        Line::raw("─────────────────────────"),
    ];
    if let Some(ref description) = record.description {
        for line in description.lines() {
            lines.push(Line::raw(line.to_string()));
        }
    }

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", truncate_chars(&record.title, 60))),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(detail, area);
}

/// Centered popup rect taking the given percentages of the frame.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(ratatui::layout::Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(ratatui::layout::Flex::Center)
        .areas(area);
    area
}

// ── Event handling ─────────────────────────────────────────────────

fn handle_event(app: &mut App) -> std::io::Result<()> {
    if !event::poll(Duration::from_millis(250))? {
        return Ok(());
    }

    let Event::Key(key) = event::read()? else {
        return Ok(());
    };
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    match app.mode {
        Mode::Normal => {
            let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                KeyCode::Char('j') | KeyCode::Down => app.select_next(),
                KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
                KeyCode::Char('g') | KeyCode::Home => app.select_first(),
                KeyCode::Char('G') | KeyCode::End => app.select_last(),
                KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => app.prev_page(),
                KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => app.next_page(),
                KeyCode::Char('C') if shifted => app.cycle_category(true),
                KeyCode::Char('c') => app.cycle_category(false),
                KeyCode::Char('T') if shifted => app.cycle_tag(true),
                KeyCode::Char('t') => app.cycle_tag(false),
                KeyCode::Char('s') => app.cycle_sort(),
                KeyCode::Char('r') => app.reset_filters(),
                KeyCode::Char('/') => {
                    app.mode = Mode::Search;
                    app.search_input.clear();
                    app.apply_filters();
                    app.status.clear();
                    app.status_time = None;
                }
                KeyCode::Enter => {
                    if app.selected_record().is_some() {
                        app.mode = Mode::Detail;
                        app.detail_scroll = 0;
                    }
                }
                _ => {}
            }
        }
        Mode::Search => match key.code {
            KeyCode::Esc => {
                app.mode = Mode::Normal;
                app.search_input.clear();
                app.apply_filters();
            }
            KeyCode::Enter => {
                app.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                app.search_input.pop();
                app.apply_filters();
            }
            KeyCode::Char(c) => {
                app.search_input.push(c);
                app.apply_filters();
            }
            _ => {}
        },
        Mode::Detail => {
            let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                    app.mode = Mode::Normal;
                    app.detail_scroll = 0;
                }
                KeyCode::Char('o') => app.open_selected(),
                KeyCode::Char('y') => app.copy_selected_path(),
                KeyCode::Char('J') if shifted => {
                    app.detail_scroll = app.detail_scroll.saturating_add(1);
                }
                KeyCode::Char('K') if shifted => {
                    app.detail_scroll = app.detail_scroll.saturating_sub(1);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────

pub fn run(store: CatalogStore, player: Option<String>) -> Result<()> {
    let mut app = App::new(store, player);

    let mut terminal = ratatui::init();

    let result = (|| {
        loop {
            terminal.draw(|frame| draw(frame, &mut app))?;
            handle_event(&mut app)?;
            if app.should_quit {
                break;
            }
        }
        Ok::<(), std::io::Error>(())
    })();

    ratatui::restore();

    result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CatalogStore {
        let raw: Vec<VideoRecord> = serde_json::from_str(
            r#"[
                {"id":"1","title":"Alpha","date":"2023-01-01","categories":["Talks"],"tags":["demo"],"local_path":"Videos/a.mp4"},
                {"id":"2","title":"Beta","date":"2023-02-01","categories":["Music"],"tags":["live"],"local_path":"Videos/b.mp4"},
                {"id":"3","title":"Gamma","date":"2023-03-01","categories":["Talks"],"tags":["demo"]}
            ]"#,
        )
        .unwrap();
        CatalogStore::from_records(raw)
    }

    #[test]
    fn test_new_applies_default_query() {
        let app = App::new(store(), None);
        // date-desc by default
        assert_eq!(app.filtered[0].title, "Gamma");
        assert_eq!(app.filtered[2].title, "Alpha");
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_search_resets_page_and_filters() {
        let mut app = App::new(store(), None);
        app.page.set_page(3);
        app.search_input = "beta".to_string();
        app.apply_filters();
        assert_eq!(app.page.current_page, 1);
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.filtered[0].title, "Beta");
    }

    #[test]
    fn test_cycle_category_wraps_to_all() {
        let mut app = App::new(store(), None);
        // Vocabulary is [Music, Talks]: two cycles land on a filter,
        // third wraps back to no filter.
        app.cycle_category(false);
        assert_eq!(app.query.category.as_deref(), Some("Music"));
        assert_eq!(app.filtered.len(), 1);
        app.cycle_category(false);
        assert_eq!(app.query.category.as_deref(), Some("Talks"));
        assert_eq!(app.filtered.len(), 2);
        app.cycle_category(false);
        assert_eq!(app.query.category, None);
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn test_cycle_category_backwards() {
        let mut app = App::new(store(), None);
        app.cycle_category(true);
        assert_eq!(app.query.category.as_deref(), Some("Talks"));
        app.cycle_category(true);
        assert_eq!(app.query.category.as_deref(), Some("Music"));
        app.cycle_category(true);
        assert_eq!(app.query.category, None);
    }

    #[test]
    fn test_page_navigation_clamps_at_edges() {
        let mut app = App::new(store(), None);
        app.page = PageState::new(1, 1);
        app.clamp_selection();
        app.prev_page();
        assert_eq!(app.page.current_page, 1);
        app.next_page();
        assert_eq!(app.page.current_page, 2);
        app.next_page();
        app.next_page();
        app.next_page();
        assert_eq!(app.page.current_page, 3);
    }

    #[test]
    fn test_selection_clamped_on_shrinking_filter() {
        let mut app = App::new(store(), None);
        app.list_state.select(Some(2));
        app.search_input = "alpha".to_string();
        app.apply_filters();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_no_results_clears_selection() {
        let mut app = App::new(store(), None);
        app.search_input = "zzz".to_string();
        app.apply_filters();
        assert!(app.filtered.is_empty());
        assert_eq!(app.list_state.selected(), None);
        assert!(app.selected_record().is_none());
    }

    #[test]
    fn test_reset_filters_restores_full_list() {
        let mut app = App::new(store(), None);
        app.search_input = "beta".to_string();
        app.cycle_sort();
        app.apply_filters();
        app.reset_filters();
        assert_eq!(app.filtered.len(), 3);
        assert_eq!(app.query.sort, crate::query::SortKey::DateDesc);
        assert!(app.query.category.is_none());
    }

    #[test]
    fn test_pagination_line_marks_active_page() {
        let mut app = App::new(store(), None);
        app.page = PageState::new(2, 1);
        let line = pagination_line(&app);
        let text: String = line.spans.iter().map(|s| s.content.clone()).collect();
        assert!(text.contains("[2]"));
        assert!(text.contains('«'));
        assert!(text.contains('»'));
    }
}
