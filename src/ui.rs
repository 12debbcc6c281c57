//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering is a pure function of
//! the already-normalized state: truncation and fallbacks happen in the
//! aggregator, so an empty slot here just means "show the empty card".
//!
//! ## For contributors
//!
//! * The homepage is a vertical stack: hero carousel, a row of three feed
//!   cards, a devotional/finance row, the history timeline, and a one-line
//!   status bar.
//! * The devotional detail page reuses the status bar.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::api::{CarouselSlide, Devotional};
use crate::app::{App, DevotionalView, Screen};
use crate::format;
use crate::home::{AggregateResult, Direction};

const ACCENT: Color = Color::Yellow;
const MUTED: Color = Color::DarkGray;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    if let Screen::Devotional(view) = &app.screen {
        draw_devotional_page(view, frame, main_area);
    } else if app.home.loading {
        draw_loading(frame, main_area);
    } else {
        draw_home(app, frame, main_area);
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new("Loading homepage…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(ACCENT))
        .block(Block::default().borders(Borders::ALL).title(" Beranda "));
    frame.render_widget(text, area);
}

// ---------------------------------------------------------------------------
// Homepage
// ---------------------------------------------------------------------------

fn draw_home(app: &mut App, frame: &mut Frame, area: Rect) {
    let [hero_area, feeds_area, middle_area, history_area] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(7),
        Constraint::Length(7),
        Constraint::Min(5),
    ])
    .areas(area);

    let agg = &app.home.page.aggregate;
    draw_hero(agg, app.hero.state().index(), app.hero.state().direction(), frame, hero_area);
    draw_feeds(agg, frame, feeds_area);

    let [devotional_area, finance_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(middle_area);
    draw_devotional_card(agg.devotional.as_ref(), frame, devotional_area);
    draw_finance(agg, frame, finance_area);

    draw_history(app, frame, history_area);
}

fn draw_hero(
    agg: &AggregateResult,
    index: usize,
    direction: Direction,
    frame: &mut Frame,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Beranda ");
    let Some(slide) = agg.carousel_slides.get(index) else {
        let empty = Paragraph::new("Welcome")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![slide_heading(slide)];
    if let Some(subtitle) = &slide.subtitle {
        lines.push(Line::from(subtitle.as_str()));
    }
    if let Some(quote) = &slide.quote {
        lines.push(Line::styled(
            format!("“{quote}”"),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    if let Some(cta) = &slide.cta_text {
        let link = slide.cta_link.as_deref().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(format!("[ {cta} ]"), Style::default().fg(Color::Cyan)),
            Span::styled(format!(" {link}"), Style::default().fg(MUTED)),
        ]));
    }
    lines.push(slide_dots(agg.carousel_slides.len(), index, direction));

    let hero = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(hero, area);
}

fn slide_heading(slide: &CarouselSlide) -> Line<'_> {
    let mut spans = Vec::new();
    if let Some(badge) = &slide.badge {
        spans.push(Span::styled(
            format!(" {badge} "),
            Style::default().fg(Color::Black).bg(ACCENT),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        slide.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

/// `‹ ○ ● ○` — filled dot marks the current slide, arrow the last move.
fn slide_dots(len: usize, index: usize, direction: Direction) -> Line<'static> {
    let arrow = match direction {
        Direction::Forward => "›",
        Direction::Backward => "‹",
    };
    let dots: Vec<&str> = (0..len)
        .map(|i| if i == index { "●" } else { "○" })
        .collect();
    Line::styled(format!("{arrow} {}", dots.join(" ")), Style::default().fg(MUTED))
}

fn draw_feeds(agg: &AggregateResult, frame: &mut Frame, area: Rect) {
    let [announcements_area, bulletins_area, programs_area] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);

    let announcements = agg
        .announcements
        .iter()
        .map(|a| {
            let date = a.date.as_deref().map(format::api_date).unwrap_or_default();
            titled_item(&a.title, &date)
        })
        .collect();
    draw_card(" Pengumuman ", announcements, "No announcements yet", frame, announcements_area);

    let bulletins = agg
        .bulletins
        .iter()
        .map(|b| {
            let date = b.date.as_deref().map(format::api_date).unwrap_or_default();
            titled_item(&b.title, &date)
        })
        .collect();
    draw_card(" Warta Jemaat ", bulletins, "No bulletins yet", frame, bulletins_area);

    let programs = agg
        .programs
        .iter()
        .map(|p| titled_item(&p.title, p.schedule.as_deref().unwrap_or("")))
        .collect();
    draw_card(" Program ", programs, "No programs yet", frame, programs_area);
}

fn titled_item<'a>(title: &'a str, detail: &str) -> ListItem<'a> {
    let mut lines = vec![Line::from(Span::styled(title, Style::default().fg(Color::White)))];
    if !detail.is_empty() {
        lines.push(Line::styled(detail.to_string(), Style::default().fg(MUTED)));
    }
    ListItem::new(lines)
}

fn draw_card(title: &str, items: Vec<ListItem>, empty: &str, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    if items.is_empty() {
        let placeholder = Paragraph::new(empty.to_string())
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(placeholder, area);
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

fn draw_devotional_card(devotional: Option<&Devotional>, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Renungan Hari Ini ");
    let body = match devotional {
        Some(d) => {
            let mut lines = vec![Line::styled(
                d.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(verse) = &d.verse {
                lines.push(Line::styled(verse.as_str(), Style::default().fg(ACCENT)));
            }
            lines.push(Line::from(format::truncate(&d.content, 160)));
            lines.push(Line::styled("Enter: read more", Style::default().fg(MUTED)));
            Paragraph::new(lines)
        }
        None => Paragraph::new("No devotional today").style(Style::default().fg(MUTED)),
    };
    frame.render_widget(body.wrap(Wrap { trim: true }).block(block), area);
}

fn draw_finance(agg: &AggregateResult, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Keuangan ");
    let body = match &agg.finance_summary {
        Some(f) => Paragraph::new(vec![
            money_line("Saldo", f.balance, Color::White),
            money_line("Pemasukan", f.total_income, Color::Green),
            money_line("Pengeluaran", f.total_expense, Color::Red),
        ]),
        None => Paragraph::new("Finance summary unavailable").style(Style::default().fg(MUTED)),
    };
    frame.render_widget(body.block(block), area);
}

fn money_line(label: &str, amount: f64, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<12}")),
        Span::styled(format::rupiah(amount), Style::default().fg(color)),
    ])
}

fn draw_history(app: &mut App, frame: &mut Frame, area: Rect) {
    let entries = &app.home.page.history.entries;
    let block = Block::default().borders(Borders::ALL).title(" Sejarah ");
    if entries.is_empty() {
        let placeholder = Paragraph::new("No history entries yet")
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<20}", format::api_date(&entry.tanggal_peristiwa)),
                    Style::default().fg(MUTED),
                ),
                Span::styled(entry.judul.as_str(), Style::default().fg(Color::White)),
            ];
            if let Some(desc) = &entry.deskripsi {
                spans.push(Span::styled(
                    format!("  {}", format::truncate(desc, 60)),
                    Style::default().fg(MUTED),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.history_state);
}

// ---------------------------------------------------------------------------
// Devotional detail page
// ---------------------------------------------------------------------------

fn draw_devotional_page(view: &DevotionalView, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Renungan ");
    let body = match view {
        DevotionalView::Loading { id } => {
            Paragraph::new(format!("Loading devotional #{id}…")).style(Style::default().fg(ACCENT))
        }
        DevotionalView::Failed { id, message } => Paragraph::new(vec![
            Line::styled(
                format!("Could not load devotional #{id}"),
                Style::default().fg(Color::Red),
            ),
            Line::from(message.as_str()),
            Line::styled("r: retry  Esc: back", Style::default().fg(MUTED)),
        ]),
        DevotionalView::Loaded(d) => {
            let mut lines = vec![Line::styled(
                d.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            let mut meta = Vec::new();
            if let Some(date) = &d.date {
                meta.push(format::api_date(date));
            }
            if let Some(author) = &d.author {
                meta.push(author.clone());
            }
            if !meta.is_empty() {
                lines.push(Line::styled(meta.join(" · "), Style::default().fg(MUTED)));
            }
            if let Some(verse) = &d.verse {
                lines.push(Line::styled(verse.as_str(), Style::default().fg(ACCENT)));
            }
            lines.push(Line::raw(""));
            lines.extend(d.content.lines().map(Line::raw));
            Paragraph::new(lines)
        }
    };
    frame.render_widget(body.wrap(Wrap { trim: false }).block(block), area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.screen {
        Screen::Home => "q: quit  ←/→: slides  ↑/↓: history  Enter: devotional  r: reload",
        Screen::Devotional(_) => "q: quit  Esc: back  r: refresh",
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(ACCENT)),
        Span::raw("  "),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
