use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};
use crate::curation::{FeedPhase, FeedRequest, ReadingListItem};
use crate::models::{find_category, Rgb, Sentiment};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    match app.screen {
        Screen::Login | Screen::SignUp | Screen::Profile => render_form(frame, app, chunks[0]),
        Screen::Onboarding => render_onboarding(frame, app, chunks[0]),
        Screen::Home => render_home(frame, app, chunks[0]),
        Screen::Article => render_article(frame, app, chunks[0]),
    }

    render_status(frame, app, chunks[1]);

    if app.show_help {
        render_help(frame);
    }
}

fn chip_color(name: &str) -> Color {
    find_category(name)
        .map(|c| rgb(c.color))
        .unwrap_or(Color::Gray)
}

fn rgb(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let area = centered_rect(60, 80, area);

    let block = Block::default()
        .title(form.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(Span::styled(field.label, label_style)));
        lines.push(Line::from(format!("  {}{cursor}", field.display())));
        lines.push(Line::from(""));
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
        lines.push(Line::from(""));
    }

    let hint = match app.screen {
        Screen::Login => "Enter: login  Tab: next field  Ctrl+N: sign up  Esc: quit",
        Screen::SignUp => "Enter: sign up  Tab: next field  Ctrl+N/Esc: back to login",
        _ => "Enter: save  Tab: next field  Ctrl+X: logout  Esc: back",
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_onboarding(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title
            Constraint::Min(0),    // Catalog
            Constraint::Length(1), // Hint
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Select Your Favorite Categories",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Browse the topics you're interested in"),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = app
        .selector
        .catalog()
        .iter()
        .map(|category| {
            let color = rgb(category.color);
            let line = if app.selector.is_selected(category.name) {
                Line::from(Span::styled(
                    format!(" [x] {} ", category.name),
                    Style::default().fg(Color::White).bg(color),
                ))
            } else {
                Line::from(Span::styled(
                    format!(" [ ] {} ", category.name),
                    Style::default().fg(color),
                ))
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.catalog_index));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    let hint = format!(
        "space: toggle  j/k: move  c: continue ({} selected)",
        app.selector.selection().len()
    );
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let curator = &app.curator;
    let continue_reading = curator.continue_reading();
    let recommended = curator.recommended();

    let mut constraints = vec![
        Constraint::Length(3), // Search bar
        Constraint::Length(3), // Category chips
        Constraint::Min(0),    // Article list
    ];
    if !continue_reading.is_empty() {
        constraints.push(Constraint::Length(continue_reading.len() as u16 + 2));
    }
    if !recommended.is_empty() {
        constraints.push(Constraint::Length(recommended.len() as u16 + 2));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_search_bar(frame, app, chunks[0]);
    render_chips(frame, app, chunks[1]);
    render_article_list(frame, app, chunks[2]);

    let mut next = 3;
    if !continue_reading.is_empty() {
        render_reading_list(frame, " Continue Reading ", continue_reading, chunks[next]);
        next += 1;
    }
    if !recommended.is_empty() {
        render_reading_list(frame, " Recommended Articles ", recommended, chunks[next]);
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let user = app
        .session
        .as_ref()
        .map(|s| s.user.display_name())
        .unwrap_or_default();

    let (text, style) = if app.search_active {
        (format!("{}_", app.search_input), Style::default().fg(Color::White))
    } else if app.search_input.is_empty() {
        (
            "Search for articles... (press /)".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.search_input.clone(), Style::default().fg(Color::Gray))
    };

    let block = Block::default()
        .title(" NewsPalette ")
        .title_bottom(Line::from(format!(" {user} ")).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_chips(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.curator.selected_category();
    let searching = matches!(app.curator.active_request(), Some(FeedRequest::Search(_)));

    let mut spans = Vec::new();
    for category in app.curator.categories().iter() {
        let color = chip_color(category);
        let style = if !searching && selected == Some(category) {
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        spans.push(Span::styled(format!(" {category} "), style));
        spans.push(Span::raw(" "));
    }
    if spans.is_empty() {
        spans.push(Span::styled("No categories followed", Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default().title(" Categories (h/l) ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_article_list(frame: &mut Frame, app: &App, area: Rect) {
    let curator = &app.curator;
    let title = curator
        .active_request()
        .map(|r| format!(" {} ", r.label()))
        .unwrap_or_else(|| " Articles ".to_string());
    let block = Block::default().title(title).borders(Borders::ALL);

    let nothing_to_show = curator.phase() == FeedPhase::Loading && curator.articles().is_empty();
    if nothing_to_show || curator.phase() == FeedPhase::ResolvingPreferences {
        let loading = Paragraph::new(format!("{} Loading...", app.spinner()))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = curator
        .articles()
        .iter()
        .map(|article| {
            let date = article
                .published_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();

            let mut lines = vec![Line::from(Span::styled(
                article.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))];
            if let Some(description) = &article.description {
                lines.push(Line::from(Span::styled(
                    description.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("Published At: {date}"),
                Style::default().fg(Color::DarkGray),
            )));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_reading_list(frame: &mut Frame, title: &str, items: &[ReadingListItem], area: Rect) {
    let items: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(Span::styled(item.title.clone(), Style::default().fg(Color::Blue))))
        .collect();

    let list = List::new(items).block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_article(frame: &mut Frame, app: &App, area: Rect) {
    let Some(article) = &app.current_article else {
        return;
    };

    let block = Block::default()
        .title(" Article ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(1).max(20) as usize;
    let mut lines = Vec::new();

    for line in textwrap::wrap(&article.title, width) {
        lines.push(Line::from(Span::styled(
            line.into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));

    let date = article
        .published_at
        .map(|d| d.to_rfc2822())
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(Line::from(Span::styled(
        format!("Published At: {date}"),
        Style::default().fg(Color::DarkGray),
    )));
    if let Some(image) = &article.image_url {
        lines.push(Line::from(Span::styled(
            format!("Image: {image}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    if let Some(description) = &article.description {
        for line in textwrap::wrap(description, width) {
            lines.push(Line::from(line.into_owned()));
        }
        lines.push(Line::from(""));
    }

    if let Some(sentiment) = article.sentiment {
        let color = match sentiment {
            Sentiment::Positive => Color::Green,
            Sentiment::Negative => Color::Red,
            Sentiment::Neutral => Color::Gray,
        };
        lines.push(Line::from(vec![
            Span::raw("Sentiment: "),
            Span::styled(sentiment.label(), Style::default().fg(color)),
        ]));
    }

    lines.push(Line::from(Span::styled(
        article.url().to_string(),
        Style::default().fg(Color::Blue),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "o/Enter: read more in browser  Esc: back",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status {
        Some(status) => (status.clone(), Style::default().fg(Color::Yellow)),
        None if app.screen == Screen::Home => {
            let state = match app.curator.phase() {
                FeedPhase::Loading | FeedPhase::ResolvingPreferences => format!("{} Loading", app.spinner()),
                FeedPhase::Errored => "Failed to load (r: retry)".to_string(),
                _ => format!("{} Stories", app.curator.articles().len()),
            };
            (
                format!("{state} | j/k:nav  h/l:category  /:search  Enter:open  p:profile  ?:help  q:quit"),
                Style::default().fg(Color::DarkGray),
            )
        }
        None => (String::new(), Style::default()),
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Feed:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   h / l    Previous / next category",
        "   /        Search articles",
        "   Enter    Open article",
        "   r        Retry last request",
        "   p        Edit profile",
        "",
        " Article:",
        "   o        Open in browser",
        "   Esc      Back to feed",
        "",
        " Onboarding:",
        "   space    Toggle category",
        "   c        Continue",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
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
