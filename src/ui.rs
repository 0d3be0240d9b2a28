use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::messages::ui_events::InputMode;
use crate::messages::{FeedView, RenderState, View};
use crate::models::Comment;

const TAGLINE: &str = "View comments on the blockchain and add your own";

// ============================================================================
// UI Drawing Functions
// ============================================================================

pub fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, main_chunks[0]);

    match &state.view {
        View::Connect => draw_connect_view(f, state, main_chunks[1]),
        View::Feed(feed) => draw_feed_view(f, feed, state.input_mode, Utc::now(), main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
            Span::styled(format!(" v{}", APP_VERSION), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(format!(" {}", TAGLINE), Style::default().fg(Color::Gray))),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_connect_view(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 40, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Connect to Wallet",
            Style::default().fg(Color::Cyan).bold(),
        ))
        .centered(),
        Line::from(""),
        Line::from("Press 'c' or Enter to connect").centered(),
    ];

    if let Some(notice) = &state.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow))).centered());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Wallet ");

    let prompt = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(prompt, popup_area);
}

fn draw_feed_view(f: &mut Frame, feed: &FeedView, input_mode: InputMode, now: DateTime<Utc>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Wallet address
            Constraint::Length(3), // Draft input
            Constraint::Min(3),    // Comments
        ])
        .split(area);

    let address = Line::from(vec![
        Span::styled(" Wallet: ", Style::default().fg(Color::DarkGray)),
        Span::styled(feed.address.as_str(), Style::default().fg(Color::Green)),
    ]);
    f.render_widget(Paragraph::new(address), chunks[0]);

    draw_draft_input(f, feed, input_mode, chunks[1]);
    draw_comments(f, feed, now, chunks[2]);
}

fn draw_draft_input(f: &mut Frame, feed: &FeedView, input_mode: InputMode, area: Rect) {
    let editing = input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let sending = if feed.is_submitting { " [sending...]" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Add a comment (e=edit, s=submit){} ", sending));

    let content = if feed.draft.is_empty() && !editing {
        Paragraph::new(Span::styled("Add a comment", Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(feed.draft.as_str())
    };
    f.render_widget(content.block(block), area);

    // Cursor
    if editing {
        let column = feed.draft[..feed.cursor_position.min(feed.draft.len())].chars().count() as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + column + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_comments(f: &mut Frame, feed: &FeedView, now: DateTime<Utc>, area: Rect) {
    let loading = if feed.is_loading { " [...]" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Comments ({}){} ", feed.comments.len(), loading));

    let mut lines: Vec<Line> = Vec::new();
    for comment in &feed.comments {
        lines.extend(comment_lines(comment, now));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No comments yet. Be the first!",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let comments = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((feed.feed_scroll, 0));
    f.render_widget(comments, area);
}

/// Text, age and author of one comment, followed by a spacer
fn comment_lines(comment: &Comment, now: DateTime<Utc>) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(comment.text.clone(), Style::default().bold())),
        Line::from(vec![
            Span::styled(comment.age(now), Style::default().fg(Color::Cyan)),
            Span::styled(" by ", Style::default().fg(Color::DarkGray)),
            Span::styled(comment.author.to_string(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(""),
    ]
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match &state.view {
        View::Connect => String::from(" c:connect | ?:help | q:quit "),
        View::Feed(feed) if feed.is_submitting => String::from(" Submitting... "),
        View::Feed(feed) if feed.is_loading => String::from(" Loading comments... "),
        View::Feed(_) if state.input_mode == InputMode::Editing => {
            String::from(" ESC:stop editing | Enter:submit | arrows:move ")
        }
        View::Feed(feed) => match &feed.last_signature {
            Some(sig) => format!(" e:edit | s:submit | ↑/↓:scroll | ?:help | q:quit | last tx {} ", sig),
            None => String::from(" e:edit | s:submit | ↑/↓:scroll | ?:help | q:quit "),
        },
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 SOLANA GUESTBOOK - Keyboard Shortcuts

 WALLET
   c / Enter          Connect wallet

 COMMENTS
   e / i              Edit comment
   s / Enter          Submit comment
   ↑ / ↓  (k / j)     Scroll comments

 EDITING
   ← / →              Move cursor
   Backspace          Delete character
   Esc                Stop editing

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
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
