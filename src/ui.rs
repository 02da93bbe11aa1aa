pub mod labels;

use klear::{BoardSize, Node, Position};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const POINTS_FIELD_WIDTH: usize = 6;

/// Board units covered by one terminal column
pub const COLUMN_UNITS: f64 = 10.0;
/// Board units covered by one terminal row
pub const ROW_UNITS: f64 = 20.0;

struct Areas {
    title: Rect,
    controls: Rect,
    buttons: Rect,
    status: Rect,
    board: Rect,
    next: Rect,
    help: Rect,
}

fn areas(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Points and time
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Board
            Constraint::Length(1), // Next
            Constraint::Length(1), // Help
        ])
        .split(area);

    Areas {
        title: chunks[0],
        controls: chunks[1],
        buttons: chunks[2],
        status: chunks[3],
        board: chunks[4],
        next: chunks[5],
        help: chunks[6],
    }
}

fn board_block() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

/// Inner board rectangle for a full terminal area
pub fn board_rect(area: Rect) -> Rect {
    board_block().inner(areas(area).board)
}

pub fn board_size(board: Rect) -> BoardSize {
    BoardSize::new(
        board.width as f64 * COLUMN_UNITS,
        board.height as f64 * ROW_UNITS,
    )
}

/// Centre of a terminal cell in board units, if the cell is on the board
pub fn cell_to_board(board: Rect, column: u16, row: u16) -> Option<Position> {
    if column < board.x || row < board.y || column >= board.right() || row >= board.bottom() {
        return None;
    }
    Some(Position::new(
        (column - board.x) as f64 * COLUMN_UNITS + COLUMN_UNITS / 2.0,
        (row - board.y) as f64 * ROW_UNITS + ROW_UNITS / 2.0,
    ))
}

/// First and one-past-last cell whose centre lies in `[start, start + len)`
fn covered_cells(start: f64, len: f64, unit: f64) -> (u16, u16) {
    let first = ((start - unit / 2.0) / unit).ceil().max(0.0);
    let end = ((start + len - unit / 2.0) / unit).ceil().max(first);
    (first as u16, end as u16)
}

/// Cells covered by a node's footprint, clipped to the board.
///
/// A cell belongs to the node exactly when its centre is inside the footprint,
/// the same point `cell_to_board` hands to hit testing.
pub fn node_rect(board: Rect, node: &Node, node_size: f64) -> Rect {
    let (first_column, end_column) = covered_cells(node.position.x, node_size, COLUMN_UNITS);
    let (first_row, end_row) = covered_cells(node.position.y, node_size, ROW_UNITS);

    Rect::new(
        board.x.saturating_add(first_column),
        board.y.saturating_add(first_row),
        end_column - first_column,
        end_row - first_row,
    )
    .intersection(board)
}

fn render_node(node: &Node, area: Rect, buf: &mut Buffer) {
    let style = if node.clicked {
        Style::default().fg(Color::White).bg(Color::Red)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(node.label())];
    if node.clicked {
        lines.push(Line::from(labels::countdown(node.remaining_time)));
    }

    Paragraph::new(lines)
        .style(style)
        .alignment(Alignment::Center)
        .render(area, buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.game.snapshot();
        let playing = self.game.is_playing();
        let areas = areas(area);

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let key_style = Style::default().fg(Color::Cyan).patch(bold_style);

        let (title, color) = labels::title(snapshot.phase);
        let title_style = match color {
            Some(c) => bold_style.fg(c),
            None => bold_style,
        };
        Paragraph::new(Span::styled(title, title_style))
            .alignment(Alignment::Center)
            .render(areas.title, buf);

        let (field, field_style) = if self.points_input.is_empty() {
            ("points?".to_string(), dim_style.add_modifier(Modifier::ITALIC))
        } else {
            let pad = POINTS_FIELD_WIDTH.saturating_sub(self.points_input.width());
            (
                format!("{}{}", self.points_input, " ".repeat(pad)),
                if playing {
                    dim_style
                } else {
                    bold_style.add_modifier(Modifier::UNDERLINED)
                },
            )
        };
        Paragraph::new(Line::from(vec![
            Span::raw("Points: "),
            Span::styled(field, field_style),
            Span::raw("   Times: "),
            Span::styled(labels::seconds(snapshot.elapsed_time), bold_style),
        ]))
        .render(areas.controls, buf);

        let mut buttons = vec![
            Span::styled("(s)", key_style),
            Span::raw(format!(" {}", labels::start_button(playing))),
        ];
        if playing {
            buttons.push(Span::raw("   "));
            buttons.push(Span::styled("(a)", key_style));
            buttons.push(Span::raw(format!(
                " {}",
                labels::auto_play_button(snapshot.auto_play_enabled)
            )));
        }
        Paragraph::new(Line::from(buttons)).render(areas.buttons, buf);

        if let Some(status) = &self.status {
            Paragraph::new(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Red),
            ))
            .render(areas.status, buf);
        }

        let block = board_block();
        let board = block.inner(areas.board);
        block.render(areas.board, buf);

        // later nodes are drawn on top, matching hit testing
        let node_size = self.game.config().node_size;
        for node in snapshot.nodes.iter().filter(|n| n.active) {
            let rect = node_rect(board, node, node_size);
            if !rect.is_empty() {
                render_node(node, rect, buf);
            }
        }

        if let Some(next) = labels::next_indicator(&snapshot) {
            Paragraph::new(Span::styled(next, bold_style)).render(areas.next, buf);
        }

        Paragraph::new(Span::styled(
            "click the points in order | (0-9) edit points | (esc)ape",
            dim_style.add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(areas.help, buf);
    }
}
