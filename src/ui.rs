use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Padding, Paragraph, Row, Table, TableState},
};

use crate::domain::{HELP_TEXT, TableConfig};
use crate::format::format_cell;
use crate::model::Model;
use crate::record::{Client, Column, Status};

pub const TABLE_HEADER_HEIGHT: u16 = 2;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const SELECTION_MARKER_WIDTH: u16 = 2;

const FILTER_PLACEHOLDER: &str = "Filter";

#[derive(Debug)]
pub struct TableUI {
    state: TableState,
    max_column_width: usize,
}

/// Badge color of a status cell.
pub fn badge_style(status: Status) -> Style {
    let color = match status {
        Status::Pending => Color::Yellow,
        Status::Success => Color::Green,
        Status::Error => Color::Red,
    };
    Style::default().fg(Color::Black).bg(color)
}

impl TableUI {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            state: TableState::default(),
            max_column_width: config.max_column_width,
        }
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let [table_area, status_area] = Layout::vertical([
            Constraint::Min(TABLE_HEADER_HEIGHT + 1),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        self.draw_table(model, frame, table_area);
        Self::draw_statusline(model, frame, status_area);

        if model.show_help() {
            Self::draw_help(frame);
        }
    }

    fn column_widths(&self, model: &Model) -> Vec<Constraint> {
        Column::ALL
            .iter()
            .map(|&column| {
                let content = model
                    .table()
                    .visible_rows()
                    .iter()
                    .map(|c| format_cell(column, c).chars().count())
                    .max()
                    .unwrap_or(0);
                let filter = model
                    .table()
                    .filter(column)
                    .map(|f| f.label().chars().count())
                    .unwrap_or(FILTER_PLACEHOLDER.len());
                // Status badges are padded by one space on each side.
                let badge = if column == Column::Status { 2 } else { 0 };
                let width = (content + badge)
                    .max(filter)
                    .max(column.title().len() + 2)
                    .min(self.max_column_width);
                Constraint::Length(width as u16)
            })
            .collect()
    }

    fn header_rows(model: &Model) -> Vec<Row<'static>> {
        let sort = model.sort_state();
        let titles = Column::ALL.iter().map(|&column| {
            let mut title = column.title().to_string();
            if let Some(state) = sort.filter(|s| s.column == column) {
                title = format!("{title} {}", state.direction.arrow());
            }
            let cell = Cell::from(title).bold();
            if column == model.cursor_column() {
                cell.underlined()
            } else {
                cell
            }
        });
        let filters = Column::ALL.iter().map(|&column| match model.table().filter(column) {
            Some(f) => Cell::from(f.label().to_string()).fg(Color::Cyan),
            None => Cell::from(FILTER_PLACEHOLDER).fg(Color::DarkGray).italic(),
        });
        vec![Row::new(titles), Row::new(filters)]
    }

    fn body_row<'a>(model: &Model, client: &'a Client) -> Row<'a> {
        let cells = Column::ALL.iter().map(|&column| {
            let text = format_cell(column, client);
            match column {
                Column::Status => Cell::from(Line::from(Span::styled(
                    format!(" {text} "),
                    badge_style(client.status),
                ))),
                Column::Amount => Cell::from(Line::from(text).right_aligned()),
                _ => Cell::from(text),
            }
        });
        let row = Row::new(cells);
        if model.is_selected(client.id) {
            row.style(Style::default().add_modifier(Modifier::BOLD).fg(Color::LightBlue))
        } else {
            row
        }
    }

    fn draw_table(&mut self, model: &Model, frame: &mut Frame, area: Rect) {
        let [header, body] =
            Layout::vertical([Constraint::Length(TABLE_HEADER_HEIGHT), Constraint::Min(0)])
                .areas(area);
        let widths = self.column_widths(model);

        let header_table = Table::new(Self::header_rows(model), widths.clone())
            .column_spacing(1)
            .block(Block::new().padding(Padding::left(SELECTION_MARKER_WIDTH)));
        frame.render_widget(header_table, header);

        let visible = model.table().visible_rows();
        let rows: Vec<Row> = visible.iter().map(|c| Self::body_row(model, c)).collect();
        let table = Table::new(rows, widths)
            .column_spacing(1)
            .highlight_symbol("> ")
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        self.state.select((!visible.is_empty()).then_some(model.cursor_row()));
        frame.render_stateful_widget(table, body, &mut self.state);
    }

    fn draw_statusline(model: &Model, frame: &mut Frame, area: Rect) {
        if let Some((label, input)) = model.prompt() {
            let line = Line::from(vec![
                Span::from(label.clone()).yellow().bold(),
                Span::from(input.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let cursor_x = area.x + (label.chars().count() + input.cursor_pos) as u16;
            frame.set_cursor_position(Position::new(cursor_x.min(area.right().saturating_sub(1)), area.y));
            return;
        }

        let table = model.table();
        let mut spans = vec![
            Span::from(format!(" {}/{} ", table.visible_len(), table.total_len())).black().on_white(),
            " ".into(),
        ];
        if table.has_filters() {
            spans.push(Span::from(format!("{} filters ", table.active_filters())).cyan());
        }
        if model.selected_count() > 0 {
            spans.push(Span::from(format!("{} selected ", model.selected_count())).light_blue());
        }
        if let Some(state) = model.sort_state() {
            spans.push(
                Span::from(format!("sort {} {} ", state.column.title(), state.direction.arrow()))
                    .magenta(),
            );
        }
        match model.status_message() {
            Some(message) => spans.push(Span::from(message.to_string())),
            None => spans.push("? help".dark_gray()),
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_help(frame: &mut Frame) {
        let area = popup_area(frame.area(), 60, 16);
        let block = Block::bordered().title(Line::from(" Card list ".bold()).centered());
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(Text::from(HELP_TEXT)).block(block), area);
    }
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_clients;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(model: &Model) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        let mut ui = TableUI::new(&TableConfig::default());
        terminal.draw(|f| ui.draw(model, f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_formatted_cells() {
        let model = Model::init(&TableConfig::default(), default_clients().unwrap());
        let screen = render(&model);
        assert!(screen.contains("Client"));
        assert!(screen.contains("Filter"));
        assert!(screen.contains("$47,427.00"));
        assert!(screen.contains("5/9/2019"));
        assert!(screen.contains("Success"));
        assert!(screen.contains("9/9"));
    }

    #[test]
    fn badge_colors() {
        assert_eq!(badge_style(Status::Error).bg, Some(Color::Red));
        assert_eq!(badge_style(Status::Success).bg, Some(Color::Green));
        assert_eq!(badge_style(Status::Pending).bg, Some(Color::Yellow));
    }
}
