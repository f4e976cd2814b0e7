use crate::app::{App, ExplorerTarget, Screen};
use crate::queue::is_video_file;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::path::PathBuf;

pub fn render_explorer(f: &mut Frame, app: &mut App) {
    let target = match app.current_screen {
        Screen::FileExplorer { target } => target,
        _ => ExplorerTarget::AddFiles,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .margin(1)
        .split(f.area());

    // Current path
    let path_text = app.current_dir.to_string_lossy();
    let path = Paragraph::new(path_text.as_ref())
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Current Directory "),
        );
    f.render_widget(path, chunks[0]);

    // File list
    let items: Vec<ListItem> = app
        .dir_entries
        .iter()
        .enumerate()
        .map(|(i, path)| {
            create_entry_item(
                path,
                i,
                app.explorer_index,
                target,
                app.marked_files.contains(path),
            )
        })
        .collect();

    let title = match target {
        ExplorerTarget::AddFiles => " Add Video Files ",
        ExplorerTarget::OutputDir => " Select Output Directory ",
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, chunks[1], &mut app.explorer_list_state);

    // Help
    let help_text = match target {
        ExplorerTarget::AddFiles => Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" Mark  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Open/Queue  "),
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw(" Queue marked  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Back"),
        ]),
        ExplorerTarget::OutputDir => Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Open folder  "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" Select folder  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Back"),
        ]),
    };

    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(help, chunks[2]);
}

fn create_entry_item(
    path: &PathBuf,
    index: usize,
    selected: usize,
    target: ExplorerTarget,
    is_marked: bool,
) -> ListItem<'static> {
    let is_selected = index == selected;
    let is_parent = path == &PathBuf::from("..");
    let is_dir = path.is_dir() || is_parent;
    let is_video = is_video_file(path);

    let name = if is_parent {
        "..".to_string()
    } else {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string())
    };

    let (icon, color) = if is_parent {
        ("↑ ", Color::Yellow)
    } else if is_dir {
        ("▶ ", Color::Blue)
    } else if is_video {
        ("▷ ", Color::Green)
    } else {
        ("  ", Color::White)
    };

    let style = if is_selected {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };

    // Dim non-selectable items in output-dir mode
    let style = match target {
        ExplorerTarget::OutputDir if is_video => style.add_modifier(Modifier::DIM),
        _ => style,
    };

    // Checkbox for multi-select in add-files mode
    let checkbox = match target {
        ExplorerTarget::AddFiles if is_video && !is_parent => {
            if is_marked {
                "[x] "
            } else {
                "[ ] "
            }
        }
        _ => "",
    };

    let prefix = if is_selected { "> " } else { "  " };
    ListItem::new(format!("{}{}{}{}", prefix, icon, checkbox, name)).style(style)
}
