use crate::app::App;
use crate::queue::{ConversionJob, JobStatus};
use crate::utils::{format_duration, format_file_size};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

pub fn render_home(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(f.area());

    // Title with batch summary
    let title_text = if app.batch.total > 0 {
        format!(
            "Batch HEVC to MP4 Converter ({}/{})",
            app.batch.completed_count, app.batch.total
        )
    } else {
        "Batch HEVC to MP4 Converter".to_string()
    };
    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(title, chunks[0]);

    // Job list
    let items: Vec<ListItem> = app
        .jobs
        .iter()
        .map(|job| create_job_item(job, app.marked_jobs.contains(&job.path)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Selected Files "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, chunks[1], &mut app.job_list_state);

    // Output directory and quality
    let settings = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(22)])
        .split(chunks[2]);

    let output_text = app
        .output_dir
        .as_ref()
        .map(|d| d.to_string_lossy().to_string())
        .unwrap_or_else(|| "(not set)".to_string());
    let output = Paragraph::new(output_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Output Directory "),
        );
    f.render_widget(output, settings[0]);

    let quality = Paragraph::new(format!("{}", app.crf))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Quality (CRF) "),
        );
    f.render_widget(quality, settings[1]);

    // Overall progress, counted in whole files
    let percent = (app.batch.ratio() * 100.0) as u16;
    let elapsed_str = app
        .batch
        .elapsed_time()
        .map(format_duration)
        .unwrap_or_else(|| "--:--".to_string());
    let label = format!(
        "{}/{} files  |  Elapsed: {}",
        app.batch.completed_count, app.batch.total, elapsed_str
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Overall Progress "),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .percent(percent)
        .label(label);
    f.render_widget(gauge, chunks[3]);

    // Status line
    let status = Paragraph::new(app.message.as_deref().unwrap_or("Ready"))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Status "),
        );
    f.render_widget(status, chunks[4]);

    // Help
    let help_text = if app.converting_active {
        Line::from(vec![Span::styled(
            "Converting...",
            Style::default().fg(Color::Cyan),
        )])
    } else {
        Line::from(vec![
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw(" Add  "),
            Span::styled("d", Style::default().fg(Color::Yellow)),
            Span::raw(" Remove  "),
            Span::styled("c", Style::default().fg(Color::Yellow)),
            Span::raw(" Clear  "),
            Span::styled("o", Style::default().fg(Color::Yellow)),
            Span::raw(" Output dir  "),
            Span::styled("←→", Style::default().fg(Color::Yellow)),
            Span::raw(" Quality  "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" Mark  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Convert  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit"),
        ])
    };

    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(help, chunks[5]);
}

fn create_job_item(job: &ConversionJob, is_marked: bool) -> ListItem<'static> {
    let name = job.filename();
    let size = job
        .source_size
        .map(format_file_size)
        .unwrap_or_else(|| "?".to_string());
    let mark = if is_marked { "* " } else { "  " };

    match &job.status {
        JobStatus::Pending => ListItem::new(format!("{}○ {} ({}) Pending", mark, name, size))
            .style(Style::default().fg(Color::DarkGray)),
        JobStatus::Converting => ListItem::new(format!("{}▶ {} ({}) Converting", mark, name, size))
            .style(Style::default().fg(Color::Cyan)),
        JobStatus::Completed => ListItem::new(format!("{}✓ {} ({}) Completed", mark, name, size))
            .style(Style::default().fg(Color::Green)),
        JobStatus::Failed { message } => {
            ListItem::new(format!("{}✗ {} Failed: {}", mark, name, message))
                .style(Style::default().fg(Color::Red))
        }
    }
}
