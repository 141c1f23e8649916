// ============================================================================
// Chart - Rendu de l'onglet graphique
// ============================================================================
// Affiche la série de la fenêtre active dans le style choisi (ligne, aire,
// chandeliers), avec le sélecteur de fenêtres, la synthèse de la fenêtre et
// le panneau volume.
//
// CONCEPTS RUST :
// 1. Option handling : gérer l'absence de données et d'annotation
// 2. Iterator chaining : transformer les lignes agrégées en points (x, y)
// 3. Slices : fenêtre visible = la fin de la série qui tient à l'écran
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne avec axes
// 2. Sparkline : barres pleines (style aire et panneau volume)
// 3. Layout : sélecteur / graphique / volume
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Sparkline},
    Frame,
};

use crate::app::{App, ChartData, ChartStyle, SectionState};
use crate::models::{AggregatedSeries, Interval, WindowAnnotation, WindowPolicy};
use crate::ui::{candlestick, table};

/// Échelle verticale du rendu Sparkline (les closes y sont normalisés)
const SPARK_SCALE: u64 = 100;

// ============================================================================
// Fonction principale de rendu de l'onglet
// ============================================================================

/// Dessine l'onglet Chart : sélecteur, graphique, volume
pub fn render_chart_tab(frame: &mut Frame, app: &App, area: Rect) {
    // Pas de panneau volume sur des barres mensuelles (fenêtre "max")
    let show_volume = app
        .current_policy()
        .map(|p| p.interval != Interval::Mo1)
        .unwrap_or(true);

    let mut constraints = vec![
        Constraint::Length(4), // Sélecteur de fenêtres + synthèse
        Constraint::Min(8),    // Graphique
    ];
    if show_volume {
        constraints.push(Constraint::Length(6)); // Volume
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec();

    render_selector(frame, app, chunks[0]);

    match &app.chart {
        SectionState::Loading => table::render_loading(frame, chunks[1], "Chart"),
        SectionState::Unavailable(message) => {
            table::render_unavailable(frame, chunks[1], "Chart", message)
        }
        SectionState::Ready(data) => {
            if data.series.is_empty() {
                render_no_data(frame, chunks[1], "Pas de données à afficher");
            } else {
                match app.chart_style {
                    ChartStyle::Line => render_line(frame, app, data, chunks[1]),
                    ChartStyle::Area => render_area(frame, app, data, chunks[1]),
                    ChartStyle::Candlestick => candlestick::render_candles(
                        frame,
                        &data.series,
                        app.current_policy(),
                        chunks[1],
                    ),
                }
            }
        }
    }

    if show_volume {
        render_volume(frame, app.chart.ready().map(|data| &data.series), chunks[2]);
    }
}

/// Aperçu compact de la fenêtre courante, affiché en bas de l'onglet Summary
pub fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let data = match &app.chart {
        SectionState::Loading => {
            table::render_loading(frame, area, "Chart");
            return;
        }
        SectionState::Unavailable(message) => {
            table::render_unavailable(frame, area, "Chart", message);
            return;
        }
        SectionState::Ready(data) => data,
    };
    if data.series.is_empty() {
        table::render_unavailable(frame, area, "Chart", "Pas de données à afficher");
        return;
    }

    let series = &data.series;
    let width = area.width.saturating_sub(2) as usize;
    let start = series.len().saturating_sub(width.max(1));
    let visible = &series.rows[start..];

    let (min_close, max_close) = visible.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), row| (min.min(row.close), max.max(row.close)),
    );
    let scaled: Vec<u64> = visible
        .iter()
        .map(|row| scale_close(row.close, min_close, max_close))
        .collect();

    let window_label = app
        .current_policy()
        .map(|p| p.window.label())
        .unwrap_or("?");
    let title = format!("{} · {}", app.symbol, window_label);
    let sparkline = Sparkline::default()
        .block(table::titled_block(&title))
        .data(&scaled)
        .max(SPARK_SCALE)
        .style(Style::default().fg(trend_color(data)));

    frame.render_widget(sparkline, area);
}

// ============================================================================
// Sélecteur de fenêtres et synthèse
// ============================================================================

/// Ligne 1 : fenêtres disponibles + style actif. Ligne 2 : synthèse.
fn render_selector(frame: &mut Frame, app: &App, area: Rect) {
    let mut window_spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, policy) in app.windows().iter().enumerate() {
        let style = if i == app.window_index {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        window_spans.push(Span::styled(policy.window.label(), style));
        window_spans.push(Span::raw("  "));
    }
    window_spans.push(Span::raw("│  "));
    window_spans.push(Span::styled(
        format!("Style: {}", app.chart_style.label()),
        Style::default().fg(Color::Cyan),
    ));

    let annotation_line = match &app.chart {
        SectionState::Ready(data) => match data.annotation {
            Some(a) => summary_line(app, &a),
            None => Line::from(""),
        },
        _ => Line::from(""),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(vec![Line::from(window_spans), annotation_line]).block(block);
    frame.render_widget(paragraph, area);
}

/// Synthèse de la fenêtre : variation, plus bas et plus haut
fn summary_line(app: &App, a: &WindowAnnotation) -> Line<'static> {
    let window_label = app
        .current_policy()
        .map(|p| p.window.label())
        .unwrap_or("");
    let trend_color = if a.percent_change_over_window >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };

    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("({}) {} {:.2}", window_label, app.symbol, a.most_recent_close),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {:+.2}%", a.percent_change_over_window),
            Style::default().fg(trend_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("L {:.2} ({:+.2}% from low)", a.window_low, a.percent_from_low),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("H {:.2} ({:+.2}% below high)", a.window_high, a.percent_from_high),
            Style::default().fg(Color::Red),
        ),
    ])
}

// ============================================================================
// Style ligne (Chart widget)
// ============================================================================

/// Dessine le graphique ligne
///
/// CONCEPT RUST : Iterator chaining complexe
/// - .iter() : itère sur les lignes agrégées
/// - .enumerate() : ajoute l'index (axe X)
/// - .map() : transforme en points (x, y)
fn render_line(frame: &mut Frame, app: &App, data: &ChartData, area: Rect) {
    let series = &data.series;
    let points: Vec<(f64, f64)> = series
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i as f64, row.close))
        .collect();

    // Bornes sur la colonne Close uniquement (c'est elle qui est tracée)
    let (min_price, max_price) = points.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), &(_x, y)| (min.min(y), max.max(y)),
    );

    // Marge de 5% pour que le graphique respire
    let margin = (max_price - min_price) * 0.05;
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    // Repère horizontal au dernier close, tracé sous la courbe
    let latest_close = points.last().map(|&(_x, y)| y).unwrap_or_default();
    let marker_points = [
        (0.0, latest_close),
        ((points.len().saturating_sub(1)) as f64, latest_close),
    ];

    let color = trend_color(data);
    let datasets = vec![
        Dataset::default()
            .name(format!("{:.2}", latest_close))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&marker_points),
        Dataset::default()
            .name(series.symbol.as_str())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&points),
    ];

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len().saturating_sub(1)) as f64])
        .labels(tick_labels(series, app.current_policy()));

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.2}", y_min)),
            Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.2}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(table::titled_block(&chart_title(app)))
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

// ============================================================================
// Style aire (Sparkline)
// ============================================================================

/// Dessine le graphique en aire pleine
///
/// Le widget Sparkline remplit depuis le bas : on normalise les closes sur
/// [0, SPARK_SCALE] et on affiche les bornes réelles dans le titre.
fn render_area(frame: &mut Frame, app: &App, data: &ChartData, area: Rect) {
    let series = &data.series;

    // Une colonne par ligne : seule la fin de la série tient à l'écran
    let width = area.width.saturating_sub(2) as usize;
    let start = series.len().saturating_sub(width.max(1));
    let visible = &series.rows[start..];

    let (min_close, max_close) = visible.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), row| (min.min(row.close), max.max(row.close)),
    );
    let scaled: Vec<u64> = visible
        .iter()
        .map(|row| scale_close(row.close, min_close, max_close))
        .collect();

    let title = format!(
        "{}  {:.2} – {:.2}",
        chart_title(app),
        min_close,
        max_close
    );
    let sparkline = Sparkline::default()
        .block(table::titled_block(&title))
        .data(&scaled)
        .max(SPARK_SCALE)
        .style(Style::default().fg(trend_color(data)));

    frame.render_widget(sparkline, area);
}

/// Normalise un close sur l'échelle du Sparkline
fn scale_close(close: f64, min: f64, max: f64) -> u64 {
    if max <= min {
        return SPARK_SCALE / 2;
    }
    (((close - min) / (max - min)) * SPARK_SCALE as f64).round() as u64
}

// ============================================================================
// Panneau volume
// ============================================================================

/// Dessine le panneau volume (vide pendant le chargement)
fn render_volume(frame: &mut Frame, series: Option<&AggregatedSeries>, area: Rect) {
    let block = table::titled_block("Volume");

    let series = match series {
        Some(series) if !series.is_empty() => series,
        _ => {
            frame.render_widget(block, area);
            return;
        }
    };

    let width = area.width.saturating_sub(2) as usize;
    let start = series.len().saturating_sub(width.max(1));
    let volumes: Vec<u64> = series.rows[start..].iter().map(|row| row.volume).collect();

    let sparkline = Sparkline::default()
        .block(block)
        .data(&volumes)
        .style(Style::default().fg(Color::Blue));

    frame.render_widget(sparkline, area);
}

// ============================================================================
// Helpers
// ============================================================================

/// Titre du graphique : symbole + fenêtre + style
fn chart_title(app: &App) -> String {
    let window_label = app
        .current_policy()
        .map(|p| p.window.label())
        .unwrap_or("?");
    format!("{} · {} · {}", app.symbol, window_label, app.chart_style.label())
}

/// Couleur de tendance : verte si la fenêtre est en hausse
fn trend_color(data: &ChartData) -> Color {
    let positive = data
        .annotation
        .map(|a| a.percent_change_over_window >= 0.0)
        .unwrap_or(true);
    if positive {
        Color::Green
    } else {
        Color::Red
    }
}

/// Labels de l'axe temps : un point tous les `tick_stride` de la politique
///
/// Le stride est borné pour garder au moins deux labels sur une série plus
/// courte que prévu (jour férié, instrument récent).
fn tick_labels(
    series: &AggregatedSeries,
    policy: Option<&'static WindowPolicy>,
) -> Vec<Span<'static>> {
    if series.is_empty() {
        return Vec::new();
    }
    let (format, stride) = match policy {
        Some(p) => (
            p.tick_format.label,
            effective_stride(p.tick_stride, series.len()),
        ),
        None => ("%b %-d, %y", effective_stride(42, series.len())),
    };

    series
        .rows
        .iter()
        .step_by(stride)
        .map(|row| Span::raw(series.local_time(row.timestamp).format(format).to_string()))
        .collect()
}

/// Stride effectif : celui de la table, borné par la longueur de la série
pub(crate) fn effective_stride(stride: usize, len: usize) -> usize {
    stride.max(1).min(len.saturating_sub(1).max(1))
}

/// Affiche un message quand il n'y a pas de données à afficher
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_stride_keeps_two_labels() {
        // série plus courte que le stride de la table
        assert_eq!(effective_stride(45, 10), 9);
        // série assez longue : stride de la table inchangé
        assert_eq!(effective_stride(32, 195), 32);
        // cas limites
        assert_eq!(effective_stride(32, 1), 1);
        assert_eq!(effective_stride(32, 0), 1);
    }

    #[test]
    fn test_scale_close_bounds() {
        assert_eq!(scale_close(100.0, 100.0, 200.0), 0);
        assert_eq!(scale_close(200.0, 100.0, 200.0), SPARK_SCALE);
        assert_eq!(scale_close(150.0, 100.0, 200.0), SPARK_SCALE / 2);
        // série plate : mi-hauteur plutôt qu'une division par zéro
        assert_eq!(scale_close(100.0, 100.0, 100.0), SPARK_SCALE / 2);
    }
}
