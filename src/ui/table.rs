// ============================================================================
// Table - Briques de rendu partagées par les onglets
// ============================================================================
// Les onglets fondamentaux affichent tous la même chose : des sections
// label/valeur sous un titre. Ce module centralise ce vocabulaire, plus les
// états Loading / Unavailable communs à toutes les sections.
//
// CONCEPTS RATATUI :
// 1. Table : widget à colonnes avec contraintes de largeur
// 2. Row et Cell : une ligne stylée cellule par cellule
// 3. Block : bordures et titre partagés par tous les panneaux
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

/// Bloc bordé avec titre, style commun à tous les panneaux du dashboard
pub fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {title} "))
}

/// Table deux colonnes label/valeur d'une section d'attributs
///
/// Une section vide (tous les champs absents du snapshot) affiche un
/// message plutôt qu'un cadre vide.
pub fn render_pairs(frame: &mut Frame, area: Rect, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        render_unavailable(frame, area, title, "No data available");
        return;
    }

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(label.as_str()).style(Style::default().fg(Color::Gray)),
                Cell::from(value.as_str()).style(Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [Constraint::Percentage(58), Constraint::Percentage(42)],
    )
    .column_spacing(1)
    .block(titled_block(title));

    frame.render_widget(table, area);
}

/// Ligne d'en-tête d'une table à colonnes
pub fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells: Vec<Cell> = titles
        .iter()
        .map(|t| {
            Cell::from(*t).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    Row::new(cells).bottom_margin(1)
}

/// Indicateur d'une section en cours de chargement
pub fn render_loading(frame: &mut Frame, area: Rect, title: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⏳ Loading...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(titled_block(title))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Section indisponible, avec la raison renvoyée par le worker
pub fn render_unavailable(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
    ];

    let paragraph = Paragraph::new(text)
        .block(titled_block(title))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
