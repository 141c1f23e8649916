// ============================================================================
// Candlestick Chart - Rendu texte ligne par ligne
// ============================================================================
// Implémentation inspirée de cli-candlestick-chart mais intégrée à ratatui
// Utilise des caractères Unicode pour dessiner les chandeliers japonais
//
// ALGORITHME :
// - Rendu vertical : ligne par ligne de haut en bas
// - Pour chaque ligne, on détermine quel caractère Unicode afficher
// - Logique des 3 zones : mèche supérieure, corps, mèche inférieure
// - Seuils fractionnaires (0.25, 0.75) pour précision sub-caractère
//
// CARACTÈRES UNICODE :
// ┃ Corps plein          │ Mèche pleine
// ╻ Demi-corps (bas)     ╹ Demi-corps (haut)
// ╽ Transition top       ╿ Transition bottom
// ╷ Demi-mèche sup       ╵ Demi-mèche inf
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{AggregatedRow, AggregatedSeries, WindowPolicy};
use crate::ui::chart::effective_stride;

// ============================================================================
// Constantes
// ============================================================================

/// Caractères Unicode pour le rendu des chandeliers
const UNICODE_VOID: char = ' ';
const UNICODE_BODY: char = '┃'; // Corps plein
const UNICODE_HALF_BODY_BOTTOM: char = '╻'; // Corps avec espace en bas
const UNICODE_HALF_BODY_TOP: char = '╹'; // Corps avec espace en haut
const UNICODE_WICK: char = '│'; // Mèche pleine
const UNICODE_TOP: char = '╽'; // Transition corps→mèche (haut)
const UNICODE_BOTTOM: char = '╿'; // Transition corps→mèche (bas)
const UNICODE_UPPER_WICK: char = '╷'; // Demi-mèche supérieure
const UNICODE_LOWER_WICK: char = '╵'; // Demi-mèche inférieure

/// Couleurs pour chandeliers haussiers et baissiers
const BULLISH_COLOR: Color = Color::Rgb(52, 208, 88); // Vert
const BEARISH_COLOR: Color = Color::Rgb(234, 74, 90); // Rouge

/// Largeur de l'axe Y (pour les prix)
const Y_AXIS_WIDTH: u16 = 12;

/// Constantes pour le design réactif
/// CONCEPT : Responsive terminal design
/// - MIN_TERMINAL_WIDTH : largeur minimale absolue pour afficher le graphique
/// - ADAPTIVE_Y_AXIS_THRESHOLD : en dessous, on réduit la largeur de l'axe Y
/// - NARROW_Y_AXIS_WIDTH : largeur réduite de l'axe Y pour terminaux étroits
const MIN_TERMINAL_WIDTH: u16 = 60;
const ADAPTIVE_Y_AXIS_THRESHOLD: u16 = 80;
const NARROW_Y_AXIS_WIDTH: u16 = 8;

// ============================================================================
// Structure principale
// ============================================================================

/// Renderer de chandeliers japonais en mode texte
pub struct CandlestickRenderer<'a> {
    series: &'a AggregatedSeries,
    tick_format: &'static str,
    tick_stride: usize,
    min_price: f64,
    max_price: f64,
    height: u16,
    width: u16,
    y_axis_width: u16,
}

impl<'a> CandlestickRenderer<'a> {
    /// Crée un nouveau renderer
    ///
    /// CONCEPT : Responsive design
    /// - Adapte la largeur de l'axe Y selon la largeur du terminal
    /// - Largeur < 80 cols : axe Y réduit à 8 caractères
    /// - Largeur >= 80 cols : axe Y normal à 12 caractères
    pub fn new(
        series: &'a AggregatedSeries,
        policy: Option<&'static WindowPolicy>,
        area: Rect,
    ) -> Self {
        // Calcule les bornes de prix
        let (min_price, max_price) = Self::compute_price_bounds(&series.rows);

        // Largeur adaptative de l'axe Y selon la largeur du terminal
        let y_axis_width = if area.width < ADAPTIVE_Y_AXIS_THRESHOLD {
            NARROW_Y_AXIS_WIDTH // Mode étroit : 8 caractères
        } else {
            Y_AXIS_WIDTH // Mode normal : 12 caractères
        };

        // Format et cadence des labels temps : ceux de la fenêtre affichée
        let (tick_format, tick_stride) = match policy {
            Some(p) => (p.tick_format.label, p.tick_stride),
            None => ("%b %-d", 21),
        };

        Self {
            series,
            tick_format,
            tick_stride,
            min_price,
            max_price,
            // Réserve 2 pour les bordures + 2 pour l'axe X (ticks + labels)
            height: area.height.saturating_sub(4),
            width: area.width.saturating_sub(y_axis_width + 2),
            y_axis_width,
        }
    }

    /// Calcule les prix min et max sur tous les chandeliers
    fn compute_price_bounds(rows: &[AggregatedRow]) -> (f64, f64) {
        let max_price = rows
            .iter()
            .fold(f64::NEG_INFINITY, |max, row| max.max(row.high));

        let min_price = rows.iter().fold(f64::INFINITY, |min, row| min.min(row.low));

        // Ajoute une marge de 2%
        let margin = (max_price - min_price) * 0.02;
        ((min_price - margin).max(0.0), max_price + margin)
    }

    /// Convertit un prix en coordonnée de hauteur
    fn price_to_height(&self, price: f64) -> f64 {
        if self.max_price == self.min_price {
            return self.height as f64 / 2.0;
        }

        (price - self.min_price) / (self.max_price - self.min_price) * self.height as f64
    }

    /// Retourne la couleur du chandelier
    fn candle_color(row: &AggregatedRow) -> Color {
        if row.is_bullish() {
            BULLISH_COLOR
        } else {
            BEARISH_COLOR
        }
    }

    /// Rend un chandelier à une hauteur donnée
    ///
    /// Ceci est le cœur de l'algorithme, adapté de cli-candlestick-chart.
    /// Il détermine quel caractère Unicode afficher selon la position verticale.
    fn render_candle(&self, row: &AggregatedRow, y: u16) -> char {
        let height_unit = y as f64;

        // Convertit les prix en coordonnées de hauteur
        let high_y = self.price_to_height(row.high);
        let low_y = self.price_to_height(row.low);
        let max_y = self.price_to_height(row.open.max(row.close));
        let min_y = self.price_to_height(row.close.min(row.open));

        let mut output = UNICODE_VOID;

        // ========================================
        // ZONE 1 : Mèche supérieure (high → max)
        // ========================================
        if high_y.ceil() >= height_unit && height_unit >= max_y.floor() {
            if max_y - height_unit > 0.75 {
                // Corps s'étend significativement dans cette ligne
                output = UNICODE_BODY;
            } else if (max_y - height_unit) > 0.25 {
                // Corps partiellement présent
                if (high_y - height_unit) > 0.75 {
                    // Mèche s'étend aussi → transition
                    output = UNICODE_TOP;
                } else {
                    // Juste le corps avec espace
                    output = UNICODE_HALF_BODY_BOTTOM;
                }
            } else if (high_y - height_unit) > 0.75 {
                // Que la mèche, pleine
                output = UNICODE_WICK;
            } else if (high_y - height_unit) > 0.25 {
                // Demi-mèche
                output = UNICODE_UPPER_WICK;
            }
        }
        // ========================================
        // ZONE 2 : Corps (min → max)
        // ========================================
        else if max_y.floor() >= height_unit && height_unit >= min_y.ceil() {
            // Toujours corps plein dans la zone du corps
            output = UNICODE_BODY;
        }
        // ========================================
        // ZONE 3 : Mèche inférieure (min → low)
        // ========================================
        else if min_y.ceil() >= height_unit && height_unit >= low_y.floor() {
            if (min_y - height_unit) < 0.25 {
                // Corps encore très proche
                output = UNICODE_BODY;
            } else if (min_y - height_unit) < 0.75 {
                // Corps partiellement présent
                if (low_y - height_unit) < 0.25 {
                    // Mèche proche aussi → transition
                    output = UNICODE_BOTTOM;
                } else {
                    // Juste le corps avec espace
                    output = UNICODE_HALF_BODY_TOP;
                }
            } else if low_y - height_unit < 0.25 {
                // Que la mèche, pleine
                output = UNICODE_WICK;
            } else if low_y - height_unit < 0.75 {
                // Demi-mèche
                output = UNICODE_LOWER_WICK;
            }
        }

        output
    }

    /// Rend une ligne de l'axe Y avec le prix
    fn render_y_axis(&self, y: u16) -> String {
        // Affiche le prix tous les 4 lignes
        if y % 4 == 0 {
            let price = self.min_price
                + (y as f64 * (self.max_price - self.min_price) / self.height as f64);
            format!("{:>9.2} │ ", price)
        } else {
            format!("{:>9} │ ", "")
        }
    }

    /// Sélectionne les chandeliers visibles (les N derniers qui tiennent à l'écran)
    fn visible_candles(&self) -> &'a [AggregatedRow] {
        let rows = &self.series.rows;
        let max_visible = self.width as usize;
        if rows.len() <= max_visible {
            rows
        } else {
            &rows[rows.len() - max_visible..]
        }
    }

    /// Génère toutes les lignes du graphique (chandeliers + axe X)
    pub fn render_lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        let visible = self.visible_candles();

        if visible.is_empty() {
            return lines;
        }

        // Calcule l'espacement entre chandeliers pour remplir toute la largeur
        // Chaque chandelier = 1 caractère + espaces après
        let spacing = if visible.len() > 1 {
            self.width as f64 / visible.len() as f64
        } else {
            1.0
        };

        // Parcourt de haut en bas (reversed)
        for y in (1..=self.height).rev() {
            let mut spans = Vec::new();

            // Ajoute l'axe Y
            spans.push(Span::styled(
                self.render_y_axis(y),
                Style::default().fg(Color::Gray),
            ));

            // Ajoute chaque chandelier avec espacement
            for (i, row) in visible.iter().enumerate() {
                let ch = self.render_candle(row, y);
                let color = Self::candle_color(row);

                // Ajoute le caractère du chandelier
                spans.push(Span::styled(ch.to_string(), Style::default().fg(color)));

                // Ajoute l'espacement après (sauf pour le dernier)
                if i < visible.len() - 1 {
                    let num_spaces = (spacing - 1.0).round() as usize;
                    if num_spaces > 0 {
                        spans.push(Span::raw(" ".repeat(num_spaces)));
                    }
                }
            }

            lines.push(Line::from(spans));
        }

        // Ajoute l'axe X (2 lignes)
        lines.extend(self.render_x_axis(visible, spacing));

        lines
    }

    /// Génère les lignes de l'axe X avec tick marks et labels
    ///
    /// CONCEPT : Adaptive label spacing
    /// - La cadence vient de la fenêtre affichée, bornée par la longueur
    /// - Puis élargie si la largeur réelle des labels risque un chevauchement
    fn render_x_axis(&self, visible: &[AggregatedRow], spacing: f64) -> Vec<Line<'a>> {
        let mut lines = vec![];

        // Largeur réelle du format de label, mesurée sur le premier chandelier
        let sample = self
            .series
            .local_time(visible[0].timestamp)
            .format(self.tick_format)
            .to_string();
        let min_space_per_label = sample.chars().count() + 2;
        let min_interval =
            ((min_space_per_label as f64) / spacing.max(f64::EPSILON)).ceil() as usize;

        let label_interval = effective_stride(self.tick_stride, visible.len())
            .max(min_interval)
            .max(1);

        // Ligne 1 : Tick marks
        let mut tick_spans = vec![Span::raw(format!(
            "{:>width$}",
            "",
            width = self.y_axis_width as usize
        ))];

        for (i, _row) in visible.iter().enumerate() {
            let tick = if i % label_interval == 0 { "│" } else { " " };

            tick_spans.push(Span::styled(tick, Style::default().fg(Color::Gray)));

            if i < visible.len() - 1 {
                let num_spaces = (spacing - 1.0).round() as usize;
                if num_spaces > 0 {
                    tick_spans.push(Span::raw(" ".repeat(num_spaces)));
                }
            }
        }

        lines.push(Line::from(tick_spans));

        // Ligne 2 : Labels de temps (heure locale de la place de cotation)
        let mut label_spans = vec![Span::raw(format!(
            "{:>width$}",
            "",
            width = self.y_axis_width as usize
        ))];

        let mut position = 0.0;
        for (i, row) in visible.iter().enumerate() {
            if i % label_interval == 0 {
                let time_label = self
                    .series
                    .local_time(row.timestamp)
                    .format(self.tick_format)
                    .to_string();

                label_spans.push(Span::styled(
                    time_label.clone(),
                    Style::default().fg(Color::Gray),
                ));

                let next_label_position = if i + label_interval < visible.len() {
                    (i + label_interval) as f64 * spacing
                } else {
                    self.width as f64
                };

                let space_to_next =
                    (next_label_position - position - time_label.len() as f64).max(0.0) as usize;
                if space_to_next > 0 {
                    label_spans.push(Span::raw(" ".repeat(space_to_next)));
                }

                position = next_label_position;
            }
        }

        lines.push(Line::from(label_spans));

        lines
    }
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine la série affichée en chandeliers japonais
pub fn render_candles(
    frame: &mut Frame,
    series: &AggregatedSeries,
    policy: Option<&'static WindowPolicy>,
    area: Rect,
) {
    // Vérifie si le terminal est assez large pour afficher le graphique
    // CONCEPT : Graceful degradation pour terminaux étroits
    if area.width < MIN_TERMINAL_WIDTH {
        render_too_narrow(frame, area);
        return;
    }

    let renderer = CandlestickRenderer::new(series, policy, area);
    let lines = renderer.render_lines();

    let window_label = policy.map(|p| p.window.label()).unwrap_or("?");
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(
                " 🕯️ {} · {} ({} candles) ",
                series.symbol,
                window_label,
                series.len()
            )),
    );

    frame.render_widget(paragraph, area);
}

/// Affiche un message quand le terminal est trop étroit
///
/// CONCEPT : Responsive design - graceful degradation
/// - Prévient les problèmes d'affichage sur terminaux très étroits
/// - Informe clairement l'utilisateur de la largeur minimale requise
fn render_too_narrow(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ⚠ Terminal trop petit ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Terminal trop étroit pour afficher le graphique",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Largeur minimale requise : {} colonnes", MIN_TERMINAL_WIDTH),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
