// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine le dashboard à onglets du symbole courant
//
// CONCEPTS RUST :
// 1. Lifetimes : 'a pour gérer la durée de vie des références
// 2. Pattern matching : router écran / onglet / état de section
// 3. Builder pattern : construction fluide des widgets
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : Tabs, Table, Paragraph, Block
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Screen, SectionState, Tab};
use crate::models::attributes::{
    flatten, format_measure, format_percent, format_price, format_volume, AttributeSpec,
    BALANCE_SHEET, CASH_FLOW, DIVIDENDS_SPLITS, FINANCIAL_STATEMENTS, FISCAL_YEAR,
    INCOME_STATEMENT, MANAGEMENT_EFFECTIVENESS, PRICE_TARGETS, PROFILE_DETAILS, PROFILE_IDENTITY,
    PROFITABILITY, RISK_RATINGS, SHARE_STATISTICS, STOCK_PRICE_HISTORY, SUMMARY_LEFT,
    SUMMARY_RIGHT, VALUATION_MEASURES,
};
use crate::models::{
    combine_chain, AggregatedSeries, Frequency, FundComposition, KeyExecutive, OptionQuote,
    QuoteSnapshot, RangePeriod,
};
use crate::ui::{chart, table};

/// Fond des lignes d'options dans la monnaie
const ITM_BG: Color = Color::Rgb(38, 42, 58);

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Pattern matching sur app.current_screen
/// - Le compilateur garantit l'exhaustivité (tous les cas gérés)
pub fn render(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Dashboard => render_dashboard(frame, app),
        Screen::InputMode => render_input_mode(frame, app),
    }
}

/// Dessine le dashboard (header, onglets, contenu, footer)
fn render_dashboard(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let chunks = create_layout(size);

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_content(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

// ============================================================================
// Layout : Découpage de l'écran
// ============================================================================

/// Crée le layout principal (header, onglets, contenu, footer)
///
/// CONCEPT RUST : Rc<[T]> vs Vec<T>
/// - Layout::split() retourne Rc<[Rect]> (reference counted slice)
/// - On le convertit en Vec avec .to_vec() pour simplifier
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : identité + cours
            Constraint::Length(3), // Barre d'onglets
            Constraint::Min(0),    // Contenu de l'onglet
            Constraint::Length(3), // Footer : raccourcis
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : identité et cours du symbole
// ============================================================================

/// Dessine le header avec le nom, le cours et la variation du jour
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyQuote ")
        .title_alignment(Alignment::Center);

    let line = if let Some(message) = &app.symbol_error {
        Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if app.symbol.is_empty() {
        Line::from(Span::styled(
            "🚀 Terminal market dashboard",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        match &app.snapshot {
            SectionState::Ready(snapshot) => quote_line(snapshot),
            SectionState::Loading => Line::from(vec![
                Span::styled(
                    "⏳ ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("Loading {}...", app.symbol),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            SectionState::Unavailable(message) => Line::from(Span::styled(
                format!("{}: {}", app.symbol, message),
                Style::default().fg(Color::Yellow),
            )),
        }
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Ligne de cotation : "Apple Inc. (AAPL)  184.25  ▲ +1.32 (+0.72%)"
fn quote_line(snapshot: &QuoteSnapshot) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{} ({})", snapshot.display_name(), snapshot.symbol),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if let Some(price) = snapshot.current_price() {
        spans.push(Span::raw("  "));
        match snapshot.price_change() {
            Some((change, percent)) => {
                let color = if change >= 0.0 { Color::Green } else { Color::Red };
                let arrow = if change >= 0.0 { "▲" } else { "▼" };

                spans.push(Span::styled(
                    format_price(price),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("{} {:+.2} ({:+.2}%)", arrow, change, percent),
                    Style::default().fg(color),
                ));
            }
            None => {
                spans.push(Span::styled(
                    format_price(price),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
        }
    }

    Line::from(spans)
}

// ============================================================================
// Barre d'onglets
// ============================================================================

/// Dessine la barre d'onglets, préfixés par leur chiffre d'accès direct
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!("{} {}", tab.index() + 1, tab.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.current_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");

    frame.render_widget(tabs, area);
}

// ============================================================================
// Contenu : router par onglet
// ============================================================================

/// Dessine le contenu de l'onglet actif
fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.symbol.is_empty() {
        render_welcome(frame, area);
        return;
    }

    match app.current_tab {
        Tab::Summary => render_summary(frame, app, area),
        Tab::Chart => chart::render_chart_tab(frame, app, area),
        Tab::Statistics => render_statistics(frame, app, area),
        Tab::HistoricalData => render_historical(frame, app, area),
        Tab::Profile => render_profile(frame, app, area),
        Tab::Financials => render_financials(frame, app, area),
        Tab::Holdings => render_holdings(frame, app, area),
        Tab::Analysis => render_analysis(frame, app, area),
        Tab::Options => render_options(frame, app, area),
    }
}

/// Écran d'accueil tant qu'aucun symbole n'est chargé
fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No ticker loaded",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled(
                "[s]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" and type a symbol: AAPL, MSFT, VOO, BTC-USD, ..."),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Récupère le snapshot prêt, ou dessine l'état d'attente de la section
///
/// Tous les onglets fondamentaux lisent le même snapshot : le placeholder
/// Loading / Unavailable est identique pour chacun.
fn snapshot_section<'a>(
    frame: &mut Frame,
    app: &'a App,
    area: Rect,
    title: &str,
) -> Option<&'a QuoteSnapshot> {
    match &app.snapshot {
        SectionState::Ready(snapshot) => Some(snapshot),
        SectionState::Loading => {
            table::render_loading(frame, area, title);
            None
        }
        SectionState::Unavailable(message) => {
            table::render_unavailable(frame, area, title, message);
            None
        }
    }
}

// ============================================================================
// Onglet Summary
// ============================================================================

/// Deux colonnes de paires label/valeur ; les fonds ajoutent leur synthèse.
/// Un aperçu de la fenêtre graphique courante occupe le bas de l'onglet.
fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = match snapshot_section(frame, app, area, "Summary") {
        Some(snapshot) => snapshot,
        None => return,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(area)
        .to_vec();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0])
        .to_vec();

    let left = flatten(snapshot, SUMMARY_LEFT);
    let mut right = flatten(snapshot, SUMMARY_RIGHT);

    // Les fonds complètent la colonne de droite avec leur synthèse
    if snapshot.is_fund() {
        if let Some(composition) = app.holdings.ready() {
            right.extend(composition.overview.iter().cloned());
        }
    }

    table::render_pairs(frame, columns[0], "Quote", &left);
    table::render_pairs(frame, columns[1], "Key Data", &right);

    chart::render_preview(frame, app, chunks[1]);
}

// ============================================================================
// Onglet Statistics
// ============================================================================

/// Groupes de statistiques empilés sur deux colonnes
fn render_statistics(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = match snapshot_section(frame, app, area, "Statistics") {
        Some(snapshot) => snapshot,
        None => return,
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
        .to_vec();

    let left_groups: &[(&str, &[AttributeSpec])] = &[
        ("Valuation Measures", VALUATION_MEASURES),
        ("Fiscal Year", FISCAL_YEAR),
        ("Profitability", PROFITABILITY),
        ("Management Effectiveness", MANAGEMENT_EFFECTIVENESS),
        ("Income Statement", INCOME_STATEMENT),
        ("Balance Sheet", BALANCE_SHEET),
        ("Cash Flow", CASH_FLOW),
    ];
    let right_groups: &[(&str, &[AttributeSpec])] = &[
        ("Stock Price History", STOCK_PRICE_HISTORY),
        ("Share Statistics", SHARE_STATISTICS),
        ("Dividends & Splits", DIVIDENDS_SPLITS),
    ];

    render_stat_column(frame, snapshot, columns[0], left_groups);
    render_stat_column(frame, snapshot, columns[1], right_groups);
}

/// Empile des groupes label/valeur dans une colonne
///
/// Les groupes entièrement absents du snapshot sont sautés ; sur un petit
/// terminal les groupes du bas sortent de l'écran.
fn render_stat_column(
    frame: &mut Frame,
    snapshot: &QuoteSnapshot,
    area: Rect,
    groups: &[(&str, &[AttributeSpec])],
) {
    let mut populated: Vec<(&str, Vec<(String, String)>)> = Vec::with_capacity(groups.len());
    for (title, specs) in groups.iter().copied() {
        let rows = flatten(snapshot, specs);
        if !rows.is_empty() {
            populated.push((title, rows));
        }
    }

    let mut constraints: Vec<Constraint> = populated
        .iter()
        .map(|(_, rows)| Constraint::Length(rows.len() as u16 + 2))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec();

    for (i, (title, rows)) in populated.iter().enumerate() {
        table::render_pairs(frame, chunks[i], title, rows);
    }
}

// ============================================================================
// Onglet Historical Data
// ============================================================================

/// Contrôles période/fréquence + table chronologique (plus récent en tête)
fn render_historical(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area)
        .to_vec();

    render_history_controls(frame, app, chunks[0]);

    match &app.history {
        SectionState::Loading => {
            table::render_loading(frame, chunks[1], "Historical Data");
            return;
        }
        SectionState::Unavailable(message) => {
            table::render_unavailable(frame, chunks[1], "Historical Data", message);
            return;
        }
        SectionState::Ready(_) => {}
    }

    match &app.history_view {
        Some(view) if !view.is_empty() => render_history_table(frame, view, chunks[1]),
        _ => table::render_unavailable(
            frame,
            chunks[1],
            "Historical Data",
            "No rows in the selected period",
        ),
    }
}

/// Sélecteurs de période et de fréquence
fn render_history_controls(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::styled(" Period: ", Style::default().fg(Color::Cyan))];
    for (i, period) in RangePeriod::history_choices().iter().enumerate() {
        let style = if i == app.history_period_index {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(period.label(), style));
        spans.push(Span::raw("  "));
    }

    spans.push(Span::raw("│  "));
    spans.push(Span::styled("Frequency: ", Style::default().fg(Color::Cyan)));
    for (i, frequency) in Frequency::history_choices().iter().enumerate() {
        let style = if i == app.history_frequency_index {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(frequency.label(), style));
        spans.push(Span::raw("  "));
    }

    let paragraph = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}

/// Table OHLC agrégée, du plus récent au plus ancien
fn render_history_table(frame: &mut Frame, view: &AggregatedSeries, area: Rect) {
    let with_actions = view.includes_actions;

    let mut titles: Vec<&'static str> = vec![
        "Date", "Open", "High", "Low", "Close", "Volume", "Change", "% Change",
    ];
    if with_actions {
        titles.push("Dividends");
        titles.push("Splits");
    }

    let rows: Vec<Row> = view
        .rows
        .iter()
        .rev() // plus récent en premier, la série reste chronologique
        .map(|row| {
            let change_color = match row.change {
                Some(change) if change < 0.0 => Color::Red,
                Some(_) => Color::Green,
                None => Color::Gray,
            };

            let mut cells = vec![
                Cell::from(view.local_time(row.timestamp).format("%b %-d, %Y").to_string()),
                Cell::from(format_price(row.open)),
                Cell::from(format_price(row.high)),
                Cell::from(format_price(row.low)),
                Cell::from(format_price(row.close)),
                Cell::from(format_volume(row.volume)),
                Cell::from(
                    row.change
                        .map(|change| format!("{:+.2}", change))
                        .unwrap_or_else(|| "-".to_string()),
                )
                .style(Style::default().fg(change_color)),
                Cell::from(row.percent_change.clone().unwrap_or_else(|| "-".to_string()))
                    .style(Style::default().fg(change_color)),
            ];
            if with_actions {
                cells.push(Cell::from(
                    row.dividends
                        .map(|dividend| format!("{:.2}", dividend))
                        .unwrap_or_default(),
                ));
                cells.push(Cell::from(
                    row.splits
                        .map(|ratio| format!("{}:1", ratio))
                        .unwrap_or_default(),
                ));
            }

            Row::new(cells)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(9),
    ];
    if with_actions {
        widths.push(Constraint::Length(10));
        widths.push(Constraint::Length(7));
    }

    let title = format!(
        "{} · {} rows · {}",
        view.symbol,
        view.len(),
        view.frequency.label()
    );
    let table_widget = Table::new(rows, widths)
        .header(table::header_row(&titles))
        .block(table::titled_block(&title))
        .column_spacing(1);

    frame.render_widget(table_widget, area);
}

// ============================================================================
// Onglet Profile
// ============================================================================

/// Identité, coordonnées, description d'activité et dirigeants
fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = match snapshot_section(frame, app, area, "Profile") {
        Some(snapshot) => snapshot,
        None => return,
    };

    let identity = flatten(snapshot, PROFILE_IDENTITY);
    let details = flatten(snapshot, PROFILE_DETAILS);
    let executives = snapshot.key_executives();

    let executives_height = if executives.is_empty() {
        0
    } else {
        executives.len().min(6) as u16 + 3
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(identity.len().max(1) as u16 + 2),
            Constraint::Length(details.len().max(1) as u16 + 2),
            Constraint::Min(5),
            Constraint::Length(executives_height),
        ])
        .split(area)
        .to_vec();

    // Identité : valeurs seules (nom, adresse, téléphone, site web)
    let identity_lines: Vec<Line> = identity
        .iter()
        .map(|(_, value)| Line::from(Span::raw(format!(" {}", value))))
        .collect();
    let identity_paragraph =
        Paragraph::new(identity_lines).block(table::titled_block(&format!("{} Profile", app.symbol)));
    frame.render_widget(identity_paragraph, chunks[0]);

    table::render_pairs(frame, chunks[1], "Details", &details);

    // Description de l'activité, repliée sur la largeur
    let summary = snapshot
        .text("longBusinessSummary")
        .unwrap_or("No business summary available.");
    let summary_paragraph = Paragraph::new(summary)
        .block(table::titled_block("Business Summary"))
        .wrap(Wrap { trim: true });
    frame.render_widget(summary_paragraph, chunks[2]);

    if !executives.is_empty() {
        render_executives(frame, &executives, chunks[3]);
    }
}

/// Table des principaux dirigeants
fn render_executives(frame: &mut Frame, executives: &[KeyExecutive], area: Rect) {
    let rows: Vec<Row> = executives
        .iter()
        .map(|executive| {
            Row::new(vec![
                Cell::from(executive.name.clone()),
                Cell::from(executive.title.clone()),
                Cell::from(
                    executive
                        .total_pay
                        .map(format_measure)
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
                Cell::from(
                    executive
                        .exercised_value
                        .map(format_measure)
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
                Cell::from(
                    executive
                        .year_born
                        .map(|year| year.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
            ])
        })
        .collect();

    let table_widget = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(36),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(9),
        ],
    )
    .header(table::header_row(&[
        "Name",
        "Title",
        "Pay",
        "Exercised",
        "Year Born",
    ]))
    .block(table::titled_block("Key Executives"))
    .column_spacing(1);

    frame.render_widget(table_widget, area);
}

// ============================================================================
// Onglet Financials
// ============================================================================

/// Résumé des états financiers (une seule table pleine largeur)
fn render_financials(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = match snapshot_section(frame, app, area, "Financials") {
        Some(snapshot) => snapshot,
        None => return,
    };

    let rows = flatten(snapshot, FINANCIAL_STATEMENTS);
    table::render_pairs(frame, area, "Financial Highlights", &rows);
}

// ============================================================================
// Onglet Holdings
// ============================================================================

/// Composition d'un fonds : allocations, secteurs, top 10, mesures
fn render_holdings(frame: &mut Frame, app: &App, area: Rect) {
    let composition = match &app.holdings {
        SectionState::Loading => {
            table::render_loading(frame, area, "Holdings");
            return;
        }
        SectionState::Unavailable(message) => {
            table::render_unavailable(frame, area, "Holdings", message);
            return;
        }
        SectionState::Ready(composition) => composition,
    };

    if composition.is_empty() {
        table::render_unavailable(
            frame,
            area,
            "Holdings",
            "No composition data reported for this fund",
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
        .to_vec();

    // Colonne gauche : allocation par classe d'actifs puis par secteur
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(composition.position_weightings.len().max(1) as u16 + 2),
            Constraint::Min(0),
        ])
        .split(columns[0])
        .to_vec();
    table::render_pairs(
        frame,
        left_chunks[0],
        "Asset Allocation",
        &composition.position_weightings,
    );
    table::render_pairs(
        frame,
        left_chunks[1],
        "Sector Weightings",
        &composition.sector_weightings,
    );

    // Colonne droite : top 10 puis mesures actions / obligations
    let mut bond_rows = composition.bond_holdings.clone();
    bond_rows.extend(composition.bond_ratings.iter().cloned());

    let top_height = if composition.top_holdings.is_empty() {
        0
    } else {
        composition.top_holdings.len() as u16 + 3
    };
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top_height),
            Constraint::Length(composition.equity_holdings.len().max(1) as u16 + 2),
            Constraint::Min(0),
        ])
        .split(columns[1])
        .to_vec();

    if !composition.top_holdings.is_empty() {
        render_top_holdings(frame, composition, right_chunks[0]);
    }
    table::render_pairs(
        frame,
        right_chunks[1],
        "Equity Holdings",
        &composition.equity_holdings,
    );
    table::render_pairs(frame, right_chunks[2], "Bond Holdings", &bond_rows);
}

/// Table des dix premières lignes du portefeuille
fn render_top_holdings(frame: &mut Frame, composition: &FundComposition, area: Rect) {
    let rows: Vec<Row> = composition
        .top_holdings
        .iter()
        .map(|holding| {
            Row::new(vec![
                Cell::from(holding.symbol.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(holding.name.clone()),
                Cell::from(format_percent(holding.percent_assets)),
            ])
        })
        .collect();

    let table_widget = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(9),
        ],
    )
    .header(table::header_row(&["Symbol", "Name", "% Assets"]))
    .block(table::titled_block("Top 10 Holdings"))
    .column_spacing(1);

    frame.render_widget(table_widget, area);
}

// ============================================================================
// Onglet Analysis
// ============================================================================

/// Consensus analystes, objectifs de cours, performance de marché et
/// risques de gouvernance
fn render_analysis(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = match snapshot_section(frame, app, area, "Analysis") {
        Some(snapshot) => snapshot,
        None => return,
    };

    let targets = flatten(snapshot, PRICE_TARGETS);
    let performance = flatten(snapshot, STOCK_PRICE_HISTORY);
    let ratings = flatten(snapshot, RISK_RATINGS);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(targets.len().max(1) as u16 + 2),
            Constraint::Length(performance.len().max(1) as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area)
        .to_vec();

    render_recommendation(frame, snapshot, chunks[0]);
    table::render_pairs(frame, chunks[1], "Price Targets", &targets);
    table::render_pairs(frame, chunks[2], "Market Performance", &performance);
    table::render_pairs(frame, chunks[3], "Governance Risk", &ratings);
}

/// Ligne de consensus : "Consensus: BUY (42 analysts)"
fn render_recommendation(frame: &mut Frame, snapshot: &QuoteSnapshot, area: Rect) {
    let line = match snapshot.text("recommendationKey") {
        Some(key) => {
            let color = match key {
                "strong_buy" | "buy" => Color::Green,
                "hold" => Color::Yellow,
                _ => Color::Red,
            };
            let label = key.replace('_', " ").to_uppercase();
            let analysts = snapshot
                .number("numberOfAnalystOpinions")
                .map(|count| format!(" ({} analysts)", count as i64))
                .unwrap_or_default();

            Line::from(vec![
                Span::raw(" Consensus: "),
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(analysts, Style::default().fg(Color::Gray)),
            ])
        }
        None => Line::from(Span::styled(
            " No analyst coverage",
            Style::default().fg(Color::Gray),
        )),
    };

    let paragraph = Paragraph::new(vec![line]).block(table::titled_block("Recommendation"));
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Onglet Options
// ============================================================================

/// Sélecteur d'échéances + table fusionnée calls/strike/puts
fn render_options(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area)
        .to_vec();

    render_expiration_selector(frame, app, chunks[0]);

    let chain = match &app.options {
        SectionState::Loading => {
            table::render_loading(frame, chunks[1], "Options");
            return;
        }
        SectionState::Unavailable(message) => {
            table::render_unavailable(frame, chunks[1], "Options", message);
            return;
        }
        SectionState::Ready(chain) => chain,
    };

    // Prix spot pour le marquage dans la monnaie ; NaN quand le snapshot
    // manque, aucune ligne n'est alors marquée
    let reference_price = app
        .snapshot
        .ready()
        .and_then(|snapshot| snapshot.current_price())
        .unwrap_or(f64::NAN);

    let combined = combine_chain(chain, reference_price);

    let rows: Vec<Row> = combined
        .iter()
        .map(|row| {
            let mut cells = option_side_cells(row.call.as_ref(), row.call_in_the_money);
            cells.push(
                Cell::from(format!("{:.2}", row.strike)).style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            );
            cells.extend(option_side_cells(row.put.as_ref(), row.put_in_the_money));
            Row::new(cells)
        })
        .collect();

    let titles = [
        "Last", "Chg", "% Chg", "Vol", "OI", "Strike", "Last", "Chg", "% Chg", "Vol", "OI",
    ];
    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let title = format!(
        "Calls ◀ {} {} ▶ Puts",
        chain.symbol,
        chain.expiration.format("%b %-d, %Y")
    );
    let table_widget = Table::new(rows, widths)
        .header(table::header_row(&titles))
        .block(table::titled_block(&title))
        .column_spacing(1);

    frame.render_widget(table_widget, chunks[1]);
}

/// Cellules d'un côté de la chaîne ; fond coloré si dans la monnaie
fn option_side_cells(quote: Option<&OptionQuote>, in_the_money: bool) -> Vec<Cell<'static>> {
    let base = if in_the_money {
        Style::default().bg(ITM_BG)
    } else {
        Style::default()
    };

    match quote {
        Some(quote) => {
            let change_color = if quote.change >= 0.0 {
                Color::Green
            } else {
                Color::Red
            };
            vec![
                Cell::from(format!("{:.2}", quote.last_price)).style(base),
                Cell::from(format!("{:+.2}", quote.change)).style(base.fg(change_color)),
                Cell::from(quote.percent_change_label()).style(base.fg(change_color)),
                Cell::from(
                    quote
                        .volume
                        .map(|volume| volume.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )
                .style(base),
                Cell::from(
                    quote
                        .open_interest
                        .map(|interest| interest.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )
                .style(base),
            ]
        }
        None => (0..5).map(|_| Cell::from("-").style(base)).collect(),
    }
}

/// Fenêtre glissante d'échéances autour de la sélection
fn render_expiration_selector(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " Expiration: ",
        Style::default().fg(Color::Cyan),
    )];

    if app.options_expirations.is_empty() {
        spans.push(Span::styled(
            "none listed",
            Style::default().fg(Color::Gray),
        ));
    } else {
        const VISIBLE: usize = 6;
        let start = app
            .options_index
            .saturating_sub(VISIBLE / 2)
            .min(app.options_expirations.len().saturating_sub(VISIBLE));

        for (i, date) in app
            .options_expirations
            .iter()
            .enumerate()
            .skip(start)
            .take(VISIBLE)
        {
            let style = if i == app.options_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(date.format("%b %-d, %Y").to_string(), style));
            spans.push(Span::raw("  "));
        }

        let hidden = app
            .options_expirations
            .len()
            .saturating_sub(start + VISIBLE);
        if hidden > 0 {
            spans.push(Span::styled(
                format!("(+{} more)", hidden),
                Style::default().fg(Color::Gray),
            ));
        }
    }

    let paragraph = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : raccourcis contextuels
// ============================================================================

/// Span d'un raccourci clavier
fn key_span(label: &'static str, color: Color) -> Span<'static> {
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    // CONCEPT : Confirmation de quit two-step
    // - Si app.is_awaiting_quit_confirmation(), affiche message d'avertissement
    // - Sinon, affiche les raccourcis normaux
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        // CONCEPT : Style avec BLINK pour attirer l'attention
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[y]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " to quit, any other key to stay ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let mut spans = vec![
            key_span("[q]", Color::Yellow),
            Span::raw(" Quit  "),
            key_span("[s]", Color::Green),
            Span::raw(" Symbol  "),
            key_span("[Tab/1-9]", Color::Yellow),
            Span::raw(" Tabs  "),
            key_span("[r]", Color::Yellow),
            Span::raw(" Reload"),
        ];
        spans.extend(tab_hint_spans(app.current_tab));
        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Raccourcis propres à l'onglet actif
fn tab_hint_spans(tab: Tab) -> Vec<Span<'static>> {
    match tab {
        Tab::Chart => vec![
            Span::raw("  "),
            key_span("[h/l]", Color::Yellow),
            Span::raw(" Window  "),
            key_span("[c]", Color::Yellow),
            Span::raw(" Style"),
        ],
        Tab::HistoricalData => vec![
            Span::raw("  "),
            key_span("[h/l]", Color::Yellow),
            Span::raw(" Period  "),
            key_span("[f]", Color::Yellow),
            Span::raw(" Frequency"),
        ],
        Tab::Options => vec![
            Span::raw("  "),
            key_span("[h/l]", Color::Yellow),
            Span::raw(" Expiration"),
        ],
        _ => Vec::new(),
    }
}

// ============================================================================
// Input Mode : Saisie de ticker
// ============================================================================

/// Dessine le dashboard avec le mode input actif
///
/// CONCEPT : Modal input (Vim-like)
/// - Affiche le dashboard en arrière-plan
/// - Affiche une ligne d'input en bas pour saisir le ticker
/// - ESC annule, Enter valide
fn render_input_mode(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let chunks = create_layout(size);

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_content(frame, app, chunks[2]);
    render_input_footer(frame, app, chunks[3]);
}

/// Dessine le footer en mode input avec la ligne de saisie
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)); // Vert pour indiquer mode input

    // Construit la ligne d'input avec le prompt, le buffer et le curseur
    let input_line = Line::from(vec![
        Span::styled(
            &app.input_prompt,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(&app.input_buffer, Style::default().fg(Color::White)),
        Span::styled(
            "█", // Curseur
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::raw("   "),
        key_span("[Enter]", Color::Green),
        Span::raw(" Confirm  "),
        key_span("[ESC]", Color::Red),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line])
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}
