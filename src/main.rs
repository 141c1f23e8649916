// ============================================================================
// LazyQuote - Dashboard de marché mono-symbole
// ============================================================================
// Programme TUI qui affiche un instrument (action, ETF, crypto, indice)
// sous neuf onglets : cotation, graphique, statistiques, historique,
// profil, finances, composition, analyses et options.
// Les données viennent de Yahoo Finance.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime pour appels API
// 4. Channels mpsc : worker en arrière-plan, l'UI ne bloque jamais
// ============================================================================

use std::io;
use std::sync::mpsc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lazyquote::api::YahooClient;
use lazyquote::app::{App, Section, Tab};
use lazyquote::models::{
    aggregate, annotate, available_windows, AggregatedSeries, BarSeries, Frequency,
    FundComposition, Interval, OptionChain, QuoteSnapshot, RangePeriod, WindowAnnotation,
    WindowPolicy,
};
use lazyquote::ui::{render, EventHandler};

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les tâches async (fetch API)
// - Communication via mpsc channels (multi-producer, single-consumer)
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// Charger un nouveau symbole : snapshot, sonde intraday, graphique,
    /// historique, composition (fonds) et chaîne d'options
    LoadSymbol { symbol: String },

    /// Vider le cache du symbole puis tout recharger
    Refresh { symbol: String },

    /// Recharger le graphique pour une autre fenêtre
    ReloadChart {
        symbol: String,
        policy: &'static WindowPolicy,
    },

    /// Recharger l'historique pour une autre période
    ReloadHistory {
        symbol: String,
        period: RangePeriod,
    },

    /// Charger la chaîne d'options d'une autre échéance
    ReloadOptions {
        symbol: String,
        expiration: NaiveDate,
    },
}

/// Résultats renvoyés par le worker thread
///
/// Chaque variante porte le symbole concerné : la boucle principale ignore
/// les résultats d'un symbole déjà remplacé par l'utilisateur.
#[derive(Debug)]
enum AppResult {
    /// Snapshot fusionné chargé (onglets fondamentaux)
    SnapshotLoaded {
        symbol: String,
        snapshot: QuoteSnapshot,
    },

    /// Résultat de la sonde intraday : choisit la table de fenêtres
    IntradayProbed { symbol: String, has_intraday: bool },

    /// Série du graphique prête, agrégée et annotée
    ChartLoaded {
        symbol: String,
        series: AggregatedSeries,
        annotation: Option<WindowAnnotation>,
    },

    /// Série quotidienne brute de l'onglet Historical Data
    HistoryLoaded { symbol: String, series: BarSeries },

    /// Composition du fonds chargée
    CompositionLoaded {
        symbol: String,
        composition: FundComposition,
    },

    /// Chaîne d'options + échéances disponibles
    ChainLoaded {
        symbol: String,
        expirations: Vec<NaiveDate>,
        chain: OptionChain,
    },

    /// Symbole inconnu du provider : écran d'erreur, rien d'autre n'est chargé
    SymbolNotFound { symbol: String, message: String },

    /// Erreur isolée d'une section, les autres restent servies
    SectionError {
        symbol: String,
        section: Section,
        message: String,
    },
}

impl AppResult {
    /// Symbole concerné, pour filtrer les résultats périmés
    fn symbol(&self) -> &str {
        match self {
            AppResult::SnapshotLoaded { symbol, .. }
            | AppResult::IntradayProbed { symbol, .. }
            | AppResult::ChartLoaded { symbol, .. }
            | AppResult::HistoryLoaded { symbol, .. }
            | AppResult::CompositionLoaded { symbol, .. }
            | AppResult::ChainLoaded { symbol, .. }
            | AppResult::SymbolNotFound { symbol, .. }
            | AppResult::SectionError { symbol, .. } => symbol,
        }
    }
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Tracing : framework moderne de logging structuré
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - Linux/WSL : ~/.local/share/lazyquote/logs/lazyquote.log
/// - macOS : ~/Library/Application Support/lazyquote/logs/lazyquote.log
/// - Windows : C:\Users\<user>\AppData\Local\lazyquote\logs\lazyquote.log
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyquote/logs/lazyquote.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=lazyquote=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("lazyquote")
        .join("logs");

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Rotation quotidienne : lazyquote.log.2024-01-15, etc.
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyquote.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazyquote::api::yahoo)
                .with_thread_ids(true) // Inclut l'ID du thread (utile pour async)
                .with_line_number(true), // Inclut le numéro de ligne
        )
        .with(
            // CONCEPT : EnvFilter
            // - RUST_LOG=debug : tous les logs debug+
            // - Par défaut : debug pour lazyquote, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyquote=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // CONCEPT : Logging avant tout le reste
    // - Si init échoue, on affiche l'erreur et continue quand même
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("LazyQuote starting up");

    // Symbole optionnel en argument : `lazyquote AAPL`
    let initial_symbol = std::env::args()
        .nth(1)
        .map(|arg| arg.trim().to_uppercase())
        .filter(|symbol| !symbol.is_empty());

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // Crée les channels pour communication avec le worker
    // CONCEPT RUST : mpsc channels
    // - command_tx/rx : pour envoyer des commandes au worker
    // - result_tx/rx : pour recevoir les résultats du worker
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx);

    // L'état vit dans la boucle principale : le worker ne le touche jamais,
    // il renvoie des AppResult que la boucle applique
    let mut app = App::new();
    match initial_symbol {
        Some(symbol) => {
            info!(ticker = %symbol, "Loading symbol from command line");
            app.symbol_loading(symbol.clone());
            let _ = command_tx.send(AppCommand::LoadSymbol { symbol });
        }
        None => app.start_input("Ticker: ".to_string()),
    }

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui traite les commandes async
// - Reçoit des AppCommand via un channel (command_rx)
// - Envoie des AppResult via un autre channel (result_tx)
// - Permet de faire des appels API sans bloquer l'UI
// ============================================================================

/// Worker thread qui exécute les requêtes provider en arrière-plan
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - tokio::runtime::Runtime : runtime async dans ce thread
/// - block_on() bloque le thread worker, jamais l'UI
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "Failed to create tokio runtime, worker exiting");
                return;
            }
        };
        let mut client = match YahooClient::new() {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client, worker exiting");
                return;
            }
        };

        // Boucle de traitement : une commande à la fois, dans l'ordre
        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::LoadSymbol { symbol } => {
                            load_symbol(&runtime, &mut client, &result_tx, &symbol);
                        }
                        AppCommand::Refresh { symbol } => {
                            client.forget(&symbol);
                            load_symbol(&runtime, &mut client, &result_tx, &symbol);
                        }
                        AppCommand::ReloadChart { symbol, policy } => {
                            load_chart(&runtime, &mut client, &result_tx, &symbol, policy);
                        }
                        AppCommand::ReloadHistory { symbol, period } => {
                            load_history(&runtime, &mut client, &result_tx, &symbol, period);
                        }
                        AppCommand::ReloadOptions { symbol, expiration } => {
                            load_options(
                                &runtime,
                                &mut client,
                                &result_tx,
                                &symbol,
                                Some(expiration),
                            );
                        }
                    }
                }
                Err(_) => {
                    // Channel fermé, on quitte
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

/// Chargement complet d'un symbole, section par section
///
/// Le snapshot part en premier : un symbole inconnu du provider annule
/// tout le reste. Les autres sections sont indépendantes, une erreur
/// n'empêche pas les suivantes.
fn load_symbol(
    runtime: &tokio::runtime::Runtime,
    client: &mut YahooClient,
    result_tx: &mpsc::Sender<AppResult>,
    symbol: &str,
) {
    // 1. Snapshot fusionné
    let snapshot = match runtime.block_on(client.fetch_snapshot(symbol)) {
        Ok(snapshot) => Some(snapshot),
        Err(e) if e.halts_symbol() => {
            warn!(ticker = %symbol, error = %e, "Symbol rejected by provider");
            let _ = result_tx.send(AppResult::SymbolNotFound {
                symbol: symbol.to_string(),
                message: e.to_string(),
            });
            return;
        }
        Err(e) => {
            error!(ticker = %symbol, error = %e, "Failed to fetch snapshot");
            let _ = result_tx.send(AppResult::SectionError {
                symbol: symbol.to_string(),
                section: Section::Snapshot,
                message: e.to_string(),
            });
            None
        }
    };

    let is_fund = snapshot.as_ref().map(QuoteSnapshot::is_fund).unwrap_or(false);
    if let Some(snapshot) = snapshot {
        info!(ticker = %symbol, fund = is_fund, "Snapshot loaded");
        let _ = result_tx.send(AppResult::SnapshotLoaded {
            symbol: symbol.to_string(),
            snapshot,
        });
    }

    // 2. Sonde intraday : décide si les fenêtres minutées sont proposées
    let has_intraday = match runtime.block_on(client.probe_intraday(symbol)) {
        Ok(supported) => supported,
        Err(e) => {
            warn!(ticker = %symbol, error = %e, "Intraday probe failed, falling back to daily windows");
            false
        }
    };
    let _ = result_tx.send(AppResult::IntradayProbed {
        symbol: symbol.to_string(),
        has_intraday,
    });

    // 3. Graphique : première fenêtre de la table applicable
    let policy = &available_windows(has_intraday)[0];
    load_chart(runtime, client, result_tx, symbol, policy);

    // 4. Historique : un an de barres quotidiennes, avec dividendes et splits
    load_history(runtime, client, result_tx, symbol, RangePeriod::OneYear);

    // 5. Composition : réservée aux fonds
    if is_fund {
        load_composition(runtime, client, result_tx, symbol);
    } else {
        let _ = result_tx.send(AppResult::SectionError {
            symbol: symbol.to_string(),
            section: Section::Holdings,
            message: "Holdings are only reported for funds and ETFs".to_string(),
        });
    }

    // 6. Options : échéance la plus proche
    load_options(runtime, client, result_tx, symbol, None);
}

/// Graphique d'une fenêtre : fetch, agrégation native, annotation
fn load_chart(
    runtime: &tokio::runtime::Runtime,
    client: &mut YahooClient,
    result_tx: &mpsc::Sender<AppResult>,
    symbol: &str,
    policy: &'static WindowPolicy,
) {
    let outcome =
        runtime.block_on(client.fetch_bars(symbol, policy.interval, policy.period, false));

    match outcome {
        Ok(bars) => {
            let series = aggregate(&bars, Frequency::Native);
            let annotation = annotate(&series);
            info!(
                ticker = %symbol,
                window = %policy.window.label(),
                rows = series.len(),
                "Chart series loaded"
            );
            let _ = result_tx.send(AppResult::ChartLoaded {
                symbol: symbol.to_string(),
                series,
                annotation,
            });
        }
        Err(e) => {
            error!(ticker = %symbol, window = %policy.window.label(), error = %e, "Failed to load chart series");
            let _ = result_tx.send(AppResult::SectionError {
                symbol: symbol.to_string(),
                section: Section::Chart,
                message: e.to_string(),
            });
        }
    }
}

/// Historique : barres quotidiennes brutes, l'agrégation se fait côté App
fn load_history(
    runtime: &tokio::runtime::Runtime,
    client: &mut YahooClient,
    result_tx: &mpsc::Sender<AppResult>,
    symbol: &str,
    period: RangePeriod,
) {
    match runtime.block_on(client.fetch_bars(symbol, Interval::D1, period, true)) {
        Ok(series) => {
            info!(ticker = %symbol, period = %period.label(), bars = series.len(), "History loaded");
            let _ = result_tx.send(AppResult::HistoryLoaded {
                symbol: symbol.to_string(),
                series,
            });
        }
        Err(e) => {
            error!(ticker = %symbol, period = %period.label(), error = %e, "Failed to load history");
            let _ = result_tx.send(AppResult::SectionError {
                symbol: symbol.to_string(),
                section: Section::History,
                message: e.to_string(),
            });
        }
    }
}

/// Composition d'un fonds (allocations, secteurs, top 10)
fn load_composition(
    runtime: &tokio::runtime::Runtime,
    client: &mut YahooClient,
    result_tx: &mpsc::Sender<AppResult>,
    symbol: &str,
) {
    match runtime.block_on(client.fetch_fund_composition(symbol)) {
        Ok(composition) => {
            info!(ticker = %symbol, "Fund composition loaded");
            let _ = result_tx.send(AppResult::CompositionLoaded {
                symbol: symbol.to_string(),
                composition,
            });
        }
        Err(e) => {
            error!(ticker = %symbol, error = %e, "Failed to load fund composition");
            let _ = result_tx.send(AppResult::SectionError {
                symbol: symbol.to_string(),
                section: Section::Holdings,
                message: e.to_string(),
            });
        }
    }
}

/// Chaîne d'options d'une échéance (la plus proche si None)
fn load_options(
    runtime: &tokio::runtime::Runtime,
    client: &mut YahooClient,
    result_tx: &mpsc::Sender<AppResult>,
    symbol: &str,
    expiration: Option<NaiveDate>,
) {
    match runtime.block_on(client.fetch_options_chain(symbol, expiration)) {
        Ok((expirations, chain)) => {
            info!(
                ticker = %symbol,
                expiration = %chain.expiration,
                expirations = expirations.len(),
                "Options chain loaded"
            );
            let _ = result_tx.send(AppResult::ChainLoaded {
                symbol: symbol.to_string(),
                expirations,
                chain,
            });
        }
        Err(e) => {
            error!(ticker = %symbol, error = %e, "Failed to load options chain");
            let _ = result_tx.send(AppResult::SectionError {
                symbol: symbol.to_string(),
                section: Section::Options,
                message: e.to_string(),
            });
        }
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// CONCEPT : Game Loop / Event Loop Pattern
// - À chaque itération :
//   0. Appliquer les résultats du worker
//   1. Dessiner l'interface (render)
//   2. Traiter les événements (input)
//   3. Mettre à jour l'état (update)
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS : applique tout ce que le worker a produit
        // ========================================
        // CONCEPT : Non-blocking receive avec try_recv
        // - try_recv() ne bloque pas (contrairement à recv())
        loop {
            match result_rx.try_recv() {
                Ok(result) => apply_result(app, result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected");
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        if let Ok(event) = events.next() {
            handle_event(app, event, &command_tx);
        }

        // ========================================
        // 3. UPDATE : Met à jour l'état
        // ========================================
        app.tick();
    }

    Ok(())
}

/// Applique un résultat du worker à l'état
///
/// Les résultats d'un symbole remplacé entre-temps sont ignorés : le worker
/// traite les commandes dans l'ordre, mais l'utilisateur peut avoir saisi
/// un autre ticker pendant un chargement.
fn apply_result(app: &mut App, result: AppResult) {
    if result.symbol() != app.symbol {
        debug!(stale = %result.symbol(), current = %app.symbol, "Dropping stale worker result");
        return;
    }

    match result {
        AppResult::SnapshotLoaded { snapshot, .. } => app.set_snapshot(snapshot),
        AppResult::IntradayProbed { has_intraday, .. } => app.set_intraday(has_intraday),
        AppResult::ChartLoaded {
            series, annotation, ..
        } => app.set_chart(series, annotation),
        AppResult::HistoryLoaded { series, .. } => app.set_history(series),
        AppResult::CompositionLoaded { composition, .. } => app.set_holdings(composition),
        AppResult::ChainLoaded {
            expirations, chain, ..
        } => app.set_options(expirations, chain),
        AppResult::SymbolNotFound { message, .. } => app.symbol_not_found(message),
        AppResult::SectionError {
            section, message, ..
        } => app.set_section_error(section, message),
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Guard clauses (if) pour filtrer les événements
/// - Les sélecteurs 'h'/'l' changent de sens selon l'onglet actif
fn handle_event(app: &mut App, event: lazyquote::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazyquote::ui::events::{
        digit_from_event, get_char_from_event, is_backspace_event, is_chart_style_event,
        is_confirm_event, is_enter_event, is_escape_event, is_frequency_event,
        is_next_selection_event, is_next_tab_event, is_previous_selection_event,
        is_previous_tab_event, is_quit_event, is_reload_event, is_symbol_event,
        is_ticker_char_event, Event,
    };

    // ========================================
    // Input Mode : la saisie capture tout
    // ========================================
    if app.is_in_input_mode() {
        if is_escape_event(&event) {
            info!("User cancelled input");
            app.cancel_input();
        } else if is_enter_event(&event) {
            let symbol = app.submit_input();
            if symbol.is_empty() {
                debug!("Empty ticker symbol, ignoring");
            } else {
                info!(ticker = %symbol, "User submitted symbol");
                app.symbol_loading(symbol.clone());
                let _ = command_tx.send(AppCommand::LoadSymbol { symbol });
            }
        } else if is_backspace_event(&event) {
            app.backspace();
        } else if is_ticker_char_event(&event) {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }
        return;
    }

    match event {
        // Confirmation de quit en attente : 'y' quitte, le reste annule
        // CONCEPT : Two-step confirmation pour éviter les quits accidentels
        Event::Key(_) if app.is_awaiting_quit_confirmation() => {
            if is_confirm_event(&event) {
                info!("User confirmed quit");
                app.quit();
            } else {
                debug!("Quit cancelled");
                app.cancel_quit();
            }
        }

        Event::Key(_) if is_quit_event(&event) => {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }

        // 's' : saisir un nouveau symbole
        Event::Key(_) if is_symbol_event(&event) => {
            info!("User requested symbol input");
            app.start_input("Ticker: ".to_string());
        }

        // Navigation entre onglets
        Event::Key(_) if is_next_tab_event(&event) => app.next_tab(),
        Event::Key(_) if is_previous_tab_event(&event) => app.previous_tab(),
        Event::Key(_) if digit_from_event(&event).is_some() => {
            if let Some(tab) = digit_from_event(&event).and_then(Tab::from_digit) {
                debug!(tab = tab.label(), "User jumped to tab");
                app.goto_tab(tab);
            }
        }

        // 'c' : style de graphique suivant (onglet Chart)
        Event::Key(_) if is_chart_style_event(&event) && app.current_tab == Tab::Chart => {
            app.cycle_chart_style();
            debug!(style = app.chart_style.label(), "User cycled chart style");
        }

        // 'f' : fréquence suivante (onglet Historical Data)
        // Réagrégation locale de la série déjà chargée, aucun appel réseau
        Event::Key(_)
            if is_frequency_event(&event) && app.current_tab == Tab::HistoricalData =>
        {
            app.cycle_history_frequency();
            debug!(
                frequency = app.history_frequency().label(),
                "User cycled history frequency"
            );
        }

        // 'r' : vider le cache du symbole et tout recharger
        Event::Key(_) if is_reload_event(&event) && !app.symbol.is_empty() => {
            info!(ticker = %app.symbol, "User requested refresh");
            let symbol = app.symbol.clone();
            app.symbol_loading(symbol.clone());
            let _ = command_tx.send(AppCommand::Refresh { symbol });
        }

        // 'l' / flèche droite : élément suivant du sélecteur de l'onglet
        Event::Key(_) if is_next_selection_event(&event) && !app.symbol.is_empty() => {
            match app.current_tab {
                Tab::Chart => {
                    if let Some(policy) = app.next_window() {
                        info!(window = policy.window.label(), "User selected next window");
                        let _ = command_tx.send(AppCommand::ReloadChart {
                            symbol: app.symbol.clone(),
                            policy,
                        });
                    }
                }
                Tab::HistoricalData => {
                    let period = app.next_history_period();
                    info!(period = period.label(), "User selected next period");
                    let _ = command_tx.send(AppCommand::ReloadHistory {
                        symbol: app.symbol.clone(),
                        period,
                    });
                }
                Tab::Options => {
                    if let Some(expiration) = app.next_expiration() {
                        info!(expiration = %expiration, "User selected next expiration");
                        let _ = command_tx.send(AppCommand::ReloadOptions {
                            symbol: app.symbol.clone(),
                            expiration,
                        });
                    }
                }
                _ => {}
            }
        }

        // 'h' / flèche gauche : élément précédent du sélecteur de l'onglet
        Event::Key(_) if is_previous_selection_event(&event) && !app.symbol.is_empty() => {
            match app.current_tab {
                Tab::Chart => {
                    if let Some(policy) = app.previous_window() {
                        info!(window = policy.window.label(), "User selected previous window");
                        let _ = command_tx.send(AppCommand::ReloadChart {
                            symbol: app.symbol.clone(),
                            policy,
                        });
                    }
                }
                Tab::HistoricalData => {
                    let period = app.previous_history_period();
                    info!(period = period.label(), "User selected previous period");
                    let _ = command_tx.send(AppCommand::ReloadHistory {
                        symbol: app.symbol.clone(),
                        period,
                    });
                }
                Tab::Options => {
                    if let Some(expiration) = app.previous_expiration() {
                        info!(expiration = %expiration, "User selected previous expiration");
                        let _ = command_tx.send(AppCommand::ReloadOptions {
                            symbol: app.symbol.clone(),
                            expiration,
                        });
                    }
                }
                _ => {}
            }
        }

        Event::Tick => {
            // Tick régulier : rien à faire pour l'instant
        }

        Event::Key(_) => {
            // Toute autre touche : rien
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// CONCEPT RUST : Terminal raw mode
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// - Crossterm gère tout ça de manière cross-platform
//
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
///
/// CONCEPT : Cleanup et RAII
/// - Appelé dans main() même en cas d'erreur
/// - Restaure le terminal pour ne pas le laisser cassé
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
