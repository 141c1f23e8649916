// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du dashboard TUI : symbole courant, onglet actif,
// sélections de fenêtre/période/échéance et l'état de chargement de chaque
// section de données.
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Enums génériques : SectionState<T> pour le cycle Loading → Ready
// 3. Mutabilité contrôlée : &mut self pour modifier l'état
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Le worker réseau ne touche jamais App directement : il envoie des
//   résultats que la boucle principale applique via ces méthodes
// ============================================================================

use chrono::NaiveDate;

use crate::models::{
    aggregate, available_windows, AggregatedSeries, BarSeries, Frequency, FundComposition,
    OptionChain, QuoteSnapshot, RangePeriod, WindowAnnotation, WindowPolicy,
};

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois, le compilateur force l'exhaustivité
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : le dashboard à onglets du symbole courant
    Dashboard,

    /// Mode saisie : capture un symbole au clavier
    /// CONCEPT : Modal input mode (Vim-like)
    /// - Capture les touches pour construire un buffer
    /// - Enter valide, ESC annule
    InputMode,
}

/// Onglets du dashboard, dans l'ordre d'affichage
///
/// Les chiffres 1-9 sautent directement à l'onglet correspondant,
/// Tab / Shift+Tab passent à l'onglet suivant / précédent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Summary,
    Chart,
    Statistics,
    HistoricalData,
    Profile,
    Financials,
    Holdings,
    Analysis,
    Options,
}

impl Tab {
    /// Tous les onglets dans l'ordre de la barre
    pub const ALL: [Tab; 9] = [
        Tab::Summary,
        Tab::Chart,
        Tab::Statistics,
        Tab::HistoricalData,
        Tab::Profile,
        Tab::Financials,
        Tab::Holdings,
        Tab::Analysis,
        Tab::Options,
    ];

    /// Libellé affiché dans la barre d'onglets
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Summary => "Summary",
            Tab::Chart => "Chart",
            Tab::Statistics => "Statistics",
            Tab::HistoricalData => "Historical Data",
            Tab::Profile => "Profile",
            Tab::Financials => "Financials",
            Tab::Holdings => "Holdings",
            Tab::Analysis => "Analysis",
            Tab::Options => "Options",
        }
    }

    /// Position dans la barre d'onglets
    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// Onglet associé à une touche chiffre ('1' → Summary, '9' → Options)
    pub fn from_digit(digit: u32) -> Option<Tab> {
        match digit {
            1..=9 => Some(Tab::ALL[(digit - 1) as usize]),
            _ => None,
        }
    }

    /// Onglet suivant (cycle)
    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    /// Onglet précédent (cycle inverse)
    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Style de rendu du graphique, cyclé avec 'c'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Line,
    Area,
    Candlestick,
}

impl ChartStyle {
    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "Line",
            ChartStyle::Area => "Area",
            ChartStyle::Candlestick => "Candles",
        }
    }

    /// Style suivant : Line → Area → Candles → Line
    pub fn next(&self) -> ChartStyle {
        match self {
            ChartStyle::Line => ChartStyle::Area,
            ChartStyle::Area => ChartStyle::Candlestick,
            ChartStyle::Candlestick => ChartStyle::Line,
        }
    }
}

/// Cycle de vie d'une section de données
///
/// CONCEPT RUST : Enum générique
/// - Chaque section (snapshot, graphique, historique, ...) se charge
///   indépendamment : une section en échec n'empêche pas les autres
/// - Unavailable porte le message affiché dans l'onglet
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    /// Chargement en cours (spinner dans l'onglet)
    Loading,
    /// Données prêtes à afficher
    Ready(T),
    /// Données indisponibles, avec la raison
    Unavailable(String),
}

impl<T> SectionState<T> {
    /// Référence aux données si la section est prête
    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }
}

/// Sections adressables par un résultat d'erreur du worker
///
/// Snapshot couvre tous les onglets fondamentaux (Summary, Statistics,
/// Profile, Financials, Analysis) : ils lisent le même dictionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Snapshot,
    Chart,
    History,
    Holdings,
    Options,
}

/// Série agrégée prête à tracer, avec sa synthèse de fenêtre
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub series: AggregatedSeries,
    pub annotation: Option<WindowAnnotation>,
}

/// État principal de l'application
///
/// CONCEPT RUST : Struct avec champs publics + méthodes de transition
/// - L'UI lit les champs directement (rendu immédiat, pas de getters)
/// - Les transitions d'état passent par les méthodes
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de 'q' : confirm_quit = true
    /// - 'y' : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,

    /// Buffer de saisie pour le mode Input
    pub input_buffer: String,

    /// Prompt affiché en mode Input ("Ticker: ")
    pub input_prompt: String,

    /// Symbole affiché par le dashboard ("" tant que rien n'est chargé)
    pub symbol: String,

    /// Erreur fatale du symbole (introuvable) : écran d'erreur plein cadre
    pub symbol_error: Option<String>,

    /// Onglet actif
    pub current_tab: Tab,

    /// Snapshot fusionné, source des onglets fondamentaux
    pub snapshot: SectionState<QuoteSnapshot>,

    /// Résultat de la sonde intraday : choisit la table de fenêtres
    pub has_intraday: bool,

    /// Index de la fenêtre active dans available_windows(has_intraday)
    pub window_index: usize,

    /// Style de rendu du graphique
    pub chart_style: ChartStyle,

    /// Série du graphique pour la fenêtre active
    pub chart: SectionState<ChartData>,

    /// Index de la période active dans RangePeriod::history_choices()
    pub history_period_index: usize,

    /// Index de la fréquence active dans Frequency::history_choices()
    pub history_frequency_index: usize,

    /// Série quotidienne brute de l'onglet Historical Data (avec actions)
    pub history: SectionState<BarSeries>,

    /// Série ré-échantillonnée à la fréquence active, dérivée de history
    pub history_view: Option<AggregatedSeries>,

    /// Composition du fonds (onglet Holdings)
    pub holdings: SectionState<FundComposition>,

    /// Échéances d'options connues pour le symbole
    pub options_expirations: Vec<NaiveDate>,

    /// Index de l'échéance active dans options_expirations
    pub options_index: usize,

    /// Chaîne d'options de l'échéance active
    pub options: SectionState<OptionChain>,
}

impl App {
    /// Crée une nouvelle instance sans symbole chargé
    ///
    /// CONCEPT RUST : Constructor pattern
    /// - Convention : fonction associée nommée "new()"
    /// - Les sections démarrent Unavailable : rien à charger sans symbole
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            input_buffer: String::new(),
            input_prompt: String::new(),
            symbol: String::new(),
            symbol_error: None,
            current_tab: Tab::Summary,
            snapshot: SectionState::Unavailable("No ticker loaded".to_string()),
            has_intraday: true,
            window_index: 0,
            chart_style: ChartStyle::Line,
            chart: SectionState::Unavailable("No ticker loaded".to_string()),
            history_period_index: default_history_period_index(),
            history_frequency_index: 0,
            history: SectionState::Unavailable("No ticker loaded".to_string()),
            history_view: None,
            holdings: SectionState::Unavailable("No ticker loaded".to_string()),
            options_expirations: Vec::new(),
            options_index: 0,
            options: SectionState::Unavailable("No ticker loaded".to_string()),
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// CONCEPT : Event Loop Pattern
    /// - tick() est appelé régulièrement même sans événement utilisateur
    /// - Le redraw qui suit fait tourner les spinners de chargement
    pub fn tick(&mut self) {
        // Rien à mettre à jour hors rendu pour l'instant
    }

    // ========================================================================
    // Chargement d'un symbole
    // ========================================================================

    /// Bascule tout l'état sur un nouveau symbole en cours de chargement
    ///
    /// Toutes les sections repassent Loading, les sélections reviennent aux
    /// défauts (onglet Summary, 1ère fenêtre, période 1Y, fréquence Daily).
    pub fn symbol_loading(&mut self, symbol: String) {
        self.symbol = symbol;
        self.symbol_error = None;
        self.current_tab = Tab::Summary;
        self.snapshot = SectionState::Loading;
        self.has_intraday = true;
        self.window_index = 0;
        self.chart = SectionState::Loading;
        self.history_period_index = default_history_period_index();
        self.history_frequency_index = 0;
        self.history = SectionState::Loading;
        self.history_view = None;
        self.holdings = SectionState::Loading;
        self.options_expirations.clear();
        self.options_index = 0;
        self.options = SectionState::Loading;
    }

    /// Symbole introuvable : écran d'erreur jusqu'à la prochaine saisie
    pub fn symbol_not_found(&mut self, message: String) {
        self.symbol_error = Some(message);
    }

    /// Applique le résultat de la sonde intraday
    ///
    /// La table de fenêtres change de taille : l'index revient sur la
    /// première entrée (1d en intraday, 1mo en daily-only).
    pub fn set_intraday(&mut self, has_intraday: bool) {
        self.has_intraday = has_intraday;
        self.window_index = 0;
    }

    pub fn set_snapshot(&mut self, snapshot: QuoteSnapshot) {
        self.snapshot = SectionState::Ready(snapshot);
    }

    pub fn set_chart(&mut self, series: AggregatedSeries, annotation: Option<WindowAnnotation>) {
        self.chart = SectionState::Ready(ChartData { series, annotation });
    }

    /// Pose la série brute de l'historique et dérive la vue agrégée
    pub fn set_history(&mut self, source: BarSeries) {
        self.history = SectionState::Ready(source);
        self.rebuild_history_view();
    }

    pub fn set_holdings(&mut self, composition: FundComposition) {
        self.holdings = SectionState::Ready(composition);
    }

    /// Pose la chaîne reçue et aligne l'échéance active dessus
    pub fn set_options(&mut self, expirations: Vec<NaiveDate>, chain: OptionChain) {
        self.options_index = expirations
            .iter()
            .position(|&d| d == chain.expiration)
            .unwrap_or(0);
        self.options_expirations = expirations;
        self.options = SectionState::Ready(chain);
    }

    /// Marque une section indisponible avec sa raison
    pub fn set_section_error(&mut self, section: Section, message: String) {
        match section {
            Section::Snapshot => self.snapshot = SectionState::Unavailable(message),
            Section::Chart => self.chart = SectionState::Unavailable(message),
            Section::History => {
                self.history = SectionState::Unavailable(message);
                self.history_view = None;
            }
            Section::Holdings => self.holdings = SectionState::Unavailable(message),
            Section::Options => self.options = SectionState::Unavailable(message),
        }
    }

    // ========================================================================
    // Navigation entre onglets
    // ========================================================================

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = self.current_tab.previous();
    }

    pub fn goto_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    // ========================================================================
    // Graphique : fenêtres et style
    // ========================================================================

    /// Fenêtres proposées pour ce symbole (intraday ou daily-only)
    pub fn windows(&self) -> &'static [WindowPolicy] {
        available_windows(self.has_intraday)
    }

    /// Politique de la fenêtre active
    pub fn current_policy(&self) -> Option<&'static WindowPolicy> {
        self.windows().get(self.window_index)
    }

    /// Fenêtre suivante ; retourne la politique à charger
    pub fn next_window(&mut self) -> Option<&'static WindowPolicy> {
        let windows = self.windows();
        self.window_index = (self.window_index + 1) % windows.len();
        self.chart = SectionState::Loading;
        windows.get(self.window_index)
    }

    /// Fenêtre précédente ; retourne la politique à charger
    pub fn previous_window(&mut self) -> Option<&'static WindowPolicy> {
        let windows = self.windows();
        self.window_index = (self.window_index + windows.len() - 1) % windows.len();
        self.chart = SectionState::Loading;
        windows.get(self.window_index)
    }

    /// Style de graphique suivant (touche 'c')
    pub fn cycle_chart_style(&mut self) {
        self.chart_style = self.chart_style.next();
    }

    // ========================================================================
    // Historical Data : période et fréquence
    // ========================================================================

    pub fn history_period(&self) -> RangePeriod {
        RangePeriod::history_choices()[self.history_period_index]
    }

    pub fn history_frequency(&self) -> Frequency {
        Frequency::history_choices()[self.history_frequency_index]
    }

    /// Période suivante ; la série doit être rechargée
    pub fn next_history_period(&mut self) -> RangePeriod {
        let choices = RangePeriod::history_choices();
        self.history_period_index = (self.history_period_index + 1) % choices.len();
        self.history = SectionState::Loading;
        self.history_view = None;
        choices[self.history_period_index]
    }

    /// Période précédente ; la série doit être rechargée
    pub fn previous_history_period(&mut self) -> RangePeriod {
        let choices = RangePeriod::history_choices();
        self.history_period_index =
            (self.history_period_index + choices.len() - 1) % choices.len();
        self.history = SectionState::Loading;
        self.history_view = None;
        choices[self.history_period_index]
    }

    /// Fréquence suivante : ré-échantillonnage local, aucun appel réseau
    pub fn cycle_history_frequency(&mut self) {
        let choices = Frequency::history_choices();
        self.history_frequency_index = (self.history_frequency_index + 1) % choices.len();
        self.rebuild_history_view();
    }

    fn rebuild_history_view(&mut self) {
        self.history_view = self
            .history
            .ready()
            .map(|source| aggregate(source, self.history_frequency()));
    }

    // ========================================================================
    // Options : échéances
    // ========================================================================

    /// Échéance active
    pub fn current_expiration(&self) -> Option<NaiveDate> {
        self.options_expirations.get(self.options_index).copied()
    }

    /// Échéance suivante ; retourne la date à charger
    pub fn next_expiration(&mut self) -> Option<NaiveDate> {
        if self.options_expirations.is_empty() {
            return None;
        }
        self.options_index = (self.options_index + 1) % self.options_expirations.len();
        self.options = SectionState::Loading;
        self.current_expiration()
    }

    /// Échéance précédente ; retourne la date à charger
    pub fn previous_expiration(&mut self) -> Option<NaiveDate> {
        if self.options_expirations.is_empty() {
            return None;
        }
        let len = self.options_expirations.len();
        self.options_index = (self.options_index + len - 1) % len;
        self.options = SectionState::Loading;
        self.current_expiration()
    }

    // ========================================================================
    // Two-step quit
    // ========================================================================

    /// Demande la confirmation de quitter (première pression de 'q')
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode input avec un prompt donné
    ///
    /// CONCEPT : Modal input (Vim-like)
    /// - Change l'écran vers InputMode
    /// - Initialise le buffer vide
    pub fn start_input(&mut self, prompt: String) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = prompt;
    }

    /// Annule le mode input et retourne au dashboard
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Récupère le symbole saisi (normalisé en majuscules) et ferme le mode
    pub fn submit_input(&mut self) -> String {
        let value = self.input_buffer.trim().to_uppercase();
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
        value
    }

    /// Ajoute un caractère au buffer d'input
    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Supprime le dernier caractère du buffer
    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Vérifie si on est en mode input
    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }
}

/// Index de la période historique par défaut (1Y)
fn default_history_period_index() -> usize {
    RangePeriod::history_choices()
        .iter()
        .position(|&p| p == RangePeriod::OneYear)
        .unwrap_or(0)
}

// ============================================================================
// Trait Default
// ============================================================================
// Convention Rust : si new() ne prend pas de paramètres, implémenter Default
// ============================================================================

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bar, Interval};
    use chrono::{TimeZone, Utc};

    fn daily_series(closes: &[f64]) -> BarSeries {
        let mut series =
            BarSeries::new("AAPL".to_string(), Interval::D1, RangePeriod::OneMonth);
        for (i, &close) in closes.iter().enumerate() {
            let ts = Utc.with_ymd_and_hms(2024, 3, 4 + i as u32, 14, 30, 0).unwrap();
            series.push(Bar::new(ts, close, close + 1.0, close - 1.0, close, 1000));
        }
        series
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.current_tab, Tab::Summary);
        assert!(app.symbol.is_empty());
        assert!(app.snapshot.ready().is_none());
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut app = App::new();
        app.goto_tab(Tab::Options);
        app.next_tab();
        assert_eq!(app.current_tab, Tab::Summary);

        app.previous_tab();
        assert_eq!(app.current_tab, Tab::Options);
    }

    #[test]
    fn test_tab_from_digit() {
        assert_eq!(Tab::from_digit(1), Some(Tab::Summary));
        assert_eq!(Tab::from_digit(4), Some(Tab::HistoricalData));
        assert_eq!(Tab::from_digit(9), Some(Tab::Options));
        assert_eq!(Tab::from_digit(0), None);
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.request_quit();
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_input_mode_submit_normalizes() {
        let mut app = App::new();
        app.start_input("Ticker: ".to_string());
        assert!(app.is_in_input_mode());

        for c in " aapl ".chars() {
            app.append_char(c);
        }
        app.backspace(); // retire l'espace final
        assert_eq!(app.input_buffer, " aapl");

        let symbol = app.submit_input();
        assert_eq!(symbol, "AAPL");
        assert!(!app.is_in_input_mode());
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn test_symbol_loading_resets_state() {
        let mut app = App::new();
        app.goto_tab(Tab::Options);
        app.window_index = 3;

        app.symbol_loading("MSFT".to_string());
        assert_eq!(app.symbol, "MSFT");
        assert_eq!(app.current_tab, Tab::Summary);
        assert_eq!(app.window_index, 0);
        assert!(app.snapshot.is_loading());
        assert!(app.chart.is_loading());
        assert!(app.options.is_loading());
        assert_eq!(app.history_period(), RangePeriod::OneYear);
        assert_eq!(app.history_frequency(), Frequency::Daily);
    }

    #[test]
    fn test_intraday_probe_switches_window_table() {
        let mut app = App::new();
        app.window_index = 5;

        app.set_intraday(false);
        assert_eq!(app.window_index, 0);
        assert_eq!(app.windows().len(), 5);
        // daily-only : toutes les politiques restantes sont >= 1 jour
        assert!(app.windows().iter().all(|p| !p.interval.is_intraday()));

        app.set_intraday(true);
        assert_eq!(app.windows().len(), 8);
    }

    #[test]
    fn test_window_cycling_wraps() {
        let mut app = App::new();
        let count = app.windows().len();

        app.previous_window();
        assert_eq!(app.window_index, count - 1);
        app.next_window();
        assert_eq!(app.window_index, 0);
        assert!(app.chart.is_loading());
    }

    #[test]
    fn test_chart_style_cycles() {
        let mut app = App::new();
        assert_eq!(app.chart_style, ChartStyle::Line);
        app.cycle_chart_style();
        assert_eq!(app.chart_style, ChartStyle::Area);
        app.cycle_chart_style();
        assert_eq!(app.chart_style, ChartStyle::Candlestick);
        app.cycle_chart_style();
        assert_eq!(app.chart_style, ChartStyle::Line);
    }

    #[test]
    fn test_history_frequency_reaggregates_locally() {
        let mut app = App::new();
        app.symbol_loading("AAPL".to_string());
        app.set_history(daily_series(&[100.0, 101.0, 102.0, 103.0, 104.0]));

        let daily_rows = app.history_view.as_ref().unwrap().len();
        assert!(daily_rows > 0);

        app.cycle_history_frequency();
        assert_eq!(app.history_frequency(), Frequency::Weekly);
        let weekly = app.history_view.as_ref().unwrap();
        assert_eq!(weekly.frequency, Frequency::Weekly);
        // toujours Ready : aucun rechargement nécessaire
        assert!(app.history.ready().is_some());
    }

    #[test]
    fn test_options_selection_follows_chain() {
        let mut app = App::new();
        let expirations = vec![
            NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 19).unwrap(),
        ];
        let chain = OptionChain {
            symbol: "AAPL".to_string(),
            expiration: expirations[1],
            calls: Vec::new(),
            puts: Vec::new(),
        };

        app.set_options(expirations.clone(), chain);
        assert_eq!(app.options_index, 1);
        assert_eq!(app.current_expiration(), Some(expirations[1]));

        let next = app.next_expiration();
        assert_eq!(next, Some(expirations[2]));
        assert!(app.options.is_loading());

        // wrap en avançant depuis la dernière échéance
        let wrapped = app.next_expiration();
        assert_eq!(wrapped, Some(expirations[0]));
    }

    #[test]
    fn test_section_error_routing() {
        let mut app = App::new();
        app.symbol_loading("AAPL".to_string());

        app.set_section_error(Section::Chart, "no data".to_string());
        assert_eq!(
            app.chart,
            SectionState::Unavailable("no data".to_string())
        );
        // les autres sections ne bougent pas
        assert!(app.snapshot.is_loading());
    }
}
