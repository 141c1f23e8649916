// ============================================================================
// Structures : Bar (OHLCV) et BarSeries
// ============================================================================
// Une barre = une observation Open/High/Low/Close/Volume à un instant donné,
// éventuellement enrichie des opérations sur titre (dividende, split).
// Une série = les barres d'un instrument pour une requête (interval, period).
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : type de chrono pour dates avec timezone UTC
// 2. f64 : floating point 64 bits pour les prix (précision suffisante)
// 3. u64 : unsigned 64 bits pour le volume (toujours positif)
// 4. FixedOffset : décalage horaire de la place de cotation (heure locale)
// ============================================================================

use chrono::offset::Offset;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Granularité des barres demandées au provider
///
/// CONCEPT : Interval vs RangePeriod
/// - Interval : granularité des barres (2m, 30m, 1d, etc.)
/// - RangePeriod : fenêtre totale couverte (1 jour, 6 mois, max, etc.)
/// - Le couple est choisi par la table de politique de fenêtre (window.rs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 minute (utilisé uniquement par la sonde intraday)
    M1,
    /// 2 minutes
    M2,
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 30 minutes
    M30,
    /// 1 heure
    H1,
    /// 1 jour (daily)
    D1,
    /// 1 semaine (weekly)
    W1,
    /// 1 mois (monthly)
    Mo1,
}

impl Interval {
    /// Convertit l'intervalle en string pour l'API Yahoo Finance
    ///
    /// CONCEPT RUST : &'static str
    /// - Retourne une string littérale (dans le binaire)
    /// - Lifetime 'static : vit pendant toute l'exécution
    /// - Pas d'allocation, très efficace
    pub fn to_yahoo_string(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M2 => "2m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::Mo1 => "1mo",
        }
    }

    /// Retourne le label court pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M2 => "2m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
            Interval::Mo1 => "1mo",
        }
    }

    /// Retourne true si l'intervalle est infra-journalier
    ///
    /// Les fonds qui ne publient qu'un cours quotidien n'ont pas de barres
    /// pour ces granularités : la table de politique daily-only les exclut.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::M1 | Interval::M2 | Interval::M5 | Interval::M15 | Interval::M30 | Interval::H1
        )
    }
}

/// Fenêtre de récupération côté provider (paramètre `range` de l'API v8)
///
/// CONCEPT : périodes relatives plutôt que timestamps
/// - "ytd" et "max" ne se traduisent pas en nombre de jours fixe
/// - L'API Yahoo accepte directement ces ranges symboliques
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePeriod {
    /// 1 jour de données
    OneDay,
    /// 5 jours
    FiveDays,
    /// 1 mois
    OneMonth,
    /// 3 mois
    ThreeMonths,
    /// 6 mois
    SixMonths,
    /// Depuis le 1er janvier (year-to-date)
    YearToDate,
    /// 1 an
    OneYear,
    /// 5 ans
    FiveYears,
    /// Tout l'historique disponible
    Max,
}

impl RangePeriod {
    /// Convertit la période en string pour l'API Yahoo Finance
    pub fn to_yahoo_string(&self) -> &'static str {
        match self {
            RangePeriod::OneDay => "1d",
            RangePeriod::FiveDays => "5d",
            RangePeriod::OneMonth => "1mo",
            RangePeriod::ThreeMonths => "3mo",
            RangePeriod::SixMonths => "6mo",
            RangePeriod::YearToDate => "ytd",
            RangePeriod::OneYear => "1y",
            RangePeriod::FiveYears => "5y",
            RangePeriod::Max => "max",
        }
    }

    /// Retourne le label pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            RangePeriod::OneDay => "1D",
            RangePeriod::FiveDays => "5D",
            RangePeriod::OneMonth => "1M",
            RangePeriod::ThreeMonths => "3M",
            RangePeriod::SixMonths => "6M",
            RangePeriod::YearToDate => "YTD",
            RangePeriod::OneYear => "1Y",
            RangePeriod::FiveYears => "5Y",
            RangePeriod::Max => "Max",
        }
    }

    /// Périodes proposées par l'onglet Historical Data
    pub fn history_choices() -> &'static [RangePeriod] {
        &[
            RangePeriod::OneMonth,
            RangePeriod::ThreeMonths,
            RangePeriod::SixMonths,
            RangePeriod::YearToDate,
            RangePeriod::OneYear,
            RangePeriod::FiveYears,
            RangePeriod::Max,
        ]
    }
}

/// Une barre OHLCV
///
/// Immutable une fois produite par l'adaptateur : les timestamps sont ceux
/// des sessions de cotation (irréguliers, pas de barre hors séance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Timestamp de la barre (UTC ; l'heure locale s'obtient via la série)
    pub timestamp: DateTime<Utc>,

    /// Prix d'ouverture (Open)
    pub open: f64,

    /// Prix le plus haut (High)
    pub high: f64,

    /// Prix le plus bas (Low)
    pub low: f64,

    /// Prix de clôture (Close)
    pub close: f64,

    /// Volume échangé
    pub volume: u64,

    /// Dividende versé sur la barre (0.0 si aucun)
    pub dividend: f64,

    /// Ratio de split sur la barre (0.0 si aucun)
    pub split: f64,
}

impl Bar {
    /// Constructeur : crée une barre sans opération sur titre
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            dividend: 0.0,
            split: 0.0,
        }
    }

    /// Vérifie si la barre est haussière (bullish)
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Vérifie si la barre est baissière (bearish)
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Corps de la chandelle (pour le rendu candlestick)
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Mèche haute (upper wick)
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Mèche basse (lower wick)
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }
}

/// Série de barres pour un instrument et une requête (interval, period)
///
/// Invariant : `bars` est trié par timestamp strictement croissant
/// (garanti par l'adaptateur ; l'API renvoie les barres dans l'ordre).
///
/// CONCEPT RUST : Ownership
/// - BarSeries possède le Vec, le Vec possède toutes les Bar
/// - Quand BarSeries est drop, tout est libéré automatiquement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    /// Symbole de l'instrument
    pub symbol: String,

    /// Granularité des barres
    pub interval: Interval,

    /// Fenêtre couverte par la requête
    pub period: RangePeriod,

    /// Décalage de la place de cotation par rapport à UTC, en secondes
    /// (champ `gmtoffset` des métadonnées du provider)
    pub utc_offset_secs: i32,

    /// true si la série a été récupérée avec les opérations sur titre
    /// (colonnes Dividends / Stock Splits présentes à l'agrégation)
    pub includes_actions: bool,

    /// Liste des barres, triées par timestamp croissant
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Crée une série vide
    pub fn new(symbol: String, interval: Interval, period: RangePeriod) -> Self {
        Self {
            symbol,
            interval,
            period,
            utc_offset_secs: 0,
            includes_actions: false,
            bars: Vec::new(),
        }
    }

    /// Ajoute une barre (l'appelant garantit l'ordre croissant)
    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    /// Retourne le nombre de barres
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Vérifie si la série est vide
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Retourne la barre la plus récente
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Décalage horaire de la place sous forme de FixedOffset
    ///
    /// Un gmtoffset aberrant du provider retombe sur UTC plutôt que de
    /// paniquer : seul l'étiquetage des heures en dépend.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    /// Convertit un timestamp UTC en heure locale de la place
    pub fn local_time(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.utc_offset())
    }

    /// Prix minimum sur toute la série (colonne Low)
    pub fn min_price(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(|b| b.low)
            .min_by(|a, b| a.partial_cmp(b).unwrap())
    }

    /// Prix maximum sur toute la série (colonne High)
    pub fn max_price(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(|b| b.high)
            .max_by(|a, b| a.partial_cmp(b).unwrap())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_bar_bullish() {
        let bar = Bar::new(Utc::now(), 100.0, 110.0, 95.0, 105.0, 1000);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
    }

    #[test]
    fn test_bar_bearish() {
        let bar = Bar::new(Utc::now(), 100.0, 105.0, 90.0, 95.0, 1000);
        assert!(bar.is_bearish());
        assert!(!bar.is_bullish());
    }

    #[test]
    fn test_bar_series_push() {
        let mut series = BarSeries::new("AAPL".to_string(), Interval::M30, RangePeriod::OneMonth);

        assert!(series.is_empty());

        series.push(Bar::new(Utc::now(), 100.0, 110.0, 95.0, 105.0, 1000));
        series.push(Bar::new(Utc::now(), 105.0, 115.0, 100.0, 110.0, 1200));

        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
    }

    #[test]
    fn test_min_max_price() {
        let mut series = BarSeries::new("AAPL".to_string(), Interval::D1, RangePeriod::OneMonth);
        series.push(Bar::new(Utc::now(), 100.0, 110.0, 95.0, 105.0, 1000));
        series.push(Bar::new(Utc::now(), 105.0, 120.0, 101.0, 110.0, 1200));

        assert_eq!(series.min_price(), Some(95.0));
        assert_eq!(series.max_price(), Some(120.0));
    }

    #[test]
    fn test_interval_yahoo_string() {
        assert_eq!(Interval::M2.to_yahoo_string(), "2m");
        assert_eq!(Interval::M30.to_yahoo_string(), "30m");
        assert_eq!(Interval::D1.to_yahoo_string(), "1d");
        assert_eq!(Interval::W1.to_yahoo_string(), "1wk");
        assert_eq!(Interval::Mo1.to_yahoo_string(), "1mo");
    }

    #[test]
    fn test_interval_intraday() {
        assert!(Interval::M1.is_intraday());
        assert!(Interval::M30.is_intraday());
        assert!(!Interval::D1.is_intraday());
        assert!(!Interval::W1.is_intraday());
        assert!(!Interval::Mo1.is_intraday());
    }

    #[test]
    fn test_range_period_yahoo_string() {
        assert_eq!(RangePeriod::OneDay.to_yahoo_string(), "1d");
        assert_eq!(RangePeriod::YearToDate.to_yahoo_string(), "ytd");
        assert_eq!(RangePeriod::Max.to_yahoo_string(), "max");
    }

    #[test]
    fn test_local_time_offset() {
        use chrono::Timelike;

        let mut series = BarSeries::new("AAPL".to_string(), Interval::D1, RangePeriod::OneDay);
        // New York : UTC-4 en été
        series.utc_offset_secs = -4 * 3600;

        let ts = Utc::now();
        let local = series.local_time(ts);
        assert_eq!(local.timestamp(), ts.timestamp());
        // 13:30 UTC = 09:30 heure locale
        let utc_1330 = ts.date_naive().and_hms_opt(13, 30, 0).unwrap();
        let local = series.local_time(chrono::TimeZone::from_utc_datetime(&Utc, &utc_1330));
        assert_eq!(local.hour(), 9);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let mut series = BarSeries::new("AAPL".to_string(), Interval::D1, RangePeriod::OneDay);
        series.utc_offset_secs = 999_999_999;
        assert_eq!(series.utc_offset().local_minus_utc(), 0);
    }
}
