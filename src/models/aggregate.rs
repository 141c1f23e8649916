// ============================================================================
// Pipeline d'agrégation OHLCV
// ============================================================================
// Ré-échantillonne une série de barres vers une granularité calendaire
// (jour / semaine / mois) avec des réducteurs fixes, puis dérive les
// colonnes Change et %Change.
//
// Réducteurs, non configurables :
//   Open = premier, High = max, Low = min, Close = dernier, Volume = somme,
//   Dividends = somme, Stock Splits = somme.
//
// Le regroupement se fait en heure locale de la place de cotation (une
// séance ne doit jamais chevaucher deux buckets journaliers). Les buckets
// vides du calendrier reçoivent un Close recopié du bucket précédent
// (forward-fill), participent à la dérivation de Change/%Change, puis sont
// supprimés par la règle « toute ligne à OHLC incomplet est abandonnée ».
//
// CONCEPTS RUST :
// 1. BTreeMap : regroupement trié par clé de bucket (ordre chronologique)
// 2. Les lignes finales n'ont plus d'Option sur OHLC : la suppression des
//    buckets incomplets rend les champs pleins par construction
// ============================================================================

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::bar::BarSeries;

/// Granularité cible de l'agrégation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Garde la granularité du fetch : aucun regroupement, seules les
    /// colonnes dérivées sont ajoutées (chemin du graphique)
    Native,
    /// Un bucket par jour de calendrier
    Daily,
    /// Un bucket par semaine (clôture le dimanche)
    Weekly,
    /// Un bucket par mois de calendrier
    Monthly,
}

impl Frequency {
    /// Label affiché dans le sélecteur de l'onglet Historical Data
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Native => "native",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }

    /// Fréquences proposées par l'onglet Historical Data
    pub fn history_choices() -> &'static [Frequency] {
        &[Frequency::Daily, Frequency::Weekly, Frequency::Monthly]
    }
}

/// Une ligne agrégée
///
/// `percent_change` est déjà formaté ("12.34%") : c'est une colonne
/// d'affichage, None sur la première ligne. `dividends` / `splits` ne sont
/// présents que si la série source portait les opérations sur titre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    /// Fin du bucket (minuit local converti en UTC ; timestamp d'origine
    /// pour la fréquence Native)
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Close - Close précédent (None sur la première ligne)
    pub change: Option<f64>,
    /// Variation en % formatée avec 2 décimales (None sur la première ligne)
    pub percent_change: Option<String>,
    pub dividends: Option<f64>,
    pub splits: Option<f64>,
}

impl AggregatedRow {
    /// Vérifie si la ligne est haussière (pour le rendu)
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Série agrégée, triée par timestamp croissant
///
/// L'ordre décroissant (plus récent en premier) de l'onglet Historical Data
/// est une transformation d'affichage, pas une propriété de cette structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub symbol: String,
    pub frequency: Frequency,
    pub includes_actions: bool,
    pub utc_offset_secs: i32,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&AggregatedRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&AggregatedRow> {
        self.rows.last()
    }

    /// Prix minimum sur la série (colonne Low)
    pub fn min_price(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.low)
            .min_by(|a, b| a.partial_cmp(b).unwrap())
    }

    /// Prix maximum sur la série (colonne High)
    pub fn max_price(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.high)
            .max_by(|a, b| a.partial_cmp(b).unwrap())
    }

    /// Volume maximum (échelle du panneau volume)
    pub fn max_volume(&self) -> Option<u64> {
        self.rows.iter().map(|r| r.volume).max()
    }

    /// Convertit un timestamp UTC en heure locale de la place
    pub fn local_time(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        use chrono::offset::Offset;
        let offset =
            FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix());
        ts.with_timezone(&offset)
    }
}

/// Accumulateur d'un bucket pendant le regroupement
struct BucketAccum {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    dividends: f64,
    splits: f64,
}

/// Ligne de travail avant suppression des buckets incomplets
struct WorkingRow {
    end: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: u64,
    dividends: f64,
    splits: f64,
}

/// Agrège une série de barres vers la fréquence cible
///
/// La série d'entrée est triée par timestamp croissant (invariant de
/// BarSeries) ; la sortie l'est aussi. Une série vide produit une série
/// agrégée vide, jamais une erreur.
pub fn aggregate(series: &BarSeries, frequency: Frequency) -> AggregatedSeries {
    match frequency {
        Frequency::Native => aggregate_native(series),
        Frequency::Daily | Frequency::Weekly | Frequency::Monthly => {
            aggregate_calendar(series, frequency)
        }
    }
}

/// Chemin Native : pas de regroupement, dérivation des colonnes seulement
fn aggregate_native(series: &BarSeries) -> AggregatedSeries {
    let mut rows: Vec<AggregatedRow> = Vec::with_capacity(series.len());

    for (i, bar) in series.bars.iter().enumerate() {
        let (change, percent_change) = if i == 0 {
            (None, None)
        } else {
            derive_change(series.bars[i - 1].close, bar.close)
        };

        rows.push(AggregatedRow {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            change,
            percent_change,
            dividends: series.includes_actions.then_some(bar.dividend),
            splits: series.includes_actions.then_some(bar.split),
        });
    }

    AggregatedSeries {
        symbol: series.symbol.clone(),
        frequency: Frequency::Native,
        includes_actions: series.includes_actions,
        utc_offset_secs: series.utc_offset_secs,
        rows,
    }
}

/// Chemin calendaire : regroupement par jour / semaine / mois
fn aggregate_calendar(series: &BarSeries, frequency: Frequency) -> AggregatedSeries {
    let offset = series.utc_offset();

    // 1. Regroupement des barres par fin de bucket (heure locale)
    let mut buckets: BTreeMap<NaiveDate, BucketAccum> = BTreeMap::new();
    for bar in &series.bars {
        let local_date = bar.timestamp.with_timezone(&offset).date_naive();
        let end = bucket_end(frequency, local_date);

        buckets
            .entry(end)
            .and_modify(|acc| {
                acc.high = acc.high.max(bar.high);
                acc.low = acc.low.min(bar.low);
                acc.close = bar.close;
                acc.volume += bar.volume;
                acc.dividends += bar.dividend;
                acc.splits += bar.split;
            })
            .or_insert(BucketAccum {
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                dividends: bar.dividend,
                splits: bar.split,
            });
    }

    // 2. Matérialisation du calendrier complet entre premier et dernier bucket
    //    (les trous — week-ends, jours fériés — deviennent des buckets vides)
    let mut working: Vec<WorkingRow> = Vec::new();
    if let (Some(first), Some(last)) = (
        buckets.keys().next().copied(),
        buckets.keys().next_back().copied(),
    ) {
        let mut end = first;
        while end <= last {
            match buckets.get(&end) {
                Some(acc) => working.push(WorkingRow {
                    end,
                    open: Some(acc.open),
                    high: Some(acc.high),
                    low: Some(acc.low),
                    close: Some(acc.close),
                    volume: acc.volume,
                    dividends: acc.dividends,
                    splits: acc.splits,
                }),
                None => working.push(WorkingRow {
                    end,
                    open: None,
                    high: None,
                    low: None,
                    close: None,
                    volume: 0,
                    dividends: 0.0,
                    splits: 0.0,
                }),
            }
            end = next_bucket_end(frequency, end);
        }
    }

    // 3. Forward-fill du Close sur les buckets vides (le premier bucket
    //    n'est jamais vide : le calendrier démarre sur une barre réelle)
    for i in 1..working.len() {
        if working[i].close.is_none() {
            working[i].close = working[i - 1].close;
        }
    }

    // 4. Dérivation de Change / %Change, strictement après le forward-fill
    let mut derived: Vec<(Option<f64>, Option<String>)> = Vec::with_capacity(working.len());
    for i in 0..working.len() {
        if i == 0 {
            derived.push((None, None));
            continue;
        }
        match (working[i - 1].close, working[i].close) {
            (Some(prev), Some(curr)) => derived.push(derive_change(prev, curr)),
            _ => derived.push((None, None)),
        }
    }

    // 5. Suppression des buckets à OHLC incomplet et émission des lignes
    let mut rows: Vec<AggregatedRow> = Vec::with_capacity(buckets.len());
    for (row, (change, percent_change)) in working.into_iter().zip(derived) {
        match (row.open, row.high, row.low, row.close) {
            (Some(open), Some(high), Some(low), Some(close)) => {
                rows.push(AggregatedRow {
                    timestamp: bucket_end_to_utc(row.end, series.utc_offset_secs),
                    open,
                    high,
                    low,
                    close,
                    volume: row.volume,
                    change,
                    percent_change,
                    dividends: series.includes_actions.then_some(row.dividends),
                    splits: series.includes_actions.then_some(row.splits),
                });
            }
            _ => {} // bucket vide (ou forward-fill seul) : abandonné
        }
    }

    AggregatedSeries {
        symbol: series.symbol.clone(),
        frequency,
        includes_actions: series.includes_actions,
        utc_offset_secs: series.utc_offset_secs,
        rows,
    }
}

/// Change et %Change entre deux clôtures consécutives
fn derive_change(prev: f64, curr: f64) -> (Option<f64>, Option<String>) {
    let change = curr - prev;
    let percent = if prev == 0.0 {
        None
    } else {
        Some(format!("{:.2}%", change / prev * 100.0))
    };
    (Some(change), percent)
}

/// Fin du bucket contenant `date` (la date elle-même en Daily, le dimanche
/// de la semaine en Weekly, le dernier jour du mois en Monthly)
fn bucket_end(frequency: Frequency, date: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Native | Frequency::Daily => date,
        Frequency::Weekly => {
            let to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
            date + Duration::days(to_sunday)
        }
        Frequency::Monthly => month_end(date),
    }
}

/// Fin du bucket suivant
fn next_bucket_end(frequency: Frequency, end: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Native | Frequency::Daily => end + Duration::days(1),
        Frequency::Weekly => end + Duration::days(7),
        Frequency::Monthly => month_end(end + Duration::days(1)),
    }
}

/// Dernier jour du mois de `date`
fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match first_of_next {
        Some(d) => d - Duration::days(1),
        None => date,
    }
}

/// Minuit local de fin de bucket, converti en UTC
fn bucket_end_to_utc(end: NaiveDate, utc_offset_secs: i32) -> DateTime<Utc> {
    let local_midnight = end.and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&(local_midnight - Duration::seconds(utc_offset_secs as i64)))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bar::{Bar, BarSeries, Interval, RangePeriod};
    use chrono::NaiveDate;

    /// Barre de test à la date donnée (12h00 UTC)
    fn bar_at(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Bar {
        let ts = Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());
        Bar::new(ts, open, high, low, close, volume)
    }

    fn daily_series(bars: Vec<Bar>) -> BarSeries {
        let mut series = BarSeries::new("AAPL".to_string(), Interval::D1, RangePeriod::OneMonth);
        series.bars = bars;
        series
    }

    /// Reconstruit une BarSeries depuis une série agrégée (pour vérifier
    /// qu'une ré-agrégation à la même fréquence est sans effet)
    fn as_bar_series(agg: &AggregatedSeries, interval: Interval) -> BarSeries {
        let mut series = BarSeries::new(agg.symbol.clone(), interval, RangePeriod::OneMonth);
        series.utc_offset_secs = agg.utc_offset_secs;
        series.includes_actions = agg.includes_actions;
        for row in &agg.rows {
            let mut bar = Bar::new(
                row.timestamp,
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume,
            );
            bar.dividend = row.dividends.unwrap_or(0.0);
            bar.split = row.splits.unwrap_or(0.0);
            series.push(bar);
        }
        series
    }

    #[test]
    fn test_reducers_on_single_bucket() {
        // 3 barres intraday le même jour : le bucket journalier doit donner
        // Open=premier, High=max, Low=min, Close=dernier, Volume=somme
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut series = daily_series(vec![]);
        series.interval = Interval::H1;
        for (i, (o, h, l, c, v)) in [
            (10.0, 15.0, 9.0, 11.0, 100u64),
            (11.0, 16.0, 8.0, 12.0, 200),
            (12.0, 14.0, 10.0, 13.0, 300),
        ]
        .iter()
        .enumerate()
        {
            let ts = Utc.from_utc_datetime(&date.and_hms_opt(10 + i as u32, 0, 0).unwrap());
            series.push(Bar::new(ts, *o, *h, *l, *c, *v));
        }

        let agg = aggregate(&series, Frequency::Daily);
        assert_eq!(agg.len(), 1);
        let row = &agg.rows[0];
        assert_eq!(row.open, 10.0);
        assert_eq!(row.high, 16.0);
        assert_eq!(row.low, 8.0);
        assert_eq!(row.close, 13.0);
        assert_eq!(row.volume, 600);
    }

    #[test]
    fn test_percent_change_first_row_and_value() {
        let series = daily_series(vec![
            bar_at(
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                100.0,
                101.0,
                99.0,
                100.0,
                1000,
            ),
            bar_at(
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                100.0,
                111.0,
                100.0,
                110.0,
                1000,
            ),
        ]);

        let agg = aggregate(&series, Frequency::Daily);
        assert_eq!(agg.len(), 2);
        assert!(agg.rows[0].change.is_none());
        assert!(agg.rows[0].percent_change.is_none());
        assert_eq!(agg.rows[1].change, Some(10.0));
        assert_eq!(agg.rows[1].percent_change.as_deref(), Some("10.00%"));
    }

    #[test]
    fn test_forward_fill_over_weekend_then_drop() {
        // Vendredi puis lundi : samedi et dimanche sont des buckets vides,
        // remplis par forward-fill puis abandonnés. La variation du lundi
        // est calculée contre le Close recopié (= celui du vendredi).
        let friday = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let series = daily_series(vec![
            bar_at(friday, 99.0, 101.0, 98.0, 100.0, 1000),
            bar_at(monday, 100.0, 111.0, 100.0, 110.0, 2000),
        ]);

        let agg = aggregate(&series, Frequency::Daily);
        assert_eq!(agg.len(), 2, "les buckets du week-end doivent disparaître");
        assert_eq!(agg.rows[1].change, Some(10.0));
        assert_eq!(agg.rows[1].percent_change.as_deref(), Some("10.00%"));
    }

    #[test]
    fn test_weekly_bucket_ends_on_sunday() {
        // Lundi 4 au vendredi 8 mars 2024 → un seul bucket, daté dimanche 10
        let mut bars = Vec::new();
        for day in 4..=8 {
            let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
            bars.push(bar_at(date, 10.0, 12.0, 9.0, 11.0, 100));
        }
        let agg = aggregate(&daily_series(bars), Frequency::Weekly);
        assert_eq!(agg.len(), 1);
        let local = agg.local_time(agg.rows[0].timestamp);
        assert_eq!(
            local.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(agg.rows[0].volume, 500);
    }

    #[test]
    fn test_monthly_bucket_ends_on_month_end() {
        let bars = vec![
            bar_at(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 10.0, 12.0, 9.0, 11.0, 100),
            bar_at(NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(), 11.0, 13.0, 10.0, 12.0, 100),
        ];
        let agg = aggregate(&daily_series(bars), Frequency::Monthly);
        assert_eq!(agg.len(), 1);
        let local = agg.local_time(agg.rows[0].timestamp);
        assert_eq!(
            local.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        // Trois semaines dont une vide au milieu : ré-agréger le résultat à
        // la même fréquence doit rendre une série identique
        let bars = vec![
            bar_at(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 10.0, 12.0, 9.0, 11.0, 100),
            bar_at(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 11.0, 13.0, 10.0, 12.0, 150),
            bar_at(NaiveDate::from_ymd_opt(2024, 3, 19).unwrap(), 12.0, 14.0, 11.0, 13.0, 200),
            bar_at(NaiveDate::from_ymd_opt(2024, 3, 21).unwrap(), 13.0, 15.0, 12.0, 14.0, 250),
        ];
        let once = aggregate(&daily_series(bars), Frequency::Weekly);
        let twice = aggregate(&as_bar_series(&once, Interval::W1), Frequency::Weekly);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_native_keeps_timestamps_and_derives_changes() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut series = daily_series(vec![]);
        series.interval = Interval::M30;
        let t0 = Utc.from_utc_datetime(&date.and_hms_opt(14, 30, 0).unwrap());
        let t1 = Utc.from_utc_datetime(&date.and_hms_opt(15, 0, 0).unwrap());
        series.push(Bar::new(t0, 100.0, 101.0, 99.0, 100.0, 10));
        series.push(Bar::new(t1, 100.0, 103.0, 100.0, 102.0, 20));

        let agg = aggregate(&series, Frequency::Native);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.rows[0].timestamp, t0);
        assert_eq!(agg.rows[1].timestamp, t1);
        assert_eq!(agg.rows[1].change, Some(2.0));
        assert_eq!(agg.rows[1].percent_change.as_deref(), Some("2.00%"));
    }

    #[test]
    fn test_actions_summed_only_when_present() {
        let date1 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let date2 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut with_actions = daily_series(vec![
            bar_at(date1, 10.0, 12.0, 9.0, 11.0, 100),
            bar_at(date2, 11.0, 13.0, 10.0, 12.0, 100),
        ]);
        with_actions.includes_actions = true;
        with_actions.bars[0].dividend = 0.50;
        with_actions.bars[1].dividend = 0.25;

        let agg = aggregate(&with_actions, Frequency::Weekly);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.rows[0].dividends, Some(0.75));
        assert_eq!(agg.rows[0].splits, Some(0.0));

        let without = daily_series(vec![bar_at(date1, 10.0, 12.0, 9.0, 11.0, 100)]);
        let agg = aggregate(&without, Frequency::Daily);
        assert!(agg.rows[0].dividends.is_none());
        assert!(agg.rows[0].splits.is_none());
    }

    #[test]
    fn test_empty_series_aggregates_to_empty() {
        let agg = aggregate(&daily_series(vec![]), Frequency::Monthly);
        assert!(agg.is_empty());
        assert!(agg.min_price().is_none());
    }

    #[test]
    fn test_exchange_local_bucketing() {
        use chrono::Timelike;

        // Place à UTC+10 (Sydney) : une barre à 23h30 UTC le 4 mars tombe
        // le 5 mars en heure locale, donc dans le bucket du 5
        let ts = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(23, 30, 0)
                .unwrap(),
        );
        let mut series = daily_series(vec![Bar::new(ts, 10.0, 12.0, 9.0, 11.0, 100)]);
        series.utc_offset_secs = 10 * 3600;

        let agg = aggregate(&series, Frequency::Daily);
        assert_eq!(agg.len(), 1);
        let local = agg.local_time(agg.rows[0].timestamp);
        assert_eq!(
            local.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(local.hour(), 0);
    }
}
