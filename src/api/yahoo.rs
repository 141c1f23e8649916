// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère les données financières depuis Yahoo Finance : barres de prix
// (v8/chart), snapshot quoteSummary (v10), composition des fonds (v10) et
// chaînes d'options (v7). Toutes les réponses passent par le cache de session.
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : erreurs typées propagées avec l'opérateur ?
// 3. Serde : désérialisation JSON automatique
// 4. Struct avec état : un client HTTP réutilisé pour toutes les requêtes
// ============================================================================

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::api::cache::{CacheKey, RequestKind, SessionCache};
use crate::models::{
    Bar, BarSeries, DataError, FundComposition, Interval, OptionChain, OptionQuote,
    QuoteSnapshot, RangePeriod, MIN_INTRADAY_BARS,
};

/// Modules quoteSummary demandés pour tout instrument
const SNAPSHOT_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile";

/// Modules quoteSummary propres aux fonds et ETF
const FUND_MODULES: &str = "topHoldings,fundProfile,fundPerformance";

// ============================================================================
// Structures pour parser les réponses JSON de Yahoo Finance
// ============================================================================
// Yahoo retourne un JSON complexe, on définit des structures qui matchent
// exactement la structure JSON pour que serde puisse désérialiser automatiquement
//
// CONCEPT RUST : #[serde(rename_all = "camelCase")]
// - Mappe les noms de champs JSON camelCase vers le snake_case Rust
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<ChartEvents>,
}

/// Métadonnées de la série (la place de cotation fixe le fuseau)
#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

/// Données OHLCV (Open, High, Low, Close, Volume)
///
/// Chaque colonne est un Vec d'Option : Yahoo met null sur les séances
/// sans cotation au lieu d'omettre le timestamp.
#[derive(Debug, Deserialize)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Opérations sur titre (présentes avec &events=div,splits)
#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendEvent>>,
    splits: Option<HashMap<String, SplitEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

/// Résultat v7/finance/options : liste d'échéances + chaîne de l'échéance
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResult {
    expiration_dates: Option<Vec<i64>>,
    options: Option<Vec<OptionsSlice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsSlice {
    expiration_date: Option<i64>,
    calls: Option<Vec<OptionContract>>,
    puts: Option<Vec<OptionContract>>,
}

/// Un contrat d'option côté provider (volume absent quand rien n'a traité)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionContract {
    strike: f64,
    last_price: Option<f64>,
    change: Option<f64>,
    percent_change: Option<f64>,
    volume: Option<u64>,
    open_interest: Option<u64>,
}

// ============================================================================
// Client
// ============================================================================

/// Client Yahoo Finance avec cache de session
///
/// CONCEPT RUST : état partagé par méthodes
/// - Le reqwest::Client maintient un pool de connexions : on le construit
///   une fois et on le réutilise pour toutes les requêtes
/// - Le cache appartient au client, les méthodes prennent &mut self
pub struct YahooClient {
    client: reqwest::Client,
    cache: SessionCache,
}

impl YahooClient {
    /// Construit le client HTTP (User-Agent navigateur, sinon Yahoo bloque)
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;
        Ok(Self {
            client,
            cache: SessionCache::new(),
        })
    }

    /// Oublie les réponses mémorisées d'un symbole (rechargement manuel)
    pub fn forget(&mut self, symbol: &str) {
        self.cache.clear_symbol(symbol);
    }

    /// Récupère une série de barres OHLCV
    ///
    /// `with_actions` ajoute les dividendes et splits à la requête : les
    /// montants sont reportés sur la barre de leur date de détachement.
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Macro tracing qui ajoute automatiquement un span
    /// - Inclut les paramètres de la fonction dans les logs
    #[instrument(skip(self))]
    pub async fn fetch_bars(
        &mut self,
        symbol: &str,
        interval: Interval,
        period: RangePeriod,
        with_actions: bool,
    ) -> Result<BarSeries, DataError> {
        let url = build_chart_url(symbol, interval, period, with_actions);
        debug!(url = %url, "Built chart URL");

        let params = format!(
            "{}/{}{}",
            period.to_yahoo_string(),
            interval.to_yahoo_string(),
            if with_actions { "/actions" } else { "" }
        );
        let key = CacheKey::new(symbol, RequestKind::Bars, params);
        let payload = self.request_json(&url, key).await?;

        let result = extract_result(&payload, "chart", symbol)?;
        let chart: ChartResult = serde_json::from_value(result.clone())
            .map_err(|e| DataError::Provider(format!("désérialisation chart : {e}")))?;

        let series = parse_chart_result(chart, symbol, interval, period, with_actions)?;
        info!(bars = series.len(), "Successfully fetched bar series");
        Ok(series)
    }

    /// Sonde la disponibilité des barres intraday pour un symbole
    ///
    /// Les fonds communs ne publient qu'un cours quotidien : la sonde demande
    /// une journée de barres 1 minute, et l'intraday n'est retenu que si le
    /// provider en renvoie un minimum.
    #[instrument(skip(self))]
    pub async fn probe_intraday(&mut self, symbol: &str) -> Result<bool, DataError> {
        match self
            .fetch_bars(symbol, Interval::M1, RangePeriod::OneDay, false)
            .await
        {
            Ok(series) => {
                let supported = series.len() >= MIN_INTRADAY_BARS;
                debug!(bars = series.len(), supported, "Intraday probe finished");
                Ok(supported)
            }
            Err(DataError::NoDataInWindow) => {
                debug!("Intraday probe returned no bars");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Récupère le snapshot quoteSummary fusionné d'un instrument
    ///
    /// Les cinq modules (price, summaryDetail, defaultKeyStatistics,
    /// financialData, assetProfile) sont aplatis en un seul dictionnaire ;
    /// une clé dupliquée garde la valeur du dernier module.
    #[instrument(skip(self))]
    pub async fn fetch_snapshot(&mut self, symbol: &str) -> Result<QuoteSnapshot, DataError> {
        let url = build_quote_summary_url(symbol, SNAPSHOT_MODULES);
        debug!(url = %url, "Built quoteSummary URL");

        let key = CacheKey::new(symbol, RequestKind::Snapshot, "");
        let payload = self.request_json(&url, key).await?;

        let result = extract_result(&payload, "quoteSummary", symbol)?;
        let fields = merge_modules(result);
        info!(fields = fields.len(), "Merged quoteSummary modules");
        Ok(QuoteSnapshot::new(symbol.to_string(), fields))
    }

    /// Récupère la composition d'un fonds ou ETF
    ///
    /// À n'appeler que pour un instrument dont le snapshot dit is_fund() :
    /// pour une action, les modules reviennent vides et la composition
    /// résultante est is_empty().
    #[instrument(skip(self))]
    pub async fn fetch_fund_composition(
        &mut self,
        symbol: &str,
    ) -> Result<FundComposition, DataError> {
        let url = build_quote_summary_url(symbol, FUND_MODULES);
        debug!(url = %url, "Built fund modules URL");

        let key = CacheKey::new(symbol, RequestKind::FundComposition, "");
        let payload = self.request_json(&url, key).await?;

        let result = extract_result(&payload, "quoteSummary", symbol)?;
        Ok(FundComposition::from_modules(
            symbol.to_string(),
            result.get("topHoldings"),
            result.get("fundProfile"),
            result.get("fundPerformance"),
        ))
    }

    /// Récupère la chaîne d'options d'une échéance
    ///
    /// Sans échéance, le provider renvoie la plus proche. La réponse porte
    /// aussi la liste complète des échéances : on la retourne avec la chaîne
    /// pour que l'onglet Options se peuple en un seul appel.
    #[instrument(skip(self))]
    pub async fn fetch_options_chain(
        &mut self,
        symbol: &str,
        expiration: Option<NaiveDate>,
    ) -> Result<(Vec<NaiveDate>, OptionChain), DataError> {
        let url = build_options_url(symbol, expiration);
        debug!(url = %url, "Built options URL");

        let params = expiration.map(|d| format!("exp={d}")).unwrap_or_default();
        let key = CacheKey::new(symbol, RequestKind::OptionsChain, params);
        let payload = self.request_json(&url, key).await?;

        let result = extract_result(&payload, "optionChain", symbol)?;
        let parsed: OptionsResult = serde_json::from_value(result.clone())
            .map_err(|e| DataError::Provider(format!("désérialisation options : {e}")))?;

        let expirations: Vec<NaiveDate> = parsed
            .expiration_dates
            .unwrap_or_default()
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect();

        let slice = parsed
            .options
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| DataError::Provider("aucune option cotée pour ce symbole".to_string()))?;

        let expiration_date = slice
            .expiration_date
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive())
            .or(expiration)
            .ok_or_else(|| DataError::Provider("échéance absente de la réponse options".to_string()))?;

        let chain = OptionChain {
            symbol: symbol.to_string(),
            expiration: expiration_date,
            calls: contracts_to_quotes(slice.calls.unwrap_or_default()),
            puts: contracts_to_quotes(slice.puts.unwrap_or_default()),
        };
        info!(
            expirations = expirations.len(),
            calls = chain.calls.len(),
            puts = chain.puts.len(),
            "Successfully fetched option chain"
        );
        Ok((expirations, chain))
    }

    /// GET avec cache : une réponse déjà vue n'est pas redemandée
    async fn request_json(&mut self, url: &str, key: CacheKey) -> Result<Value, DataError> {
        if let Some(hit) = self.cache.get(&key) {
            debug!(url = %url, "Session cache hit");
            return Ok(hit.clone());
        }

        debug!(url = %url, "Sending HTTP request to Yahoo Finance");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Un 404 porte un objet d'erreur JSON plus précis que le statut :
        // on parse le corps dans tous les cas et on laisse extract_result
        // décider. Seules les réponses 2xx sont mémorisées.
        let payload: Value = response.json().await?;
        if status.is_success() {
            self.cache.insert(key, payload.clone());
        }
        Ok(payload)
    }
}

// ============================================================================
// Construction des URLs
// ============================================================================

/// URL v8/chart : barres OHLCV d'un couple (interval, range)
///
/// CONCEPT RUST : &str vs String
/// - Fonction prend &str (référence, pas d'allocation)
/// - Retourne String (owned, allouée)
fn build_chart_url(
    symbol: &str,
    interval: Interval,
    period: RangePeriod,
    with_actions: bool,
) -> String {
    let mut url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?interval={}&range={}",
        symbol,
        interval.to_yahoo_string(),
        period.to_yahoo_string()
    );
    if with_actions {
        url.push_str("&events=div,splits");
    }
    url
}

/// URL v10/quoteSummary : modules fondamentaux
fn build_quote_summary_url(symbol: &str, modules: &str) -> String {
    format!(
        "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}",
        symbol, modules
    )
}

/// URL v7/options : chaîne d'une échéance (la plus proche sans paramètre)
fn build_options_url(symbol: &str, expiration: Option<NaiveDate>) -> String {
    let base = format!("https://query1.finance.yahoo.com/v7/finance/options/{}", symbol);
    match expiration {
        Some(date) => {
            let unix = Utc
                .from_utc_datetime(&date.and_time(NaiveTime::MIN))
                .timestamp();
            format!("{}?date={}", base, unix)
        }
        None => base,
    }
}

// ============================================================================
// Extraction et parsing des réponses
// ============================================================================

/// Déballe l'enveloppe commune {root: {result: [...], error: ...}}
///
/// Un objet d'erreur "Not Found" devient DataError::NotFound (le symbole
/// n'existe pas), tout autre objet d'erreur devient DataError::Provider.
fn extract_result<'a>(payload: &'a Value, root: &str, symbol: &str) -> Result<&'a Value, DataError> {
    let body = payload
        .get(root)
        .ok_or_else(|| DataError::Provider(format!("champ {root} absent de la réponse")))?;

    if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_str).unwrap_or("");
        let description = err
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("erreur provider inconnue");
        error!(code = %code, description = %description, "Yahoo Finance returned an error object");
        if code.eq_ignore_ascii_case("not found") {
            return Err(DataError::NotFound {
                symbol: symbol.to_string(),
            });
        }
        return Err(DataError::Provider(format!("{code}: {description}")));
    }

    body.get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| DataError::NotFound {
            symbol: symbol.to_string(),
        })
}

/// Aplatit les modules quoteSummary en un seul dictionnaire de champs
fn merge_modules(result: &Value) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(modules) = result.as_object() {
        for module in modules.values() {
            if let Some(object) = module.as_object() {
                for (field, value) in object {
                    fields.insert(field.clone(), value.clone());
                }
            }
        }
    }
    fields
}

/// Convertit le résultat v8/chart en BarSeries
///
/// CONCEPT RUST : Ownership et borrowing
/// - result est "moved" (pas de &), on en devient propriétaire
/// - symbol est borrowed (&str), on ne le copie pas
fn parse_chart_result(
    result: ChartResult,
    symbol: &str,
    interval: Interval,
    period: RangePeriod,
    with_actions: bool,
) -> Result<BarSeries, DataError> {
    let mut series = BarSeries::new(symbol.to_string(), interval, period);
    series.utc_offset_secs = result.meta.gmtoffset.unwrap_or(0);
    series.includes_actions = with_actions;

    let timestamps = result.timestamp.unwrap_or_default();
    debug!(timestamp_count = timestamps.len(), "Received timestamps from Yahoo");

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or(DataError::NoDataInWindow)?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    // Dividendes et splits indexés par timestamp de détachement : la date
    // d'un event correspond exactement au timestamp de sa barre quotidienne
    let mut dividend_by_ts: HashMap<i64, f64> = HashMap::new();
    let mut split_by_ts: HashMap<i64, f64> = HashMap::new();
    if let Some(events) = result.events {
        for event in events.dividends.unwrap_or_default().into_values() {
            dividend_by_ts.insert(event.date, event.amount);
        }
        for event in events.splits.unwrap_or_default().into_values() {
            if event.denominator != 0.0 {
                split_by_ts.insert(event.date, event.numerator / event.denominator);
            }
        }
    }

    // CONCEPT RUST : Iterators et pattern matching
    // - Une bougie dont une colonne OHLC est null est sautée (séance sans
    //   cotation), le volume manquant vaut 0
    let mut skipped_count = 0;
    for (i, &ts) in timestamps.iter().enumerate() {
        let columns = (
            opens.get(i).and_then(|&v| v),
            highs.get(i).and_then(|&v| v),
            lows.get(i).and_then(|&v| v),
            closes.get(i).and_then(|&v| v),
        );
        let (open, high, low, close) = match columns {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => {
                skipped_count += 1;
                continue;
            }
        };
        let volume = volumes.get(i).and_then(|&v| v).unwrap_or(0);

        let datetime = match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt,
            None => {
                skipped_count += 1;
                continue;
            }
        };

        let mut bar = Bar::new(datetime, open, high, low, close, volume);
        if let Some(amount) = dividend_by_ts.get(&ts) {
            bar.dividend = *amount;
        }
        if let Some(ratio) = split_by_ts.get(&ts) {
            bar.split = *ratio;
        }
        series.push(bar);
    }

    if skipped_count > 0 {
        warn!(
            skipped = skipped_count,
            total = timestamps.len(),
            "Skipped candles with missing data"
        );
    }

    debug!(
        parsed = series.len(),
        total = timestamps.len(),
        skipped = skipped_count,
        "Finished parsing bar series"
    );

    // Symbole valide mais fenêtre vide : erreur de section, pas fatale
    if series.is_empty() {
        return Err(DataError::NoDataInWindow);
    }

    Ok(series)
}

/// Convertit les contrats provider en lignes de table
fn contracts_to_quotes(contracts: Vec<OptionContract>) -> Vec<OptionQuote> {
    contracts
        .into_iter()
        .map(|c| OptionQuote {
            strike: c.strike,
            last_price: c.last_price.unwrap_or(0.0),
            change: c.change.unwrap_or(0.0),
            percent_change: c.percent_change.unwrap_or(0.0),
            volume: c.volume,
            open_interest: c.open_interest,
        })
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_chart_url() {
        let url = build_chart_url("AAPL", Interval::M2, RangePeriod::OneDay, false);
        assert!(url.contains("AAPL"));
        assert!(url.contains("interval=2m"));
        assert!(url.contains("range=1d"));
        assert!(url.contains("yahoo.com"));
        assert!(!url.contains("events"));

        let url = build_chart_url("AAPL", Interval::D1, RangePeriod::OneYear, true);
        assert!(url.contains("interval=1d"));
        assert!(url.contains("range=1y"));
        assert!(url.contains("events=div,splits"));
    }

    #[test]
    fn test_build_quote_summary_url() {
        let url = build_quote_summary_url("VTI", SNAPSHOT_MODULES);
        assert!(url.contains("quoteSummary/VTI"));
        assert!(url.contains("modules=price,summaryDetail"));
    }

    #[test]
    fn test_build_options_url() {
        assert_eq!(
            build_options_url("AAPL", None),
            "https://query1.finance.yahoo.com/v7/finance/options/AAPL"
        );
        // 2024-06-21 00:00 UTC
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let url = build_options_url("AAPL", Some(date));
        assert!(url.ends_with("options/AAPL?date=1718928000"));
    }

    #[test]
    fn test_extract_result_not_found() {
        let payload = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" },
            },
        });
        match extract_result(&payload, "chart", "ZZZZ") {
            Err(DataError::NotFound { symbol }) => assert_eq!(symbol, "ZZZZ"),
            other => panic!("attendu NotFound, obtenu {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_extract_result_provider_error() {
        let payload = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Internal Error", "description": "boom" },
            },
        });
        assert!(matches!(
            extract_result(&payload, "quoteSummary", "AAPL"),
            Err(DataError::Provider(_))
        ));
    }

    #[test]
    fn test_parse_chart_result_skips_null_candles() {
        let result: ChartResult = serde_json::from_value(json!({
            "meta": { "gmtoffset": -14400 },
            "timestamp": [1714138200, 1714138320, 1714138440],
            "indicators": {
                "quote": [{
                    "open":   [169.0, null, 170.2],
                    "high":   [169.5, 170.1, 170.6],
                    "low":    [168.8, 169.7, 170.0],
                    "close":  [169.2, 170.0, 170.5],
                    "volume": [120000, 80000, null],
                }],
            },
        }))
        .unwrap();

        let series =
            parse_chart_result(result, "AAPL", Interval::M2, RangePeriod::OneDay, false).unwrap();
        // la 2e bougie (open null) est sautée, le volume null vaut 0
        assert_eq!(series.len(), 2);
        assert_eq!(series.utc_offset_secs, -14400);
        assert_eq!(series.bars[1].volume, 0);
        assert!(!series.includes_actions);
    }

    #[test]
    fn test_parse_chart_result_merges_actions() {
        let result: ChartResult = serde_json::from_value(json!({
            "meta": { "gmtoffset": -18000 },
            "timestamp": [1707485400, 1707571800],
            "indicators": {
                "quote": [{
                    "open":   [187.0, 188.5],
                    "high":   [188.0, 189.9],
                    "low":    [186.2, 188.0],
                    "close":  [187.9, 189.3],
                    "volume": [50_000_000u64, 48_000_000u64],
                }],
            },
            "events": {
                "dividends": {
                    "1707571800": { "amount": 0.24, "date": 1707571800 },
                },
                "splits": {
                    "1707485400": { "date": 1707485400, "numerator": 4.0, "denominator": 1.0 },
                },
            },
        }))
        .unwrap();

        let series =
            parse_chart_result(result, "AAPL", Interval::D1, RangePeriod::OneMonth, true).unwrap();
        assert!(series.includes_actions);
        assert_eq!(series.bars[0].split, 4.0);
        assert_eq!(series.bars[0].dividend, 0.0);
        assert_eq!(series.bars[1].dividend, 0.24);
    }

    #[test]
    fn test_parse_chart_result_empty_window() {
        let result: ChartResult = serde_json::from_value(json!({
            "meta": { "gmtoffset": 0 },
            "timestamp": null,
            "indicators": { "quote": [{}] },
        }))
        .unwrap();

        assert!(matches!(
            parse_chart_result(result, "AAPL", Interval::D1, RangePeriod::OneDay, false),
            Err(DataError::NoDataInWindow)
        ));
    }

    #[test]
    fn test_merge_modules_last_module_wins() {
        let result = json!({
            "price": { "symbol": "AAPL", "regularMarketPrice": { "raw": 170.5 } },
            "summaryDetail": { "marketCap": { "raw": 2.5e12 }, "regularMarketPrice": { "raw": 170.5 } },
        });
        let fields = merge_modules(&result);
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("symbol"));
        assert!(fields.contains_key("marketCap"));
    }

    #[test]
    fn test_contracts_to_quotes_defaults() {
        let contracts: Vec<OptionContract> = serde_json::from_value(json!([
            { "strike": 100.0, "lastPrice": 1.86, "change": -0.06, "percentChange": -3.12,
              "volume": 12, "openInterest": 58 },
            { "strike": 105.0 },
        ]))
        .unwrap();

        let quotes = contracts_to_quotes(contracts);
        assert_eq!(quotes[0].volume, Some(12));
        assert_eq!(quotes[1].last_price, 0.0);
        assert_eq!(quotes[1].volume, None);
    }

    // Test async nécessite tokio test runtime
    // CONCEPT RUST : #[tokio::test]
    // - Macro qui setup un runtime tokio pour le test
    // - Permet d'utiliser .await dans les tests
    #[tokio::test]
    async fn test_fetch_bars_live() {
        // Test avec un vrai appel API (peut échouer si pas de connexion)
        let mut client = match YahooClient::new() {
            Ok(client) => client,
            Err(e) => {
                println!("⚠ Test skippé (client HTTP) : {}", e);
                return;
            }
        };
        let result = client
            .fetch_bars("AAPL", Interval::D1, RangePeriod::OneMonth, false)
            .await;

        // On vérifie juste que l'appel fonctionne
        // (on ne vérifie pas les données car elles changent)
        match result {
            Ok(series) => {
                assert_eq!(series.symbol, "AAPL");
                assert!(!series.is_empty());
                println!("✓ Récupéré {} barres pour AAPL", series.len());
            }
            Err(e) => {
                println!("⚠ Test skippé (pas de connexion?) : {}", e);
            }
        }
    }
}
