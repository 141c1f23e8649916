// ============================================================================
// Couche d'aplatissement des attributs
// ============================================================================
// Transforme un snapshot de cotation en lignes (label, valeur formatée)
// prêtes à afficher, pilotée par des tables de correspondance déclaratives :
// une table par section d'onglet, l'ordre de la table EST l'ordre d'affichage.
//
// Règles, dans l'ordre :
// 1. dérivations spéciales par champ (composites bid × taille, fourchettes,
//    dates Unix, correction d'unité du debt/equity, ...)
// 2. échelonnement K/M/B/T des valeurs numériques ≥ 1000 (sauf champs
//    exemptés type effectifs, et champs pourcentage)
// 3. format numérique déclaré par le champ
// Un champ absent est sauté — jamais de placeholder, jamais d'erreur. Un
// composite dont une partie manque est supprimé en entier.
// ============================================================================

use chrono::DateTime;

use crate::models::snapshot::QuoteSnapshot;

/// Format numérique déclaré par champ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// 2 décimales avec séparateur de milliers ("1,234.56")
    Amount,
    /// Entier avec séparateur de milliers ("161,000")
    Count,
    /// 2 décimales sans séparateur ("28.50")
    Ratio,
    /// Valeur × 100, 2 décimales, suffixe % ("65.12%")
    Percent,
}

/// Une ligne de table de correspondance
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    /// Nom du champ côté provider (ou clé composite "a_b")
    pub key: &'static str,
    /// Label affiché ; peut contenir "{dateShortInterest}" ou
    /// "{sharesShortPreviousMonthDate}" interpolés à l'affichage
    pub label: &'static str,
    /// Format numérique, None pour affichage brut / texte
    pub format: Option<FieldFormat>,
}

const fn attr(
    key: &'static str,
    label: &'static str,
    format: Option<FieldFormat>,
) -> AttributeSpec {
    AttributeSpec { key, label, format }
}

const AMOUNT: Option<FieldFormat> = Some(FieldFormat::Amount);
const COUNT: Option<FieldFormat> = Some(FieldFormat::Count);
const RATIO: Option<FieldFormat> = Some(FieldFormat::Ratio);
const PERCENT: Option<FieldFormat> = Some(FieldFormat::Percent);
const TEXT: Option<FieldFormat> = None;

/// Champs décodés comme dates Unix → "AAAA-MM-JJ"
const DATE_KEYS: [&str; 5] = [
    "exDividendDate",
    "lastSplitDate",
    "lastFiscalYearEnd",
    "mostRecentQuarter",
    "fundInceptionDate",
];

/// Champs jamais échelonnés en K/M/B/T (des effectifs, pas des montants)
const SCALE_EXEMPT: [&str; 2] = ["fullTimeEmployees", "yearBorn"];

// ============================================================================
// Tables par section (l'ordre des lignes est l'ordre d'affichage)
// ============================================================================

/// Onglet Summary, colonne de gauche
pub const SUMMARY_LEFT: &[AttributeSpec] = &[
    attr("previousClose", "Previous Close", AMOUNT),
    attr("open", "Open", AMOUNT),
    attr("bid_bidSize", "Bid", TEXT),
    attr("ask_askSize", "Ask", TEXT),
    attr("dayLow_dayHigh", "Day's Range", TEXT),
    attr("fiftyTwoWeekLow_fiftyTwoWeekHigh", "52 Week Range", TEXT),
    attr("fiftyDayAverage", "50-Day Average", AMOUNT),
    attr("twoHundredDayAverage", "200-Day Average", AMOUNT),
    attr("lastCapGain", "Last Cap Gain", AMOUNT),
    attr("morningStarOverallRating", "Morningstar Rating", TEXT),
    attr("morningStarRiskRating", "Morningstar Risk Rating", TEXT),
];

/// Onglet Summary, colonne de droite
pub const SUMMARY_RIGHT: &[AttributeSpec] = &[
    attr("volume", "Volume", COUNT),
    attr("averageVolume", "Avg. Volume", COUNT),
    attr("totalAssets", "Total Assets", AMOUNT),
    attr("marketCap", "Market Cap", AMOUNT),
    attr("navPrice", "NAV", AMOUNT),
    attr("beta", "Beta (5Y Monthly)", RATIO),
    attr("trailingPE", "PE Ratio (TTM)", RATIO),
    attr("trailingEps", "EPS (TTM)", RATIO),
    attr("dividendRate_dividendYield", "Forward Dividend & Yield", TEXT),
    attr("exDividendDate", "Ex-Dividend Date", TEXT),
    attr("yield", "Yield", PERCENT),
    attr("ytdReturn", "YTD Daily Total Return", PERCENT),
    attr("beta3Year", "Beta (3Y Monthly)", RATIO),
    attr("targetMeanPrice", "1y Target Est", AMOUNT),
    attr("annualHoldingsTurnover", "Holdings Turnover", PERCENT),
    attr("lastDividendValue", "Last Dividend", AMOUNT),
    attr("fundInceptionDate", "Inception Date", TEXT),
];

/// Onglet Statistics — Valuation Measures
pub const VALUATION_MEASURES: &[AttributeSpec] = &[
    attr("marketCap", "Market Cap (intraday)", AMOUNT),
    attr("enterpriseValue", "Enterprise Value", AMOUNT),
    attr("trailingPE", "Trailing P/E", RATIO),
    attr("forwardPE", "Forward P/E", RATIO),
    attr("pegRatio", "PEG Ratio (5 yr expected)", RATIO),
    attr("priceToSalesTrailing12Months", "Price/Sales (ttm)", RATIO),
    attr("priceToBook", "Price/Book (mrq)", RATIO),
];

/// Onglet Statistics — Fiscal Year
pub const FISCAL_YEAR: &[AttributeSpec] = &[
    attr("lastFiscalYearEnd", "Fiscal Year Ends", TEXT),
    attr("mostRecentQuarter", "Most Recent Quarter (mrq)", TEXT),
];

/// Onglet Statistics — Profitability
pub const PROFITABILITY: &[AttributeSpec] = &[
    attr("profitMargins", "Profit Margin", PERCENT),
    attr("operatingMargins", "Operating Margin (ttm)", PERCENT),
];

/// Onglet Statistics — Management Effectiveness
pub const MANAGEMENT_EFFECTIVENESS: &[AttributeSpec] = &[
    attr("returnOnAssets", "Return on Assets (ttm)", PERCENT),
    attr("returnOnEquity", "Return on Equity (ttm)", PERCENT),
];

/// Onglet Statistics — Income Statement
pub const INCOME_STATEMENT: &[AttributeSpec] = &[
    attr("totalRevenue", "Revenue (ttm)", AMOUNT),
    attr("revenuePerShare", "Revenue Per Share (ttm)", RATIO),
    attr("grossProfits", "Gross Profit (ttm)", AMOUNT),
    attr("ebitda", "EBITDA", AMOUNT),
    attr("netIncomeToCommon", "Net Income Avi to Common (ttm)", AMOUNT),
    attr("trailingEps", "Diluted EPS (ttm)", RATIO),
    attr("earningsQuarterlyGrowth", "Quarterly Earnings Growth (yoy)", PERCENT),
];

/// Onglet Statistics — Balance Sheet
pub const BALANCE_SHEET: &[AttributeSpec] = &[
    attr("totalCash", "Total Cash (mrq)", AMOUNT),
    attr("totalCashPerShare", "Total Cash Per Share (mrq)", RATIO),
    attr("totalDebt", "Total Debt (mrq)", AMOUNT),
    attr("debtToEquity", "Total Debt/Equity (mrq)", TEXT),
    attr("currentRatio", "Current Ratio (mrq)", RATIO),
    attr("bookValue", "Book Value Per Share (mrq)", RATIO),
];

/// Onglet Statistics — Cash Flow
pub const CASH_FLOW: &[AttributeSpec] = &[
    attr("operatingCashflow", "Operating Cash Flow (ttm)", AMOUNT),
    attr("freeCashflow", "Levered Free Cash Flow (ttm)", AMOUNT),
];

/// Onglet Statistics / Analysis — Stock Price History
pub const STOCK_PRICE_HISTORY: &[AttributeSpec] = &[
    attr("beta", "Beta (5Y Monthly)", RATIO),
    attr("52WeekChange", "52-Week Change", PERCENT),
    attr("SandP52WeekChange", "S&P500 52-Week Change", PERCENT),
    attr("fiftyTwoWeekHigh", "52 Week High", AMOUNT),
    attr("fiftyTwoWeekLow", "52 Week Low", AMOUNT),
    attr("fiftyDayAverage", "50-Day Moving Average", AMOUNT),
    attr("twoHundredDayAverage", "200-Day Moving Average", AMOUNT),
];

/// Onglet Statistics — Share Statistics
pub const SHARE_STATISTICS: &[AttributeSpec] = &[
    attr("averageVolume", "Avg Vol (3 month)", COUNT),
    attr("averageVolume10days", "Avg Vol (10 day)", COUNT),
    attr("sharesOutstanding", "Shares Outstanding", COUNT),
    attr("impliedSharesOutstanding", "Implied Shares Outstanding", COUNT),
    attr("floatShares", "Float", COUNT),
    attr("heldPercentInsiders", "% Held by Insiders", PERCENT),
    attr("heldPercentInstitutions", "% Held by Institutions", PERCENT),
    attr("sharesShort", "Shares Short ({dateShortInterest})", COUNT),
    attr("shortRatio", "Short Ratio ({dateShortInterest})", RATIO),
    attr("shortPercentOfFloat", "Short % of Float ({dateShortInterest})", PERCENT),
    attr(
        "sharesPercentSharesOut",
        "Short % of Shares Outstanding ({dateShortInterest})",
        PERCENT,
    ),
    attr(
        "sharesShortPriorMonth",
        "Shares Short (prior month {sharesShortPreviousMonthDate})",
        COUNT,
    ),
];

/// Onglet Statistics — Dividends & Splits
pub const DIVIDENDS_SPLITS: &[AttributeSpec] = &[
    attr("dividendRate", "Forward Annual Dividend Rate", RATIO),
    attr("dividendYield", "Forward Annual Dividend Yield", PERCENT),
    attr("trailingAnnualDividendRate", "Trailing Annual Dividend Rate", RATIO),
    attr("trailingAnnualDividendYield", "Trailing Annual Dividend Yield", PERCENT),
    attr("fiveYearAvgDividendYield", "5 Year Average Dividend Yield", RATIO),
    attr("payoutRatio", "Payout Ratio", PERCENT),
    attr("exDividendDate", "Ex-Dividend Date", TEXT),
    attr("lastSplitFactor", "Last Split Factor", TEXT),
    attr("lastSplitDate", "Last Split Date", TEXT),
];

/// Onglet Profile — bloc identité (labels vides : lignes valeur seule)
pub const PROFILE_IDENTITY: &[AttributeSpec] = &[
    attr("shortName", "", TEXT),
    attr("address1", "", TEXT),
    attr("city_state_zip", "", TEXT),
    attr("country", "", TEXT),
    attr("phone", "", TEXT),
    attr("website", "", TEXT),
];

/// Onglet Profile — détails société / fonds
pub const PROFILE_DETAILS: &[AttributeSpec] = &[
    attr("sector", "Sector", TEXT),
    attr("industry", "Industry", TEXT),
    attr("fullTimeEmployees", "Full Time Employees", COUNT),
    attr("category", "Category", TEXT),
    attr("fundFamily", "Fund Family", TEXT),
    attr("totalAssets", "Net Assets", AMOUNT),
    attr("ytdReturn", "YTD Return", PERCENT),
    attr("yield", "Yield", PERCENT),
    attr("legalType", "Legal Type", TEXT),
];

/// Onglet Financials — résumé des états financiers
pub const FINANCIAL_STATEMENTS: &[AttributeSpec] = &[
    attr("totalCash", "Total Cash (mrq)", AMOUNT),
    attr("totalCashPerShare", "Total Cash Per Share (mrq)", RATIO),
    attr("ebitda", "EBITDA", AMOUNT),
    attr("totalDebt", "Total Debt (mrq)", AMOUNT),
    attr("quickRatio", "Quick Ratio (mrq)", RATIO),
    attr("currentRatio", "Current Ratio (mrq)", RATIO),
    attr("totalRevenue", "Revenue (ttm)", AMOUNT),
    attr("debtToEquity", "Total Debt/Equity (mrq)", TEXT),
    attr("revenuePerShare", "Revenue Per Share (ttm)", RATIO),
    attr("returnOnAssets", "Return on Assets (ttm)", PERCENT),
    attr("returnOnEquity", "Return on Equity (ttm)", PERCENT),
    attr("grossProfits", "Gross Profit (ttm)", AMOUNT),
    attr("freeCashflow", "Levered Free Cash Flow (ttm)", AMOUNT),
    attr("operatingCashflow", "Operating Cash Flow (ttm)", AMOUNT),
    attr("earningsGrowth", "Quarterly Earnings Growth (yoy)", PERCENT),
    attr("revenueGrowth", "Quarterly Revenue Growth (yoy)", PERCENT),
];

/// Onglet Analysis — objectifs de cours et recommandation
pub const PRICE_TARGETS: &[AttributeSpec] = &[
    attr("currentPrice", "Current Price", AMOUNT),
    attr("targetHighPrice", "Target High", AMOUNT),
    attr("targetLowPrice", "Target Low", AMOUNT),
    attr("targetMeanPrice", "Target Mean", AMOUNT),
    attr("targetMedianPrice", "Target Median", AMOUNT),
    attr("recommendationMean", "Recommendation Mean", RATIO),
    attr("recommendationKey", "Recommendation", TEXT),
    attr("numberOfAnalystOpinions", "Number of Analyst Opinions", COUNT),
];

/// Onglet Analysis — notes de gouvernance
pub const RISK_RATINGS: &[AttributeSpec] = &[
    attr("auditRisk", "Audit Risk", TEXT),
    attr("boardRisk", "Board Risk", TEXT),
    attr("compensationRisk", "Compensation Risk", TEXT),
    attr("shareHolderRightsRisk", "Shareholder Rights Risk", TEXT),
    attr("overallRisk", "Overall Risk", TEXT),
];

// ============================================================================
// Aplatissement
// ============================================================================

/// Aplatit un snapshot selon une table de correspondance
///
/// Garanties : l'ordre de sortie est celui de la table ; un champ manquant
/// est sauté sans décaler le reste ; aucune panique sur snapshot incomplet.
pub fn flatten(snapshot: &QuoteSnapshot, table: &[AttributeSpec]) -> Vec<(String, String)> {
    let mut rows = Vec::with_capacity(table.len());
    for spec in table {
        if let Some(value) = field_value(snapshot, spec) {
            rows.push((field_label(snapshot, spec), value));
        }
    }
    rows
}

/// Label d'une ligne, avec interpolation éventuelle des dates de short interest
fn field_label(snapshot: &QuoteSnapshot, spec: &AttributeSpec) -> String {
    if !spec.label.contains('{') {
        return spec.label.to_string();
    }
    let mut label = spec.label.to_string();
    for key in ["dateShortInterest", "sharesShortPreviousMonthDate"] {
        let pattern = format!("{{{key}}}");
        if label.contains(&pattern) {
            let date = snapshot
                .number(key)
                .and_then(unix_date_string)
                .unwrap_or_else(|| "N/A".to_string());
            label = label.replace(&pattern, &date);
        }
    }
    label
}

/// Valeur formatée d'une ligne, None = ligne sautée
fn field_value(snapshot: &QuoteSnapshot, spec: &AttributeSpec) -> Option<String> {
    // 1. Dérivations spéciales par champ
    match spec.key {
        "bid_bidSize" => return composite_price_size(snapshot, "bid", "bidSize"),
        "ask_askSize" => return composite_price_size(snapshot, "ask", "askSize"),
        "dayLow_dayHigh" => return composite_range(snapshot, "dayLow", "dayHigh"),
        "fiftyTwoWeekLow_fiftyTwoWeekHigh" => {
            return composite_range(snapshot, "fiftyTwoWeekLow", "fiftyTwoWeekHigh")
        }
        "dividendRate_dividendYield" => return composite_rate_yield(snapshot),
        "city_state_zip" => return composite_city_state_zip(snapshot),
        // Le provider livre debtToEquity en points (150.35 pour 150.35%)
        "debtToEquity" => {
            return snapshot
                .number("debtToEquity")
                .map(|v| format!("{v:.2}%"))
        }
        // Un volume moyen à zéro signifie « pas de donnée », pas « 0 »
        "averageVolume" if snapshot.number("averageVolume") == Some(0.0) => return None,
        _ => {}
    }

    if DATE_KEYS.contains(&spec.key) {
        return snapshot.number(spec.key).and_then(unix_date_string);
    }

    // 2. Valeur générique : numérique (échelonnée puis formatée) ou texte
    if let Some(value) = snapshot.number(spec.key) {
        let scalable = value.abs() >= 1000.0
            && !SCALE_EXEMPT.contains(&spec.key)
            && spec.format != Some(FieldFormat::Percent);
        if scalable {
            return Some(format_scaled(value, spec.format));
        }
        return Some(format_number(value, spec.format));
    }
    snapshot.text(spec.key).map(|s| s.to_string())
}

/// Composite prix × taille ("184.25 x 900") — supprimé si une partie manque
fn composite_price_size(
    snapshot: &QuoteSnapshot,
    price_key: &str,
    size_key: &str,
) -> Option<String> {
    let price = snapshot.number(price_key)?;
    let size = snapshot.number(size_key)?;
    Some(format!("{price:.2} x {size:.0}"))
}

/// Composite fourchette ("180.10 - 186.00") — supprimé si une borne manque
fn composite_range(snapshot: &QuoteSnapshot, low_key: &str, high_key: &str) -> Option<String> {
    let low = snapshot.number(low_key)?;
    let high = snapshot.number(high_key)?;
    Some(format!("{low:.2} - {high:.2}"))
}

/// Composite taux + rendement de dividende ("0.96 (0.52%)")
fn composite_rate_yield(snapshot: &QuoteSnapshot) -> Option<String> {
    let rate = snapshot.number("dividendRate")?;
    let yield_ = snapshot.number("dividendYield")?;
    Some(format!("{rate:.2} ({:.2}%)", yield_ * 100.0))
}

/// Composite adresse "Ville, ÉTAT CodePostal"
fn composite_city_state_zip(snapshot: &QuoteSnapshot) -> Option<String> {
    let city = snapshot.text("city")?;
    let state = snapshot.text("state")?;
    let zip = snapshot.text("zip")?;
    Some(format!("{city}, {state} {zip}"))
}

/// Timestamp Unix → "AAAA-MM-JJ"
fn unix_date_string(ts: f64) -> Option<String> {
    DateTime::from_timestamp(ts as i64, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

// ============================================================================
// Formatage numérique
// ============================================================================

/// Échelonne |valeur| ≥ 1000 par pas de 1000, suffixe K/M/B/T
fn scale_magnitude(value: f64) -> (f64, &'static str) {
    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];
    let mut scaled = value;
    let mut magnitude = 0;
    while scaled.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        magnitude += 1;
    }
    (scaled, SUFFIXES[magnitude])
}

/// Valeur échelonnée puis formatée ("2.50T", "54M")
fn format_scaled(value: f64, format: Option<FieldFormat>) -> String {
    let (scaled, suffix) = scale_magnitude(value);
    if suffix.is_empty() {
        return format_number(value, format);
    }
    let body = match format {
        Some(FieldFormat::Count) => format!("{scaled:.0}"),
        _ => format!("{scaled:.2}"),
    };
    format!("{body}{suffix}")
}

/// Applique le format déclaré du champ
fn format_number(value: f64, format: Option<FieldFormat>) -> String {
    match format {
        Some(FieldFormat::Amount) => group_thousands(format!("{value:.2}")),
        Some(FieldFormat::Count) => group_thousands(format!("{value:.0}")),
        Some(FieldFormat::Ratio) => format!("{value:.2}"),
        Some(FieldFormat::Percent) => format!("{:.2}%", value * 100.0),
        None => format!("{value}"),
    }
}

/// Insère les séparateurs de milliers dans un nombre déjà formaté
fn group_thousands(formatted: String) -> String {
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let negative = int_part.starts_with('-');
    let digits = int_part.trim_start_matches('-');

    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Prix pour l'en-tête et les tableaux : 2 décimales, milliers séparés,
/// jamais échelonné (625,000.00 reste 625,000.00)
pub fn format_price(value: f64) -> String {
    group_thousands(format!("{value:.2}"))
}

/// Volume pour l'axe du graphique et les tableaux ("54.32M", "950")
pub fn format_volume(volume: u64) -> String {
    let (scaled, suffix) = scale_magnitude(volume as f64);
    if suffix.is_empty() {
        format!("{volume}")
    } else {
        format!("{scaled:.2}{suffix}")
    }
}

/// Fraction → pourcentage affiché (0.0523 → "5.23%")
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Mesure de portefeuille : 2 décimales, échelonnée K/M/B/T si ≥ 1000
/// (ratios et médianes de capitalisation partagent la même colonne)
pub fn format_measure(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format_scaled(value, AMOUNT)
    } else {
        format!("{value:.2}")
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(fields: serde_json::Value) -> QuoteSnapshot {
        match fields {
            serde_json::Value::Object(map) => QuoteSnapshot::new("AAPL".to_string(), map),
            _ => panic!("fixture non-objet"),
        }
    }

    const ORDER_TABLE: &[AttributeSpec] = &[
        attr("alpha", "Alpha", RATIO),
        attr("bravo", "Bravo", RATIO),
        attr("charlie", "Charlie", TEXT),
    ];

    #[test]
    fn test_missing_field_skipped_order_preserved() {
        // Table [A, B, C], snapshot sans A → sortie [B, C]
        let snap = snapshot(json!({ "bravo": 2.0, "charlie": "trois" }));
        let rows = flatten(&snap, ORDER_TABLE);
        let labels: Vec<&str> = rows.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Bravo", "Charlie"]);
        assert_eq!(rows[0].1, "2.00");
        assert_eq!(rows[1].1, "trois");
    }

    #[test]
    fn test_composite_suppressed_when_partial() {
        // bid sans bidSize : la ligne Bid disparaît entièrement
        let snap = snapshot(json!({ "bid": 184.25, "previousClose": 183.0 }));
        let rows = flatten(&snap, SUMMARY_LEFT);
        assert!(rows.iter().all(|(l, _)| l != "Bid"));
        assert!(rows.iter().any(|(l, _)| l == "Previous Close"));

        let snap = snapshot(json!({ "bid": 184.25, "bidSize": 900.0 }));
        let rows = flatten(&snap, SUMMARY_LEFT);
        assert_eq!(rows[0], ("Bid".to_string(), "184.25 x 900".to_string()));
    }

    #[test]
    fn test_fifty_two_week_range_needs_both_bounds() {
        let snap = snapshot(json!({ "fiftyTwoWeekLow": 142.10 }));
        assert!(flatten(&snap, SUMMARY_LEFT).is_empty());

        let snap = snapshot(json!({ "fiftyTwoWeekLow": 142.10, "fiftyTwoWeekHigh": 199.62 }));
        let rows = flatten(&snap, SUMMARY_LEFT);
        assert_eq!(rows[0].1, "142.10 - 199.62");
    }

    #[test]
    fn test_dividend_rate_and_yield() {
        let snap = snapshot(json!({ "dividendRate": 0.96, "dividendYield": 0.0052 }));
        let rows = flatten(&snap, SUMMARY_RIGHT);
        assert_eq!(rows[0].1, "0.96 (0.52%)");
    }

    #[test]
    fn test_magnitude_scaling() {
        let snap = snapshot(json!({
            "marketCap": 2.5e12,
            "volume": 54_321_000.0,
            "trailingPE": 28.5,
        }));
        let rows = flatten(&snap, SUMMARY_RIGHT);
        let get = |label: &str| {
            rows.iter()
                .find(|(l, _)| l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("Market Cap"), "2.50T");
        assert_eq!(get("Volume"), "54M");
        assert_eq!(get("PE Ratio (TTM)"), "28.50");
    }

    #[test]
    fn test_headcount_exempt_from_scaling() {
        let snap = snapshot(json!({ "fullTimeEmployees": 161000.0 }));
        let rows = flatten(&snap, PROFILE_DETAILS);
        assert_eq!(rows[0].1, "161,000");
    }

    #[test]
    fn test_percent_never_scaled() {
        let snap = snapshot(json!({ "heldPercentInsiders": 0.6512 }));
        let rows = flatten(&snap, SHARE_STATISTICS);
        assert_eq!(rows[0].1, "65.12%");
    }

    #[test]
    fn test_debt_to_equity_unit_correction() {
        let snap = snapshot(json!({ "debtToEquity": 150.35 }));
        let rows = flatten(&snap, BALANCE_SHEET);
        assert_eq!(rows[0].1, "150.35%");
    }

    #[test]
    fn test_unix_date_decoded() {
        // 1709510400 = 2024-03-04 00:00:00 UTC
        let snap = snapshot(json!({ "exDividendDate": 1709510400.0 }));
        let rows = flatten(&snap, SUMMARY_RIGHT);
        assert_eq!(rows[0].1, "2024-03-04");
    }

    #[test]
    fn test_short_interest_label_interpolation() {
        let snap = snapshot(json!({
            "sharesShort": 120_000_000.0,
            "dateShortInterest": 1709510400.0,
        }));
        let rows = flatten(&snap, SHARE_STATISTICS);
        let (label, value) = &rows[0];
        assert_eq!(label, "Shares Short (2024-03-04)");
        assert_eq!(value, "120M");
    }

    #[test]
    fn test_zero_average_volume_skipped() {
        let snap = snapshot(json!({ "averageVolume": 0.0, "volume": 100.0 }));
        let rows = flatten(&snap, SUMMARY_RIGHT);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "Volume");
    }

    #[test]
    fn test_city_state_zip_composite() {
        let snap = snapshot(json!({
            "city": "Cupertino", "state": "CA", "zip": "95014",
        }));
        let rows = flatten(&snap, PROFILE_IDENTITY);
        assert_eq!(rows[0].1, "Cupertino, CA 95014");

        // state manquant : pas de ligne adresse
        let snap = snapshot(json!({ "city": "Cupertino", "zip": "95014" }));
        assert!(flatten(&snap, PROFILE_IDENTITY).is_empty());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(format_price(1_234_567.891), "1,234,567.89");
        assert_eq!(format_price(-4321.5), "-4,321.50");
        assert_eq!(format_price(184.25), "184.25");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(950), "950");
        assert_eq!(format_volume(54_320_000), "54.32M");
        assert_eq!(format_volume(1_250_000_000), "1.25B");
    }
}
