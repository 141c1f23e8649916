// ============================================================================
// Composition d'un fonds
// ============================================================================
// Sections de l'onglet Holdings, décodées depuis les modules quoteSummary
// topHoldings / fundProfile / fundPerformance : répartition par classe
// d'actifs, par secteur, mesures du portefeuille actions et obligations,
// notations obligataires et top 10 des positions.
//
// Les clés provider sont traduites en noms d'affichage par des tables
// statiques ; une clé inconnue garde son nom brut plutôt que de disparaître.
// Les sections sont déjà formatées en lignes (label, valeur) : même contrat
// de rendu que la couche d'aplatissement.
// ============================================================================

use serde_json::Value;

use crate::models::attributes::{format_measure, format_percent};
use crate::models::snapshot::number_like;

/// Répartition par classe d'actifs (module topHoldings)
const POSITION_LABELS: [(&str, &str); 6] = [
    ("cashPosition", "Cash"),
    ("stockPosition", "Stocks"),
    ("bondPosition", "Bonds"),
    ("preferredPosition", "Preferred"),
    ("convertiblePosition", "Convertible"),
    ("otherPosition", "Others"),
];

/// Secteurs provider → noms d'affichage
const SECTOR_LABELS: [(&str, &str); 11] = [
    ("realestate", "Real Estate"),
    ("consumer_cyclical", "Consumer Cyclical"),
    ("basic_materials", "Basic Materials"),
    ("consumer_defensive", "Consumer Defensive"),
    ("technology", "Technology"),
    ("communication_services", "Communication Services"),
    ("financial_services", "Financial Services"),
    ("utilities", "Utilities"),
    ("industrials", "Industrials"),
    ("energy", "Energy"),
    ("healthcare", "Healthcare"),
];

/// Mesures du portefeuille actions
const EQUITY_MEASURES: [(&str, &str); 6] = [
    ("priceToEarnings", "Price/Earnings"),
    ("priceToBook", "Price/Book"),
    ("priceToSales", "Price/Sales"),
    ("priceToCashflow", "Price/Cashflow"),
    ("medianMarketCap", "Median Market Cap"),
    ("threeYearEarningsGrowth", "3 Year Earnings Growth"),
];

/// Mesures du portefeuille obligataire
const BOND_MEASURES: [(&str, &str); 3] = [
    ("maturity", "Maturity"),
    ("duration", "Duration"),
    ("creditQuality", "Credit Quality"),
];

/// Notations obligataires provider → affichage
const BOND_RATING_LABELS: [(&str, &str); 9] = [
    ("us_government", "US Government"),
    ("aaa", "AAA"),
    ("aa", "AA"),
    ("a", "A"),
    ("bbb", "BBB"),
    ("bb", "BB"),
    ("b", "B"),
    ("below_b", "Below B"),
    ("other", "Other"),
];

/// Une position du top 10
#[derive(Debug, Clone, PartialEq)]
pub struct TopHolding {
    pub symbol: String,
    pub name: String,
    /// Fraction des actifs (0.0712 pour 7.12 %)
    pub percent_assets: f64,
}

/// Composition complète d'un fonds, prête à afficher
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FundComposition {
    pub symbol: String,
    pub position_weightings: Vec<(String, String)>,
    pub sector_weightings: Vec<(String, String)>,
    pub equity_holdings: Vec<(String, String)>,
    pub bond_holdings: Vec<(String, String)>,
    pub bond_ratings: Vec<(String, String)>,
    pub top_holdings: Vec<TopHolding>,
    /// Lignes fonds de l'onglet Summary (YTD return, frais, catégorie, ...)
    pub overview: Vec<(String, String)>,
}

impl FundComposition {
    /// Décode les trois modules quoteSummary d'un fonds (chacun optionnel)
    pub fn from_modules(
        symbol: String,
        top_holdings: Option<&Value>,
        fund_profile: Option<&Value>,
        fund_performance: Option<&Value>,
    ) -> Self {
        Self {
            symbol,
            position_weightings: labeled_weight_rows(top_holdings, &POSITION_LABELS),
            sector_weightings: keyed_list_rows(
                top_holdings.and_then(|v| v.get("sectorWeightings")),
                &SECTOR_LABELS,
            ),
            equity_holdings: measure_rows(
                top_holdings.and_then(|v| v.get("equityHoldings")),
                &EQUITY_MEASURES,
            ),
            bond_holdings: measure_rows(
                top_holdings.and_then(|v| v.get("bondHoldings")),
                &BOND_MEASURES,
            ),
            bond_ratings: keyed_list_rows(
                top_holdings.and_then(|v| v.get("bondRatings")),
                &BOND_RATING_LABELS,
            ),
            top_holdings: top_holding_rows(top_holdings.and_then(|v| v.get("holdings"))),
            overview: overview_rows(fund_profile, fund_performance),
        }
    }

    /// true quand aucune section n'a de donnée (instrument non-fonds)
    pub fn is_empty(&self) -> bool {
        self.position_weightings.is_empty()
            && self.sector_weightings.is_empty()
            && self.equity_holdings.is_empty()
            && self.bond_holdings.is_empty()
            && self.bond_ratings.is_empty()
            && self.top_holdings.is_empty()
            && self.overview.is_empty()
    }
}

/// Pondérations à clés fixes d'un objet module ("cashPosition": 0.012, ...)
fn labeled_weight_rows(value: Option<&Value>, labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let obj = match value.and_then(Value::as_object) {
        Some(obj) => obj,
        None => return Vec::new(),
    };
    labels
        .iter()
        .filter_map(|(key, label)| {
            obj.get(*key)
                .and_then(number_like)
                .map(|weight| (label.to_string(), format_percent(weight)))
        })
        .collect()
}

/// Listes de dicts mono-clé ([{"technology": 0.31}, ...]), ordre provider
fn keyed_list_rows(value: Option<&Value>, labels: &[(&str, &'static str)]) -> Vec<(String, String)> {
    let list = match value.and_then(Value::as_array) {
        Some(list) => list,
        None => return Vec::new(),
    };

    let mut rows = Vec::with_capacity(list.len());
    for entry in list {
        if let Some(obj) = entry.as_object() {
            for (key, weight) in obj {
                if let Some(value) = number_like(weight) {
                    rows.push((display_name(key, labels).to_string(), format_percent(value)));
                }
            }
        }
    }
    rows
}

/// Nom d'affichage d'une clé provider, la clé brute en dernier recours
fn display_name<'a>(key: &'a str, labels: &[(&str, &'static str)]) -> &'a str {
    labels
        .iter()
        .find(|(provider_key, _)| *provider_key == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// Mesures numériques d'un objet module (ratios, médianes)
fn measure_rows(value: Option<&Value>, labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let obj = match value.and_then(Value::as_object) {
        Some(obj) => obj,
        None => return Vec::new(),
    };
    labels
        .iter()
        .filter_map(|(key, label)| {
            obj.get(*key)
                .and_then(number_like)
                .map(|v| (label.to_string(), format_measure(v)))
        })
        .collect()
}

/// Top 10 des positions du fonds
fn top_holding_rows(value: Option<&Value>) -> Vec<TopHolding> {
    let list = match value.and_then(Value::as_array) {
        Some(list) => list,
        None => return Vec::new(),
    };
    list.iter()
        .filter_map(|entry| {
            let percent = entry.get("holdingPercent").and_then(number_like)?;
            Some(TopHolding {
                symbol: entry
                    .get("symbol")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                name: entry
                    .get("holdingName")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                percent_assets: percent,
            })
        })
        .collect()
}

/// Lignes fonds de l'onglet Summary
fn overview_rows(
    fund_profile: Option<&Value>,
    fund_performance: Option<&Value>,
) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    let performance_overview = fund_performance.and_then(|v| v.get("performanceOverview"));

    if let Some(v) = performance_overview
        .and_then(|v| v.get("ytdReturnPct"))
        .and_then(number_like)
    {
        rows.push(("YTD Return".to_string(), format_percent(v)));
    }
    if let Some(v) = fund_profile
        .and_then(|v| v.get("feesExpensesInvestment"))
        .and_then(|v| v.get("netExpRatio"))
        .and_then(number_like)
    {
        rows.push(("Expense Ratio (net)".to_string(), format_percent(v)));
    }
    if let Some(name) = fund_profile
        .and_then(|v| v.get("categoryName"))
        .and_then(Value::as_str)
    {
        rows.push(("Category".to_string(), name.to_string()));
    }
    if let Some(v) = performance_overview
        .and_then(|v| v.get("fiveYrAvgReturnPct"))
        .and_then(number_like)
    {
        rows.push(("5y Average Return".to_string(), format_percent(v)));
    }
    rows
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_weightings_fixed_order() {
        let top = json!({
            "stockPosition": { "raw": 0.9834 },
            "cashPosition": 0.0166,
        });
        let comp = FundComposition::from_modules("VTI".to_string(), Some(&top), None, None);
        assert_eq!(
            comp.position_weightings,
            vec![
                ("Cash".to_string(), "1.66%".to_string()),
                ("Stocks".to_string(), "98.34%".to_string()),
            ]
        );
    }

    #[test]
    fn test_sector_weightings_provider_order_and_names() {
        let top = json!({
            "sectorWeightings": [
                { "technology": { "raw": 0.3102 } },
                { "realestate": 0.0251 },
                { "mystery_sector": 0.01 },
            ],
        });
        let comp = FundComposition::from_modules("VTI".to_string(), Some(&top), None, None);
        assert_eq!(
            comp.sector_weightings,
            vec![
                ("Technology".to_string(), "31.02%".to_string()),
                ("Real Estate".to_string(), "2.51%".to_string()),
                // clé inconnue : nom brut conservé
                ("mystery_sector".to_string(), "1.00%".to_string()),
            ]
        );
    }

    #[test]
    fn test_equity_measures_and_bond_ratings() {
        let top = json!({
            "equityHoldings": {
                "priceToEarnings": { "raw": 21.45 },
                "medianMarketCap": { "raw": 52700.0 },
            },
            "bondRatings": [
                { "us_government": { "raw": 0.712 } },
                { "below_b": 0.003 },
            ],
        });
        let comp = FundComposition::from_modules("VTI".to_string(), Some(&top), None, None);
        assert_eq!(comp.equity_holdings[0].1, "21.45");
        assert_eq!(comp.equity_holdings[1].1, "52.70K");
        assert_eq!(comp.bond_ratings[0], ("US Government".to_string(), "71.20%".to_string()));
        assert_eq!(comp.bond_ratings[1].0, "Below B");
    }

    #[test]
    fn test_top_holdings() {
        let top = json!({
            "holdings": [
                { "symbol": "AAPL", "holdingName": "Apple Inc", "holdingPercent": { "raw": 0.0712 } },
                { "holdingName": "sans pourcentage" },
            ],
        });
        let comp = FundComposition::from_modules("VTI".to_string(), Some(&top), None, None);
        assert_eq!(comp.top_holdings.len(), 1);
        assert_eq!(comp.top_holdings[0].symbol, "AAPL");
        assert_eq!(comp.top_holdings[0].percent_assets, 0.0712);
    }

    #[test]
    fn test_overview_rows() {
        let profile = json!({
            "categoryName": "Large Blend",
            "feesExpensesInvestment": { "netExpRatio": { "raw": 0.0003 } },
        });
        let performance = json!({
            "performanceOverview": {
                "ytdReturnPct": { "raw": 0.0523 },
                "fiveYrAvgReturnPct": 0.1101,
            },
        });
        let comp = FundComposition::from_modules(
            "VTI".to_string(),
            None,
            Some(&profile),
            Some(&performance),
        );
        assert_eq!(
            comp.overview,
            vec![
                ("YTD Return".to_string(), "5.23%".to_string()),
                ("Expense Ratio (net)".to_string(), "0.03%".to_string()),
                ("Category".to_string(), "Large Blend".to_string()),
                ("5y Average Return".to_string(), "11.01%".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_modules_yield_empty_composition() {
        let comp = FundComposition::from_modules("AAPL".to_string(), None, None, None);
        assert!(comp.is_empty());
    }
}
