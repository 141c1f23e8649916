// ============================================================================
// Chaîne d'options
// ============================================================================
// Calls et puts d'une échéance, puis fusion en une table unique indexée par
// strike (jointure externe, ordre croissant) : colonnes call | Strike |
// colonnes put, avec un drapeau « dans la monnaie » par côté.
//
// Un call est dans la monnaie quand strike ≤ prix de référence, un put
// quand strike ≥ prix de référence. Le prix de référence est le prix
// courant de l'en-tête (ask, sinon clôture précédente).
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Un contrat d'option (une ligne côté call ou put)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub volume: Option<u64>,
    pub open_interest: Option<u64>,
}

impl OptionQuote {
    /// Variation en % formatée pour la table ("5.25%")
    pub fn percent_change_label(&self) -> String {
        format!("{:.2}%", self.percent_change)
    }
}

/// Chaîne d'options d'une échéance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

/// Une ligne de la table fusionnée calls/puts
///
/// Les drapeaux ITM sont calculés pour les deux côtés même quand un côté
/// est absent du strike ; l'affichage ne les montre que si le côté existe.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub strike: f64,
    pub call: Option<OptionQuote>,
    pub put: Option<OptionQuote>,
    pub call_in_the_money: bool,
    pub put_in_the_money: bool,
}

/// Fusionne calls et puts par strike (jointure externe, strikes croissants)
pub fn combine_chain(chain: &OptionChain, reference_price: f64) -> Vec<CombinedRow> {
    // Clé entière en dixièmes de cent : les strikes cotés sont des quarts
    // ou des demis, la conversion est exacte
    let key = |strike: f64| (strike * 1000.0).round() as i64;

    let mut merged: BTreeMap<i64, (f64, Option<OptionQuote>, Option<OptionQuote>)> =
        BTreeMap::new();
    for call in &chain.calls {
        merged
            .entry(key(call.strike))
            .or_insert((call.strike, None, None))
            .1 = Some(call.clone());
    }
    for put in &chain.puts {
        merged
            .entry(key(put.strike))
            .or_insert((put.strike, None, None))
            .2 = Some(put.clone());
    }

    merged
        .into_values()
        .map(|(strike, call, put)| CombinedRow {
            strike,
            call,
            put,
            call_in_the_money: strike <= reference_price,
            put_in_the_money: strike >= reference_price,
        })
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(strike: f64, last_price: f64) -> OptionQuote {
        OptionQuote {
            strike,
            last_price,
            change: 0.5,
            percent_change: 5.25,
            volume: Some(120),
            open_interest: Some(2400),
        }
    }

    fn chain(calls: Vec<OptionQuote>, puts: Vec<OptionQuote>) -> OptionChain {
        OptionChain {
            symbol: "AAPL".to_string(),
            expiration: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            calls,
            puts,
        }
    }

    #[test]
    fn test_outer_merge_by_strike_sorted() {
        let chain = chain(
            vec![quote(105.0, 2.10), quote(100.0, 5.40)],
            vec![quote(110.0, 6.80), quote(105.0, 1.95)],
        );
        let rows = combine_chain(&chain, 105.0);

        let strikes: Vec<f64> = rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![100.0, 105.0, 110.0]);

        assert!(rows[0].call.is_some() && rows[0].put.is_none());
        assert!(rows[1].call.is_some() && rows[1].put.is_some());
        assert!(rows[2].call.is_none() && rows[2].put.is_some());
    }

    #[test]
    fn test_in_the_money_flags() {
        let chain = chain(
            vec![quote(100.0, 5.40), quote(105.0, 2.10), quote(110.0, 0.80)],
            vec![quote(100.0, 0.70), quote(105.0, 1.95), quote(110.0, 6.80)],
        );
        let rows = combine_chain(&chain, 105.0);

        // Call ITM : strike ≤ 105 ; Put ITM : strike ≥ 105
        assert!(rows[0].call_in_the_money && !rows[0].put_in_the_money);
        assert!(rows[1].call_in_the_money && rows[1].put_in_the_money);
        assert!(!rows[2].call_in_the_money && rows[2].put_in_the_money);
    }

    #[test]
    fn test_fractional_strikes_do_not_collide() {
        let chain = chain(vec![quote(102.5, 1.0)], vec![quote(102.55, 1.0)]);
        let rows = combine_chain(&chain, 100.0);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_percent_change_label() {
        assert_eq!(quote(100.0, 1.0).percent_change_label(), "5.25%");
    }
}
