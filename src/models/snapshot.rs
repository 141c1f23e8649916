// ============================================================================
// Snapshot de cotation
// ============================================================================
// Vue à plat des champs quoteSummary du provider (price, summaryDetail,
// defaultKeyStatistics, financialData, assetProfile, ...). La population
// des champs varie énormément selon le type d'instrument (action vs ETF vs
// fonds), d'où une map dynamique plutôt qu'une struct serde figée.
//
// Les valeurs arrivent soit brutes (3.14, "Technology"), soit emballées
// dans un objet { "raw": 3.14, "fmt": "3.14" } : les getters acceptent les
// deux formes. Un champ absent donne None — jamais une erreur.
// ============================================================================

use serde_json::{Map, Value};

/// Dirigeant de l'entreprise (section Key Executives de l'onglet Profile)
#[derive(Debug, Clone, PartialEq)]
pub struct KeyExecutive {
    pub name: String,
    pub title: String,
    pub total_pay: Option<f64>,
    pub exercised_value: Option<f64>,
    pub year_born: Option<i64>,
}

/// Champs de cotation d'un instrument, indexés par nom provider
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    pub symbol: String,
    fields: Map<String, Value>,
}

/// Extrait un nombre d'une valeur brute ou emballée { raw, fmt }
/// (partagé avec la décomposition des fonds, qui lit les mêmes modules)
pub(crate) fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(obj) => obj.get("raw").and_then(Value::as_f64),
        _ => None,
    }
}

impl QuoteSnapshot {
    pub fn new(symbol: String, fields: Map<String, Value>) -> Self {
        Self { symbol, fields }
    }

    /// Valeur numérique d'un champ
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(number_like)
    }

    /// Valeur texte d'un champ (None si vide)
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Object(obj) => match obj.get("fmt") {
                Some(Value::String(s)) if !s.is_empty() => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    /// Valeur booléenne d'un champ
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Valeur brute (pour les structures imbriquées comme companyOfficers)
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// true si le champ existe et n'est pas null
    pub fn has(&self, key: &str) -> bool {
        self.fields.get(key).map(|v| !v.is_null()).unwrap_or(false)
    }

    /// Nom d'affichage : shortName, sinon longName, sinon le symbole
    pub fn display_name(&self) -> &str {
        self.text("shortName")
            .or_else(|| self.text("longName"))
            .unwrap_or(&self.symbol)
    }

    /// Type de cotation provider ("EQUITY", "ETF", "MUTUALFUND", ...)
    pub fn quote_type(&self) -> Option<&str> {
        self.text("quoteType")
    }

    /// true pour les instruments de type fonds (onglet Holdings pertinent)
    pub fn is_fund(&self) -> bool {
        matches!(self.quote_type(), Some("ETF") | Some("MUTUALFUND"))
    }

    /// Prix courant affiché en tête de dashboard : le ask, ou la clôture
    /// précédente quand le ask est absent ou à zéro (hors séance)
    pub fn current_price(&self) -> Option<f64> {
        match self.number("ask") {
            Some(ask) if ask != 0.0 => Some(ask),
            _ => self.number("previousClose"),
        }
    }

    /// Variation (absolue, %) du prix courant contre la clôture de la
    /// séance régulière précédente
    pub fn price_change(&self) -> Option<(f64, f64)> {
        let current = self.current_price()?;
        let previous = self.number("regularMarketPreviousClose")?;
        if previous == 0.0 {
            return None;
        }
        let change = current - previous;
        Some((change, change / previous * 100.0))
    }

    /// Dirigeants listés dans assetProfile.companyOfficers
    pub fn key_executives(&self) -> Vec<KeyExecutive> {
        let officers = match self.raw("companyOfficers").and_then(Value::as_array) {
            Some(list) => list,
            None => return Vec::new(),
        };

        officers
            .iter()
            .filter_map(|officer| {
                let name = officer.get("name")?.as_str()?.to_string();
                Some(KeyExecutive {
                    name,
                    title: officer
                        .get("title")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    total_pay: officer.get("totalPay").and_then(number_like),
                    exercised_value: officer.get("exercisedValue").and_then(number_like),
                    year_born: officer.get("yearBorn").and_then(Value::as_i64),
                })
            })
            .collect()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(fields: Value) -> QuoteSnapshot {
        let map = match fields {
            Value::Object(map) => map,
            _ => panic!("fixture non-objet"),
        };
        QuoteSnapshot::new("AAPL".to_string(), map)
    }

    #[test]
    fn test_number_plain_and_wrapped() {
        let snap = snapshot(json!({
            "trailingPE": 28.5,
            "marketCap": { "raw": 2.5e12, "fmt": "2.5T" },
        }));
        assert_eq!(snap.number("trailingPE"), Some(28.5));
        assert_eq!(snap.number("marketCap"), Some(2.5e12));
        assert_eq!(snap.number("absent"), None);
    }

    #[test]
    fn test_text_and_has() {
        let snap = snapshot(json!({
            "sector": "Technology",
            "empty": "",
            "nullField": null,
        }));
        assert_eq!(snap.text("sector"), Some("Technology"));
        assert_eq!(snap.text("empty"), None);
        assert!(snap.has("sector"));
        assert!(!snap.has("nullField"));
        assert!(!snap.has("absent"));
    }

    #[test]
    fn test_current_price_falls_back_to_previous_close() {
        let snap = snapshot(json!({ "ask": 184.25, "previousClose": 183.0 }));
        assert_eq!(snap.current_price(), Some(184.25));

        // Hors séance, le ask vaut 0 : on retombe sur la clôture
        let snap = snapshot(json!({ "ask": 0.0, "previousClose": 183.0 }));
        assert_eq!(snap.current_price(), Some(183.0));

        let snap = snapshot(json!({ "previousClose": 183.0 }));
        assert_eq!(snap.current_price(), Some(183.0));
    }

    #[test]
    fn test_price_change_against_regular_close() {
        let snap = snapshot(json!({
            "ask": 102.0,
            "previousClose": 101.0,
            "regularMarketPreviousClose": 100.0,
        }));
        let (change, percent) = snap.price_change().unwrap();
        assert_eq!(change, 2.0);
        assert_eq!(percent, 2.0);
    }

    #[test]
    fn test_key_executives() {
        let snap = snapshot(json!({
            "companyOfficers": [
                {
                    "name": "Jane Doe",
                    "title": "CEO",
                    "totalPay": { "raw": 1500000.0, "fmt": "1.5M" },
                    "yearBorn": 1970,
                },
                { "title": "sans nom, ignoré" },
            ],
        }));
        let execs = snap.key_executives();
        assert_eq!(execs.len(), 1);
        assert_eq!(execs[0].name, "Jane Doe");
        assert_eq!(execs[0].total_pay, Some(1_500_000.0));
        assert_eq!(execs[0].year_born, Some(1970));
    }

    #[test]
    fn test_fund_detection() {
        assert!(snapshot(json!({ "quoteType": "ETF" })).is_fund());
        assert!(snapshot(json!({ "quoteType": "MUTUALFUND" })).is_fund());
        assert!(!snapshot(json!({ "quoteType": "EQUITY" })).is_fund());
        assert!(!snapshot(json!({})).is_fund());
    }
}
