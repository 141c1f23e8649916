// ============================================================================
// Annotations du graphique
// ============================================================================
// Statistiques résumées de la fenêtre affichée, recalculées à chaque rendu
// à partir de la série agrégée. Fonction pure : la couleur, le signe et le
// placement des badges restent du ressort du rendu.
//
// Attention : window_high / window_low portent sur la colonne Close de la
// fenêtre affichée — ce ne sont PAS les extrêmes 52 semaines de
// l'instrument (sauf si la fenêtre est exactement "1y").
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::aggregate::AggregatedSeries;

/// Résumé dérivé d'une fenêtre affichée
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAnnotation {
    /// Variation en % entre la première et la dernière clôture
    pub percent_change_over_window: f64,
    /// Plus haute clôture de la fenêtre
    pub window_high: f64,
    /// Plus basse clôture de la fenêtre
    pub window_low: f64,
    /// Distance de la dernière clôture au plus bas, en %
    pub percent_from_low: f64,
    /// Distance de la dernière clôture au plus haut, en % (généralement ≤ 0)
    pub percent_from_high: f64,
    /// Dernière clôture de la fenêtre
    pub most_recent_close: f64,
}

/// Calcule l'annotation d'une série agrégée
///
/// Retourne `None` (sentinelle « indisponible ») quand la série compte
/// moins de 2 lignes — une fenêtre d'une seule clôture n'a pas de
/// variation — ou quand un dénominateur serait nul. Ne panique jamais.
pub fn annotate(series: &AggregatedSeries) -> Option<WindowAnnotation> {
    if series.len() < 2 {
        return None;
    }

    let first_close = series.first()?.close;
    let last_close = series.last()?.close;

    let window_high = series
        .rows
        .iter()
        .map(|r| r.close)
        .max_by(|a, b| a.partial_cmp(b).unwrap())?;
    let window_low = series
        .rows
        .iter()
        .map(|r| r.close)
        .min_by(|a, b| a.partial_cmp(b).unwrap())?;

    if first_close == 0.0 || window_low == 0.0 || window_high == 0.0 {
        return None;
    }

    Some(WindowAnnotation {
        percent_change_over_window: (last_close - first_close) / first_close * 100.0,
        window_high,
        window_low,
        percent_from_low: (last_close - window_low) / window_low * 100.0,
        percent_from_high: (last_close - window_high) / window_high * 100.0,
        most_recent_close: last_close,
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aggregate::{AggregatedRow, Frequency};
    use chrono::{Duration, Utc};

    /// Série agrégée synthétique à partir d'une liste de clôtures
    fn series_from_closes(closes: &[f64]) -> AggregatedSeries {
        let start = Utc::now();
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, close)| AggregatedRow {
                timestamp: start + Duration::days(i as i64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: 100,
                change: None,
                percent_change: None,
                dividends: None,
                splits: None,
            })
            .collect();
        AggregatedSeries {
            symbol: "AAPL".to_string(),
            frequency: Frequency::Daily,
            includes_actions: false,
            utc_offset_secs: 0,
            rows,
        }
    }

    #[test]
    fn test_losing_window() {
        let ann = annotate(&series_from_closes(&[100.0, 80.0])).unwrap();
        assert_eq!(ann.window_high, 100.0);
        assert_eq!(ann.window_low, 80.0);
        assert_eq!(ann.percent_change_over_window, -20.0);
        assert_eq!(ann.percent_from_low, 0.0);
        assert_eq!(ann.percent_from_high, -20.0);
        assert_eq!(ann.most_recent_close, 80.0);
    }

    #[test]
    fn test_gaining_window() {
        let ann = annotate(&series_from_closes(&[100.0, 110.0, 105.0])).unwrap();
        assert_eq!(ann.window_high, 110.0);
        assert_eq!(ann.window_low, 100.0);
        assert_eq!(ann.percent_change_over_window, 5.0);
        assert_eq!(ann.percent_from_low, 5.0);
        assert!((ann.percent_from_high - (-4.545454)).abs() < 0.001);
    }

    #[test]
    fn test_too_short_series_yields_sentinel() {
        assert!(annotate(&series_from_closes(&[])).is_none());
        assert!(annotate(&series_from_closes(&[42.0])).is_none());
    }

    #[test]
    fn test_zero_close_yields_sentinel() {
        assert!(annotate(&series_from_closes(&[0.0, 10.0])).is_none());
    }
}
