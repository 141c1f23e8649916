// ============================================================================
// Politique de fenêtre temporelle
// ============================================================================
// Associe chaque fenêtre logique du graphique ("1d", "6mo", "max", ...) à un
// couple (granularité, période) à demander au provider, plus la politique
// d'étiquetage de l'axe temps (format + stride).
//
// Deux tables déclaratives : une pour les instruments disposant de barres
// intraday, une pour ceux qui ne publient qu'un cours quotidien (la seconde
// commence à l'échelle du mois). Ajouter une fenêtre = ajouter une ligne de
// table, pas une branche de code.
//
// CONCEPTS RUST :
// 1. const tables : les politiques vivent dans le binaire, zéro allocation
// 2. &'static : les lignes sont référencées directement, jamais copiées
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::bar::{Interval, RangePeriod};

/// Nombre minimum de barres 1 minute sur la dernière séance pour considérer
/// qu'un instrument supporte l'intraday. Les fonds à cours quotidien
/// renvoient parfois 1 à 4 barres minute isolées ; 5 évite de les classer
/// intraday à tort.
pub const MIN_INTRADAY_BARS: usize = 5;

/// Fenêtre logique demandée pour le graphique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    /// Dernière séance
    OneDay,
    /// 5 séances
    FiveDays,
    /// 1 mois
    OneMonth,
    /// 6 mois
    SixMonths,
    /// Depuis le 1er janvier
    YearToDate,
    /// 1 an
    OneYear,
    /// 5 ans
    FiveYears,
    /// Tout l'historique
    Max,
}

impl Window {
    /// Label de la fenêtre tel qu'affiché dans le sélecteur
    pub fn label(&self) -> &'static str {
        match self {
            Window::OneDay => "1d",
            Window::FiveDays => "5d",
            Window::OneMonth => "1mo",
            Window::SixMonths => "6mo",
            Window::YearToDate => "ytd",
            Window::OneYear => "1y",
            Window::FiveYears => "5y",
            Window::Max => "max",
        }
    }
}

/// Formats chrono pour l'axe temps
///
/// - `label` : ticks de l'axe (court)
/// - `hover` : barre survolée / pied de graphique (détaillé)
#[derive(Debug, Clone, Copy)]
pub struct TickFormat {
    pub label: &'static str,
    pub hover: &'static str,
}

/// Une ligne de la table de politique
///
/// `tick_stride` est une constante par fenêtre (un label tous les N points),
/// choisie pour un nombre de labels lisible sur une série typique — jamais
/// recalculée depuis la densité des données.
#[derive(Debug, Clone, Copy)]
pub struct WindowPolicy {
    pub window: Window,
    pub interval: Interval,
    pub period: RangePeriod,
    pub tick_format: TickFormat,
    pub tick_stride: usize,
}

/// Table pour les instruments avec barres intraday
///
/// Strides : ~1 label tous les (longueur typique / 6) points. La longueur
/// typique par fenêtre : 1d ≈ 195 barres 2m, 5d ≈ 130 barres 15m,
/// 1mo ≈ 273 barres 30m, 6mo ≈ 126 jours, ytd ≈ 1600 barres 30m à mi-année,
/// 1y ≈ 252 jours, 5y ≈ 261 semaines, max ≈ 240 mois.
pub const INTRADAY_POLICIES: [WindowPolicy; 8] = [
    WindowPolicy {
        window: Window::OneDay,
        interval: Interval::M2,
        period: RangePeriod::OneDay,
        tick_format: TickFormat {
            label: "%I %p",
            hover: "%I:%M %p",
        },
        tick_stride: 32,
    },
    WindowPolicy {
        window: Window::FiveDays,
        interval: Interval::M15,
        period: RangePeriod::FiveDays,
        tick_format: TickFormat {
            label: "%a",
            hover: "%a %b %-d, %I:%M %p",
        },
        tick_stride: 21,
    },
    WindowPolicy {
        window: Window::OneMonth,
        interval: Interval::M30,
        period: RangePeriod::OneMonth,
        tick_format: TickFormat {
            label: "%b %-d",
            hover: "%b %-d, %y",
        },
        tick_stride: 45,
    },
    WindowPolicy {
        window: Window::SixMonths,
        interval: Interval::D1,
        period: RangePeriod::SixMonths,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 21,
    },
    WindowPolicy {
        window: Window::YearToDate,
        interval: Interval::M30,
        period: RangePeriod::YearToDate,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 260,
    },
    WindowPolicy {
        window: Window::OneYear,
        interval: Interval::D1,
        period: RangePeriod::OneYear,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 42,
    },
    WindowPolicy {
        window: Window::FiveYears,
        interval: Interval::W1,
        period: RangePeriod::FiveYears,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 43,
    },
    WindowPolicy {
        window: Window::Max,
        interval: Interval::Mo1,
        period: RangePeriod::Max,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 40,
    },
];

/// Table pour les instruments sans barres intraday (fonds à cours quotidien)
///
/// Les fenêtres infra-journalières ne sont pas désactivées : elles
/// n'existent pas dans cette table. Longueurs typiques : 1mo ≈ 21 jours,
/// ytd ≈ 126 jours à mi-année, 1y ≈ 252 jours, 5y ≈ 261 semaines,
/// max ≈ 240 mois.
pub const DAILY_POLICIES: [WindowPolicy; 5] = [
    WindowPolicy {
        window: Window::OneMonth,
        interval: Interval::D1,
        period: RangePeriod::OneMonth,
        tick_format: TickFormat {
            label: "%b %-d",
            hover: "%b %-d, %y",
        },
        tick_stride: 4,
    },
    WindowPolicy {
        window: Window::YearToDate,
        interval: Interval::D1,
        period: RangePeriod::YearToDate,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 21,
    },
    WindowPolicy {
        window: Window::OneYear,
        interval: Interval::D1,
        period: RangePeriod::OneYear,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 42,
    },
    WindowPolicy {
        window: Window::FiveYears,
        interval: Interval::W1,
        period: RangePeriod::FiveYears,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 43,
    },
    WindowPolicy {
        window: Window::Max,
        interval: Interval::Mo1,
        period: RangePeriod::Max,
        tick_format: TickFormat {
            label: "%b %-d, %y",
            hover: "%b %-d, %y",
        },
        tick_stride: 40,
    },
];

/// Retourne la table applicable à l'instrument
///
/// Le sélecteur de fenêtre de l'UI itère directement sur cette slice :
/// une fenêtre absente de la table n'est pas proposée du tout.
pub fn available_windows(has_intraday: bool) -> &'static [WindowPolicy] {
    if has_intraday {
        &INTRADAY_POLICIES
    } else {
        &DAILY_POLICIES
    }
}

/// Sélectionne la politique d'une fenêtre dans la table applicable
///
/// Retourne `None` quand la fenêtre n'existe pas pour cet instrument
/// (ex : "1d" sans support intraday).
pub fn select_policy(window: Window, has_intraday: bool) -> Option<&'static WindowPolicy> {
    available_windows(has_intraday)
        .iter()
        .find(|p| p.window == window)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intraday_table_covers_all_windows() {
        let windows: Vec<Window> = INTRADAY_POLICIES.iter().map(|p| p.window).collect();
        assert_eq!(
            windows,
            vec![
                Window::OneDay,
                Window::FiveDays,
                Window::OneMonth,
                Window::SixMonths,
                Window::YearToDate,
                Window::OneYear,
                Window::FiveYears,
                Window::Max,
            ]
        );
    }

    #[test]
    fn test_daily_table_starts_at_month_scale() {
        assert_eq!(DAILY_POLICIES[0].window, Window::OneMonth);
        assert!(DAILY_POLICIES
            .iter()
            .all(|p| p.window != Window::OneDay && p.window != Window::FiveDays));
    }

    #[test]
    fn test_daily_table_never_returns_intraday_interval() {
        for policy in available_windows(false) {
            assert!(
                !policy.interval.is_intraday(),
                "intervalle intraday {} pour la fenêtre {}",
                policy.interval.label(),
                policy.window.label()
            );
        }
    }

    #[test]
    fn test_select_policy_comes_from_the_declared_table() {
        // Toute sélection doit être une ligne de la table courante, à l'identique
        for has_intraday in [true, false] {
            for row in available_windows(has_intraday) {
                let selected = select_policy(row.window, has_intraday)
                    .expect("fenêtre déclarée mais non sélectionnable");
                assert!(std::ptr::eq(selected, row));
            }
        }
    }

    #[test]
    fn test_sub_day_windows_removed_without_intraday() {
        assert!(select_policy(Window::OneDay, false).is_none());
        assert!(select_policy(Window::FiveDays, false).is_none());
        // Mais disponibles avec intraday
        assert!(select_policy(Window::OneDay, true).is_some());
    }

    #[test]
    fn test_policy_pairs_spot_check() {
        let p = select_policy(Window::FiveDays, true).unwrap();
        assert_eq!(p.interval, Interval::M15);
        assert_eq!(p.period, RangePeriod::FiveDays);

        let p = select_policy(Window::YearToDate, true).unwrap();
        assert_eq!(p.interval, Interval::M30);

        let p = select_policy(Window::YearToDate, false).unwrap();
        assert_eq!(p.interval, Interval::D1);

        let p = select_policy(Window::Max, false).unwrap();
        assert_eq!(p.interval, Interval::Mo1);
        assert_eq!(p.period, RangePeriod::Max);
    }

    #[test]
    fn test_strides_allow_at_least_two_ticks() {
        for policy in INTRADAY_POLICIES.iter().chain(DAILY_POLICIES.iter()) {
            assert!(policy.tick_stride >= 2);
        }
    }
}
