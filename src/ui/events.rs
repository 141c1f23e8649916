// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Non-blocking I/O : poll avec timeout pour garder l'UI fluide
// 3. Pattern matching sur KeyCode pour identifier les touches
// 4. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

// ============================================================================
// Enum Event
// ============================================================================
// CONCEPT RUST : Enums avec données
// - Chaque variant peut contenir des données différentes
// - Key(KeyEvent) : stocke l'événement clavier complet
// - Tick : variant sans données (unit variant)
// ============================================================================

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (rafraîchissement, spinners de chargement)
    Tick,
}

// ============================================================================
// Structure EventHandler
// ============================================================================

/// Gestionnaire d'événements
pub struct EventHandler;

impl EventHandler {
    /// Crée un nouveau gestionnaire d'événements
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend max 250ms
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    /// - Si événement, le lit et le convertit
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                // CONCEPT : Filter sur KeyEventKind
                // Sur certains OS, on reçoit Press ET Release
                // On ne veut gérer que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Ok(Event::Key(key))
                }

                // Autres événements (release, resize, mouse) ignorés
                _ => Ok(Event::Tick),
            }
        } else {
            // Timeout : pas d'événement, retourne Tick
            Ok(Event::Tick)
        }
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================
// CONCEPT RUST : Pattern matching avancé
// - Match sur KeyCode pour identifier la touche
// - matches! avec garde pour les classes de caractères
// ============================================================================

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Vérifie si l'événement est 'y' (confirme la sortie)
pub fn is_confirm_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))
    } else {
        false
    }
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Vérifie si l'événement est Entrée
pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

/// Vérifie si l'événement est Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Backspace)
    } else {
        false
    }
}

/// Vérifie si l'événement est Tab (onglet suivant)
pub fn is_next_tab_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Tab)
    } else {
        false
    }
}

/// Vérifie si l'événement est Shift+Tab (onglet précédent)
pub fn is_previous_tab_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::BackTab)
    } else {
        false
    }
}

/// Vérifie si l'événement est 'l' ou flèche droite (sélection suivante)
///
/// La sélection dépend de l'onglet actif : fenêtre du graphique, période
/// de l'historique ou échéance d'options.
pub fn is_next_selection_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('l') | KeyCode::Right)
    } else {
        false
    }
}

/// Vérifie si l'événement est 'h' ou flèche gauche (sélection précédente)
pub fn is_previous_selection_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('h') | KeyCode::Left)
    } else {
        false
    }
}

/// Vérifie si l'événement est 's' (saisir un nouveau symbole)
pub fn is_symbol_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S'))
    } else {
        false
    }
}

/// Vérifie si l'événement est 'c' (style de graphique suivant)
pub fn is_chart_style_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    } else {
        false
    }
}

/// Vérifie si l'événement est 'f' (fréquence de l'historique)
pub fn is_frequency_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('f') | KeyCode::Char('F'))
    } else {
        false
    }
}

/// Vérifie si l'événement est 'r' (recharger le symbole)
pub fn is_reload_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
    } else {
        false
    }
}

/// Extrait le chiffre d'une touche 1-9 (saut direct d'onglet)
pub fn digit_from_event(event: &Event) -> Option<u32> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            return c.to_digit(10);
        }
    }
    None
}

/// Vérifie si l'événement est un caractère valide pour un symbole
///
/// Couvre les tickers composés : BTC-USD, BRK.B, ^GSPC, EURUSD=X
pub fn is_ticker_char_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(c)
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '^' || c == '=')
    } else {
        false
    }
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, event::KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_tab_events() {
        assert!(is_next_tab_event(&key(KeyCode::Tab)));
        assert!(is_previous_tab_event(&key(KeyCode::BackTab)));
        assert!(!is_next_tab_event(&key(KeyCode::BackTab)));
    }

    #[test]
    fn test_digit_from_event() {
        assert_eq!(digit_from_event(&key(KeyCode::Char('3'))), Some(3));
        assert_eq!(digit_from_event(&key(KeyCode::Char('x'))), None);
        assert_eq!(digit_from_event(&Event::Tick), None);
    }

    #[test]
    fn test_ticker_char_event() {
        assert!(is_ticker_char_event(&key(KeyCode::Char('A'))));
        assert!(is_ticker_char_event(&key(KeyCode::Char('-'))));
        assert!(is_ticker_char_event(&key(KeyCode::Char('^'))));
        assert!(!is_ticker_char_event(&key(KeyCode::Char(' '))));
    }

    #[test]
    fn test_selection_events_cover_arrows() {
        assert!(is_next_selection_event(&key(KeyCode::Right)));
        assert!(is_next_selection_event(&key(KeyCode::Char('l'))));
        assert!(is_previous_selection_event(&key(KeyCode::Left)));
        assert!(is_previous_selection_event(&key(KeyCode::Char('h'))));
    }
}
