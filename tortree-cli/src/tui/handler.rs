use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tortree_core::Priority;

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode) -> Action {
    match mode {
        AppMode::Help => handle_key_help(key),
        AppMode::Building => handle_key_building(key),
        AppMode::Browsing => handle_key_browsing(key),
    }
}

fn handle_key_help(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::HideHelp,
        _ => Action::Tick,
    }
}

fn handle_key_building(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_browsing(key: KeyEvent) -> Action {
    match key.code {
        // Quit
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToFirst,
        KeyCode::End | KeyCode::Char('G') => Action::GoToLast,

        // Directories
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Action::Enter,
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => Action::GoUp,

        // Selection
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('a') => Action::SelectAll,
        KeyCode::Esc => Action::ClearSelection,

        // Wanted / priority
        KeyCode::Char('w') => Action::SetWanted,
        KeyCode::Char('x') => Action::SetUnwanted,
        KeyCode::Char('1') => Action::SetPriority(Priority::Low),
        KeyCode::Char('2') => Action::SetPriority(Priority::Normal),
        KeyCode::Char('3') => Action::SetPriority(Priority::High),

        // Help
        KeyCode::Char('?') => Action::ShowHelp,

        _ => Action::Tick,
    }
}
