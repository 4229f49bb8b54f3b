use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use slogscope_types::Severity;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    Console,
    Detail,
    SearchInput,
    GroupPicker,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::Dismiss);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        // Console list - less-like navigation
        let mut console = HashMap::new();
        console.insert(KeyBinding::new(KeyCode::Char('j')), Action::SelectDown(1));
        console.insert(KeyBinding::new(KeyCode::Down), Action::SelectDown(1));
        console.insert(KeyBinding::new(KeyCode::Char('k')), Action::SelectUp(1));
        console.insert(KeyBinding::new(KeyCode::Up), Action::SelectUp(1));
        console.insert(KeyBinding::ctrl(KeyCode::Char('f')), Action::PageDown);
        console.insert(KeyBinding::ctrl(KeyCode::Char('b')), Action::PageUp);
        console.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::PageDown);
        console.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::PageUp);
        console.insert(KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        console.insert(KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        console.insert(KeyBinding::new(KeyCode::Char('g')), Action::SelectFirst);
        console.insert(KeyBinding::shift(KeyCode::Char('G')), Action::SelectLast);
        console.insert(KeyBinding::new(KeyCode::Home), Action::SelectFirst);
        console.insert(KeyBinding::new(KeyCode::End), Action::SelectLast);
        console.insert(KeyBinding::new(KeyCode::Char('f')), Action::ToggleAutoScroll);
        // Severity toggles
        console.insert(
            KeyBinding::new(KeyCode::Char('e')),
            Action::ToggleSeverity(Severity::Error),
        );
        console.insert(
            KeyBinding::new(KeyCode::Char('w')),
            Action::ToggleSeverity(Severity::Warning),
        );
        console.insert(
            KeyBinding::new(KeyCode::Char('i')),
            Action::ToggleSeverity(Severity::Info),
        );
        console.insert(KeyBinding::new(KeyCode::Char('c')), Action::ToggleCollapse);
        console.insert(KeyBinding::shift(KeyCode::Char('X')), Action::ClearConsole);
        console.insert(KeyBinding::new(KeyCode::Char('s')), Action::ExportView);
        console.insert(KeyBinding::new(KeyCode::Char('r')), Action::ReopenSource);
        console.insert(KeyBinding::new(KeyCode::Char('p')), Action::ToggleGroupPicker);
        console.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        console.insert(KeyBinding::new(KeyCode::Char('n')), Action::ClearSearch);
        console.insert(KeyBinding::new(KeyCode::Enter), Action::OpenFrame);
        console.insert(KeyBinding::new(KeyCode::Tab), Action::ToggleDetailFocus);
        console.insert(KeyBinding::new(KeyCode::Char('+')), Action::GrowDetail);
        console.insert(KeyBinding::shift(KeyCode::Char('+')), Action::GrowDetail);
        console.insert(KeyBinding::new(KeyCode::Char('-')), Action::ShrinkDetail);
        bindings.insert(KeyContext::Console, console);

        // Detail pane: move between stack-trace lines
        let mut detail = HashMap::new();
        detail.insert(KeyBinding::new(KeyCode::Char('j')), Action::FrameDown);
        detail.insert(KeyBinding::new(KeyCode::Down), Action::FrameDown);
        detail.insert(KeyBinding::new(KeyCode::Char('k')), Action::FrameUp);
        detail.insert(KeyBinding::new(KeyCode::Up), Action::FrameUp);
        detail.insert(KeyBinding::new(KeyCode::Enter), Action::OpenFrame);
        detail.insert(KeyBinding::new(KeyCode::Tab), Action::ToggleDetailFocus);
        detail.insert(KeyBinding::new(KeyCode::Esc), Action::ToggleDetailFocus);
        detail.insert(KeyBinding::new(KeyCode::Char('+')), Action::GrowDetail);
        detail.insert(KeyBinding::shift(KeyCode::Char('+')), Action::GrowDetail);
        detail.insert(KeyBinding::new(KeyCode::Char('-')), Action::ShrinkDetail);
        bindings.insert(KeyContext::Detail, detail);

        // Search input (when search bar is active)
        let mut search = HashMap::new();
        search.insert(KeyBinding::new(KeyCode::Enter), Action::ApplySearch);
        search.insert(KeyBinding::new(KeyCode::Esc), Action::CloseSearch);
        search.insert(KeyBinding::new(KeyCode::Backspace), Action::SearchBackspace);
        search.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::SearchClear);
        search.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::CloseSearch);
        bindings.insert(KeyContext::SearchInput, search);

        // Group picker overlay
        let mut picker = HashMap::new();
        picker.insert(KeyBinding::new(KeyCode::Up), Action::PickerUp);
        picker.insert(KeyBinding::new(KeyCode::Down), Action::PickerDown);
        picker.insert(KeyBinding::new(KeyCode::Char('k')), Action::PickerUp);
        picker.insert(KeyBinding::new(KeyCode::Char('j')), Action::PickerDown);
        picker.insert(KeyBinding::new(KeyCode::Char(' ')), Action::PickerToggle);
        picker.insert(KeyBinding::new(KeyCode::Enter), Action::PickerToggle);
        picker.insert(KeyBinding::new(KeyCode::Char('a')), Action::PickerSelectAll);
        picker.insert(KeyBinding::new(KeyCode::Char('c')), Action::PickerCycleColor);
        picker.insert(KeyBinding::new(KeyCode::Char('d')), Action::PickerRemove);
        picker.insert(KeyBinding::new(KeyCode::Char('p')), Action::ToggleGroupPicker);
        picker.insert(KeyBinding::new(KeyCode::Esc), Action::ToggleGroupPicker);
        bindings.insert(KeyContext::GroupPicker, picker);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|context_bindings| context_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event while the search bar is active
    /// Returns Some(Action) for special keys and typed characters
    pub fn get_search_input_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if let Some(action) = self
            .bindings
            .get(&KeyContext::SearchInput)
            .and_then(|search| search.get(&binding))
        {
            return Some(action.clone());
        }

        // Regular characters extend the query
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(Action::SearchInput(c));
            }
        }

        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_context_binding_wins_over_global() {
        let bindings = KeyBindings::new();
        let esc = key(KeyCode::Esc, KeyModifiers::NONE);

        assert_eq!(
            bindings.get_action(KeyContext::Console, &esc),
            Some(Action::Dismiss)
        );
        assert_eq!(
            bindings.get_action(KeyContext::GroupPicker, &esc),
            Some(Action::ToggleGroupPicker)
        );
    }

    #[test]
    fn test_severity_toggles() {
        let bindings = KeyBindings::new();
        let w = key(KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(
            bindings.get_action(KeyContext::Console, &w),
            Some(Action::ToggleSeverity(Severity::Warning))
        );
    }

    #[test]
    fn test_search_input_takes_plain_characters() {
        let bindings = KeyBindings::new();

        // 'q' quits in the console but types while searching
        let q = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(bindings.get_search_input_action(&q), Some(Action::SearchInput('q')));

        let upper = key(KeyCode::Char('T'), KeyModifiers::SHIFT);
        assert_eq!(
            bindings.get_search_input_action(&upper),
            Some(Action::SearchInput('T'))
        );

        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(bindings.get_search_input_action(&enter), Some(Action::ApplySearch));

        let ctrl_x = key(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(bindings.get_search_input_action(&ctrl_x), None);
    }

    #[test]
    fn test_unbound_key() {
        let bindings = KeyBindings::new();
        let z = key(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(bindings.get_action(KeyContext::Console, &z), None);
    }
}
