use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

use crate::action::TreeAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct TreeKeyBindings {
    profile: KeymapProfile,
}

impl Default for TreeKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve(&self, key: KeyEvent) -> Option<TreeAction> {
        let nav_action = match self.profile {
            KeymapProfile::Default => self.resolve_default_nav(key),
            KeymapProfile::Vim => self.resolve_vim_nav(key),
            KeymapProfile::Arrows => self.resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        self.resolve_common(key)
    }

    const fn resolve_default_nav(&self, key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(TreeAction::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(TreeAction::SelectNext),
            KeyCode::Left | KeyCode::Char('h') => Some(TreeAction::SelectParent),
            KeyCode::Right | KeyCode::Char('l') => Some(TreeAction::SelectChild),
            _ => None,
        }
    }

    const fn resolve_vim_nav(&self, key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Char('k') => Some(TreeAction::SelectPrev),
            KeyCode::Char('j') => Some(TreeAction::SelectNext),
            KeyCode::Char('h') => Some(TreeAction::SelectParent),
            KeyCode::Char('l') => Some(TreeAction::SelectChild),
            _ => None,
        }
    }

    const fn resolve_arrow_nav(&self, key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Up => Some(TreeAction::SelectPrev),
            KeyCode::Down => Some(TreeAction::SelectNext),
            KeyCode::Left => Some(TreeAction::SelectParent),
            KeyCode::Right => Some(TreeAction::SelectChild),
            _ => None,
        }
    }

    const fn resolve_common(&self, key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(TreeAction::Activate),
            KeyCode::Char('g') => Some(TreeAction::ToggleGuides),
            KeyCode::Home => Some(TreeAction::SelectFirst),
            KeyCode::End => Some(TreeAction::SelectLast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_profile_accepts_arrows_and_letters() {
        let bindings = TreeKeyBindings::new();
        assert_eq!(bindings.resolve(key(KeyCode::Up)), Some(TreeAction::SelectPrev));
        assert_eq!(bindings.resolve(key(KeyCode::Char('j'))), Some(TreeAction::SelectNext));
        assert_eq!(bindings.resolve(key(KeyCode::Enter)), Some(TreeAction::Activate));
    }

    #[test]
    fn vim_profile_ignores_arrows() {
        let bindings = TreeKeyBindings::with_profile(KeymapProfile::Vim);
        assert_eq!(bindings.resolve(key(KeyCode::Down)), None);
        assert_eq!(bindings.resolve(key(KeyCode::Char('l'))), Some(TreeAction::SelectChild));
    }

    #[test]
    fn arrows_profile_ignores_letters() {
        let bindings = TreeKeyBindings::with_profile(KeymapProfile::Arrows);
        assert_eq!(bindings.resolve(key(KeyCode::Char('k'))), None);
        assert_eq!(bindings.resolve(key(KeyCode::Left)), Some(TreeAction::SelectParent));
    }

    #[test]
    fn common_keys_work_in_every_profile() {
        for profile in [KeymapProfile::Default, KeymapProfile::Vim, KeymapProfile::Arrows] {
            let bindings = TreeKeyBindings::with_profile(profile);
            assert_eq!(bindings.resolve(key(KeyCode::Char(' '))), Some(TreeAction::Activate));
            assert_eq!(bindings.resolve(key(KeyCode::Char('g'))), Some(TreeAction::ToggleGuides));
            assert_eq!(bindings.resolve(key(KeyCode::End)), Some(TreeAction::SelectLast));
        }
    }
}
