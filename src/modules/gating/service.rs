use sekolah_core::Action;
use tracing::trace;

use super::model::{ButtonState, GateDecision, MatchMode, PermissionSource};

pub const DEFAULT_DENIED_TOOLTIP: &str = "Anda tidak memiliki akses untuk tindakan ini";

/// Conditional render on a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGuard {
    pub action: Action,
    pub has_fallback: bool,
}

impl PermissionGuard {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            has_fallback: false,
        }
    }

    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    pub fn decide(&self, source: PermissionSource<'_>) -> GateDecision {
        let allowed = source.resolve().allows(self.action);
        trace!(action = %self.action, allowed, "Permission guard");
        match (allowed, self.has_fallback) {
            (true, _) => GateDecision::Render,
            (false, true) => GateDecision::Fallback,
            (false, false) => GateDecision::Hidden,
        }
    }

    /// Pick the content to show: `children` when allowed, else `fallback`.
    pub fn render<T>(&self, source: PermissionSource<'_>, children: T, fallback: Option<T>) -> Option<T> {
        if source.resolve().allows(self.action) {
            Some(children)
        } else {
            fallback
        }
    }
}

/// A button that stays visible but disabled when the action is denied,
/// unless it is configured to disappear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionButton {
    pub action: Action,
    pub hide_when_denied: bool,
    pub denied_tooltip: Option<String>,
}

impl PermissionButton {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            hide_when_denied: false,
            denied_tooltip: Some(DEFAULT_DENIED_TOOLTIP.to_string()),
        }
    }

    pub fn hide_when_denied(mut self) -> Self {
        self.hide_when_denied = true;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.denied_tooltip = Some(tooltip.into());
        self
    }

    pub fn without_tooltip(mut self) -> Self {
        self.denied_tooltip = None;
        self
    }

    pub fn decide(&self, source: PermissionSource<'_>) -> GateDecision {
        if source.resolve().allows(self.action) {
            GateDecision::Render
        } else if self.hide_when_denied {
            GateDecision::Hidden
        } else {
            GateDecision::Disabled
        }
    }

    /// `disabled` ORs the caller's own disabled flag (e.g. form still
    /// submitting) with the permission check. The tooltip only explains denials.
    pub fn state(&self, source: PermissionSource<'_>, disabled: bool) -> ButtonState {
        match self.decide(source) {
            GateDecision::Hidden => ButtonState {
                visible: false,
                disabled: true,
                tooltip: None,
            },
            GateDecision::Disabled => ButtonState {
                visible: true,
                disabled: true,
                tooltip: self.denied_tooltip.clone(),
            },
            _ => ButtonState {
                visible: true,
                disabled,
                tooltip: None,
            },
        }
    }
}

/// Render when a set of actions is allowed, combined with [`MatchMode`].
///
/// An empty action list never renders: there is nothing to have been granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRender {
    pub actions: Vec<Action>,
    pub mode: MatchMode,
    pub has_fallback: bool,
}

impl ConditionalRender {
    pub fn new(actions: impl IntoIterator<Item = Action>, mode: MatchMode) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            mode,
            has_fallback: false,
        }
    }

    pub fn all(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(actions, MatchMode::All)
    }

    pub fn any(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(actions, MatchMode::Any)
    }

    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    pub fn allows(&self, source: PermissionSource<'_>) -> bool {
        if self.actions.is_empty() {
            return false;
        }
        let permission = source.resolve();
        match self.mode {
            MatchMode::All => permission.allows_all(&self.actions),
            MatchMode::Any => permission.allows_any(&self.actions),
        }
    }

    pub fn decide(&self, source: PermissionSource<'_>) -> GateDecision {
        match (self.allows(source), self.has_fallback) {
            (true, _) => GateDecision::Render,
            (false, true) => GateDecision::Fallback,
            (false, false) => GateDecision::Hidden,
        }
    }

    pub fn render<T>(&self, source: PermissionSource<'_>, children: T, fallback: Option<T>) -> Option<T> {
        if self.allows(source) { Some(children) } else { fallback }
    }
}
