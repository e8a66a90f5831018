use crate::theme::{Theme, ThemePatch};
use std::sync::Arc;

#[derive(Default)]
pub struct DialProvider {
    theme: Option<Theme>,
}

#[derive(Clone)]
struct ProviderGlobal {
    theme: Arc<Theme>,
}

impl gpui::Global for ProviderGlobal {}

impl DialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_theme(mut self, configure: impl FnOnce(Theme) -> Theme) -> Self {
        let current = self.theme.take().unwrap_or_default();
        self.theme = Some(configure(current));
        self
    }

    pub fn patch_theme(self, patch: &ThemePatch) -> Self {
        self.set_theme(|theme| theme.merged(patch))
    }

    pub fn init(self, cx: &mut gpui::App) {
        if cx.has_global::<ProviderGlobal>() {
            if let Some(theme) = self.theme {
                cx.global_mut::<ProviderGlobal>().theme = Arc::new(theme);
            }
            return;
        }

        cx.set_global(ProviderGlobal {
            theme: Arc::new(self.theme.unwrap_or_default()),
        });
    }

    pub fn theme_arc_or_default(cx: &gpui::App) -> Arc<Theme> {
        cx.try_global::<ProviderGlobal>()
            .map(|global| global.theme.clone())
            .unwrap_or_else(|| Arc::new(Theme::default()))
    }
}
