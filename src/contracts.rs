use crate::id::ComponentId;
use crate::motion::MotionConfig;
use crate::style::{Radius, Size};
use crate::theme::{ComponentPatch, LocalTheme};

pub trait WithId: Sized {
    fn id(&self) -> &ComponentId;
    fn id_mut(&mut self) -> &mut ComponentId;

    fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        *self.id_mut() = id.into();
        self
    }
}

pub(crate) trait SizeConfigurable: Sized {
    fn size(self, value: Size) -> Self;
    fn radius(self, value: Radius) -> Self;
}

pub trait Sizeable: Sized {
    fn size(self, value: Size) -> Self;
}

impl<T> Sizeable for T
where
    T: SizeConfigurable,
{
    fn size(self, value: Size) -> Self {
        SizeConfigurable::size(self, value)
    }
}

pub trait Radiusable: Sized {
    fn radius(self, value: Radius) -> Self;
}

impl<T> Radiusable for T
where
    T: SizeConfigurable,
{
    fn radius(self, value: Radius) -> Self {
        SizeConfigurable::radius(self, value)
    }
}

pub trait Disableable: Sized {
    fn disabled(self, value: bool) -> Self;
}

#[macro_export]
macro_rules! impl_disableable {
    ($type:ty) => {
        impl $crate::contracts::Disableable for $type {
            fn disabled(self, value: bool) -> Self {
                <$type>::disabled(self, value)
            }
        }
    };
}

pub trait MotionAware: Sized {
    fn motion(self, value: MotionConfig) -> Self;
}

pub trait ComponentThemeOverridable: Sized {
    fn local_theme_mut(&mut self) -> &mut LocalTheme;

    fn with_theme_patch(mut self, patch: ComponentPatch) -> Self {
        self.local_theme_mut().set_component_patch(Some(patch));
        self
    }

    fn theme(mut self, configure: impl FnOnce(ComponentPatch) -> ComponentPatch) -> Self {
        self.local_theme_mut().update_component_patch(configure);
        self
    }

    fn clear_theme_patch(mut self) -> Self {
        self.local_theme_mut().set_component_patch(None);
        self
    }
}
