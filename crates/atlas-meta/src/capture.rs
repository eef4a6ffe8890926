//! Write-once capture of the registrations made by one meta document.

use std::fmt;

use crate::{ChildrenSettings, MetaContext, MetaError, Settings, SheetSettings};

/// The four registration slots a meta document can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Settings,
    DefaultSettings,
    SheetSettings,
    ChildrenSettings,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::Settings,
        Slot::DefaultSettings,
        Slot::SheetSettings,
        Slot::ChildrenSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Settings => "settings",
            Slot::DefaultSettings => "default_settings",
            Slot::SheetSettings => "sheet_settings",
            Slot::ChildrenSettings => "children_settings",
        }
    }

    pub fn from_name(name: &str) -> Option<Slot> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    fn forbidden_in(&self, context: MetaContext) -> bool {
        matches!(
            (self, context),
            (Slot::SheetSettings, MetaContext::Folder) | (Slot::ChildrenSettings, MetaContext::Asset)
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registrations collected while one document is evaluated.
///
/// Each slot accepts a single value; later registrations into a filled slot
/// are dropped. A capture is created per evaluation and consumed by
/// [`MetaCapture::finish`].
#[derive(Debug, Default)]
pub struct MetaCapture {
    settings: Option<Settings>,
    default_settings: Option<Settings>,
    sheet_settings: Option<SheetSettings>,
    children_settings: Option<ChildrenSettings>,
}

/// What a meta document registered, validated for its context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaOutput {
    pub settings: Option<Settings>,
    pub default_settings: Option<Settings>,
    pub sheet_settings: Option<SheetSettings>,
    pub children_settings: Option<ChildrenSettings>,
}

fn store<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

impl MetaCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the slot was already filled.
    pub fn settings(&mut self, settings: Settings) -> bool {
        store(&mut self.settings, settings)
    }

    pub fn default_settings(&mut self, settings: Settings) -> bool {
        store(&mut self.default_settings, settings)
    }

    pub fn sheet_settings(&mut self, sheet: SheetSettings) -> bool {
        store(&mut self.sheet_settings, sheet)
    }

    pub fn children_settings(&mut self, children: ChildrenSettings) -> bool {
        store(&mut self.children_settings, children)
    }

    pub fn is_filled(&self, slot: Slot) -> bool {
        match slot {
            Slot::Settings => self.settings.is_some(),
            Slot::DefaultSettings => self.default_settings.is_some(),
            Slot::SheetSettings => self.sheet_settings.is_some(),
            Slot::ChildrenSettings => self.children_settings.is_some(),
        }
    }

    /// Validate the registrations against `context` and hand them out.
    pub fn finish(self, context: MetaContext) -> Result<MetaOutput, MetaError> {
        if let Some(slot) = Slot::ALL
            .into_iter()
            .find(|slot| self.is_filled(*slot) && slot.forbidden_in(context))
        {
            return Err(MetaError::Forbidden { slot, context });
        }

        if context == MetaContext::Asset
            && self.settings.is_none()
            && self.default_settings.is_none()
            && self.sheet_settings.is_none()
        {
            return Err(MetaError::MissingRegistration);
        }

        Ok(MetaOutput {
            settings: self.settings,
            default_settings: self.default_settings,
            sheet_settings: self.sheet_settings,
            children_settings: self.children_settings,
        })
    }
}
