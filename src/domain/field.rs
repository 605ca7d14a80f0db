//! Editor fields whose value may be derived from another field.

/// Whether a field is still following its source or was edited by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Derived,
    Manual,
}

/// A text value paired with its [`FieldMode`].
///
/// Upstream changes only reach the value while the mode is
/// [`FieldMode::Derived`]; any direct edit switches it to
/// [`FieldMode::Manual`] until derivation is re-enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedField {
    value: String,
    mode: FieldMode,
}

impl DerivedField {
    pub fn derived(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mode: FieldMode::Derived,
        }
    }

    pub fn manual(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mode: FieldMode::Manual,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    pub fn is_derived(&self) -> bool {
        self.mode == FieldMode::Derived
    }

    /// Direct edit by the author.
    pub fn edit(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.mode = FieldMode::Manual;
    }

    /// Recompute from the source, unless the field is manual.
    pub fn follow(&mut self, derive: impl FnOnce() -> String) {
        if self.is_derived() {
            self.value = derive();
        }
    }

    /// Switch back to derivation and recompute right away.
    pub fn rederive(&mut self, derive: impl FnOnce() -> String) {
        self.mode = FieldMode::Derived;
        self.value = derive();
    }

    /// The value when it carries content, `None` for an empty or blank field.
    pub fn submitted(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl Default for DerivedField {
    fn default() -> Self {
        Self::derived(String::new())
    }
}
