//! Chip-list editing for short multi-valued string fields.

/// A list of chips plus the hidden-until-asked "new chip" input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipList {
    values: Vec<String>,
    input_visible: bool,
    input: String,
}

impl ChipList {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values,
            input_visible: false,
            input: String::new(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    pub fn input_visible(&self) -> bool {
        self.input_visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn show_input(&mut self) {
        self.input_visible = true;
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Commit the pending input (blur or enter).
    ///
    /// Appends the trimmed text when it is non-empty and not already a chip,
    /// then hides and clears the input either way. Returns the appended value.
    pub fn confirm(&mut self) -> Option<String> {
        let value = self.input.trim().to_string();
        self.input_visible = false;
        self.input.clear();
        self.push_unique(value)
    }

    /// Append `value` unless it is blank or already present.
    pub fn push_unique(&mut self, value: String) -> Option<String> {
        if value.is_empty() || self.values.contains(&value) {
            return None;
        }
        self.values.push(value.clone());
        Some(value)
    }

    /// Remove every chip equal to `value`.
    pub fn remove(&mut self, value: &str) {
        self.values.retain(|v| v != value);
    }

    /// Overwrite the chip at `index`.
    ///
    /// Only blank replacements are rejected; the result may duplicate
    /// another chip.
    pub fn edit(&mut self, index: usize, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }
}
