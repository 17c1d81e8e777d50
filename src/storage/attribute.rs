// SPDX-License-Identifier: MPL-2.0
//! Theme indicator shared with the rendering layer.

use std::cell::RefCell;
use std::rc::Rc;

/// A single string attribute that already-rendered views read to pick
/// their theme, so a change applies without rebuilding them.
pub trait ThemeAttribute {
    fn get(&self) -> Option<String>;
    fn set(&mut self, value: &str);
}

/// Attribute held in memory; clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct SharedAttribute {
    value: Rc<RefCell<Option<String>>>,
}

impl SharedAttribute {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an attribute that starts with `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(value.into()))),
        }
    }
}

impl ThemeAttribute for SharedAttribute {
    fn get(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn set(&mut self, value: &str) {
        *self.value.borrow_mut() = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_value() {
        let attribute = SharedAttribute::new();
        assert_eq!(attribute.get(), None);

        let mut writer = attribute.clone();
        writer.set("light");
        assert_eq!(attribute.get(), Some("light".to_string()));
    }
}
