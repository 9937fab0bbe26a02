//! Transient user-facing notices (the equivalent of an alert box).

use crate::request::Feature;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub feature: Feature,
    pub text: String,
}

impl Notice {
    pub fn new(feature: Feature, text: impl Into<String>) -> Self {
        Self {
            feature,
            text: text.into(),
        }
    }
}
