//! Keystroke injection for the dictation pipeline.
//!
//! The session only ever needs three synthetic-input actions: type a chunk
//! of text, press Enter, and clear the focused field. Backends implement
//! [`TextInjector`]; failures are surfaced as values and logged by the
//! caller, since a rejected keystroke must never take the listening loop
//! down.

use async_trait::async_trait;

pub mod enigo_injector;
pub mod error;
pub mod noop_injector;

pub use enigo_injector::EnigoInjector;
pub use error::InjectionError;
pub use noop_injector::NoOpInjector;

#[async_trait]
pub trait TextInjector: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Type `text` into the focused application. Implementations append a
    /// trailing space so consecutive dictation chunks do not fuse into one
    /// word.
    async fn type_text(&self, text: &str) -> Result<(), InjectionError>;

    async fn press_enter(&self) -> Result<(), InjectionError>;

    /// Select-all followed by delete in the focused field.
    async fn clear_field(&self) -> Result<(), InjectionError>;
}

pub(crate) fn with_trailing_space(text: &str) -> String {
    if text.ends_with(' ') {
        text.to_string()
    } else {
        format!("{} ", text)
    }
}
