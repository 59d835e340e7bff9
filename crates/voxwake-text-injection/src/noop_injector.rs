use async_trait::async_trait;
use tracing::trace;

use crate::error::InjectionError;
use crate::{with_trailing_space, TextInjector};

/// Fallback injector that does nothing and always succeeds. Used when no
/// real backend is available so the pipeline keeps running (transcripts
/// are still logged, just not typed anywhere).
#[derive(Default)]
pub struct NoOpInjector;

impl NoOpInjector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextInjector for NoOpInjector {
    fn backend_name(&self) -> &'static str {
        "noop"
    }

    async fn type_text(&self, text: &str) -> Result<(), InjectionError> {
        trace!(
            "NoOpInjector: would type {} chars",
            with_trailing_space(text).chars().count()
        );
        Ok(())
    }

    async fn press_enter(&self) -> Result<(), InjectionError> {
        trace!("NoOpInjector: would press Enter");
        Ok(())
    }

    async fn clear_field(&self) -> Result<(), InjectionError> {
        trace!("NoOpInjector: would clear the focused field");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_actions_always_succeed() {
        let injector = NoOpInjector::new();
        assert_eq!(injector.backend_name(), "noop");
        injector.type_text("hello").await.unwrap();
        injector.press_enter().await.unwrap();
        injector.clear_field().await.unwrap();
    }
}
