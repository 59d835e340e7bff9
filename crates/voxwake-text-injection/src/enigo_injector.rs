use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::debug;

use crate::error::InjectionError;
use crate::{with_trailing_space, TextInjector};

/// Synthetic input via the enigo library.
///
/// Enigo is not `Send`, so every operation builds its instance inside a
/// blocking task.
pub struct EnigoInjector {
    _private: (),
}

impl EnigoInjector {
    /// Probe availability by constructing an instance once; this fails when
    /// the session lacks input-injection permission.
    pub fn new() -> Result<Self, InjectionError> {
        Enigo::new(&Settings::default())
            .map_err(|e| InjectionError::Unavailable(e.to_string()))?;
        Ok(Self { _private: () })
    }

    async fn with_keyboard<F>(&self, op: F) -> Result<(), InjectionError>
    where
        F: FnOnce(&mut Enigo) -> Result<(), InjectionError> + Send + 'static,
    {
        let joined = tokio::task::spawn_blocking(move || {
            let mut enigo = Enigo::new(&Settings::default())
                .map_err(|e| InjectionError::Unavailable(e.to_string()))?;
            op(&mut enigo)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(_) => Err(InjectionError::Cancelled),
        }
    }
}

fn key_failed(action: &str, e: impl std::fmt::Display) -> InjectionError {
    InjectionError::MethodFailed(format!("{}: {}", action, e))
}

#[async_trait]
impl TextInjector for EnigoInjector {
    fn backend_name(&self) -> &'static str {
        "enigo"
    }

    async fn type_text(&self, text: &str) -> Result<(), InjectionError> {
        let padded = with_trailing_space(text);
        let chars = padded.chars().count();
        self.with_keyboard(move |enigo| {
            enigo
                .text(&padded)
                .map_err(|e| key_failed("typing text", e))
        })
        .await?;
        debug!("Typed {} chars via enigo", chars);
        Ok(())
    }

    async fn press_enter(&self) -> Result<(), InjectionError> {
        self.with_keyboard(|enigo| {
            enigo
                .key(Key::Return, Direction::Click)
                .map_err(|e| key_failed("pressing Enter", e))
        })
        .await
    }

    async fn clear_field(&self) -> Result<(), InjectionError> {
        self.with_keyboard(|enigo| {
            #[cfg(target_os = "macos")]
            let modifier = Key::Meta;
            #[cfg(not(target_os = "macos"))]
            let modifier = Key::Control;

            enigo
                .key(modifier, Direction::Press)
                .map_err(|e| key_failed("pressing select-all modifier", e))?;
            enigo
                .key(Key::Unicode('a'), Direction::Click)
                .map_err(|e| key_failed("selecting all", e))?;
            enigo
                .key(modifier, Direction::Release)
                .map_err(|e| key_failed("releasing select-all modifier", e))?;
            enigo
                .key(Key::Backspace, Direction::Click)
                .map_err(|e| key_failed("deleting selection", e))
        })
        .await
    }
}
