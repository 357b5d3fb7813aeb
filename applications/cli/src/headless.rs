//! Media backend without audio output.
//!
//! The command-line front end resolves and loads sources exactly like a
//! device would, but nothing is rendered: handles only keep track of the
//! transport state and report it back to the engine.

use async_trait::async_trait;
use soundkit_core::{MediaBackend, MediaHandle, MediaOptions, MediaStatus, Result, StatusCallback};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct HeadlessMedia {
    loaded: Mutex<Option<String>>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// URI of the most recently loaded source
    pub fn loaded_uri(&self) -> Option<String> {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MediaBackend for HeadlessMedia {
    async fn create(
        &self,
        uri: &str,
        options: MediaOptions,
        on_status: StatusCallback,
    ) -> Result<Box<dyn MediaHandle>> {
        info!(uri, rate = options.rate, volume = options.volume, "Source loaded");
        *self.loaded.lock().unwrap_or_else(PoisonError::into_inner) = Some(uri.to_string());

        let handle = HeadlessHandle {
            uri: uri.to_string(),
            status: Mutex::new(MediaStatus::default()),
            on_status,
        };
        handle.report(|status| status.is_playing = options.auto_play);
        Ok(Box::new(handle))
    }
}

struct HeadlessHandle {
    uri: String,
    status: Mutex<MediaStatus>,
    on_status: StatusCallback,
}

impl HeadlessHandle {
    fn report(&self, update: impl FnOnce(&mut MediaStatus)) {
        let status = {
            let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
            update(&mut status);
            *status
        };
        (self.on_status)(status);
    }
}

#[async_trait]
impl MediaHandle for HeadlessHandle {
    async fn play(&self) -> Result<()> {
        self.report(|status| status.is_playing = true);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.report(|status| status.is_playing = false);
        Ok(())
    }

    async fn set_position(&self, position_ms: u64) -> Result<()> {
        self.report(|status| status.position_ms = position_ms);
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        debug!(uri = %self.uri, volume, "Volume changed");
        Ok(())
    }

    async fn set_rate(&self, rate: f32) -> Result<()> {
        debug!(uri = %self.uri, rate, "Rate changed");
        Ok(())
    }

    async fn unload(&self) -> Result<()> {
        debug!(uri = %self.uri, "Source unloaded");
        Ok(())
    }
}
