//! SpeakEasy core crate.
//!
//! Thirty timed Hindi to English translation levels (words, sentences, short
//! paragraphs), unlocked one after another. The progression engine, scoring,
//! countdown and progress persistence are plain Rust and test natively; the
//! `web` module mounts them into a page via `start_app()`.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod engine;
pub mod progress;
pub mod scoring;
pub mod store;
pub mod timer;
mod web;

pub use catalog::{CatalogError, LEVEL_COUNT, Prompt, Tier};
pub use engine::{Engine, EngineError, EngineSnapshot, Feedback, Intent, Phase};
pub use progress::{AttemptRecord, Outcome, ProgressState};
pub use store::{LocalStorageStore, MemoryStore, ProgressStore, StoreError};
pub use timer::{Countdown, LevelTimer, TimerEvent, TimerState};
pub use web::start_app;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (hot reload) fails harmlessly.
    let _ = console_log::init_with_level(log::Level::Info);
}
