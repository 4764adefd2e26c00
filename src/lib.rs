//! Pokémon lookup TUI built on tui-dispatch.
//!
//! The library exposes the store, effects and components so the binary and
//! the integration tests share them.

pub mod action;
pub mod api;
pub mod cards;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod evolution;
pub mod favorites;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod view;
