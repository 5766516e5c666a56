//! RegimeLab Core — aligned series, indicators, signal, volatility regime, composition.
//!
//! This crate contains the signal-and-backtest engine:
//! - Domain types (observations, aligned series, signals, regimes, variants)
//! - Inner-join alignment of a price series and a volatility series
//! - Rolling indicators with an explicit warm-up contract
//! - Moving-average/RSI signal generation
//! - Rolling z-score volatility regimes with exposure multipliers
//! - Lagged strategy returns and trimming of undefined rows
//!
//! Everything here is pure and synchronous. File I/O, metrics and reporting
//! live in `regimelab-runner`.

pub mod components;
pub mod data;
pub mod domain;
pub mod indicators;
