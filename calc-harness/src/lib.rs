// SPDX-License-Identifier: GPL-3.0-or-later

pub mod args;
pub mod calc;
pub mod config;
pub mod intercept;
pub mod multi_calc;
pub mod runner;
