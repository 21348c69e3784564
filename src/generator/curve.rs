/*
curve.rs

Copyright 2025 Hervé Quatremain

This file is part of Kanjimerge.

Kanjimerge is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Kanjimerge is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Kanjimerge. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Target difficulty for each stage.
//!
//! The target is a linear ramp modulated by a sine wave, so that hard stages alternate with
//! easier ones instead of rising monotonically.

use std::f64::consts::TAU;

use crate::config::{DifficultyMode, MAX_DIFFICULTY, MIN_DIFFICULTY, Settings};

/// Difficulty curve.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyCurve {
    /// Ramp value at the first position.
    pub ramp_start: f64,

    /// Ramp value at the last position.
    pub ramp_end: f64,

    /// Wave amplitude, in difficulty levels.
    pub amplitude: f64,

    /// Wave period, in positions.
    pub period: f64,

    /// Lowest target.
    pub min: u8,

    /// Highest target.
    pub max: u8,
}

impl DifficultyCurve {
    /// Build the curve for the given mode.
    ///
    /// In Easy mode, the ramp and the targets stop at [`Settings::easy_max_difficulty`].
    pub fn new(settings: &Settings, mode: DifficultyMode) -> Self {
        let max: u8 = match mode {
            DifficultyMode::Easy => settings.easy_max_difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            DifficultyMode::Normal => MAX_DIFFICULTY,
        };
        Self {
            ramp_start: settings.ramp_start.min(max as f64),
            ramp_end: settings.ramp_end.min(max as f64),
            amplitude: settings.wave_amplitude,
            period: settings.wave_period,
            min: MIN_DIFFICULTY,
            max,
        }
    }

    /// Return the target difficulty at `position`, for a curve that spans `span` positions.
    pub fn target(&self, position: usize, span: usize) -> u8 {
        let progress: f64 = if span > 1 {
            position as f64 / (span - 1) as f64
        } else {
            0.0
        };
        let ramp: f64 = self.ramp_start + (self.ramp_end - self.ramp_start) * progress;
        let wave: f64 = if self.period > 0.0 {
            self.amplitude * (TAU * position as f64 / self.period).sin()
        } else {
            0.0
        };
        (ramp + wave)
            .round()
            .clamp(self.min as f64, self.max as f64) as u8
    }
}
