//! Correction models: two interchangeable formulas behind one strategy
//! trait, selected by configuration.
//!
//! Both models are pure functions of one minute's measured gravity value,
//! the intersection's quiet reference level, and the minute's seismic
//! energy ratio. The quiet minute is the one with minimal full energy; its
//! measured value is the quiet level and its energy the ratio denominator.

use gc_core::CorrectionModelKind;
use tracing::debug;

use crate::error::PipelineError;

/// Energy ratios below this are treated as arithmetic domain errors.
pub const MIN_ENERGY_RATIO: f64 = 1e-9;

/// Round half away from zero to four decimal places.
#[must_use]
pub fn round4(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

/// Inputs for one minute's correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinuteInput {
    pub measured: f64,
    pub quiet_level: f64,
    pub energy_ratio: f64,
}

/// A correction formula applied per minute.
pub trait CorrectionModel: Send + Sync {
    fn kind(&self) -> CorrectionModelKind;

    /// # Errors
    ///
    /// `Compute` when the energy ratio is outside the model's domain; the
    /// caller skips that single minute.
    fn correction(&self, input: MinuteInput) -> Result<f64, PipelineError>;
}

fn checked_ratio(input: MinuteInput) -> Result<f64, PipelineError> {
    if input.energy_ratio < MIN_ENERGY_RATIO {
        return Err(PipelineError::Compute(format!(
            "non-positive energy ratio {}",
            input.energy_ratio
        )));
    }
    Ok(input.energy_ratio)
}

fn seismic_correction(input: MinuteInput) -> Result<f64, PipelineError> {
    let ratio = checked_ratio(input)?;
    let amplitude = input.quiet_level - input.measured;
    Ok(amplitude * (1.0 - 1.0 / ratio.sqrt()))
}

/// Pure seismic-energy model.
pub struct SeismicEnergyModel;

impl CorrectionModel for SeismicEnergyModel {
    fn kind(&self) -> CorrectionModelKind {
        CorrectionModelKind::SeismicEnergy
    }

    fn correction(&self, input: MinuteInput) -> Result<f64, PipelineError> {
        Ok(round4(seismic_correction(input)?))
    }
}

/// Seismic-energy model with the corrected value clamped so it never
/// overshoots the quiet level.
pub struct LevelClampedModel;

impl CorrectionModel for LevelClampedModel {
    fn kind(&self) -> CorrectionModelKind {
        CorrectionModelKind::LevelClamped
    }

    fn correction(&self, input: MinuteInput) -> Result<f64, PipelineError> {
        let raw = seismic_correction(input)?;
        let corrected = input.measured + raw;

        let moved = (input.measured - corrected).abs();
        let to_quiet = (corrected - input.quiet_level).abs();
        let clamped = if moved >= to_quiet {
            corrected
        } else {
            input.quiet_level - input.measured + corrected
        };
        Ok(round4(clamped - input.measured))
    }
}

/// Model instance for a configured kind.
#[must_use]
pub fn model_for(kind: CorrectionModelKind) -> Box<dyn CorrectionModel> {
    match kind {
        CorrectionModelKind::SeismicEnergy => Box::new(SeismicEnergyModel),
        CorrectionModelKind::LevelClamped => Box::new(LevelClampedModel),
    }
}

/// Corrections for one intersection's aligned (measured, energy) sequences.
///
/// The quiet minute is the position with minimal full energy. Minutes whose
/// ratio falls outside the model's domain are skipped individually; an
/// all-zero energy sequence yields no corrections at all.
#[must_use]
pub fn minute_corrections(
    model: &dyn CorrectionModel,
    measured: &[f64],
    energy_full: &[f64],
) -> Vec<(usize, f64)> {
    let count = measured.len().min(energy_full.len());
    let Some(quiet) = (0..count).min_by(|&a, &b| {
        energy_full[a]
            .partial_cmp(&energy_full[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    }) else {
        return Vec::new();
    };

    let quiet_energy = energy_full[quiet];
    if quiet_energy <= 0.0 {
        debug!(quiet_energy, "quiet minute has no energy, skipping intersection");
        return Vec::new();
    }
    let quiet_level = measured[quiet];

    let mut corrections = Vec::with_capacity(count);
    for i in 0..count {
        let input = MinuteInput {
            measured: measured[i],
            quiet_level,
            energy_ratio: energy_full[i] / quiet_energy,
        };
        match model.correction(input) {
            Ok(value) => corrections.push((i, value)),
            Err(error) => debug!(minute = i, %error, "minute correction skipped"),
        }
    }
    corrections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round4_keeps_four_decimals_symmetrically() {
        assert_eq!(round4(1.23456), 1.2346);
        assert_eq!(round4(-1.23456), -1.2346);
        assert_eq!(round4(0.00012), 0.0001);
        assert_eq!(round4(-0.00012), -0.0001);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn quiet_minute_gets_zero_seismic_correction() {
        let model = SeismicEnergyModel;
        for measured in [2567.0, 2566.5, 0.0] {
            let value = model
                .correction(MinuteInput {
                    measured,
                    quiet_level: 2567.0,
                    energy_ratio: 1.0,
                })
                .unwrap();
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn seismic_correction_moves_toward_quiet_level() {
        let model = SeismicEnergyModel;
        // Noisy minute reads 2566.9 against a quiet 2567.0; ratio 4 pulls
        // halfway back: 0.1 * (1 - 1/2) = 0.05.
        let value = model
            .correction(MinuteInput {
                measured: 2566.9,
                quiet_level: 2567.0,
                energy_ratio: 4.0,
            })
            .unwrap();
        assert_eq!(value, 0.05);
    }

    #[test]
    fn non_positive_ratio_fails_the_minute() {
        for model in [model_for(CorrectionModelKind::SeismicEnergy),
            model_for(CorrectionModelKind::LevelClamped)]
        {
            let result = model.correction(MinuteInput {
                measured: 2567.0,
                quiet_level: 2567.0,
                energy_ratio: 0.0,
            });
            assert!(matches!(result, Err(PipelineError::Compute(_))));
        }
    }

    #[test]
    fn clamp_never_increases_distance_to_quiet_level() {
        let seismic = SeismicEnergyModel;
        let clamped = LevelClampedModel;
        let quiet_level = 2567.0;

        for measured in [2566.9, 2567.1, 2565.0, 2569.0] {
            for ratio in [1.0, 1.5, 4.0, 100.0] {
                let input = MinuteInput {
                    measured,
                    quiet_level,
                    energy_ratio: ratio,
                };
                let raw = seismic.correction(input).unwrap();
                let clamp = clamped.correction(input).unwrap();

                let raw_distance = (measured + raw - quiet_level).abs();
                let clamp_distance = (measured + clamp - quiet_level).abs();
                assert!(
                    clamp_distance <= raw_distance + 1e-4,
                    "measured {measured} ratio {ratio}: {clamp_distance} > {raw_distance}"
                );
            }
        }
    }

    #[test]
    fn quiet_minute_drives_the_ratio() {
        let model = SeismicEnergyModel;
        let measured = vec![2567.0, 2566.9, 2566.8];
        // Minute 0 is quietest; its value becomes the quiet level.
        let energy = vec![1.0, 4.0, 16.0];

        let corrections = minute_corrections(&model, &measured, &energy);
        assert_eq!(corrections.len(), 3);
        assert_eq!(corrections[0], (0, 0.0));
        assert_eq!(corrections[1], (1, 0.05));
        // A = 0.2, ratio 16: 0.2 * (1 - 1/4) = 0.15.
        assert_eq!(corrections[2], (2, 0.15));
    }

    #[test]
    fn zero_quiet_energy_yields_nothing() {
        let model = SeismicEnergyModel;
        let corrections = minute_corrections(&model, &[2567.0, 2566.9], &[0.0, 4.0]);
        assert!(corrections.is_empty());
    }

    #[test]
    fn sequences_truncate_to_common_length() {
        let model = SeismicEnergyModel;
        let corrections = minute_corrections(&model, &[2567.0, 2566.9, 2566.8], &[1.0, 4.0]);
        assert_eq!(corrections.len(), 2);
    }

    #[test]
    fn models_are_deterministic() {
        let input = MinuteInput {
            measured: 2566.87,
            quiet_level: 2567.01,
            energy_ratio: 2.37,
        };
        for model in [model_for(CorrectionModelKind::SeismicEnergy),
            model_for(CorrectionModelKind::LevelClamped)]
        {
            let a = model.correction(input).unwrap();
            let b = model.correction(input).unwrap();
            assert_eq!(a, b);
        }
    }
}
