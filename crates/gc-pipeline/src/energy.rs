//! Spectral energy extraction for seismic sub-windows.
//!
//! Each intersection is partitioned into consecutive non-overlapping
//! sub-windows (one gravimetric minute by default; a trailing remainder is
//! dropped). Per window and axis the detrended signal goes through a real
//! FFT; spectral energy is the trapezoidal integral of squared one-sided
//! amplitudes over the configured band.

use chrono::{Duration, NaiveDateTime};
use realfft::RealFftPlanner;

use gc_core::Axis;
use gc_db::repos::EnergyRow;
use gc_formats::{SeismicReader, Signal};

use crate::error::PipelineError;

/// Per-worker extractor. The planner caches FFT plans by length, so one
/// extractor per worker amortizes planning across windows.
pub struct SpectralExtractor {
    planner: RealFftPlanner<f64>,
    f_min: f64,
    f_max: f64,
    window_seconds: u32,
}

impl SpectralExtractor {
    #[must_use]
    pub fn new(band: (f64, f64), window_seconds: u32) -> Self {
        Self {
            planner: RealFftPlanner::new(),
            f_min: band.0,
            f_max: band.1,
            window_seconds,
        }
    }

    /// Band-limited spectral energy of one signal window.
    ///
    /// # Errors
    ///
    /// `Compute` for windows too short to transform.
    pub fn band_energy(&mut self, signal: &Signal) -> Result<f64, PipelineError> {
        let n = signal.samples.len();
        if n < 2 {
            return Err(PipelineError::Compute(format!(
                "window of {n} samples is too short for a spectrum"
            )));
        }

        #[allow(clippy::cast_precision_loss)]
        let n_f = n as f64;
        let mean = signal.samples.iter().sum::<f64>() / n_f;
        let mut input: Vec<f64> = signal.samples.iter().map(|s| s - mean).collect();

        let fft = self.planner.plan_fft_forward(n);
        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum)
            .map_err(|e| PipelineError::Compute(e.to_string()))?;

        let df = f64::from(signal.sample_rate) / n_f;
        let scale = 2.0 / n_f;
        let band: Vec<f64> = spectrum
            .iter()
            .enumerate()
            .filter(|(k, _)| {
                #[allow(clippy::cast_precision_loss)]
                let freq = *k as f64 * df;
                freq >= self.f_min && freq <= self.f_max
            })
            .map(|(_, x)| (x.norm() * scale).powi(2))
            .collect();

        if band.len() < 2 {
            return Ok(0.0);
        }
        Ok(band.windows(2).map(|w| (w[0] + w[1]) * 0.5 * df).sum())
    }

    /// Energies of every whole sub-window in `[start, stop)`, ordered by
    /// minute index from 0.
    ///
    /// # Errors
    ///
    /// Signal read failures and degenerate windows fail the whole
    /// intersection; the caller logs and moves to the next one.
    pub fn window_energies(
        &mut self,
        reader: &dyn SeismicReader,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Vec<EnergyRow>, PipelineError> {
        let window = i64::from(self.window_seconds);
        let count = (stop - start).num_seconds() / window;

        let mut rows = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
        for minute_index in 0..count {
            let left = start + Duration::seconds(window * minute_index);
            let right = left + Duration::seconds(window);

            let mut axis_energy = [0.0f64; 3];
            for (slot, axis) in axis_energy.iter_mut().zip(Axis::ALL) {
                let signal = reader.read_signal(axis, left, right)?;
                *slot = self.band_energy(&signal)?;
            }
            let energy_full = axis_energy.iter().map(|e| e * e).sum::<f64>().sqrt();

            rows.push(EnergyRow {
                minute_index,
                energy_x: axis_energy[0],
                energy_y: axis_energy[1],
                energy_z: axis_energy[2],
                energy_full,
            });
        }
        Ok(rows)
    }
}
