//! Resampling and indicator computation

use crate::config::{IndicatorConfig, TradingConfig};
use crate::data::{closes, resample, Bar, Snapshot};
use crate::indicators::{bollinger_series, macd_series, rsi_series, sma_series};
use crate::signals::{SignalRow, Trend};
use crate::Result;
use chrono::Duration;
use tracing::debug;

/// Last computed frame, reused while the bar input is unchanged
#[derive(Debug)]
struct SignalFrame {
    bars: Vec<Bar>,
    rows: Vec<SignalRow>,
}

/// Signal engine
///
/// Stateless apart from the last computed frame.
#[derive(Debug)]
pub struct SignalEngine {
    indicators: IndicatorConfig,
    bar_interval: Duration,
    max_rows: usize,
    last_frame: Option<SignalFrame>,
}

impl SignalEngine {
    pub fn new(indicators: IndicatorConfig, bar_interval: Duration, max_rows: usize) -> Result<Self> {
        if bar_interval.num_seconds() <= 0 {
            anyhow::bail!("bar interval must be positive, got {}s", bar_interval.num_seconds());
        }
        // Reject unusable windows up front rather than on the first cycle
        sma_series(&[], indicators.short_window)?;
        sma_series(&[], indicators.long_window)?;
        rsi_series(&[], indicators.rsi_period)?;
        macd_series(&[], indicators.macd_fast, indicators.macd_slow, indicators.macd_signal)?;
        bollinger_series(&[], indicators.bb_period, indicators.bb_std_dev)?;

        Ok(Self {
            indicators,
            bar_interval,
            max_rows,
            last_frame: None,
        })
    }

    pub fn from_config(config: &TradingConfig) -> Result<Self> {
        Self::new(config.indicators.clone(), config.bar_interval(), config.signal_rows)
    }

    /// Resample snapshots into this engine's bar interval
    pub fn resample(&self, snapshots: &[Snapshot]) -> Vec<Bar> {
        resample(snapshots, self.bar_interval)
    }

    /// Compute indicator rows for time-ascending bars.
    ///
    /// Only rows where every indicator is defined are kept; the most recent
    /// `max_rows` of them are returned, oldest first.
    pub fn compute_indicators(&self, bars: &[Bar]) -> Result<Vec<SignalRow>> {
        let cfg = &self.indicators;
        let closes = closes(bars);

        let short = sma_series(&closes, cfg.short_window)?;
        let long = sma_series(&closes, cfg.long_window)?;
        let rsi = rsi_series(&closes, cfg.rsi_period)?;
        let macd = macd_series(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)?;
        let bands = bollinger_series(&closes, cfg.bb_period, cfg.bb_std_dev)?;

        let mut rows = Vec::new();
        for (i, bar) in bars.iter().enumerate() {
            let (Some(short_ma), Some(long_ma), Some(rsi), Some(band)) =
                (short[i], long[i], rsi[i], bands[i].as_ref())
            else {
                continue;
            };
            rows.push(SignalRow {
                bar: bar.clone(),
                short_ma,
                long_ma,
                signal: Trend::from_averages(short_ma, long_ma),
                rsi,
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                bb_upper: band.upper,
                bb_mid: band.middle,
                bb_lower: band.lower,
            });
        }

        let skip = rows.len().saturating_sub(self.max_rows);
        Ok(rows.split_off(skip))
    }

    /// Resample, then compute (or reuse) the signal frame
    pub fn get_signals(&mut self, snapshots: &[Snapshot]) -> Result<Vec<SignalRow>> {
        let bars = self.resample(snapshots);

        if let Some(frame) = self.last_frame.as_ref().filter(|f| f.bars == bars) {
            debug!("Signal frame unchanged ({} bars), reusing", bars.len());
            return Ok(frame.rows.clone());
        }

        let rows = self.compute_indicators(&bars)?;
        debug!(
            "Computed {} signal rows from {} bars ({} snapshots)",
            rows.len(),
            bars.len(),
            snapshots.len()
        );
        self.last_frame = Some(SignalFrame {
            bars,
            rows: rows.clone(),
        });
        Ok(rows)
    }

    /// Rows from the most recent computation
    pub fn last_frame(&self) -> Option<&[SignalRow]> {
        self.last_frame.as_ref().map(|f| f.rows.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_windows_rejected_at_construction() {
        let cfg = IndicatorConfig {
            bb_period: 1,
            ..Default::default()
        };
        assert!(SignalEngine::new(cfg, Duration::minutes(5), 50).is_err());
        assert!(SignalEngine::new(IndicatorConfig::default(), Duration::zero(), 50).is_err());
    }
}
