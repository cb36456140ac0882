//! Per-letter wave caption.
//!
//! The caption is a pure function of its text: an ordered sequence of
//! `(character, delay)` pairs where each delay is `index × step`. Each letter
//! bobs on an endless wave that starts once its delay has elapsed.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::types::WaveConfig;

pub const NBSP: char = '\u{00A0}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letter {
    pub ch: char,
    pub delay: Duration,
}

/// Restartable letter sequence; every call to [`Caption::letters`] starts
/// from the first character again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    text: String,
    step: Duration,
}

impl Caption {
    pub fn new(text: impl Into<String>, step: Duration) -> Self {
        Self {
            text: text.into(),
            step,
        }
    }

    pub fn letters(&self) -> impl Iterator<Item = Letter> + Clone + '_ {
        let step = self.step;
        self.text.chars().enumerate().map(move |(index, ch)| Letter {
            ch: if ch == ' ' { NBSP } else { ch },
            delay: step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX)),
        })
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Upward displacement of a letter at `elapsed`, in the wave's lift units.
///
/// Zero until `delay` has passed, then a raised-cosine bob that peaks at
/// half period.
pub fn wave_offset(elapsed: Duration, delay: Duration, wave: WaveConfig) -> f32 {
    let Some(since) = elapsed.checked_sub(delay) else {
        return 0.0;
    };
    let period = wave.period.as_secs_f64();
    if period <= 0.0 {
        return 0.0;
    }
    let phase = (since.as_secs_f64() / period).fract() as f32;
    wave.lift * 0.5 * (1.0 - (TAU * phase).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_step_by_index() {
        let caption = Caption::new("COMING SOON", Duration::from_millis(100));
        let letters: Vec<_> = caption.letters().collect();
        assert_eq!(letters.len(), 11);
        for (index, letter) in letters.iter().enumerate() {
            assert_eq!(letter.delay, Duration::from_millis(100 * index as u64));
        }
        assert_eq!(letters[0].ch, 'C');
        assert_eq!(letters[6].ch, NBSP);
    }

    #[test]
    fn sequence_restarts() {
        let caption = Caption::new("ab", Duration::from_millis(50));
        let first: Vec<_> = caption.letters().collect();
        let second: Vec<_> = caption.letters().collect();
        assert_eq!(first, second);

        let iter = caption.letters();
        let cloned = iter.clone();
        assert_eq!(iter.count(), cloned.count());
    }

    #[test]
    fn empty_caption_has_no_letters() {
        let caption = Caption::new("", Duration::from_millis(100));
        assert!(caption.is_empty());
        assert_eq!(caption.letters().count(), 0);
    }

    #[test]
    fn letters_rest_before_their_delay() {
        let wave = WaveConfig::default();
        let delay = Duration::from_millis(500);
        assert_eq!(wave_offset(Duration::ZERO, delay, wave), 0.0);
        assert_eq!(wave_offset(Duration::from_millis(499), delay, wave), 0.0);
        assert_eq!(wave_offset(delay, delay, wave), 0.0);
    }

    #[test]
    fn wave_peaks_at_half_period() {
        let wave = WaveConfig {
            period: Duration::from_secs(2),
            lift: 20.0,
        };
        let peak = wave_offset(Duration::from_secs(1), Duration::ZERO, wave);
        assert!((peak - 20.0).abs() < 1e-4);
        let rest = wave_offset(Duration::from_secs(4), Duration::ZERO, wave);
        assert!(rest.abs() < 1e-4);
        let quarter = wave_offset(Duration::from_millis(500), Duration::ZERO, wave);
        assert!((quarter - 10.0).abs() < 1e-3);
    }
}
