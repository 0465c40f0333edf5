//! Procedural explosion-sound fallback.
//!
//! When the host has no explosion audio file, it asks the core for a
//! synthesized sample buffer instead: half a second of enveloped white
//! noise through a low-pass filter, shaped by a fast attack and a long
//! exponential decay. The host hands the buffer to WebAudio; if audio
//! is unavailable entirely it simply never calls this.

use crate::systems::burst::Rng;

/// Length of the noise buffer in seconds.
const NOISE_SECS: f32 = 0.5;
/// Low-pass cutoff, Hz.
const CUTOFF_HZ: f32 = 1400.0;
/// Gain envelope: near-silence to full blast over the attack, then an
/// exponential decay back to near-silence by the end of the buffer.
const GAIN_FLOOR: f32 = 0.0001;
const GAIN_PEAK: f32 = 1.15;
const GAIN_TAIL: f32 = 0.001;
const ATTACK_SECS: f32 = 0.012;
const DECAY_END_SECS: f32 = 0.6;

/// Direct-form biquad low-pass (RBJ cookbook coefficients).
struct LowPass {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl LowPass {
    fn new(sample_rate: f32, cutoff: f32) -> Self {
        let q = std::f32::consts::FRAC_1_SQRT_2;
        let w0 = std::f32::consts::TAU * cutoff / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: ((1.0 - cos_w0) / 2.0) / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: ((1.0 - cos_w0) / 2.0) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        // Transposed direct form II.
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

/// Exponential gain envelope sampled at time `t` seconds.
fn gain_at(t: f32) -> f32 {
    if t < ATTACK_SECS {
        GAIN_FLOOR * (GAIN_PEAK / GAIN_FLOOR).powf(t / ATTACK_SECS)
    } else {
        let decay = (t - ATTACK_SECS) / (DECAY_END_SECS - ATTACK_SECS);
        GAIN_PEAK * (GAIN_TAIL / GAIN_PEAK).powf(decay.min(1.0))
    }
}

/// Render the fallback explosion into a mono sample buffer.
/// Output samples are clamped to [-1, 1].
pub fn render_explosion_fallback(sample_rate: u32, rng: &mut Rng) -> Vec<f32> {
    let len = (sample_rate as f32 * NOISE_SECS) as usize;
    let mut filter = LowPass::new(sample_rate as f32, CUTOFF_HZ);
    let mut out = Vec::with_capacity(len);

    for i in 0..len {
        let t = i as f32 / sample_rate as f32;
        // Raw noise with a linear decay and slight level jitter.
        let env = 1.0 - i as f32 / len as f32;
        let noise = (rng.next_f32() * 2.0 - 1.0) * env * (0.75 + rng.next_f32() * 0.7);
        let sample = filter.process(noise) * gain_at(t);
        out.push(sample.clamp(-1.0, 1.0));
    }
    out
}
