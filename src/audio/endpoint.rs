//! Speech endpointing over captured sample chunks.
//!
//! Decides when an utterance starts and ends from windowed RMS energy:
//! wait for the level to cross the energy threshold, then record until a
//! run of silence as long as the pause threshold, or until the phrase
//! time limit is reached. A short pre-roll of audio from just before the
//! detected onset is kept so the first syllable is not clipped.

/// State after feeding a chunk to the endpointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// No speech yet.
    Waiting,
    /// Speech detected, recording.
    Recording,
    /// Utterance finished (silence run or phrase limit).
    Complete,
}

/// Windowed-RMS speech endpointer.
///
/// Purely sample-driven; time is measured in samples at the capture rate,
/// so the same instance behaves identically on live and synthetic input.
pub struct Endpointer {
    energy_threshold: f32, // RMS level separating speech from silence
    max_samples: usize,    // phrase time limit, in samples of the recorded buffer
    silence_samples: usize, // silence run that ends the utterance
    preroll_samples: usize, // onset slack kept from before speech starts
    preroll: Vec<f32>,
    recorded: Vec<f32>,
    silent_run: usize,
    state: EndpointState,
}

impl Endpointer {
    /// Audio kept from just before the detected onset, in seconds.
    const PREROLL_SECS: f32 = 0.25;

    pub fn new(sample_rate: u32, energy_threshold: f32, pause_threshold: f32, phrase_time_limit: f32) -> Self {
        let rate = sample_rate as f32;
        Self {
            energy_threshold,
            max_samples: (phrase_time_limit * rate) as usize,
            silence_samples: (pause_threshold * rate) as usize,
            preroll_samples: (Self::PREROLL_SECS * rate) as usize,
            preroll: Vec::new(),
            recorded: Vec::new(),
            silent_run: 0,
            state: EndpointState::Waiting,
        }
    }

    /// Feed one chunk of mono samples; returns the state after the chunk.
    pub fn feed(&mut self, chunk: &[f32]) -> EndpointState {
        match self.state {
            EndpointState::Waiting => {
                if rms(chunk) >= self.energy_threshold {
                    self.state = EndpointState::Recording;
                    let preroll = std::mem::take(&mut self.preroll);
                    self.recorded.extend_from_slice(&preroll);
                    self.ingest(chunk);
                } else {
                    self.preroll.extend_from_slice(chunk);
                    let excess = self.preroll.len().saturating_sub(self.preroll_samples);
                    if excess > 0 {
                        self.preroll.drain(..excess);
                    }
                }
            }
            EndpointState::Recording => self.ingest(chunk),
            EndpointState::Complete => {}
        }
        self.state
    }

    fn ingest(&mut self, chunk: &[f32]) {
        self.recorded.extend_from_slice(chunk);

        if rms(chunk) < self.energy_threshold {
            self.silent_run += chunk.len();
        } else {
            self.silent_run = 0;
        }

        if self.silent_run >= self.silence_samples || self.recorded.len() >= self.max_samples {
            self.recorded.truncate(self.max_samples);
            self.state = EndpointState::Complete;
        }
    }

    /// Whether speech has been detected yet.
    pub fn heard_speech(&self) -> bool {
        !matches!(self.state, EndpointState::Waiting)
    }

    /// Consume the endpointer and return the captured utterance.
    pub fn into_samples(self) -> Vec<f32> {
        self.recorded
    }
}

/// Root-mean-square level of a chunk.
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
