//! Handshake / Outage Detector
//!
//! Reduces the combined visibility series (any relay in view of either
//! beacon) to discrete events. The reducer is a pure
//! `(state, sample) -> (state, output)` step folded left to right:
//!
//! | Previous | Current | Effect                                        |
//! |----------|---------|-----------------------------------------------|
//! | out      | in      | handshake; close the running outage, if any   |
//! | in       | in      | none                                          |
//! | in / out | out     | extend the running outage by one cadence      |
//!
//! Before the first sample the link is out of view but no edge can be
//! observed, so a link already up at sample 0 is not a handshake. An
//! outage still open after the last sample is flushed.

use serde::{Deserialize, Serialize};

/// Rising edge of the combined visibility series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeEvent {
    pub sample: usize,
}

/// Maximal run of samples with no relay in view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageEvent {
    pub start_sample: usize,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkState {
    /// Visibility of the previous sample; `None` before sample 0
    previous: Option<bool>,
    outage_start: usize,
    outage_run_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutput {
    pub handshake: bool,
    pub closed_outage: Option<OutageEvent>,
}

impl LinkState {
    pub fn in_comm(&self) -> bool {
        self.previous.unwrap_or(false)
    }

    /// Seconds accumulated in the currently open outage
    pub fn outage_run_seconds(&self) -> u64 {
        self.outage_run_seconds
    }

    pub fn step(self, sample: usize, visible: bool, cadence_seconds: u64) -> (LinkState, StepOutput) {
        let mut next = self;
        let mut output = StepOutput::default();

        if visible && self.previous == Some(false) {
            output.handshake = true;
            output.closed_outage = self.open_outage();
            next.outage_run_seconds = 0;
        }

        if !visible {
            if next.outage_run_seconds == 0 {
                next.outage_start = sample;
            }
            next.outage_run_seconds += cadence_seconds;
        }

        next.previous = Some(visible);
        (next, output)
    }

    /// Flush an outage still open at the end of the horizon
    pub fn finish(self) -> Option<OutageEvent> {
        if self.in_comm() {
            None
        } else {
            self.open_outage()
        }
    }

    fn open_outage(&self) -> Option<OutageEvent> {
        (self.outage_run_seconds > 0).then_some(OutageEvent {
            start_sample: self.outage_start,
            duration_seconds: self.outage_run_seconds,
        })
    }
}

/// Events detected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTimeline {
    pub cadence_seconds: u32,
    pub handshakes: Vec<HandshakeEvent>,
    pub outages: Vec<OutageEvent>,
    /// 1 where a handshake occurred entering that sample, else 0
    pub handshake_series: Vec<u8>,
    pub in_view_samples: usize,
}

impl LinkTimeline {
    pub fn handshake_count(&self) -> usize {
        self.handshakes.len()
    }

    pub fn outage_durations(&self) -> Vec<u64> {
        self.outages.iter().map(|o| o.duration_seconds).collect()
    }

    pub fn in_view_seconds(&self) -> u64 {
        self.in_view_samples as u64 * self.cadence_seconds as u64
    }

    pub fn samples(&self) -> usize {
        self.handshake_series.len()
    }
}

/// Fold the combined visibility series into handshake and outage events
pub fn detect(series: &[bool], cadence_seconds: u32) -> LinkTimeline {
    let cadence = cadence_seconds as u64;
    let mut timeline = LinkTimeline {
        cadence_seconds,
        handshake_series: Vec::with_capacity(series.len()),
        ..Default::default()
    };

    let final_state = series
        .iter()
        .enumerate()
        .fold(LinkState::default(), |state, (i, &visible)| {
            let (next, output) = state.step(i, visible, cadence);

            if output.handshake {
                timeline.handshakes.push(HandshakeEvent { sample: i });
            }
            timeline.outages.extend(output.closed_outage);
            timeline.handshake_series.push(u8::from(output.handshake));
            if visible {
                timeline.in_view_samples += 1;
            }

            next
        });

    timeline.outages.extend(final_state.finish());
    timeline
}
