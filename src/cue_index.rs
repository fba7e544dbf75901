/*!
 * Time-indexed cue lookup.
 *
 * A lookup returns the first cue, in track order, whose `[start, end]`
 * interval contains the query time. Overlapping cues are resolved by that
 * order alone: the earliest cue in the track wins, not the latest start or
 * the shortest interval.
 */

use std::cmp::Ordering;

use crate::cue_track::{Cue, CueTrack};

/// Linear scan over cues in stored order
pub fn lookup(cues: &[Cue], time: f64) -> Option<&Cue> {
    cues.iter().find(|cue| cue.contains(time))
}

/// Cue track with a start-ordered index over its positions
#[derive(Debug, Clone, Default)]
pub struct CueIndex {
    track: CueTrack,
    /// Track positions ordered by start, ties broken by position
    by_start: Vec<usize>,
    /// `starts[i]` is the start of `track[by_start[i]]`
    starts: Vec<f64>,
}

impl CueIndex {
    pub fn new(track: CueTrack) -> Self {
        let mut by_start: Vec<usize> = (0..track.len()).collect();
        by_start.sort_by(|&a, &b| {
            let (a_cue, b_cue) = (&track.cues()[a], &track.cues()[b]);
            a_cue
                .start()
                .partial_cmp(&b_cue.start())
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        let starts = by_start.iter().map(|&i| track.cues()[i].start()).collect();

        CueIndex { track, by_start, starts }
    }

    pub fn track(&self) -> &CueTrack {
        &self.track
    }

    /// Active cue at `time`
    pub fn lookup(&self, time: f64) -> Option<&Cue> {
        self.lookup_position(time).and_then(|position| self.track.get(position))
    }

    /// Track position of the active cue at `time`.
    ///
    /// Only cues starting at or before `time` are candidates; among those
    /// still running at `time` the lowest track position is returned.
    pub fn lookup_position(&self, time: f64) -> Option<usize> {
        let candidates = self.starts.partition_point(|&start| start <= time);
        let cues = self.track.cues();

        self.by_start[..candidates]
            .iter()
            .copied()
            .filter(|&position| cues[position].end() >= time)
            .min()
    }
}

impl From<CueTrack> for CueIndex {
    fn from(track: CueTrack) -> Self {
        CueIndex::new(track)
    }
}
