use std::fmt;
use std::fs;
use std::path::Path;
use log::{debug, warn};

use crate::errors::CueParseError;
use crate::timecode;

// @module: Cue track parsing

// @const: Separator between start and end timestamps
const TIMING_SEPARATOR: &str = "-->";

// @const: Expected header prefix
const HEADER_PREFIX: &str = "WEBVTT";

// @struct: Single timed cue
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Start offset in seconds
    start: f64,

    // @field: End offset in seconds
    end: f64,

    // @field: Cue text, source lines joined by single spaces
    text: String,
}

impl Cue {
    /// Creates a new cue - used by tests and external consumers
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `time` falls inside `[start, end]`, both ends inclusive
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {} {}",
            timecode::format(self.start),
            timecode::format(self.end),
            self.text
        )
    }
}

/// Cue being accumulated while scanning a block
struct PendingCue {
    line: usize,
    start: f64,
    end: f64,
    text: String,
}

impl PendingCue {
    fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }

    fn finish(self) -> Cue {
        if self.end <= self.start {
            warn!(
                "Cue at line {} ends at or before its start ({} --> {})",
                self.line,
                timecode::format(self.start),
                timecode::format(self.end)
            );
        }
        Cue::new(self.start, self.end, self.text)
    }
}

/// Ordered, immutable collection of cues in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueTrack {
    cues: Vec<Cue>,
}

impl CueTrack {
    /// Build a track from already parsed cues, keeping their order
    pub fn from_cues(cues: Vec<Cue>) -> Self {
        CueTrack { cues }
    }

    /// Read and parse a track file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CueParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let track = Self::parse(&content)?;
        debug!("Loaded {} cue(s) from {}", track.len(), path.display());
        Ok(track)
    }

    /// Parse cue track text.
    ///
    /// The first line is a header and is always skipped. Each block is a
    /// timing line followed by text lines and closed by a blank line or the
    /// end of input. A timing line arriving before the previous block was
    /// closed discards that block. Any malformed timestamp fails the whole
    /// parse; no partial track is returned.
    pub fn parse(content: &str) -> Result<Self, CueParseError> {
        let mut cues = Vec::new();
        let mut current: Option<PendingCue> = None;
        let mut lines = content.lines().enumerate();

        if let Some((_, header)) = lines.next() {
            if !header.trim_start_matches('\u{feff}').trim().starts_with(HEADER_PREFIX) {
                warn!("Unexpected cue track header: {:?}", header);
            }
        }

        for (index, raw) in lines {
            let line_number = index + 1;
            let line = raw.trim();

            if line.contains(TIMING_SEPARATOR) {
                let (start, end) = Self::parse_timing_line(line, line_number)?;
                if let Some(dropped) = current.take() {
                    debug!(
                        "Discarding unterminated cue from line {} ({:?})",
                        dropped.line, dropped.text
                    );
                }
                current = Some(PendingCue {
                    line: line_number,
                    start,
                    end,
                    text: String::new(),
                });
            } else if !line.is_empty() {
                if let Some(pending) = current.as_mut() {
                    pending.push_line(line);
                }
            } else if let Some(pending) = current.take() {
                cues.push(pending.finish());
            }
        }

        // Last block without a trailing blank line
        if let Some(pending) = current.take() {
            cues.push(pending.finish());
        }

        Ok(CueTrack { cues })
    }

    /// Split a timing line into start and end offsets
    fn parse_timing_line(line: &str, line_number: usize) -> Result<(f64, f64), CueParseError> {
        let (left, right) = line
            .split_once(TIMING_SEPARATOR)
            .unwrap_or((line, ""));

        // Cue settings may follow the end timestamp
        let end_field = right.split_whitespace().next().unwrap_or("");

        let start = timecode::parse(left.trim())
            .map_err(|source| CueParseError::Format { line: line_number, source })?;
        let end = timecode::parse(end_field)
            .map_err(|source| CueParseError::Format { line: line_number, source })?;

        Ok((start, end))
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Latest end offset of any cue, or zero for an empty track
    pub fn duration(&self) -> f64 {
        self.cues.iter().map(Cue::end).fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a CueTrack {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

impl fmt::Display for CueTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Track")?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        writeln!(f, "Duration: {}", timecode::format(self.duration()))?;
        Ok(())
    }
}
