//! Incremental request completeness detection.
//!
//! The detector is a byte-at-a-time state machine over the minimal request
//! grammar: a request line, optional header lines, and a blank line. A request
//! line that ends right after the URI is a legacy HTTP/0.9 request and is
//! complete on its own.
//!
//! ```text
//!  Word1 ──' '──▶ Space1 ──byte──▶ Word2 ──'\n'──▶ Complete (HTTP/0.9)
//!                                    │
//!                                   ' '
//!                                    ▼
//!                                  Space2 ──byte──▶ Word3 ──'\n'──▶ LineFeed
//!                                                                    │   ▲
//!                                                  '\n' ◀────────────┘   │
//!                                                   │      other         │ '\n'
//!                                                Complete    └──▶ HeaderLine
//! ```
//!
//! The detector keeps a cursor so repeated calls over a growing buffer only
//! scan bytes that have not been seen yet.

/// Scanner position within the request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectState {
    /// Scanning the method token
    Word1,
    /// Spaces between method and URI
    Space1,
    /// Scanning the URI token
    Word2,
    /// Spaces between URI and version
    Space2,
    /// Scanning the version token
    Word3,
    /// Just saw a line feed; a second one ends the head
    LineFeed,
    /// Inside a header line
    HeaderLine,
}

/// Result of feeding bytes to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// More bytes are needed.
    Incomplete,
    /// `boundary` bytes form one complete request. `legacy` marks HTTP/0.9.
    Complete { boundary: usize, legacy: bool },
    /// Byte at `offset` is not allowed in `state`.
    Malformed { offset: usize, state: DetectState },
}

/// What a single byte does to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Stay,
    Goto(DetectState),
    Done { legacy: bool },
    Reject,
}

/// Transition table. Kept free of any cursor bookkeeping so it can be read
/// against the grammar on its own.
fn step(state: DetectState, c: u8) -> Step {
    use DetectState::*;

    match (state, c) {
        (Word1, b' ') => Step::Goto(Space1),
        (Word1, c) if c.is_ascii_alphabetic() => Step::Stay,
        (Word1, _) => Step::Reject,

        (Space1, b' ') => Step::Stay,
        (Space1, b'\r' | b'\n' | b'\t') => Step::Reject,
        (Space1, _) => Step::Goto(Word2),

        (Word2, b'\n') => Step::Done { legacy: true },
        (Word2, b' ') => Step::Goto(Space2),
        (Word2, b'\t') => Step::Reject,
        (Word2, _) => Step::Stay,

        (Space2, b' ') => Step::Stay,
        (Space2, b'\r' | b'\n' | b'\t') => Step::Reject,
        (Space2, _) => Step::Goto(Word3),

        (Word3, b'\n') => Step::Goto(LineFeed),
        (Word3, b' ' | b'\t') => Step::Reject,
        (Word3, _) => Step::Stay,

        (LineFeed, b'\n') => Step::Done { legacy: false },
        (LineFeed, b'\r') => Step::Stay,
        (LineFeed, _) => Step::Goto(HeaderLine),

        (HeaderLine, b'\n') => Step::Goto(LineFeed),
        (HeaderLine, _) => Step::Stay,
    }
}

#[derive(Debug, Clone)]
pub struct RequestDetector {
    state: DetectState,
    cursor: usize,
    outcome: Option<Detection>,
}

impl Default for RequestDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDetector {
    pub fn new() -> Self {
        Self {
            state: DetectState::Word1,
            cursor: 0,
            outcome: None,
        }
    }

    /// Scans the bytes of `buf` past the cursor.
    ///
    /// `buf` must be the same growing buffer on every call. Once the detector
    /// has reached `Complete` or `Malformed` it keeps returning that outcome
    /// until [`RequestDetector::reset`]. Bytes past a complete request are
    /// never examined.
    pub fn feed(&mut self, buf: &[u8]) -> Detection {
        if let Some(done) = self.outcome {
            return done;
        }

        while self.cursor < buf.len() {
            let c = buf[self.cursor];

            match step(self.state, c) {
                Step::Stay => {}
                Step::Goto(next) => self.state = next,
                Step::Done { legacy } => {
                    self.cursor += 1;
                    return self.finish(Detection::Complete {
                        boundary: self.cursor,
                        legacy,
                    });
                }
                Step::Reject => {
                    return self.finish(Detection::Malformed {
                        offset: self.cursor,
                        state: self.state,
                    });
                }
            }

            self.cursor += 1;
        }

        Detection::Incomplete
    }

    /// Number of bytes scanned so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> DetectState {
        self.state
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn finish(&mut self, detection: Detection) -> Detection {
        self.outcome = Some(detection);
        detection
    }
}
