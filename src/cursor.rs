//! Rewindable read position over an immutable character sequence.
//!
//! The same cursor type drives pattern parsing and subject matching. It is a
//! small `Copy` value (slice reference plus three indices), so taking a
//! checkpoint before a speculative match is just a copy, and restoring it is
//! an assignment.
//!
//! A cursor may be narrowed to a window `[start, end)` of its text. Positions
//! stay absolute, which keeps parse offsets and node labels aligned with the
//! original pattern while a group or charset body is parsed in place.

/// A read position over `text`, confined to the window `[start, end)`.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    text: &'a [char],
    start: usize,
    end: usize,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the beginning of `text`.
    pub fn new(text: &'a [char]) -> Self {
        Self {
            text,
            start: 0,
            end: text.len(),
            pos: 0,
        }
    }

    /// Narrow to `[start, end)`, positioned at `start`.
    ///
    /// Panics if the window is not inside the current one.
    pub fn window(&self, start: usize, end: usize) -> Self {
        assert!(
            self.start <= start && start <= end && end <= self.end,
            "cursor window {}..{} outside {}..{}",
            start,
            end,
            self.start,
            self.end
        );
        Self {
            text: self.text,
            start,
            end,
            pos: start,
        }
    }

    /// Copy of this cursor positioned at `pos`.
    #[inline]
    pub fn at(&self, pos: usize) -> Self {
        let mut cursor = *self;
        cursor.restore(pos);
        cursor
    }

    /// Current absolute position (the snapshot value).
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return to a position previously obtained from [`Cursor::position`].
    #[inline]
    pub fn restore(&mut self, pos: usize) {
        assert!(
            self.start <= pos && pos <= self.end,
            "cursor position {} outside {}..={}",
            pos,
            self.start,
            self.end
        );
        self.pos = pos;
    }

    /// Read the next character and advance; `None` at end of input.
    #[inline]
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// The next character without advancing.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        if self.pos < self.end {
            Some(self.text[self.pos])
        } else {
            None
        }
    }

    /// The character just before the position; `None` at the window start.
    #[inline]
    pub fn look_behind(&self) -> Option<char> {
        if self.pos > self.start {
            Some(self.text[self.pos - 1])
        } else {
            None
        }
    }

    /// Move back `n` characters.
    ///
    /// Rolling back past the window start means the caller's advances and
    /// rollbacks are unbalanced, which is a bug; this panics.
    #[inline]
    pub fn step_back(&mut self, n: usize) {
        assert!(
            n <= self.pos - self.start,
            "unbalanced rollback of {} at position {}",
            n,
            self.pos
        );
        self.pos -= n;
    }

    /// Move forward `n` characters. Panics when overrunning the window end.
    #[inline]
    pub fn step_forward(&mut self, n: usize) {
        assert!(
            n <= self.end - self.pos,
            "advance of {} past end at position {}",
            n,
            self.pos
        );
        self.pos += n;
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Characters between two absolute positions, clamped to the text.
    pub fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.text.len());
        let from = from.min(to);
        self.text[from..to].iter().collect()
    }
}
