// SPDX-License-Identifier: MPL-2.0
//! Cyclic photo index for the gallery.

/// Position inside a list of `len` photos; moving past either end wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GalleryCursor {
    index: usize,
    len: usize,
}

impl GalleryCursor {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Index after `next`: from the last photo back to the first.
    #[must_use]
    pub fn next(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + 1) % self.len,
            ..self
        }
    }

    /// Index after `previous`: from the first photo to the last.
    #[must_use]
    pub fn previous(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + self.len - 1) % self.len,
            ..self
        }
    }

    /// Jumps to `index`; out-of-range values are ignored.
    #[must_use]
    pub fn select(self, index: usize) -> Self {
        if index < self.len {
            Self { index, ..self }
        } else {
            self
        }
    }

    /// 1-based position for the "i / N" counter.
    #[must_use]
    pub fn position(self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.index + 1
        }
    }
}
