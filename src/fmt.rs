//! Fixed capacity text formatting.

use std::{fmt, ops::Deref, str};

/// Default capacity used for assertion and trace messages.
pub const DEFAULT_MESSAGE_BUFFER_SIZE: usize = 1024;

/// A stack allocated text buffer which never grows.
///
/// Writes past the capacity are truncated at the last UTF-8 character
/// boundary that still fits and the buffer remembers that it was truncated.
/// Writing never fails because of truncation.
pub struct FixedBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> Default for FixedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FixedBuf<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
            truncated: false,
        }
    }

    /// Format `args` into a fresh buffer.
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut buf = Self::new();
        let _ = fmt::Write::write_fmt(&mut buf, args);
        buf
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if any write was cut short.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_str(&self) -> &str {
        // only whole characters are ever copied in
        str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }
}

impl<const N: usize> fmt::Write for FixedBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let room = N - self.len;
        let mut take = s.len().min(room);
        if take < s.len() {
            while !s.is_char_boundary(take) {
                take -= 1;
            }
            self.truncated = true;
        }

        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl<const N: usize> Deref for FixedBuf<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> fmt::Display for FixedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for FixedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedBuf")
            .field("text", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits() {
        let buf = FixedBuf::<16>::format(format_args!("{}-{}", 12, "ab"));
        assert_eq!(buf.as_str(), "12-ab");
        assert!(!buf.truncated());
    }

    #[test]
    fn truncates_at_capacity() {
        let buf = FixedBuf::<4>::format(format_args!("abcdefgh"));
        assert_eq!(buf.as_str(), "abcd");
        assert_eq!(buf.len(), buf.capacity());
        assert!(buf.truncated());
    }

    #[test]
    fn truncates_on_char_boundary() {
        // 'é' is two bytes and would straddle the end
        let buf = FixedBuf::<4>::format(format_args!("abcé"));
        assert_eq!(buf.as_str(), "abc");
        assert!(buf.truncated());
    }

    #[test]
    fn stops_after_truncation() {
        use std::fmt::Write;

        let mut buf = FixedBuf::<3>::new();
        write!(buf, "ab").unwrap();
        write!(buf, "éz").unwrap();
        write!(buf, "z").unwrap();
        assert_eq!(buf.as_str(), "ab");

        buf.clear();
        assert!(buf.is_empty());
        assert!(!buf.truncated());
    }
}
