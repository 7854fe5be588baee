//! Writes decoded keystrokes to the output sink

use std::cell::RefCell;
use std::io::{self, Write};

use tracing::warn;

use crate::keys::decode;

use super::api::{KeyDown, KeyDownHandler};

/// Decodes each key-down and writes it straight to `W`, flushing per event
///
/// The callback runs on a single thread, so the sink sits behind a
/// `RefCell` rather than a lock.
pub struct Emitter<W: Write> {
    sink: RefCell<W>,
}

impl<W: Write> Emitter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: RefCell::new(sink),
        }
    }

    fn emit(&self, key: KeyDown) -> io::Result<()> {
        let symbol = decode(key.code, key.modifiers);
        let mut sink = self.sink.borrow_mut();
        write!(sink, "{symbol}")?;
        sink.flush()
    }
}

impl Emitter<io::Stdout> {
    /// Emitter writing to the process's standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> KeyDownHandler for Emitter<W> {
    fn on_key_down(&self, key: KeyDown) {
        if let Err(e) = self.emit(key) {
            warn!(code = %key.code, error = %e, "failed to write keystroke");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyCode, ModifierState};

    fn key(code: u16, shift: bool) -> KeyDown {
        KeyDown {
            code: KeyCode(code),
            modifiers: ModifierState { shift },
        }
    }

    /// Records writes and flushes separately
    #[derive(Default)]
    struct Recorder {
        written: Vec<u8>,
        flushed: usize,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed += 1;
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_emits_in_order() {
        let emitter = Emitter::new(Vec::new());

        for k in [key(4, true), key(14, false), key(37, false), key(37, false), key(31, false)] {
            emitter.on_key_down(k);
        }
        emitter.on_key_down(key(49, false));
        emitter.on_key_down(key(36, false));

        let out = emitter.sink.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello Return");
    }

    #[test]
    fn test_flushes_every_event() {
        let emitter = Emitter::new(Recorder::default());

        emitter.on_key_down(key(0, false));
        emitter.on_key_down(key(999, true));

        let recorder = emitter.sink.into_inner();
        assert_eq!(recorder.flushed, 2);
        assert_eq!(
            String::from_utf8(recorder.written).unwrap(),
            "a[Unknown Key: 999] "
        );
    }

    #[test]
    fn test_write_errors_do_not_panic() {
        let emitter = Emitter::new(Broken);
        emitter.on_key_down(key(0, false));
        emitter.on_key_down(key(0, true));
    }
}
