use std::io::Write;
use std::sync::{Arc, Mutex};

/// Final destination of every formatted line.
pub type Sink = Arc<dyn Fn(&str) + Send + Sync>;

pub fn stdout() -> Sink {
    Arc::new(|line: &str| write_line(&mut std::io::stdout().lock(), line))
}

pub fn stderr() -> Sink {
    Arc::new(|line: &str| write_line(&mut std::io::stderr().lock(), line))
}

/// Writes one line per call into `writer`. Write failures are dropped.
pub fn writer<W: Write + Send + 'static>(writer: W) -> Sink {
    let writer = Mutex::new(writer);

    Arc::new(move |line: &str| {
        if let Ok(mut writer) = writer.lock() {
            write_line(&mut *writer, line);
        }
    })
}

// A closed stream (e.g. a broken pipe) must not take the caller down.
fn write_line<W: Write + ?Sized>(writer: &mut W, line: &str) {
    let _ = writeln!(writer, "{}", line);
    let _ = writer.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn writer_sink_appends_lines() {
        let buffer = SharedBuffer::default();
        let sink = writer(buffer.clone());

        sink("first");
        sink("second");

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "first\nsecond\n");
    }

    #[test]
    fn write_line_ignores_a_closed_stream() {
        write_line(&mut BrokenPipe, "dropped");

        let mut buffer = SharedBuffer::default();
        write_line(&mut buffer, "kept");
        assert_eq!(buffer.0.lock().unwrap().as_slice(), b"kept\n");
    }

    #[test]
    fn std_stream_sinks_do_not_panic() {
        stdout()("to stdout");
        stderr()("to stderr");
    }

    #[test]
    fn writer_sink_swallows_io_errors() {
        let sink = writer(BrokenPipe);

        sink("lost");
    }
}
