use crate::FileSinkManager;

use std::io;
use std::sync::Mutex;

/// Reusable output buffers that stage a full rendered line before it hits
/// the file sink, so the sink lock is held for exactly one write per line.
/// Buffers are created on demand: acquisition never blocks on an empty pool.
pub struct WriterPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    buffer_size: usize,
}

impl WriterPool {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
            buffer_size,
        }
    }

    fn acquire(&self) -> Vec<u8> {
        self.buffers
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.buffer_size))
    }

    fn release(&self, mut buffer: Vec<u8>) {
        buffer.clear();
        buffer.shrink_to(self.buffer_size);
        self.buffers.lock().unwrap().push(buffer);
    }

    /// Stage the line in a pooled buffer and hand it to the sink in one call.
    /// Write errors surface to the caller; the buffer returns to the pool
    /// either way.
    pub fn write(&self, sink: &FileSinkManager, line: &str) -> io::Result<()> {
        let mut buffer = self.acquire();
        buffer.extend_from_slice(line.as_bytes());

        let result = sink.write(&buffer);
        self.release(buffer);
        result
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }
}
