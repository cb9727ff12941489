use std::io::{self, Read};
use talkpipe_core::AudioChunk;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Chunks a byte source into [`AudioChunk`]s of a fixed size.
///
/// Every chunk is exactly `chunk_size` bytes except possibly the last one;
/// the sequence ends when the source reports end-of-stream (a zero-byte
/// read). Short reads from the source are accumulated until a chunk fills,
/// so pipe fragmentation never produces undersized chunks mid-stream.
pub struct FrameReader<R: Read> {
    source: R,
    chunk_size: usize,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        Self {
            source,
            chunk_size,
            done: false,
        }
    }

    fn fill_chunk(&mut self) -> io::Result<Option<AudioChunk>> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < self.chunk_size {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        buf.truncate(filled);
        Ok(Some(AudioChunk::new(buf)))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = io::Result<AudioChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.fill_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // A failed source is not resumable; fuse the iterator.
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Async form of the same contract, for sessions that read stdin inside a
/// tokio runtime. `Ok(None)` signals end-of-stream.
pub async fn read_frame<R: AsyncRead + Unpin>(
    source: &mut R,
    chunk_size: usize,
) -> io::Result<Option<AudioChunk>> {
    let mut buf = vec![0u8; chunk_size];
    let mut filled = 0;
    while filled < chunk_size {
        let n = source.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled == 0 {
        return Ok(None);
    }
    buf.truncate(filled);
    Ok(Some(AudioChunk::new(buf)))
}
