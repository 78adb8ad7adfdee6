//! Step recording / playback.
//!
//! Provides [`FrameEncoder`] and [`FrameDecoder`] for persisting the
//! per-iteration [`Frame`]s of a search to a byte stream, so a run can be
//! replayed later without re-running the search.
//!
//! ## Wire format
//!
//! Each frame is written as:
//! ```text
//! [total_byte_len: u32 LE]
//! [iteration: u64 LE]
//! [rows: i32 LE]
//! [cols: i32 LE]
//! [num_cells: u32 LE]
//! for each cell:
//!   [row: i32 LE] [col: i32 LE]
//!   [state: u8]  (CellState::code)
//! ```

use std::io::{self, Read, Write};

use crate::cell::CellState;
use crate::geom::{Point, Size};
use crate::grid::{Frame, FrameCell};

/// Bytes per serialized cell: pos(8) + state(1) = 9
const CELL_SIZE: usize = 9;
/// Header size: iteration(8) + rows(4) + cols(4) + num_cells(4) = 20
const HEADER_SIZE: usize = 20;

fn read_u32(data: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&data[at..at + 4]);
    u32::from_le_bytes(b)
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&data[at..at + 4]);
    i32::from_le_bytes(b)
}

fn read_u64(data: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&data[at..at + 8]);
    u64::from_le_bytes(b)
}

// ---------------------------------------------------------------------------
// FrameEncoder
// ---------------------------------------------------------------------------

/// Encodes [`Frame`]s to a byte-oriented writer.
pub struct FrameEncoder<W: Write> {
    writer: W,
}

impl<W: Write> FrameEncoder<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single frame.
    pub fn encode(&mut self, frame: &Frame) -> io::Result<()> {
        let num_cells = u32::try_from(frame.cells.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "frame too large"))?;
        let total_len = u32::try_from(HEADER_SIZE + frame.cells.len() * CELL_SIZE)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "frame too large"))?;

        // Length prefix
        self.writer.write_all(&total_len.to_le_bytes())?;

        // Header
        self.writer.write_all(&frame.iteration.to_le_bytes())?;
        self.writer.write_all(&frame.size.rows.to_le_bytes())?;
        self.writer.write_all(&frame.size.cols.to_le_bytes())?;
        self.writer.write_all(&num_cells.to_le_bytes())?;

        // Cells
        for fc in &frame.cells {
            self.writer.write_all(&fc.pos.row.to_le_bytes())?;
            self.writer.write_all(&fc.pos.col.to_le_bytes())?;
            self.writer.write_all(&[fc.state.code()])?;
        }

        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the encoder, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

// ---------------------------------------------------------------------------
// FrameDecoder
// ---------------------------------------------------------------------------

/// Decodes [`Frame`]s from a byte-oriented reader.
pub struct FrameDecoder<R: Read> {
    reader: R,
}

impl<R: Read> FrameDecoder<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next frame, or `None` at EOF.
    pub fn decode(&mut self) -> io::Result<Option<Frame>> {
        // Read length prefix
        let mut len_buf = [0u8; 4];
        match self.reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let total_len = u32::from_le_bytes(len_buf) as usize;

        if total_len < HEADER_SIZE {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "frame too small"));
        }

        // Header first, so the length prefix is checked before the cell
        // payload is allocated.
        let mut header = [0u8; HEADER_SIZE];
        self.reader.read_exact(&mut header)?;
        let iteration = read_u64(&header, 0);
        let rows = read_i32(&header, 8);
        let cols = read_i32(&header, 12);
        let num_cells = read_u32(&header, 16) as usize;

        let expected = num_cells
            .checked_mul(CELL_SIZE)
            .and_then(|n| n.checked_add(HEADER_SIZE));
        if expected != Some(total_len) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame size mismatch: {num_cells} cells in a {total_len}-byte frame"),
            ));
        }

        if num_cells > Size::new(rows, cols).len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{num_cells} cells in a {rows}x{cols} frame"),
            ));
        }

        // Grows with the bytes actually present instead of trusting the header.
        let payload = num_cells * CELL_SIZE;
        let mut data = Vec::new();
        self.reader.by_ref().take(payload as u64).read_to_end(&mut data)?;
        if data.len() != payload {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "frame payload truncated",
            ));
        }

        // Parse cells
        let mut cells = Vec::with_capacity(num_cells);
        let mut offset = 0;
        for _ in 0..num_cells {
            let row = read_i32(&data, offset);
            let col = read_i32(&data, offset + 4);
            let code = data[offset + 8];
            let state = CellState::from_code(code).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown cell state code {code}"),
                )
            })?;
            cells.push(FrameCell {
                pos: Point::new(row, col),
                state,
            });
            offset += CELL_SIZE;
        }

        Ok(Some(Frame {
            iteration,
            size: Size::new(rows, cols),
            cells,
        }))
    }

    /// Consume the decoder, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for FrameDecoder<R> {
    type Item = io::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode().transpose()
    }
}
