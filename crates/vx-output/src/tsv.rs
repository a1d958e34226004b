//! Tab-separated trace backend.
//!
//! Lines are unquoted and newline-terminated.  Rows of different widths may
//! share a stream (`Rx` lines with and without a delay column).

use std::io::Write;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::writer::TraceWriter;
use crate::{ChannelSampleRow, OutputError, OutputResult, PacketRow, SampleLayout};

/// Writes trace rows to any `io::Write` sink.
pub struct TsvTrace<W: Write> {
    inner: Writer<W>,
    lines: u64,
}

impl<W: Write> TsvTrace<W> {
    pub fn new(sink: W) -> Self {
        let inner = WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Never)
            .has_headers(false)
            .flexible(true)
            .from_writer(sink);
        Self { inner, lines: 0 }
    }

    /// Number of lines appended so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> OutputResult<W> {
        self.inner.into_inner().map_err(|e| OutputError::Io(e.into_error()))
    }

    fn append<I, T>(&mut self, fields: I) -> OutputResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.inner.write_record(fields)?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write> TraceWriter for TsvTrace<W> {
    fn write_packet(&mut self, row: &PacketRow) -> OutputResult<()> {
        let mut fields = vec![
            row.direction.as_str().to_owned(),
            row.time.to_string(),
            row.size.to_string(),
        ];
        if let Some(delay) = row.delay_ns {
            fields.push(delay.to_string());
        }
        self.append(&fields)
    }

    fn write_sample(&mut self, row: &ChannelSampleRow<'_>, layout: SampleLayout) -> OutputResult<()> {
        match layout {
            SampleLayout::Compact => self.append([
                row.time.to_string(),
                row.path_loss.to_string(),
                row.distance.to_string(),
                row.weather_att.to_string(),
                row.period.to_string(),
            ]),
            SampleLayout::Extended => self.append([
                row.time.to_string(),
                row.speed_kmh.to_string(),
                row.rain.to_string(),
                row.path_loss.to_string(),
                row.distance.to_string(),
                row.weather_att.to_string(),
                row.weather_cond.to_string(),
                row.scenario.to_owned(),
                row.rain.to_string(),
                row.k.to_string(),
                row.alpha.to_string(),
                row.channel_condition.to_owned(),
            ]),
        }
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}
