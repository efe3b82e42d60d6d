//! Minimal RFC 4180 record writer.
//!
//! Fields containing a comma, a double quote, CR or LF are quoted, with inner
//! quotes doubled. Records end with CRLF.

use std::io::{self, Write};

/// Writes CSV records to `W`.
pub struct CsvWriter<W: Write> {
    out: W,
    records: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: 0,
        }
    }

    /// Write one record.
    pub fn write_record<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.out.write_all(b",")?;
            }
            write_field(&mut self.out, field.as_ref())?;
        }
        self.out.write_all(b"\r\n")?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far, header included.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
}

fn write_field(out: &mut impl Write, field: &str) -> io::Result<()> {
    if !needs_quotes(field) {
        return out.write_all(field.as_bytes());
    }
    out.write_all(b"\"")?;
    out.write_all(field.replace('"', "\"\"").as_bytes())?;
    out.write_all(b"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fields: &[&str]) -> String {
        let mut writer = CsvWriter::new(Vec::new());
        writer.write_record(fields).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(render(&["name", "type", ""]), "name,type,\r\n");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(render(&["a,b", "say \"hi\"", "x"]), "\"a,b\",\"say \"\"hi\"\"\",x\r\n");
        assert_eq!(render(&["line\nbreak"]), "\"line\nbreak\"\r\n");
    }

    #[test]
    fn test_escaped_paths_stay_unquoted() {
        // Encoded names never contain a raw comma, so a single path needs no quotes.
        assert_eq!(render(&["My Drive/a\\54b"]), "My Drive/a\\54b\r\n");
    }

    #[test]
    fn test_record_count() {
        let mut writer = CsvWriter::new(Vec::new());
        writer.write_record(["h1", "h2"]).unwrap();
        writer.write_record(["v1", "v2"]).unwrap();
        assert_eq!(writer.records(), 2);
    }
}
