//! Decode encoded paths from a report.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;

use crate::codec::decode_path_list;

/// Print the raw names of encoded paths, one path per line.
///
/// Each argument is a `paths` cell (one or more encoded paths joined by `,`) or a
/// single encoded owner or grantee.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Encoded values, as they appear in the report
    #[arg(value_name = "ENCODED", required = true)]
    encoded: Vec<String>,
}

impl DecodeCommand {
    /// Decode and print every value.
    ///
    /// # Errors
    ///
    /// Returns a [`GdscanError::Decode`](crate::core::GdscanError::Decode) for the
    /// first malformed value; nothing is printed for it.
    pub fn execute(self) -> Result<()> {
        let stdout = std::io::stdout();
        self.write_to(&mut stdout.lock())
    }

    fn write_to(&self, out: &mut impl Write) -> Result<()> {
        for text in &self.encoded {
            for names in decode_path_list(text)? {
                writeln!(out, "{}", names.join("/")).context("Failed to write to stdout")?;
            }
        }
        Ok(())
    }
}
