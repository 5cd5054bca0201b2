//! Abundance histogram output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SplitError;
use crate::table::CountingTable;

/// Write `"<abundance> <slots>"` for every non-empty bin with abundance >= 1.
pub fn write_histogram<W: Write>(w: &mut W, dist: &[u64]) -> std::io::Result<()> {
    for (abundance, &n) in dist.iter().enumerate().skip(1) {
        if n > 0 {
            writeln!(w, "{abundance} {n}")?;
        }
    }
    Ok(())
}

/// Write the abundance distribution of `table` to `path`.
pub fn write_histogram_file<T: CountingTable, P: AsRef<Path>>(
    table: &T,
    path: P,
) -> Result<(), SplitError> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    write_histogram(&mut w, &table.abundance_distribution())?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_zero_bins_and_empty_slots() {
        let mut dist = vec![0u64; 256];
        dist[0] = 90;
        dist[1] = 7;
        dist[3] = 2;
        dist[255] = 1;
        let mut out = Vec::new();
        write_histogram(&mut out, &dist).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 7\n3 2\n255 1\n");
    }
}
