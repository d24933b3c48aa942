use crate::core::grid::array::ChannelArray;
use std::io::{self, Read, Write};

/// Writes every channel interleaved per grid point as little-endian `f32`.
///
/// Points are visited with `i` outermost and `k` innermost. At each point the
/// `fixed` channels are written first, then the `variable` channels, giving a
/// channel-last `[i][j][k][channel]` tensor with no header.
pub fn write_binmap<W: Write>(
    writer: &mut W,
    fixed: &[ChannelArray],
    variable: &[ChannelArray],
) -> io::Result<()> {
    let Some(points) = fixed.iter().chain(variable).map(ChannelArray::points).next() else {
        return Ok(());
    };
    assert!(
        fixed.iter().chain(variable).all(|a| a.points() == points),
        "all channel arrays must share one size"
    );

    let channels: Vec<&[f32]> = fixed
        .iter()
        .chain(variable)
        .map(ChannelArray::as_slice)
        .collect();
    let mut record = Vec::with_capacity(channels.len() * 4);
    for offset in 0..points * points * points {
        record.clear();
        for channel in &channels {
            record.extend_from_slice(&channel[offset].to_le_bytes());
        }
        writer.write_all(&record)?;
    }
    Ok(())
}

/// Reads a packed stream back into channel-last order, `[point][channel]`.
pub fn read_binmap<R: Read>(reader: &mut R, channels: usize) -> io::Result<Vec<Vec<f32>>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let stride = channels * 4;
    if stride == 0 || bytes.len() % stride != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "binmap of {} bytes is not a whole number of {}-channel records",
                bytes.len(),
                channels
            ),
        ));
    }
    Ok(bytes
        .chunks_exact(stride)
        .map(|record| {
            record
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        })
        .collect())
}
