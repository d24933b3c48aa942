use crate::core::grid::array::ChannelArray;
use crate::core::grid::geometry::GridGeometry;
use std::io::{self, Write};

/// Significant digits used for every number in a map file.
const MAP_PRECISION: usize = 5;

/// Formats `value` like C's `%.{digits}g`: shortest of fixed or exponent
/// notation, trailing zeros removed.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Writes one channel as an AutoDock4 grid map.
///
/// The header carries the spacing, the cell count per axis, and the grid
/// center; samples follow one per line with `x` varying fastest.
pub fn write_map_grid<W: Write>(
    writer: &mut W,
    geometry: &GridGeometry,
    array: &ChannelArray,
) -> io::Result<()> {
    let points = geometry.points_per_axis();
    assert_eq!(
        array.points(),
        points,
        "channel array does not match grid geometry"
    );

    let fmt = |v: f64| format_significant(v, MAP_PRECISION);
    let center = geometry.center();

    writeln!(writer, "GRID_PARAMETER_FILE")?;
    writeln!(writer, "GRID_DATA_FILE")?;
    writeln!(writer, "MACROMOLECULE")?;
    writeln!(writer, "SPACING {}", fmt(geometry.resolution()))?;
    let n = geometry.count();
    writeln!(writer, "NELEMENTS {n} {n} {n}")?;
    writeln!(
        writer,
        "CENTER {} {} {}",
        fmt(center.x),
        fmt(center.y),
        fmt(center.z)
    )?;

    for k in 0..points {
        for j in 0..points {
            for i in 0..points {
                writeln!(writer, "{}", fmt(array.get(i, j, k) as f64))?;
            }
        }
    }
    Ok(())
}
