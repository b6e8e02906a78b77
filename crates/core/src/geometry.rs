//! Vector-path geometry: decodes the compact binary opcode streams
//! referenced by path records into path commands, and renders those as
//! SVG-style path data.
//!
//! Opcode format: one tag byte followed by a fixed number of little-endian
//! 32-bit floats — 0x00 close (0), 0x01 moveTo (2), 0x02 lineTo (2),
//! 0x03 quadTo (4), 0x04 cubicTo (6).

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    Close,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadTo {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
}

/// Decode an opcode stream spread over one or more blobs, concatenated in
/// declared order. Truncation mid-record and unrecognized tag bytes stop
/// decoding and return the commands parsed so far; this never fails.
pub fn decode_commands(blobs: &[&[u8]]) -> Vec<PathCommand> {
    let stream: Vec<u8> = blobs.iter().flat_map(|b| b.iter().copied()).collect();
    let mut commands = Vec::new();
    let mut pos = 0;

    while pos < stream.len() {
        let tag = stream[pos];
        pos += 1;
        let operand_count = match tag {
            0x00 => 0,
            0x01 | 0x02 => 2,
            0x03 => 4,
            0x04 => 6,
            _ => return commands,
        };
        let Some(operands) = read_floats(&stream, pos, operand_count) else {
            return commands;
        };
        pos += operand_count * 4;

        commands.push(match tag {
            0x00 => PathCommand::Close,
            0x01 => PathCommand::MoveTo {
                x: operands[0],
                y: operands[1],
            },
            0x02 => PathCommand::LineTo {
                x: operands[0],
                y: operands[1],
            },
            0x03 => PathCommand::QuadTo {
                x1: operands[0],
                y1: operands[1],
                x: operands[2],
                y: operands[3],
            },
            _ => PathCommand::CubicTo {
                x1: operands[0],
                y1: operands[1],
                x2: operands[2],
                y2: operands[3],
                x: operands[4],
                y: operands[5],
            },
        });
    }
    commands
}

fn read_floats(stream: &[u8], pos: usize, count: usize) -> Option<[f64; 6]> {
    if pos + count * 4 > stream.len() {
        return None;
    }
    let mut out = [0.0; 6];
    for (i, slot) in out.iter_mut().enumerate().take(count) {
        let at = pos + i * 4;
        let bits = u32::from_le_bytes([
            stream[at],
            stream[at + 1],
            stream[at + 2],
            stream[at + 3],
        ]);
        *slot = f64::from(f32::from_bits(bits));
    }
    Some(out)
}

/// Rescale every coordinate pair by axis-independent factors. Command
/// letters are untouched; only operands change.
pub fn scale_commands(commands: &mut [PathCommand], sx: f64, sy: f64) {
    for command in commands {
        match command {
            PathCommand::Close => {}
            PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                *x *= sx;
                *y *= sy;
            }
            PathCommand::QuadTo { x1, y1, x, y } => {
                *x1 *= sx;
                *y1 *= sy;
                *x *= sx;
                *y *= sy;
            }
            PathCommand::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                *x1 *= sx;
                *y1 *= sy;
                *x2 *= sx;
                *y2 *= sy;
                *x *= sx;
                *y *= sy;
            }
        }
    }
}

/// Render commands as SVG path data (`M20 20L0 0Z`).
pub fn to_path_data(commands: &[PathCommand]) -> String {
    let mut out = String::with_capacity(commands.len() * 12);
    for command in commands {
        match command {
            PathCommand::Close => out.push('Z'),
            PathCommand::MoveTo { x, y } => {
                out.push('M');
                push_pair(&mut out, *x, *y);
            }
            PathCommand::LineTo { x, y } => {
                out.push('L');
                push_pair(&mut out, *x, *y);
            }
            PathCommand::QuadTo { x1, y1, x, y } => {
                out.push('Q');
                push_pair(&mut out, *x1, *y1);
                out.push(' ');
                push_pair(&mut out, *x, *y);
            }
            PathCommand::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                out.push('C');
                push_pair(&mut out, *x1, *y1);
                out.push(' ');
                push_pair(&mut out, *x2, *y2);
                out.push(' ');
                push_pair(&mut out, *x, *y);
            }
        }
    }
    out
}

fn push_pair(out: &mut String, x: f64, y: f64) {
    out.push_str(&fmt_coord(x));
    out.push(' ');
    out.push_str(&fmt_coord(y));
}

/// Round to 2 decimals; snap magnitudes below 0.005 to exactly `0` so the
/// output never carries `-0` or near-zero noise.
fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded.abs() < 0.005 { 0.0 } else { rounded };
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_to(x: f32, y: f32) -> Vec<u8> {
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&x.to_le_bytes());
        bytes.extend_from_slice(&y.to_le_bytes());
        bytes
    }

    #[test]
    fn decodes_a_full_subpath() {
        let mut stream = move_to(0.0, 0.0);
        stream.push(0x02);
        stream.extend_from_slice(&10.0f32.to_le_bytes());
        stream.extend_from_slice(&0.0f32.to_le_bytes());
        stream.push(0x00);
        let commands = decode_commands(&[&stream]);
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo { x: 0.0, y: 0.0 },
                PathCommand::LineTo { x: 10.0, y: 0.0 },
                PathCommand::Close,
            ]
        );
        assert_eq!(to_path_data(&commands), "M0 0L10 0Z");
    }

    #[test]
    fn truncated_stream_returns_partial_result() {
        let mut stream = move_to(1.0, 2.0);
        stream.push(0x04);
        stream.extend_from_slice(&3.0f32.to_le_bytes()); // 5 floats short
        let commands = decode_commands(&[&stream]);
        assert_eq!(commands, vec![PathCommand::MoveTo { x: 1.0, y: 2.0 }]);
    }

    #[test]
    fn unknown_tag_stops_early() {
        let mut stream = move_to(1.0, 1.0);
        stream.push(0x7F);
        stream.extend_from_slice(&[0; 8]);
        let commands = decode_commands(&[&stream]);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn blobs_concatenate_in_declared_order() {
        let first = move_to(0.0, 0.0);
        let mut second = vec![0x02];
        second.extend_from_slice(&5.0f32.to_le_bytes());
        second.extend_from_slice(&5.0f32.to_le_bytes());
        let commands = decode_commands(&[&first, &second]);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn rescale_multiplies_each_axis_independently() {
        let mut commands = decode_commands(&[&move_to(10.0, 20.0)]);
        scale_commands(&mut commands, 2.0, 1.0);
        assert_eq!(to_path_data(&commands), "M20 20");
    }

    #[test]
    fn identity_rescale_is_byte_identical() {
        let stream = move_to(3.25, 7.5);
        let plain = to_path_data(&decode_commands(&[&stream]));
        let mut scaled = decode_commands(&[&stream]);
        scale_commands(&mut scaled, 1.0, 1.0);
        assert_eq!(to_path_data(&scaled), plain);
    }

    #[test]
    fn near_zero_snaps_to_plain_zero() {
        let commands = vec![PathCommand::MoveTo {
            x: -0.001,
            y: 0.004,
        }];
        assert_eq!(to_path_data(&commands), "M0 0");
    }

    #[test]
    fn coordinates_round_to_two_decimals() {
        let commands = vec![PathCommand::LineTo {
            x: 1.234,
            y: -2.678,
        }];
        assert_eq!(to_path_data(&commands), "L1.23 -2.68");
    }
}
