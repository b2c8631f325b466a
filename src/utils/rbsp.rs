use bytes::{BufMut, Bytes, BytesMut};

/// Strips emulation prevention bytes, turning NAL payload bytes into RBSP.
///
/// Every `00 00 03` sequence loses its `03`. The zero counter restarts after a
/// removed byte, so `00 00 03 00 00 03` yields `00 00 00 00`.
pub fn remove_emulation_prevention(data: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(data.len());
    let mut zeros = 0usize;

    for &byte in data {
        if zeros >= 2 && byte == 0x03 {
            zeros = 0;
            continue;
        }
        zeros = if byte == 0x00 { zeros + 1 } else { 0 };
        out.put_u8(byte);
    }

    out.freeze()
}
