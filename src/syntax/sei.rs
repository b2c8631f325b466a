use bytes::Bytes;

use crate::error::{DemuxError, Result};

/// payloadType of a buffering period SEI message in H.264, H.265 and H.266.
pub const BUFFERING_PERIOD: u32 = 0;

/// One sei_message() with its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeiMessage {
    /// payloadType
    pub payload_type: u32,
    /// payload_size bytes of sei_payload()
    pub payload: Bytes,
}

/// Splits an SEI RBSP (NAL header removed, emulation prevention undone) into
/// its messages.
///
/// Stops at the rbsp_trailing_bits byte, ignoring any trailing zero bytes
/// after it, or at the end of the data.
pub fn split_sei_messages(rbsp: &Bytes) -> Result<Vec<SeiMessage>> {
    let end = rbsp_data_end(rbsp);
    let data = &rbsp[..end];
    let mut messages = Vec::new();
    let mut pos = 0;

    while pos < end {
        let payload_type = read_ff_coded(data, &mut pos)?;
        let payload_size = read_ff_coded(data, &mut pos)? as usize;

        let msg_end = pos + payload_size;
        if msg_end > end {
            return Err(DemuxError::InvalidData(format!(
                "SEI payload of type {} needs {} bytes, {} left",
                payload_type,
                payload_size,
                end - pos
            )));
        }
        messages.push(SeiMessage {
            payload_type,
            payload: rbsp.slice(pos..msg_end),
        });
        pos = msg_end;
    }

    Ok(messages)
}

/// Length of the message data: trailing zero bytes are dropped, then the
/// `0x80` byte holding rbsp_stop_one_bit.
fn rbsp_data_end(rbsp: &[u8]) -> usize {
    match rbsp.iter().rposition(|&b| b != 0) {
        Some(last) if rbsp[last] == 0x80 => last,
        Some(last) => last + 1,
        None => 0,
    }
}

/// Reads a value coded as a run of 0xFF bytes plus one final byte.
fn read_ff_coded(data: &[u8], pos: &mut usize) -> Result<u32> {
    let mut value = 0u32;
    loop {
        let byte = *data
            .get(*pos)
            .ok_or_else(|| DemuxError::InvalidData("SEI message header truncated".into()))?;
        *pos += 1;
        value = value
            .checked_add(byte as u32)
            .ok_or_else(|| DemuxError::InvalidData("SEI header value overflow".into()))?;
        if byte != 0xFF {
            return Ok(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_messages() {
        let mut rbsp = vec![0x00, 0x02, 0xAA, 0xBB];
        // type 0xFF + 0x04 = 259, size 1
        rbsp.extend_from_slice(&[0xFF, 0x04, 0x01, 0xCC, 0x80]);
        let messages = split_sei_messages(&Bytes::from(rbsp)).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].payload_type, BUFFERING_PERIOD);
        assert_eq!(&messages[0].payload[..], &[0xAA, 0xBB]);
        assert_eq!(messages[1].payload_type, 259);
        assert_eq!(&messages[1].payload[..], &[0xCC]);
    }

    #[test]
    fn test_overrun_is_invalid() {
        let rbsp = Bytes::from_static(&[0x05, 0x10, 0x00, 0x80]);
        assert!(matches!(
            split_sei_messages(&rbsp),
            Err(DemuxError::InvalidData(_))
        ));
        let truncated = Bytes::from_static(&[0x05, 0xFF]);
        assert!(split_sei_messages(&truncated).is_err());
    }

    #[test]
    fn test_trailing_zero_bytes_after_stop_bit() {
        let rbsp = Bytes::from_static(&[0x00, 0x01, 0xAA, 0x80, 0x00]);
        let messages = split_sei_messages(&rbsp).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(&messages[0].payload[..], &[0xAA]);

        let rbsp = Bytes::from_static(&[0x00, 0x01, 0xAA, 0x80, 0x00, 0x00]);
        assert_eq!(split_sei_messages(&rbsp).unwrap(), messages);
        assert!(split_sei_messages(&Bytes::from_static(&[0x80, 0x00, 0x00]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_empty_rbsp() {
        assert!(split_sei_messages(&Bytes::from_static(&[0x80])).unwrap().is_empty());
        assert!(split_sei_messages(&Bytes::new()).unwrap().is_empty());
    }
}
