//! Tests for the transport contract

use hvdbg_protocol::{send, ControlCode, ResponseBuffer, Transport, TransportError};

/// Writes a fixed pattern and reports a configurable length
struct PatternTransport
{
    report: usize,
    calls: usize,
}

impl Transport for PatternTransport
{
    fn exchange(&mut self, _code: ControlCode, _request: &[u8], response: &mut [u8]) -> Result<usize, TransportError>
    {
        self.calls += 1;
        for (i, byte) in response.iter_mut().enumerate().take(self.report) {
            *byte = 0xa0 + i as u8;
        }
        Ok(self.report)
    }
}

struct FailingTransport;

impl Transport for FailingTransport
{
    fn exchange(&mut self, _code: ControlCode, _request: &[u8], _response: &mut [u8]) -> Result<usize, TransportError>
    {
        Err(TransportError::Failed {
            code: Some(0x1f),
            reason: "device not functioning".to_string(),
        })
    }
}

#[test]
fn test_zeroed_buffer_has_nothing_returned()
{
    let buffer = ResponseBuffer::zeroed(16);
    assert_eq!(buffer.capacity(), 16);
    assert_eq!(buffer.returned_len(), 0);
    assert!(buffer.is_partial());
    assert_eq!(buffer.get(0), None);
}

#[test]
fn test_send_records_partial_length()
{
    let mut transport = PatternTransport { report: 10, calls: 0 };
    let buffer = send(&mut transport, ControlCode::ReadMemory, &[0; 24], 16).unwrap();

    assert_eq!(transport.calls, 1);
    assert_eq!(buffer.returned_len(), 10);
    assert!(buffer.is_partial());
    assert_eq!(buffer.get(9), Some(0xa9));
    assert_eq!(buffer.get(10), None);
    assert_eq!(buffer.filled().len(), 10);
}

#[test]
fn test_send_rejects_overrun()
{
    let mut transport = PatternTransport { report: 32, calls: 0 };
    let err = send(&mut transport, ControlCode::ReadMemory, &[0; 24], 16).unwrap_err();
    assert!(matches!(err, TransportError::Overrun { returned: 32, capacity: 16 }));
}

#[test]
fn test_send_propagates_os_code()
{
    let err = send(&mut FailingTransport, ControlCode::ReadOrWriteMsr, &[0; 24], 8).unwrap_err();
    assert_eq!(err.os_code(), Some(0x1f));
}

#[test]
fn test_wide_reads_need_every_byte()
{
    let mut transport = PatternTransport { report: 6, calls: 0 };
    let buffer = send(&mut transport, ControlCode::ReadMemory, &[], 16).unwrap();

    assert_eq!(buffer.u32_at(0), Some(0xa3a2_a1a0));
    assert_eq!(buffer.u32_at(4), None);
    assert_eq!(buffer.u64_at(0), None);
}

#[test]
fn test_from_returned_clamps_length()
{
    let buffer = ResponseBuffer::from_returned(vec![1, 2, 3], 8);
    assert_eq!(buffer.returned_len(), 3);
    assert!(!buffer.is_partial());
}
