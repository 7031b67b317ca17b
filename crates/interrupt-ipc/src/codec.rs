//! Wire encoding for interrupt events.
//!
//! An interrupt notification is a fixed 16-byte record with no length prefix
//! and no version field:
//!
//! | offset | field         | type  |
//! |--------|---------------|-------|
//! | 0      | `event_type`  | i32   |
//! | 4      | `force_type`  | i32   |
//! | 8      | `hint_type`   | i32   |
//! | 12     | `duck_volume` | f32   |
//!
//! All fields are little-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::IpcError;
use crate::event::{ForceType, InterruptEvent, InterruptHint, InterruptType};
use crate::IpcResult;

/// Size of an encoded interrupt event in bytes.
pub const INTERRUPT_EVENT_WIRE_LEN: usize = 16;

/// Encode an event into its wire form.
pub fn encode(event: &InterruptEvent) -> Bytes {
    let mut buf = BytesMut::with_capacity(INTERRUPT_EVENT_WIRE_LEN);
    buf.put_i32_le(event.event_type.as_raw());
    buf.put_i32_le(event.force_type.as_raw());
    buf.put_i32_le(event.hint_type.as_raw());
    buf.put_f32_le(event.duck_volume);
    buf.freeze()
}

/// Decode an event from its wire form.
pub fn decode(mut data: &[u8]) -> IpcResult<InterruptEvent> {
    if data.len() != INTERRUPT_EVENT_WIRE_LEN {
        return Err(IpcError::InvalidLength {
            expected: INTERRUPT_EVENT_WIRE_LEN,
            actual: data.len(),
        });
    }

    let event_type = InterruptType::from_raw(data.get_i32_le());
    let force_type = ForceType::from_raw(data.get_i32_le());
    let hint_type = InterruptHint::from_raw(data.get_i32_le());
    let duck_volume = data.get_f32_le();

    Ok(InterruptEvent {
        event_type,
        force_type,
        hint_type,
        duck_volume,
    })
}
