//! Dynamic values delivered to consumers and the field readers generated
//! code uses to build them.

use std::ffi::{c_char, CStr};

pub use serde_json::Value;

/// Keyed value map with unique string keys, iterated in insertion order.
pub type ValueMap = serde_json::Map<String, Value>;

/// Boolean key added to every one-shot result map.
pub const IO_FAILURE_KEY: &str = "io_failure";

/// Read a fixed-size character buffer up to the first NUL.
///
/// A buffer without a terminator is read in full. Invalid UTF-8 is replaced.
pub fn text_from_chars(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Read a nullable C string. Null reads as empty text.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
#[allow(unsafe_code)]
pub unsafe fn text_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

/// 64-bit identity objects (user ids, game ids) read as their packed value.
///
/// The host implements this for its native identity types.
pub trait NativeId64 {
    fn to_u64(&self) -> u64;
}

impl NativeId64 for u64 {
    fn to_u64(&self) -> u64 {
        *self
    }
}
