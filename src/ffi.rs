//! C ABI for GUI front-ends.
//!
//! A front-end loads one context at startup, lists the districts, and calls
//! `segment_predict` per form submission. On failure a function returns null
//! (or a negative count) and `segment_last_error` describes why.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::path::Path;

use crate::context::AppContext;
use crate::data::form::{FormInput, Position};
use crate::error::SegmentError;

pub const SEGMENT_CLASSES: usize = 4;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(err: &SegmentError) {
    log::error!("{}: {}", err.kind(), err);
    let message = CString::new(format!("{}: {}", err.kind(), err).replace('\0', " ")).ok();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

unsafe fn path_arg<'a>(ptr: *const libc::c_char, field: &'static str) -> Result<&'a Path, SegmentError> {
    if ptr.is_null() {
        return Err(SegmentError::invalid_input(field, "null pointer"));
    }
    let text = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| SegmentError::invalid_input(field, "not valid UTF-8"))?;
    Ok(Path::new(text))
}

#[repr(C)]
pub struct SegmentPrediction {
    pub class_code: i64,
    /// Owned UTF-8 label; released by `segment_prediction_free`.
    pub label: *mut libc::c_char,
    pub has_probabilities: bool,
    pub probabilities: [f64; SEGMENT_CLASSES],
}

#[unsafe(no_mangle)]
pub extern "C" fn segment_context_load(
    dataset_path: *const libc::c_char,
    model_path: *const libc::c_char,
) -> *mut AppContext {
    let loaded = unsafe { path_arg(dataset_path, "dataset_path") }.and_then(|dataset| {
        let model = unsafe { path_arg(model_path, "model_path") }?;
        AppContext::load_from(dataset, model)
    });
    match loaded {
        Ok(ctx) => {
            clear_last_error();
            Box::into_raw(Box::new(ctx))
        }
        Err(e) => {
            set_last_error(&e);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn segment_context_free(ctx: *mut AppContext) {
    if !ctx.is_null() {
        unsafe {
            let _ = Box::from_raw(ctx);
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn segment_district_count(ctx: *const AppContext) -> libc::c_int {
    match unsafe { ctx.as_ref() } {
        Some(ctx) => ctx.districts().names().len() as libc::c_int,
        None => -1,
    }
}

/// Writes the NUL-terminated district name into `buf`. Returns the name's
/// length in bytes, or -1 if the index or buffer is unusable.
#[unsafe(no_mangle)]
pub extern "C" fn segment_district_name(
    ctx: *const AppContext,
    index: libc::c_int,
    buf: *mut libc::c_char,
    buf_len: libc::size_t,
) -> libc::c_int {
    let Some(ctx) = (unsafe { ctx.as_ref() }) else {
        return -1;
    };
    let Some(name) = usize::try_from(index)
        .ok()
        .and_then(|i| ctx.districts().names().get(i))
    else {
        return -1;
    };
    let bytes = name.as_bytes();
    if buf.is_null() || bytes.len() + 1 > buf_len {
        return -1;
    }
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, bytes.len());
        *buf.add(bytes.len()) = 0;
    }
    bytes.len() as libc::c_int
}

/// `position` is 0 for front-facing, 1 for alley. `price` is in billions.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn segment_predict(
    ctx: *const AppContext,
    area: f64,
    width: f64,
    floors: f64,
    price: f64,
    bedrooms: i64,
    toilets: i64,
    position: libc::c_int,
    district: *const libc::c_char,
) -> *mut SegmentPrediction {
    let Some(ctx) = (unsafe { ctx.as_ref() }) else {
        set_last_error(&SegmentError::invalid_input("context", "null pointer"));
        return std::ptr::null_mut();
    };

    let result = (|| {
        let position = match position {
            0 => Position::FrontFacing,
            1 => Position::Alley,
            other => {
                return Err(SegmentError::invalid_input(
                    "position",
                    format!("{other} is neither 0 (front-facing) nor 1 (alley)"),
                ));
            }
        };
        if district.is_null() {
            return Err(SegmentError::invalid_input("district", "null pointer"));
        }
        let district = unsafe { CStr::from_ptr(district) }
            .to_str()
            .map_err(|_| SegmentError::invalid_input("district", "not valid UTF-8"))?;

        let form = FormInput {
            area,
            width,
            floors,
            price,
            bedrooms,
            toilets,
            position,
            district: district.to_string(),
        };
        let prediction = ctx.predict(&form)?;

        let label = CString::new(prediction.label.replace('\0', " "))
            .map_err(|e| SegmentError::Prediction(e.to_string()))?;
        let mut probabilities = [0.0; SEGMENT_CLASSES];
        let has_probabilities = match &prediction.probabilities {
            Some(per_class) => {
                if per_class.len() != SEGMENT_CLASSES {
                    return Err(SegmentError::Prediction(format!(
                        "model reports {} class probabilities, the C interface carries {SEGMENT_CLASSES}",
                        per_class.len()
                    )));
                }
                for (slot, p) in probabilities.iter_mut().zip(per_class) {
                    *slot = p.probability;
                }
                true
            }
            None => false,
        };
        Ok(SegmentPrediction {
            class_code: prediction.class_code,
            label: label.into_raw(),
            has_probabilities,
            probabilities,
        })
    })();

    match result {
        Ok(prediction) => {
            clear_last_error();
            Box::into_raw(Box::new(prediction))
        }
        Err(e) => {
            set_last_error(&e);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn segment_prediction_free(result: *mut SegmentPrediction) {
    if !result.is_null() {
        unsafe {
            let result = Box::from_raw(result);
            if !result.label.is_null() {
                let _ = CString::from_raw(result.label);
            }
        }
    }
}

/// Last error on this thread, or null. Valid until the next call into this
/// library from the same thread.
#[unsafe(no_mangle)]
pub extern "C" fn segment_last_error() -> *const libc::c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|message| message.as_ptr())
            .unwrap_or(std::ptr::null())
    })
}
