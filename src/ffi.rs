//! FFI bindings for Nutriplan
//!
//! This module provides C-compatible functions for calling the planner from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `nutri_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::calculator::{BodyProfile, NutritionCalculator};
use crate::pipeline::intake_to_plan;
use crate::types::{ActivityLevel, Gender, Objective};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Compute a plan record from questionnaire JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `nutri_free_string`.
/// - Returns NULL on error; call `nutri_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn nutri_intake_to_plan(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match intake_to_plan(json_str) {
        Ok(record) => string_to_cstr(&record),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Compute a nutrition plan directly from measurements.
///
/// `gender`, `activity_level` and `objective` are labels (e.g. "female",
/// "very_active", "lose_weight"); `activity_level` and `objective` may be NULL
/// or unrecognised, in which case the defaults apply.
///
/// # Safety
/// - `gender` must be a valid null-terminated C string.
/// - `activity_level` and `objective` must be NULL or valid null-terminated C strings.
/// - Returns a newly allocated JSON string that must be freed with `nutri_free_string`.
/// - Returns NULL on error; call `nutri_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn nutri_calculate(
    gender: *const c_char,
    age: f64,
    weight_kg: f64,
    height_cm: f64,
    activity_level: *const c_char,
    objective: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let gender = match cstr_to_string(gender).as_deref().and_then(Gender::from_label) {
        Some(g) => g,
        None => {
            set_last_error("Invalid gender");
            return ptr::null_mut();
        }
    };

    let profile = BodyProfile {
        gender,
        age,
        weight_kg,
        height_cm,
        activity_level: cstr_to_string(activity_level)
            .as_deref()
            .and_then(ActivityLevel::from_label),
        objective: cstr_to_string(objective)
            .as_deref()
            .and_then(Objective::from_label),
    };

    let result = NutritionCalculator::calculate_profile(&profile)
        .and_then(|plan| serde_json::to_string(&plan).map_err(Into::into));

    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a static string that is valid until the next FFI call.
/// - Do NOT free this pointer.
/// - Returns NULL if there is no error.
#[no_mangle]
pub unsafe extern "C" fn nutri_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Free a string returned by Nutriplan.
///
/// # Safety
/// - `s` must be a pointer returned by a Nutriplan function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn nutri_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_intake_to_plan() {
        let json = CString::new(r#"{"name": "Ana", "age": 28, "weight": 62, "height": 168}"#)
            .unwrap();

        unsafe {
            let result = nutri_intake_to_plan(json.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let record: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(record["intake"]["name"], "Ana");
            assert!(record["plan"]["calories"].as_u64().unwrap() > 0);

            nutri_free_string(result);
        }
    }

    #[test]
    fn test_ffi_calculate() {
        let gender = CString::new("male").unwrap();
        let activity = CString::new("very_active").unwrap();

        unsafe {
            let result = nutri_calculate(gender.as_ptr(), 30.0, 70.0, 175.0, activity.as_ptr(), ptr::null());
            assert!(!result.is_null());

            let plan: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(plan["meals_per_day"], 6);

            nutri_free_string(result);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let gender = CString::new("female").unwrap();

        unsafe {
            let result = nutri_calculate(gender.as_ptr(), 30.0, f64::NAN, 175.0, ptr::null(), ptr::null());
            assert!(result.is_null());

            let error = nutri_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("weight_kg"));

            let result = nutri_intake_to_plan(ptr::null());
            assert!(result.is_null());
        }
    }
}
